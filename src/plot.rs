//! Scatter plots of 2D point sets.

use std::io::{self, Write};

const PLOT_RADIUS: usize = 2;

/// Renders `points` (each coordinate in [0, 1)) as black dots on a white
/// `resolution` x `resolution` image, and writes it as a PNG.
pub fn write_scatter_png<W: Write>(
    points: &[(f32, f32)],
    resolution: usize,
    out: &mut W,
) -> io::Result<()> {
    let width = resolution;
    let height = resolution;
    let mut image = vec![0xffu8; width * height * 4];

    let mut plot = |x: usize, y: usize| {
        let min_x = x.saturating_sub(PLOT_RADIUS);
        let min_y = y.saturating_sub(PLOT_RADIUS);
        let max_x = (x + PLOT_RADIUS + 1).min(width);
        let max_y = (y + PLOT_RADIUS + 1).min(height);

        for yy in min_y..max_y {
            for xx in min_x..max_x {
                let x2 = x as isize - xx as isize;
                let y2 = y as isize - yy as isize;
                if (((x2 * x2) + (y2 * y2)) as f64).sqrt() <= PLOT_RADIUS as f64 {
                    let i = (yy * width + xx) * 4;
                    image[i..(i + 4)].copy_from_slice(&[0x00, 0x00, 0x00, 0xff]);
                }
            }
        }
    };

    let scale = resolution.saturating_sub(1) as f32;
    for &(x, y) in points.iter() {
        // Flip y so that 0 is at the bottom.
        plot((x * scale) as usize, ((1.0 - y) * scale) as usize);
    }

    png_encode_mini::write_rgba_from_u8(out, &image, width as u32, height as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png() {
        let points = [(0.0, 0.0), (0.5, 0.5), (0.999, 0.999)];
        let mut png = Vec::new();
        write_scatter_png(&points, 64, &mut png).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn empty_plot() {
        let mut png = Vec::new();
        write_scatter_png(&[], 16, &mut png).unwrap();
        assert!(!png.is_empty());
    }
}
