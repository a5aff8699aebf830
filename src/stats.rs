//! Avalanche bias measurement for scramble functions.
//!
//! Scramble functions are measured in the bit-reversed domain, where an
//! Owen scramble only carries changes from lower to higher bits.  A true
//! Owen scramble has a very particular expected bias per output bit (see
//! `EXPECTED_OWEN_BIAS`), and a good approximation should match it rather
//! than simply minimize bias.

use std::io::{self, Write};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rayon::prelude::*;

use crate::scramble::Scramble;

/// Expected average avalanche bias of a true Owen scramble at each
/// (bit-reversed) output bit.
///
/// Bits 0 through 15 are exact to 1/1,000,000.  The rest are extrapolated,
/// using the ratio between consecutive bits converging to sqrt(0.5).
pub const EXPECTED_OWEN_BIAS: [f64; 32] = [
    0.0, 1.0, 0.5, 0.375, 0.273437, 0.19638, 0.139949, 0.099346, 0.070386, 0.049819, 0.035244,
    0.024927, 0.017628, 0.012466, 0.008815, 0.006233, 0.004407, 0.003117, 0.002204, 0.001558,
    0.001102, 0.000779, 0.000551, 0.000390, 0.000275, 0.000195, 0.000138, 0.000097, 0.000069,
    0.000049, 0.000034, 0.000024,
];

/// Rounds per seed.  Each chunk of this many rounds runs on one thread with
/// one seed.
const SUB_ROUNDS: u32 = 256;

#[derive(Debug, Copy, Clone)]
pub struct Stats {
    /// Probability that flipping `[bit_in]` flips `[bit_out]`.
    pub avalanche: [[f64; 32]; 32],
    /// Average over seeds of `|2p - 1|`, where `p` is the per-seed
    /// avalanche probability.
    pub avalanche_avg_bias: [[f64; 32]; 32],
    /// Where two random inputs first diverge in the scramble tree, against
    /// where their outputs do.  Indexed `[output][input]` by the (low five
    /// bits of the) shared trailing-zero pattern, scaled so that a uniform
    /// spread gives 0.5 in every cell.
    pub tree_bias: [[f64; 32]; 32],
}

pub const STATS_ZERO: Stats = Stats {
    avalanche: [[0.0; 32]; 32],
    avalanche_avg_bias: [[0.0; 32]; 32],
    tree_bias: [[0.0; 32]; 32],
};

impl Stats {
    /// Average bias of each output bit over the input bits below it.
    pub fn per_bit_bias(&self) -> [f64; 32] {
        let mut reduced = [0.0f64; 32];
        for bit_in in 0..32 {
            for bit_out in (bit_in + 1)..32 {
                reduced[bit_out] += self.avalanche_avg_bias[bit_in][bit_out] / bit_out as f64;
            }
        }
        reduced
    }

    /// Average bias over all input/output pairs with `bit_in < bit_out`.
    pub fn total_bias(&self) -> f64 {
        let mut total = 0.0;
        for bit_in in 0..32 {
            for bit_out in (bit_in + 1)..32 {
                total += self.avalanche_avg_bias[bit_in][bit_out];
            }
        }
        total / (32 * 31 / 2) as f64
    }

    /// Sum of squared differences from `EXPECTED_OWEN_BIAS`.  Lower is
    /// better.
    pub fn owen_error(&self) -> f64 {
        let mut score = 0.0;
        for bit_out in 0..32 {
            for bit_in in 0..bit_out {
                let diff = self.avalanche_avg_bias[bit_in][bit_out] - EXPECTED_OWEN_BIAS[bit_out];
                score += diff * diff;
            }
        }
        score
    }
}

/// Measures the statistics of the provided hash function.
///
/// `hash` is called as `(input, seed) -> output`.  `rounds` is rounded up
/// to a multiple of 256.  The same `seed` always gives the same result.
pub fn measure_stats<F>(hash: F, rounds: u32, seed: u64) -> Stats
where
    F: Fn(u32, u32) -> u32 + Sync,
{
    // Break up the rounds into chunks that we can hoist off to different
    // threads.
    let loop_rounds = ((rounds / SUB_ROUNDS) + ((rounds % SUB_ROUNDS) != 0) as u32).max(1);
    let rounds = loop_rounds * SUB_ROUNDS;

    let data = (0..loop_rounds)
        .into_par_iter()
        .map(|lr| {
            let mut rng = Pcg32::seed_from_u64(seed ^ ((lr as u64) << 32));
            let hash_seed = rng.gen::<u32>();

            let mut data = STATS_ZERO;
            for _ in 0..SUB_ROUNDS {
                let input_1 = rng.gen::<u32>();
                let output_1 = hash(input_1, hash_seed);
                for bit_in in 0..32 {
                    let input_2 = input_1 ^ (1 << bit_in);
                    let output_2 = hash(input_2, hash_seed);
                    let diff = output_1 ^ output_2;
                    for bit_out in 0..32 {
                        if (diff & (1 << bit_out)) != 0 {
                            data.avalanche[bit_in][bit_out] += 1.0;
                            data.avalanche_avg_bias[bit_in][bit_out] += 1.0;
                        }
                    }
                }

                // Tree seeding bias.
                let tree_seed = rng.gen::<u32>();
                let input_3 = rng.gen::<u32>();
                let input_4 = rng.gen::<u32>();
                let (x, y) = tree_divergence(
                    hash(input_3, tree_seed) ^ hash(input_4, tree_seed),
                    input_3 ^ input_4,
                );
                data.tree_bias[x][y] += 0.5;
            }

            // Per-seed bias.
            for i in 0..32 {
                for j in 0..32 {
                    data.avalanche_avg_bias[i][j] =
                        (data.avalanche_avg_bias[i][j] - (0.5 * SUB_ROUNDS as f64)).abs();
                }
            }

            data
        })
        .reduce(
            || STATS_ZERO,
            |mut a, b| {
                for i in 0..32 {
                    for j in 0..32 {
                        a.avalanche[i][j] += b.avalanche[i][j];
                        a.avalanche_avg_bias[i][j] += b.avalanche_avg_bias[i][j];
                        a.tree_bias[i][j] += b.tree_bias[i][j];
                    }
                }
                a
            },
        );

    let mut stats = STATS_ZERO;
    for i in 0..32 {
        for j in 0..32 {
            stats.avalanche[i][j] = data.avalanche[i][j] / rounds as f64;
            stats.avalanche_avg_bias[i][j] = data.avalanche_avg_bias[i][j] * 2.0 / rounds as f64;
            stats.tree_bias[i][j] = data.tree_bias[i][j] / rounds as f64 * (32.0 * 32.0);
        }
    }

    stats
}

/// Shifts the output and input differences right together until either
/// has a low bit set, and returns the next five bits of each, mirrored.
fn tree_divergence(output_diff: u32, input_diff: u32) -> (usize, usize) {
    let mut x = output_diff;
    let mut y = input_diff;
    while x & 1 == 0 && y & 1 == 0 && (x != 0 || y != 0) {
        x >>= 1;
        y >>= 1;
    }
    (
        (x.reverse_bits() >> 26) as usize & 0b11111,
        (y.reverse_bits() >> 26) as usize & 0b11111,
    )
}

/// Measures `scramble` in the bit-reversed domain.
pub fn measure_scramble(scramble: Scramble, rounds: u32, seed: u64) -> Stats {
    tracing::info!(%scramble, rounds, "measuring avalanche bias");
    measure_stats(
        |n, s| scramble.apply(n.reverse_bits(), s).reverse_bits(),
        rounds,
        seed,
    )
}

pub fn print_stats<W: Write>(stats: &Stats, out: &mut W) -> io::Result<()> {
    let per_bit = stats.per_bit_bias();
    writeln!(out, "bit  bias      expected")?;
    for bit in 0..32 {
        writeln!(
            out,
            "{:>3}  {:<8.6}  {:<8.6}",
            bit, per_bit[bit], EXPECTED_OWEN_BIAS[bit]
        )?;
    }
    writeln!(out, "Total average bias: {:0.4}", stats.total_bias())?;
    writeln!(out, "Error vs. Owen:     {:0.6}", stats.owen_error())?;
    Ok(())
}

/// Writes the avalanche, average-bias and tree-bias matrices side by side
/// as a PNG.  For the first two, rows are input bits and columns are output
/// bits.
pub fn write_stats_image<W: Write>(stats: &Stats, out: &mut W) -> io::Result<()> {
    const BIT_PIXEL_SIZE: usize = 8;
    const WIDTH: usize = BIT_PIXEL_SIZE * 32 * 3;
    const HEIGHT: usize = BIT_PIXEL_SIZE * 32;
    let mut image = vec![0x00u8; 4 * WIDTH * HEIGHT];
    let mut plot = |x: usize, y: usize, color: u8| {
        let min_x = x * BIT_PIXEL_SIZE;
        let min_y = y * BIT_PIXEL_SIZE;

        for y in min_y..(min_y + BIT_PIXEL_SIZE) {
            for x in min_x..(min_x + BIT_PIXEL_SIZE) {
                let i = (y * WIDTH + x) * 4;
                image[i..(i + 3)].copy_from_slice(&[color; 3]);
                image[i + 3] = 0xFF;
            }
        }
    };

    let to_color = |v: f64| (v.min(1.0).max(0.0) * 255.0) as u8;
    for bit_in in 0..32 {
        for bit_out in 0..32 {
            plot(bit_out, bit_in, to_color(stats.avalanche[bit_in][bit_out]));
            plot(
                bit_out + 32,
                bit_in,
                to_color(stats.avalanche_avg_bias[bit_in][bit_out]),
            );
            plot(bit_out + 64, bit_in, to_color(stats.tree_bias[bit_in][bit_out]));
        }
    }
    png_encode_mini::write_rgba_from_u8(out, &image, WIDTH as u32, HEIGHT as u32)
}
