//! An implementation of the Sobol low discrepancy sequence.
//!
//! Supports the full 2^32 index range, with 32-bit output.  Scrambling is
//! handled separately in `scramble`.

// The following `include` provides `MAX_DIMENSION` and `VECTORS`.
// See the build.rs file for how this included file is generated.
include!(concat!(env!("OUT_DIR"), "/vectors.inc"));

/// Compute one component of one sample from the Sobol sequence, where
/// `dimension` specifies the component and `index` specifies the sample
/// within the sequence.
///
/// # Panics
///
/// Panics if `dimension >= MAX_DIMENSION`.
#[inline]
pub fn sobol(index: u32, dimension: u32) -> u32 {
    assert!(dimension < MAX_DIMENSION);
    let vecs = &VECTORS[dimension as usize];
    let mut index = index;

    let mut result = 0;
    let mut i = 0;
    while index != 0 {
        let j = index.trailing_zeros();
        result ^= vecs[(i + j) as usize];
        i += j + 1;
        index >>= j;
        index >>= 1;
    }

    result
}

/// The first four dimensions of sample `index`.
#[inline]
pub fn sobol_4d(index: u32) -> [u32; 4] {
    let mut result = [0u32; 4];
    let mut index = index;
    let mut i = 0;
    while index != 0 {
        let j = index.trailing_zeros();
        for (r, vecs) in result.iter_mut().zip(VECTORS.iter()) {
            *r ^= vecs[(i + j) as usize];
        }
        i += j + 1;
        index >>= j;
        index >>= 1;
    }

    result
}

/// The largest `f32` below 1.0.
pub const ONE_MINUS_EPSILON: f32 = 0.99999994;

/// Maps a 32-bit integer to [0, 1).
///
/// The conversion rounds to nearest like a plain `n as f32 / 2^32`, except
/// that values rounding up to 1.0 are clamped just below it.
#[inline(always)]
pub fn u32_to_0_1_f32(n: u32) -> f32 {
    (n as f32 * (1.0 / (1u64 << 32) as f32)).min(ONE_MINUS_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_dimension_is_van_der_corput() {
        for index in 0..4096u32 {
            assert_eq!(sobol(index, 0), index.reverse_bits());
        }
        assert_eq!(sobol(0xffffffff, 0), 0xffffffff);
    }

    #[test]
    fn first_samples() {
        let expected: [[u32; 4]; 4] = [
            [0x00000000, 0x80000000, 0x40000000, 0xc0000000],
            [0x00000000, 0x80000000, 0xc0000000, 0x40000000],
            [0x00000000, 0x80000000, 0xc0000000, 0x40000000],
            [0x00000000, 0x80000000, 0xc0000000, 0x40000000],
        ];
        for dim in 0..4 {
            for index in 0..4 {
                assert_eq!(
                    sobol(index, dim),
                    expected[dim as usize][index as usize],
                    "dim {} index {}",
                    dim,
                    index
                );
            }
        }
    }

    #[test]
    fn known_values() {
        assert_eq!(sobol(5, 1), 0x20000000);
        assert_eq!(sobol(7, 2), 0x20000000);
        assert_eq!(sobol(100, 4), 0x86000000);
        assert_eq!(sobol(1000, 3), 0xe8c00000);
    }

    #[test]
    fn each_dimension_is_stratified() {
        // Every power-of-two prefix of a Sobol dimension puts exactly one
        // point in each elementary interval of that size.
        for dim in 0..MAX_DIMENSION {
            for &log_n in [1u32, 4, 8, 10].iter() {
                let n = 1u32 << log_n;
                let mut hit = vec![false; n as usize];
                for index in 0..n {
                    let cell = (sobol(index, dim) >> (32 - log_n)) as usize;
                    assert!(!hit[cell], "dim {} n {}", dim, n);
                    hit[cell] = true;
                }
            }
        }
    }

    #[test]
    fn sobol_4d_matches_sobol() {
        for _ in 0..1000 {
            let index = rand::random::<u32>();
            let x = sobol_4d(index);
            for dim in 0..4 {
                assert_eq!(x[dim as usize], sobol(index, dim));
            }
        }
    }

    #[test]
    #[should_panic]
    fn dimension_out_of_range() {
        sobol(1, MAX_DIMENSION);
    }

    #[test]
    fn to_float() {
        assert_eq!(u32_to_0_1_f32(0), 0.0);
        assert_eq!(u32_to_0_1_f32(0x80000000), 0.5);
        assert_eq!(u32_to_0_1_f32(0x40000000), 0.25);
        assert!(u32_to_0_1_f32(0xffffffff) < 1.0);
        assert!(u32_to_0_1_f32(0xffffff00) < 1.0);
    }
}
