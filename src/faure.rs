//! The Faure sequence in base 5, which has five dimensions.
//!
//! Dimension `d` of sample `i` is the radical inverse of the base-5 digits
//! of `i` after multiplying them by the `d`-th power of the Pascal matrix,
//! mod 5.

use crate::sobol::ONE_MINUS_EPSILON;

pub const BASE: u32 = 5;

/// Number of dimensions the base-5 Faure sequence supports.
pub const DIMENSIONS: u32 = 5;

/// Base-5 digits needed to represent any `u32`.
pub const DIGITS: usize = 14;

/// Binomial coefficients mod 5, `BINOMIAL_MOD_5[n][k]`.
const BINOMIAL_MOD_5: [[u32; DIGITS]; DIGITS] = binomial_table();

const fn binomial_table() -> [[u32; DIGITS]; DIGITS] {
    let mut table = [[0u32; DIGITS]; DIGITS];
    let mut n = 0;
    while n < DIGITS {
        table[n][0] = 1;
        let mut k = 1;
        while k <= n {
            table[n][k] = (table[n - 1][k - 1] + table[n - 1][k]) % BASE;
            k += 1;
        }
        n += 1;
    }
    table
}

/// Writes the base-5 digits of `index` into `digits`, least significant
/// first.
pub fn extract_digits(index: u32, digits: &mut [u32; DIGITS]) {
    let mut index = index;
    for digit in digits.iter_mut() {
        *digit = index % BASE;
        index /= BASE;
    }
}

/// Applies the Faure generator matrix for `dim` to base-5 `digits`, in
/// place.  `dim` is taken mod 5.
pub fn faure05(dim: u32, digits: &mut [u32; DIGITS]) {
    let d = dim % BASE;

    // Powers of `d` mod 5.  `d^0` is 1 even for `d == 0`.
    let mut powers = [0u32; DIGITS];
    powers[0] = 1;
    for i in 1..DIGITS {
        powers[i] = (powers[i - 1] * d) % BASE;
    }

    for r in 0..DIGITS {
        let mut sum = 0;
        for c in r..DIGITS {
            sum += BINOMIAL_MOD_5[c][r] * powers[c - r] * (digits[c] % BASE);
        }
        // Row `r` only reads columns at or above `r`, so it's safe to write
        // it back before computing the next row.
        digits[r] = sum % BASE;
    }
}

/// Maps base-5 `digits` (least significant first) to [0, 1) by mirroring
/// them around the radix point.  Digits above 4 are taken mod 5.
pub fn radical_inverse(digits: &[u32; DIGITS]) -> f32 {
    // 5^14 fits comfortably in a u64.
    let mut numerator = 0u64;
    let mut denominator = 1u64;
    for &digit in digits.iter() {
        numerator = numerator * BASE as u64 + (digit % BASE) as u64;
        denominator *= BASE as u64;
    }
    ((numerator as f64 / denominator as f64) as f32).min(ONE_MINUS_EPSILON)
}

/// Dimension `dim` of Faure sample `index`.
pub fn sample(index: u32, dim: u32) -> f32 {
    let mut digits = [0u32; DIGITS];
    extract_digits(index, &mut digits);
    faure05(dim, &mut digits);
    radical_inverse(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn binomials() {
        assert_eq!(BINOMIAL_MOD_5[4][2], 1); // 6
        assert_eq!(BINOMIAL_MOD_5[5][1], 0); // 5
        assert_eq!(BINOMIAL_MOD_5[6][3], 0); // 20
        assert_eq!(BINOMIAL_MOD_5[7][3], 0); // 35
        assert_eq!(BINOMIAL_MOD_5[7][2], 1); // 21
    }

    #[test]
    fn digits() {
        let mut digits = [9u32; DIGITS];
        extract_digits(7, &mut digits);
        assert_eq!(digits[..4], [2, 1, 0, 0]);
        extract_digits(124, &mut digits);
        assert_eq!(digits[..4], [4, 4, 4, 0]);
        assert!(digits[4..].iter().all(|&d| d == 0));

        extract_digits(u32::MAX, &mut digits);
        let value = digits
            .iter()
            .rev()
            .fold(0u64, |acc, &d| acc * 5 + d as u64);
        assert_eq!(value, u32::MAX as u64);
    }

    #[test]
    fn first_dimension_is_van_der_corput() {
        assert!(approx_eq(sample(0, 0), 0.0));
        assert!(approx_eq(sample(1, 0), 0.2));
        assert!(approx_eq(sample(5, 0), 0.04));
        assert!(approx_eq(sample(7, 0), 0.44));
    }

    #[test]
    fn known_values() {
        assert!(approx_eq(sample(5, 1), 0.24));
        assert!(approx_eq(sample(5, 2), 0.44));
        assert!(approx_eq(sample(5, 4), 0.84));
        assert!(approx_eq(sample(3, 3), 0.6));
    }

    #[test]
    fn each_dimension_is_stratified() {
        // The first 5^k points of every dimension land in distinct
        // intervals of width 5^-k.
        for dim in 0..DIMENSIONS {
            for &k in [1usize, 2, 3].iter() {
                let n = 5u32.pow(k as u32);
                let mut hit = vec![false; n as usize];
                for index in 0..n {
                    let mut digits = [0u32; DIGITS];
                    extract_digits(index, &mut digits);
                    faure05(dim, &mut digits);
                    let cell = digits[..k].iter().fold(0, |acc, &d| acc * 5 + d) as usize;
                    assert!(!hit[cell], "dim {} n {}", dim, n);
                    hit[cell] = true;
                }
            }
        }
    }

    #[test]
    fn stays_below_one() {
        let digits = [4u32; DIGITS];
        assert!(radical_inverse(&digits) < 1.0);
        for _ in 0..1000 {
            let index = rand::random::<u32>();
            for dim in 0..DIMENSIONS {
                let x = sample(index, dim);
                assert!(x >= 0.0 && x < 1.0);
            }
        }
    }

    #[test]
    fn out_of_range_digits_wrap() {
        let mut wild = [0u32; DIGITS];
        wild[0] = 6;
        wild[1] = u32::MAX;
        let mut tame = [0u32; DIGITS];
        tame[0] = 1;
        tame[1] = u32::MAX % 5;
        assert_eq!(radical_inverse(&wild), radical_inverse(&tame));

        faure05(2, &mut wild);
        faure05(7, &mut tame);
        assert_eq!(wild, tame);
        assert!(wild.iter().all(|&d| d < BASE));
    }
}
