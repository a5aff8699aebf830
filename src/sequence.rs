//! Named point generation strategies.
//!
//! A `Sequence` pairs a base sequence (Sobol, Faure, or pseudo-random) with
//! at most one scramble.  `generate_points()` evaluates one dimension of it.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand_pcg::Pcg32;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::faure;
use crate::hash::{finalize, hash_combine};
use crate::scramble::Scramble;
use crate::sobol::{sobol, u32_to_0_1_f32};

/// Largest dimension supported by every sequence.
pub const MAX_DIMENSION: u32 = faure::DIMENSIONS - 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sequence {
    /// PCG32 output, seeded per dimension.
    Random,
    Faure05,
    /// Plain, unscrambled Sobol.
    Sobol,
    /// Sobol with a random digital shift.
    SobolRds,
    /// Sobol with a shuffled index and an Owen scrambled result.
    SobolOwen(Scramble),
}

impl Sequence {
    pub const ALL: [Sequence; 9] = [
        Sequence::Random,
        Sequence::Faure05,
        Sequence::Sobol,
        Sequence::SobolRds,
        Sequence::SobolOwen(Scramble::Exact),
        Sequence::SobolOwen(Scramble::OriginalLk),
        Sequence::SobolOwen(Scramble::V2),
        Sequence::SobolOwen(Scramble::Fast),
        Sequence::SobolOwen(Scramble::FiveRound),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sequence::Random => "random",
            Sequence::Faure05 => "faure05",
            Sequence::Sobol => "sobol",
            Sequence::SobolRds => "sobol_rds",
            Sequence::SobolOwen(Scramble::Exact) => "sobol_owen",
            Sequence::SobolOwen(Scramble::OriginalLk) => "sobol_owen_hash_lk",
            Sequence::SobolOwen(Scramble::V2) => "sobol_owen_hash_v2",
            Sequence::SobolOwen(Scramble::Fast) => "sobol_owen_hash_fast",
            Sequence::SobolOwen(Scramble::FiveRound) => "sobol_owen_hash_good",
        }
    }

    /// The scramble function this sequence applies, if any.
    pub fn scramble(self) -> Option<Scramble> {
        match self {
            Sequence::SobolOwen(scramble) => Some(scramble),
            _ => None,
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Sequence::ALL
            .iter()
            .copied()
            .find(|seq| seq.name() == s)
            .ok_or_else(|| Error::UnknownSequence(s.to_string()))
    }
}

//----------------------------------------------------------------------

/// Generates samples `0..n` of dimension `dim` of `sequence`.
///
/// The seed is passed through `finalize()` first, whatever the sequence.
/// Samples are computed in parallel, but the result is identical to
/// computing them one after another.
pub fn generate_points(sequence: Sequence, n: u32, dim: u32, seed: u32) -> Result<Vec<f32>> {
    if dim > MAX_DIMENSION {
        return Err(Error::DimensionOutOfRange {
            dimension: dim as i64,
            max: MAX_DIMENSION,
        });
    }
    tracing::debug!(%sequence, n, dim, seed, "generating points");

    let seed = finalize(seed);
    let points = match sequence {
        Sequence::Random => {
            let mut rng = Pcg32::new(hash_combine(seed, dim) as u64, 0);
            (0..n).map(|_| u32_to_0_1_f32(rng.next_u32())).collect()
        }
        Sequence::Faure05 => par_samples(n, |i| faure::sample(i, dim)),
        Sequence::Sobol => par_samples(n, |i| u32_to_0_1_f32(sobol(i, dim))),
        Sequence::SobolRds => {
            let shift = hash_combine(seed, finalize(dim));
            par_samples(n, |i| u32_to_0_1_f32(sobol(i, dim) ^ shift))
        }
        Sequence::SobolOwen(scramble) => {
            let dim_seed = hash_combine(seed, dim);
            par_samples(n, |i| {
                let index = scramble.apply(i, seed);
                u32_to_0_1_f32(scramble.apply(sobol(index, dim), dim_seed))
            })
        }
    };

    Ok(points)
}

fn par_samples<F>(n: u32, sample: F) -> Vec<f32>
where
    F: Fn(u32) -> f32 + Sync + Send,
{
    (0..n).into_par_iter().map(sample).collect()
}

/// Same as `generate_points()`, but looks the sequence up by name.
pub fn generate_points_by_name(name: &str, n: u32, dim: u32, seed: u32) -> Result<Vec<f32>> {
    generate_points(name.parse()?, n, dim, seed)
}

/// A validated request for points, as it comes from the command line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GenRequest {
    pub sequence: Sequence,
    pub count: u32,
    pub dimension: u32,
    pub seed: u32,
}

impl GenRequest {
    /// Builds a request, clamping a negative `count` to 0 and an
    /// out-of-range `dimension` to 0.
    pub fn clamped(sequence: Sequence, count: i64, dimension: i64, seed: u32) -> GenRequest {
        let count = count.max(0).min(u32::MAX as i64) as u32;
        let dimension = if dimension < 0 || dimension > MAX_DIMENSION as i64 {
            0
        } else {
            dimension as u32
        };
        GenRequest {
            sequence,
            count,
            dimension,
            seed,
        }
    }

    /// Builds a request, rejecting a negative `count` or an out-of-range
    /// `dimension`.
    pub fn strict(sequence: Sequence, count: i64, dimension: i64, seed: u32) -> Result<GenRequest> {
        if count < 0 {
            return Err(Error::NegativeCount(count));
        }
        if dimension < 0 || dimension > MAX_DIMENSION as i64 {
            return Err(Error::DimensionOutOfRange {
                dimension,
                max: MAX_DIMENSION,
            });
        }
        Ok(GenRequest::clamped(sequence, count, dimension, seed))
    }

    pub fn generate(&self) -> Result<Vec<f32>> {
        generate_points(self.sequence, self.count, self.dimension, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlation(a: &[f32], b: &[f32]) -> f64 {
        let n = a.len() as f64;
        let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n;
        let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            let dx = x as f64 - mean_a;
            let dy = y as f64 - mean_b;
            cov += dx * dy;
            var_a += dx * dx;
            var_b += dy * dy;
        }
        cov / (var_a * var_b).sqrt()
    }

    #[test]
    fn names_round_trip() {
        for seq in Sequence::ALL.iter().copied() {
            assert_eq!(seq.name().parse::<Sequence>(), Ok(seq));
            assert_eq!(seq.to_string(), seq.name());
        }
    }

    #[test]
    fn unknown_name() {
        let err = "bogus".parse::<Sequence>().unwrap_err();
        assert_eq!(err, Error::UnknownSequence("bogus".to_string()));
        assert_eq!(err.to_string(), "unknown sequence: bogus");
        assert_eq!(
            generate_points_by_name("sobol_owen_hash", 4, 0, 1),
            Err(Error::UnknownSequence("sobol_owen_hash".to_string()))
        );
    }

    #[test]
    fn plain_sobol() {
        let points = generate_points(Sequence::Sobol, 4, 0, 1).unwrap();
        let expected: Vec<f32> = (0..4).map(|i| u32_to_0_1_f32(sobol(i, 0))).collect();
        assert_eq!(points, expected);
        assert_eq!(points, vec![0.0, 0.5, 0.25, 0.75]);

        // The seed has no effect on plain Sobol.
        assert_eq!(points, generate_points(Sequence::Sobol, 4, 0, 99).unwrap());
    }

    #[test]
    fn random_matches_pcg_stream() {
        let seed = 7;
        let dim = 2;
        let points = generate_points(Sequence::Random, 16, dim, seed).unwrap();
        let mut rng = Pcg32::new(hash_combine(finalize(seed), dim) as u64, 0);
        for x in points {
            assert_eq!(x, u32_to_0_1_f32(rng.next_u32()));
        }
    }

    #[test]
    fn random_prefixes_agree() {
        let short = generate_points(Sequence::Random, 10, 0, 3).unwrap();
        let long = generate_points(Sequence::Random, 100, 0, 3).unwrap();
        assert_eq!(&short[..], &long[..10]);
    }

    #[test]
    fn sobol_rds_is_a_digital_shift() {
        let seed = 5;
        let dim = 3;
        let points = generate_points(Sequence::SobolRds, 64, dim, seed).unwrap();
        let shift = hash_combine(finalize(seed), finalize(dim));
        for (i, &x) in points.iter().enumerate() {
            assert_eq!(x, u32_to_0_1_f32(sobol(i as u32, dim) ^ shift));
        }
    }

    #[test]
    fn sobol_owen_matches_scramble_functions() {
        let seed = 11;
        for scramble in Scramble::ALL.iter().copied() {
            let points = generate_points(Sequence::SobolOwen(scramble), 32, 1, seed).unwrap();
            let s = finalize(seed);
            for (i, &x) in points.iter().enumerate() {
                let index = scramble.apply(i as u32, s);
                let expected = scramble.apply(sobol(index, 1), hash_combine(s, 1));
                assert_eq!(x, u32_to_0_1_f32(expected));
            }
        }
    }

    #[test]
    fn faure_ignores_seed() {
        let a = generate_points(Sequence::Faure05, 25, 2, 1).unwrap();
        let b = generate_points(Sequence::Faure05, 25, 2, 2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[5], faure::sample(5, 2));
    }

    #[test]
    fn deterministic_and_in_range() {
        for seq in Sequence::ALL.iter().copied() {
            for dim in 0..=MAX_DIMENSION {
                let a = generate_points(seq, 300, dim, 1234).unwrap();
                let b = generate_points(seq, 300, dim, 1234).unwrap();
                assert_eq!(a.len(), 300);
                assert_eq!(a, b, "{} dim {}", seq, dim);
                for &x in a.iter() {
                    assert!(x >= 0.0 && x < 1.0, "{} produced {}", seq, x);
                }
            }
        }
    }

    #[test]
    fn owen_scrambled_sets_stay_stratified() {
        // Shuffling the first 2^k indices yields an aligned block of 2^k
        // indices, and Owen scrambling preserves the elementary intervals
        // of that block.
        let seed = finalize(42);
        for scramble in Scramble::ALL.iter().copied() {
            let mut hit = [false; 256];
            for i in 0..256 {
                let index = scramble.apply(i, seed);
                let x = scramble.apply(sobol(index, 1), hash_combine(seed, 1));
                let cell = (x >> 24) as usize;
                assert!(!hit[cell], "{} is not stratified", scramble);
                hit[cell] = true;
            }
        }
    }

    #[test]
    fn seeds_give_different_sets() {
        for seq in Sequence::ALL.iter().copied() {
            if seq == Sequence::Sobol || seq == Sequence::Faure05 {
                continue;
            }
            let a = generate_points(seq, 16, 0, 1).unwrap();
            let b = generate_points(seq, 16, 0, 2).unwrap();
            assert_ne!(a, b, "{}", seq);
        }
    }

    #[test]
    fn dimensions_are_decorrelated() {
        let a = generate_points(Sequence::SobolOwen(Scramble::Exact), 1024, 0, 17).unwrap();
        let b = generate_points(Sequence::SobolOwen(Scramble::Exact), 1024, 1, 17).unwrap();
        let r = correlation(&a, &b);
        assert!(r.abs() < 0.15, "correlation {}", r);
    }

    #[test]
    fn empty_request() {
        for seq in Sequence::ALL.iter().copied() {
            assert!(generate_points(seq, 0, 0, 1).unwrap().is_empty());
        }
    }

    #[test]
    fn dimension_out_of_range() {
        assert_eq!(
            generate_points(Sequence::Sobol, 4, 5, 1),
            Err(Error::DimensionOutOfRange {
                dimension: 5,
                max: MAX_DIMENSION
            })
        );
    }

    #[test]
    fn clamped_request() {
        let seq = Sequence::SobolOwen(Scramble::Fast);
        let clamped = GenRequest::clamped(seq, 8, 7, 3);
        assert_eq!(clamped.dimension, 0);
        assert_eq!(
            clamped.generate().unwrap(),
            generate_points(seq, 8, 0, 3).unwrap()
        );

        let clamped = GenRequest::clamped(seq, -4, -1, 3);
        assert_eq!(clamped.count, 0);
        assert_eq!(clamped.dimension, 0);
        assert!(clamped.generate().unwrap().is_empty());

        assert_eq!(GenRequest::clamped(seq, 8, 4, 3).dimension, 4);
    }

    #[test]
    fn strict_request() {
        let seq = Sequence::Sobol;
        assert_eq!(
            GenRequest::strict(seq, -1, 0, 1),
            Err(Error::NegativeCount(-1))
        );
        assert_eq!(
            GenRequest::strict(seq, 4, 7, 1),
            Err(Error::DimensionOutOfRange {
                dimension: 7,
                max: MAX_DIMENSION
            })
        );
        assert_eq!(
            GenRequest::strict(seq, 4, 2, 1),
            Ok(GenRequest::clamped(seq, 4, 2, 1))
        );
    }
}
