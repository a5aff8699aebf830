//! Random search for better approximate Owen scramble constants.
//!
//! Candidates are op lists, scored by how far their average avalanche bias
//! is from that of a true Owen scramble (`Stats::owen_error`).  Each round
//! either re-rolls some constants of a kept candidate or draws a fresh
//! random list, and keeps it if it beats the worst candidate so far.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::hash_ops::{exec_hash_slice, HashOp};
use crate::stats::{measure_stats, Stats};

#[derive(Debug, Copy, Clone)]
pub struct SearchConfig {
    /// Candidate lists to try.
    pub rounds: usize,
    /// How many of the best lists to keep.
    pub candidates: usize,
    /// Measurement rounds per score.
    pub stat_rounds: u32,
    /// Drives both the mutations and the measurements.
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub ops: Vec<HashOp>,
    /// Lower is better.
    pub score: f64,
    pub stats: Stats,
}

/// Measures `ops` as a hash in the reversed domain and scores it.
///
/// All candidates of one search are measured with the same `seed`, so their
/// scores are directly comparable.
pub fn score_ops(ops: &[HashOp], stat_rounds: u32, seed: u64) -> Candidate {
    let stats = measure_stats(|n, s| exec_hash_slice(ops, n, s), stat_rounds, seed);
    Candidate {
        ops: ops.to_vec(),
        score: stats.owen_error(),
        stats,
    }
}

/// Searches for op lists scoring better than `start`.
///
/// Returns up to `config.candidates` lists, best first.  `start` itself is
/// one of the initial candidates, so the best result never scores worse
/// than it.  The same config always gives the same result.
pub fn optimize(start: &[HashOp], config: &SearchConfig) -> Vec<Candidate> {
    let keep = config.candidates.max(1);
    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut current = vec![score_ops(start, config.stat_rounds, config.seed)];
    tracing::info!(score = current[0].score, "scored starting ops");

    for round in 0..config.rounds {
        let ops: Vec<HashOp> = if rng.gen_range(0, 4) == 0 {
            (0..start.len().max(1))
                .map(|_| HashOp::gen_random(&mut rng))
                .collect()
        } else {
            let parent = &current[rng.gen_range(0, current.len())];
            parent
                .ops
                .iter()
                .map(|op| {
                    if rng.gen::<bool>() {
                        op.new_constant(&mut rng)
                    } else {
                        *op
                    }
                })
                .collect()
        };

        let candidate = score_ops(&ops, config.stat_rounds, config.seed);
        tracing::debug!(round, score = candidate.score, "scored candidate");

        if candidate.score < current[0].score {
            tracing::info!(round, score = candidate.score, "new best");
        }
        if current.len() < keep {
            current.push(candidate);
        } else if candidate.score < current[current.len() - 1].score {
            let last = current.len() - 1;
            current[last] = candidate;
        } else {
            continue;
        }
        current.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
    }

    current
}
