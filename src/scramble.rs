//! Owen scrambling of 32-bit integers.
//!
//! `nested_uniform_scramble_base2()` is a full, ground-truth nested uniform
//! scramble that hashes every bit separately.  The other four functions are
//! fast approximations in the style of Laine and Karras ("Stratified
//! Sampling for Stochastic Transparency"): they reverse the bits, run a few
//! rounds of add/xor/multiply mixing that only carries changes toward
//! higher bits, and reverse the bits back.
//!
//! All of them are bijections on `u32` for a fixed seed.

use std::fmt;

use crate::hash::{hash_combine, hash_u32, reverse_bits};
use crate::hash_ops::{exec_hash_slice, HashOp};
use crate::sobol::sobol_4d;

/// The hash from the original Laine-Karras paper.
pub const ORIGINAL_LK_OPS: &[HashOp] = &[
    HashOp::Add(0),
    HashOp::MulXor(0x6c50b47c),
    HashOp::MulXor(0xb82f1e52),
    HashOp::MulXor(0xc7afe638),
    HashOp::MulXor(0x8d22f6e6),
];

pub const V2_OPS: &[HashOp] = &[
    HashOp::Add(0),
    HashOp::Xor(0xdc967795),
    HashOp::Mul(0x97b756bb),
    HashOp::Xor(0x866350b1),
    HashOp::Mul(0x9e3779cd),
];

/// Slower than `FAST_OPS`, but closer to a true per-bit hash.
pub const FIVE_ROUND_OPS: &[HashOp] = &[
    HashOp::Mul(0x788aeeed),
    HashOp::MulXor(0x41506a02),
    HashOp::Add(0),
    HashOp::Mul(0),
    HashOp::MulXor(0x7483dc64),
];

pub const FAST_OPS: &[HashOp] = &[
    HashOp::ShlAdd(2),
    HashOp::MulXor(0xfe9b5742),
    HashOp::Add(0),
    HashOp::Mul(0),
];

/// Which Owen scramble function to use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Scramble {
    /// The per-bit keyed hash.  32 SipHash evaluations per call.
    Exact,
    OriginalLk,
    V2,
    FiveRound,
    Fast,
}

impl Scramble {
    pub const ALL: [Scramble; 5] = [
        Scramble::Exact,
        Scramble::OriginalLk,
        Scramble::V2,
        Scramble::FiveRound,
        Scramble::Fast,
    ];

    /// Scrambles `x` with the given seed.
    #[inline]
    pub fn apply(self, x: u32, seed: u32) -> u32 {
        match self.hash_ops() {
            None => nested_uniform_scramble_base2(x, seed),
            Some(ops) => scramble_with_ops(ops, x, seed),
        }
    }

    /// The op list of an approximate scramble, or `None` for the exact one.
    pub fn hash_ops(self) -> Option<&'static [HashOp]> {
        match self {
            Scramble::Exact => None,
            Scramble::OriginalLk => Some(ORIGINAL_LK_OPS),
            Scramble::V2 => Some(V2_OPS),
            Scramble::FiveRound => Some(FIVE_ROUND_OPS),
            Scramble::Fast => Some(FAST_OPS),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scramble::Exact => "exact",
            Scramble::OriginalLk => "original_lk",
            Scramble::V2 => "v2",
            Scramble::FiveRound => "5round",
            Scramble::Fast => "fast",
        }
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//----------------------------------------------------------------------

/// Full, ground-truth Owen scramble of `x`.
///
/// Each output bit is flipped based on a keyed hash of the input bits
/// above it, which is exactly a random digit-scrambling tree of depth 32.
pub fn nested_uniform_scramble_base2(x: u32, seed: u32) -> u32 {
    let in_bits = x;
    let mut out_bits = x;

    for bit in 0..31 {
        let high_mask = !((1u32 << (bit + 1)) - 1);
        let hash = hash_u32(in_bits & high_mask, seed as u64, bit as u64);
        out_bits ^= hash & (1 << bit);
    }

    // The top bit has nothing above it, so it only depends on the seed.
    out_bits ^= hash_u32(0, seed as u64, 31) & (1 << 31);

    out_bits
}

/// Approximate Owen scramble using an arbitrary op list.
///
/// The ops run on the bit-reversed value, so that their low-to-high mixing
/// becomes high-to-low mixing on `x`.  The result is a bijection whenever
/// every op in `hash_ops` is invertible.
#[inline(always)]
pub fn scramble_with_ops(hash_ops: &[HashOp], x: u32, seed: u32) -> u32 {
    reverse_bits(exec_hash_slice(hash_ops, reverse_bits(x), seed))
}

#[inline]
pub fn nested_uniform_scramble_base2_original_lk(x: u32, seed: u32) -> u32 {
    scramble_with_ops(ORIGINAL_LK_OPS, x, seed)
}

#[inline]
pub fn nested_uniform_scramble_base2_v2(x: u32, seed: u32) -> u32 {
    scramble_with_ops(V2_OPS, x, seed)
}

#[inline]
pub fn nested_uniform_scramble_base2_5round(x: u32, seed: u32) -> u32 {
    scramble_with_ops(FIVE_ROUND_OPS, x, seed)
}

#[inline]
pub fn nested_uniform_scramble_base2_fast(x: u32, seed: u32) -> u32 {
    scramble_with_ops(FAST_OPS, x, seed)
}

/// Shuffled and scrambled Sobol sample for dimensions 0 through 3 at once.
///
/// The index is shuffled with `seed`, and dimension `i` is scrambled with
/// `hash_combine(seed, i)`.
pub fn shuffled_scrambled_sobol_4d(scramble: Scramble, index: u32, seed: u32) -> [u32; 4] {
    let index = scramble.apply(index, seed);
    let mut x = sobol_4d(index);
    for (i, x) in x.iter_mut().enumerate() {
        *x = scramble.apply(*x, hash_combine(seed, i as u32));
    }
    x
}
