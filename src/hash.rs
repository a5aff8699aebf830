//! Small integer hashing utilities shared by the scramble functions.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

/// Reverses the bit order of `x`, so bit 0 becomes bit 31 and so on.
#[inline(always)]
pub fn reverse_bits(x: u32) -> u32 {
    x.reverse_bits()
}

/// Keyed hash of `x`, using SipHash-2-4 with the 128-bit key
/// `(seed1, seed2)`.  The 64-bit result is truncated to 32 bits.
///
/// This is slow, but it's a proper pseudo-random oracle, which is what the
/// reference Owen scramble needs.
#[inline]
pub fn hash_u32(x: u32, seed1: u64, seed2: u64) -> u32 {
    let mut hasher = SipHasher24::new_with_keys(seed1, seed2);
    hasher.write(&x.to_le_bytes());
    hasher.finish() as u32
}

/// Combines `v` into `seed`, for deriving sub-seeds.
///
/// Not a bijection, and not a good hash on its own.  The formula must stay
/// exactly as-is to reproduce reference point sets.
#[inline(always)]
pub fn hash_combine(seed: u32, v: u32) -> u32 {
    seed ^ (v
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2))
}

/// The murmur3 32-bit finalizer.
///
/// Seeds are passed through this before use, so that sequential or
/// otherwise low-entropy seeds still give unrelated point sets.
#[inline(always)]
pub fn finalize(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x85ebca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2ae35);
    x ^= x >> 16;
    x
}
