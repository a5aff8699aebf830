//! Constants-based scramble hashes, represented as data.
//!
//! An approximate Owen scramble is a short list of `HashOp`s run on the
//! bit-reversed input.  Every op only propagates changes from lower bits to
//! higher bits, so after reversing back, each output bit depends only on the
//! input bits above it, which is the structure of Owen scrambling.
//!
//! `gen_random()` and `new_constant()` drive the search for new op lists in
//! `optimize`.

use std::fmt;

use rand::Rng;

/// One step of an approximate Owen scramble.
///
/// A constant of zero means "use the seed" instead, since zero would make
/// any of these steps either a no-op or lossy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HashOp {
    Xor(u32),    // x ^= constant
    Add(u32),    // x += constant
    Mul(u32),    // x *= odd_constant
    MulXor(u32), // x ^= x * even_constant
    ShlAdd(u32), // x += x << constant[1, 31]
    ShlXor(u32), // x ^= x << constant[1, 31]
}

impl HashOp {
    /// A random invertible add, multiply, or xor-multiply op.  One time in
    /// four it uses the seed instead of a constant.
    pub fn gen_random<R: Rng + ?Sized>(rng: &mut R) -> HashOp {
        let use_seed = rng.gen::<u32>() & 0b11 == 0;
        let op = match rng.gen_range(0, 3) {
            0 => HashOp::Add(1),
            1 => HashOp::Mul(1),
            _ => HashOp::MulXor(2),
        };
        if use_seed {
            op.with_constant(0)
        } else {
            op.new_constant(rng)
        }
    }

    /// The same kind of op with a fresh random constant.  Ops that use the
    /// seed are returned unchanged, and the new constant never switches an
    /// op over to the seed or makes it lossy.
    pub fn new_constant<R: Rng + ?Sized>(&self, rng: &mut R) -> HashOp {
        if self.constant() == 0 {
            return *self;
        }
        let r = rng.gen::<u32>();
        match *self {
            HashOp::Xor(_) => HashOp::Xor(r.max(1)),
            HashOp::Add(_) => HashOp::Add(r.max(1)),
            HashOp::Mul(_) => HashOp::Mul(r | 1),
            HashOp::MulXor(_) => HashOp::MulXor((r & !1).max(2)),
            HashOp::ShlAdd(_) => HashOp::ShlAdd((r % 31) + 1),
            HashOp::ShlXor(_) => HashOp::ShlXor((r % 31) + 1),
        }
    }

    pub fn constant(&self) -> u32 {
        match *self {
            HashOp::Xor(c)
            | HashOp::Add(c)
            | HashOp::Mul(c)
            | HashOp::MulXor(c)
            | HashOp::ShlAdd(c)
            | HashOp::ShlXor(c) => c,
        }
    }

    fn with_constant(&self, c: u32) -> HashOp {
        match *self {
            HashOp::Xor(_) => HashOp::Xor(c),
            HashOp::Add(_) => HashOp::Add(c),
            HashOp::Mul(_) => HashOp::Mul(c),
            HashOp::MulXor(_) => HashOp::MulXor(c),
            HashOp::ShlAdd(_) => HashOp::ShlAdd(c),
            HashOp::ShlXor(_) => HashOp::ShlXor(c),
        }
    }

    #[inline(always)]
    pub fn exec(&self, x: u32, seed: u32) -> u32 {
        match *self {
            HashOp::Xor(c) => {
                if c == 0 {
                    x ^ seed
                } else {
                    x ^ c
                }
            }

            HashOp::Add(c) => {
                if c == 0 {
                    x.wrapping_add(seed)
                } else {
                    x.wrapping_add(c)
                }
            }

            HashOp::Mul(c) => {
                if c == 0 {
                    x.wrapping_mul(seed | 1)
                } else {
                    x.wrapping_mul(c)
                }
            }

            HashOp::MulXor(c) => {
                if c == 0 {
                    x ^ x.wrapping_mul(seed & !1)
                } else {
                    x ^ x.wrapping_mul(c)
                }
            }

            HashOp::ShlAdd(c) => {
                if c == 0 {
                    x.wrapping_add(x.wrapping_shl(seed & 0b11111))
                } else {
                    x.wrapping_add(x.wrapping_shl(c))
                }
            }

            HashOp::ShlXor(c) => {
                if c == 0 {
                    x ^ x.wrapping_shl(seed & 0b11111)
                } else {
                    x ^ x.wrapping_shl(c)
                }
            }
        }
    }

    /// Whether this op is a bijection on `u32` for every seed.
    ///
    /// An even multiplier, an odd xor-multiplier, or a shift outside of
    /// `[1, 31]` all lose information.  Seeded variants are always fine,
    /// since the seed gets forced odd/even/in-range as appropriate, except
    /// for seeded shifts, which can be zero.
    pub fn is_invertible(&self) -> bool {
        match *self {
            HashOp::Xor(_) | HashOp::Add(_) => true,
            HashOp::Mul(c) => c == 0 || c & 1 == 1,
            HashOp::MulXor(c) => c & 1 == 0,
            HashOp::ShlAdd(c) | HashOp::ShlXor(c) => (1..32).contains(&c),
        }
    }
}

impl fmt::Display for HashOp {
    /// Prints the op as Rust source, with the constant in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            HashOp::Xor(_) => "Xor",
            HashOp::Add(_) => "Add",
            HashOp::Mul(_) => "Mul",
            HashOp::MulXor(_) => "MulXor",
            HashOp::ShlAdd(_) => "ShlAdd",
            HashOp::ShlXor(_) => "ShlXor",
        };
        match self.constant() {
            0 => write!(f, "HashOp::{}(0)", name),
            c => write!(f, "HashOp::{}(0x{:08x})", name, c),
        }
    }
}

/// Runs a slice of `HashOp`s as a hash function on the given
/// value with the given seed.
#[inline]
pub fn exec_hash_slice(hash_ops: &[HashOp], x: u32, seed: u32) -> u32 {
    let mut x = x;
    for op in hash_ops.iter() {
        x = op.exec(x, seed);
    }
    x
}
