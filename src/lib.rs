//! Low-discrepancy sample generation with Owen scrambling.
//!
//! Generates one dimension at a time of Sobol, Faure, or pseudo-random
//! point sets, optionally Owen scrambled with either the exact per-bit hash
//! or one of several fast approximations of it.
//!
//! ```rust
//! use genpoints::{generate_points, Scramble, Sequence};
//!
//! let xs = generate_points(Sequence::SobolOwen(Scramble::Fast), 16, 0, 1).unwrap();
//! let ys = generate_points(Sequence::SobolOwen(Scramble::Fast), 16, 1, 1).unwrap();
//! for (x, y) in xs.iter().zip(ys.iter()) {
//!     assert!(*x >= 0.0 && *x < 1.0);
//!     assert!(*y >= 0.0 && *y < 1.0);
//! }
//! ```

#![allow(clippy::unreadable_literal)]

mod error;
pub mod faure;
pub mod format;
pub mod hash;
pub mod hash_ops;
pub mod optimize;
pub mod plot;
pub mod scramble;
pub mod sequence;
pub mod sobol;
pub mod stats;

pub use error::{Error, Result};
pub use hash::{finalize, hash_combine, hash_u32, reverse_bits};
pub use hash_ops::HashOp;
pub use scramble::{
    nested_uniform_scramble_base2, nested_uniform_scramble_base2_5round,
    nested_uniform_scramble_base2_fast, nested_uniform_scramble_base2_original_lk,
    nested_uniform_scramble_base2_v2, scramble_with_ops, Scramble,
};
pub use sequence::{generate_points, generate_points_by_name, GenRequest, Sequence};
