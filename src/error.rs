//! Error types for point generation.

use thiserror::Error;

use crate::scramble::Scramble;
use crate::sequence::Sequence;

/// Errors reported by the library.
///
/// None of these terminate the process.  The `genpoints` binary decides
/// which of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The sequence name is not one of `Sequence::ALL`.
    #[error("unknown sequence: {0}")]
    UnknownSequence(String),

    /// A dimension outside of `0..=max` was requested.
    #[error("dimension {dimension} is out of range (0..={max})")]
    DimensionOutOfRange {
        /// The requested dimension.
        dimension: i64,
        /// The largest supported dimension.
        max: u32,
    },

    /// A negative sample count was requested.
    #[error("sample count {0} is negative")]
    NegativeCount(i64),

    /// A numeric argument could not be parsed.
    #[error("invalid {name}: {value:?}")]
    InvalidNumber {
        /// Which argument was being parsed.
        name: &'static str,
        /// The text that failed to parse.
        value: String,
    },

    /// The sequence does not apply a scramble function.
    #[error("sequence {0} has no scramble function")]
    NoScramble(Sequence),

    /// The scramble is not built from `HashOp`s, so it can't be searched
    /// over.
    #[error("scramble {0} is not a list of hash ops")]
    NotAnOpList(Scramble),
}

pub type Result<T> = std::result::Result<T, Error>;
