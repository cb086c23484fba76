//! Error types.

use core::fmt;

/// Misuse of the arithmetic engine by the calling code.
///
/// Decoding never fails and arithmetic on well-formed elements is total, so every variant here
/// indicates a defect in the caller rather than bad input data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An operand has absorbed too many additions since its last reduction and must be
    /// multiplied, squared or reduced before it can be added or encoded.
    NotValidSummand,

    /// A small multiplier does not fit in half a limb.
    SmallValueOutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotValidSummand => f.write_str("not a valid summand"),
            Error::SmallValueOutOfRange => f.write_str("small value out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
