//! Errors reported by float operations.

use thiserror::Error;

/// Errors from parsing, configuration and domain checks.
///
/// Domain errors never modify the receiver of the failed operation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FloatError {
    /// The text is not a valid numeral in the requested base.
    #[error("invalid numeral {input:?} in base {base}")]
    Parse {
        /// The rejected text.
        input: String,
        /// The base it was parsed in.
        base: i32,
    },

    /// The base is outside `2..=62`.
    #[error("unsupported base {0}, expected 2..=62")]
    InvalidBase(i32),

    /// The precision is outside the range MPFR supports.
    #[error("precision {0} is outside the supported range")]
    InvalidPrecision(u64),

    /// The exponent does not fit the current exponent range.
    #[error("exponent {0} is outside the current exponent range")]
    ExponentOutOfRange(i64),

    /// A native double passed as a power exponent is not an integer.
    #[error("exponent {0} is not an integer; pass a Float for real powers")]
    FractionalExponent(f64),

    /// A native double passed as the base of `expow` is negative.
    #[error("base {0} of expow must be a non-negative integer")]
    NegativeBase(f64),

    /// The operands of a dot product differ in length.
    #[error("dot product operands differ in length ({left} vs {right})")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },

    /// A reduction has more operands than MPFR can count.
    #[error("{0} operands exceed MPFR's operand count")]
    TooManyOperands(usize),

    /// A rounding mode name was not recognised.
    #[error("unknown rounding mode {0:?}")]
    UnknownRounding(String),
}
