//! # precisa-float
//!
//! Arbitrary precision floating point numbers for precisa.
//!
//! This crate wraps MPFR (through `rug` and `gmp-mpfr-sys`) to provide:
//! - `Float`, a value with a fixed bit precision and its own rounding mode
//! - Correctly rounded arithmetic, transcendental and special functions,
//!   each returning a ternary rounding status
//! - IEEE 754 style predicates, including `totalOrder`
//! - Sticky exception flags and the exponent range
//! - A thread-local `Context` holding the default precision and rounding
//!
//! ## Rounding status
//!
//! Every operation that rounds returns an [`std::cmp::Ordering`]:
//! `Equal` when the stored result is exact, `Greater` when it lies above
//! the exact value and `Less` when it lies below.
//!
//! ## Operation forms
//!
//! Most functions come in two shapes: `Float::op_sin(&mut out, &x)` writes
//! into `out` using `out`'s precision and rounding, while `x.sin_mut()`
//! works in place.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

#[macro_use]
mod macros;

mod arith;
mod compare;
pub mod context;
pub mod error;
pub mod flags;
mod float;
mod fmt;
mod ops;
pub mod rounding;
mod transcendental;

#[cfg(test)]
mod proptests;

pub use context::{Context, ContextGuard};
pub use error::FloatError;
pub use flags::Flags;
pub use float::{Float, Limb, Scalar};
pub use rounding::Rounding;

/// The smallest precision MPFR accepts, in bits.
pub const PRECISION_MIN: u32 = 1;

/// The largest precision MPFR accepts on this platform, in bits.
#[must_use]
pub fn precision_max() -> u32 {
    rug::float::prec_max()
}

/// The precision used when nothing else has been configured, in bits.
pub const DEFAULT_PRECISION: u32 = 53;
