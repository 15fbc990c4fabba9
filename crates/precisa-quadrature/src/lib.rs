//! # precisa-quadrature
//!
//! Numerical integration in arbitrary precision with the double
//! exponential (tanh-sinh) rule.
//!
//! - [`TanhSinh`]: the adaptive engine, over finite or infinite intervals
//! - [`AbscissaTable`]: precomputed abscissas and weights, built once per
//!   precision and reused across integrations
//! - [`Integrand`]: the function being integrated, implemented for closures
//!
//! ## Complements
//!
//! The integrand receives both `x` and the distance from `x` to the
//! nearer end of the interval. Near an endpoint the abscissas crowd
//! together far below the working precision relative to the bounds,
//! so forming `b - x` loses every digit. Integrands with endpoint
//! singularities should use the complement instead:
//!
//! ```
//! use precisa_float::Float;
//! use precisa_quadrature::TanhSinh;
//!
//! // 1 / sqrt(1 - x^2) = 1 / sqrt(c (2 - c)) with c = 1 - |x|
//! let mut engine = TanhSinh::new(64);
//! engine.set_integrand(|out: &mut Float, _: &Float, c: &Float| {
//!     out.assign(c);
//!     out.sub_from_mut(2.0);
//!     out.mul_mut(c);
//!     out.rec_sqrt_mut();
//! });
//! engine.set_bounds(-1.0, 1.0);
//! engine.compile().unwrap();
//! engine.integrate().unwrap();
//!
//! assert!((engine.integral_approx().to_f64() - std::f64::consts::PI).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
mod improper;
pub mod integrand;
pub mod table;
mod tanh_sinh;

#[cfg(test)]
mod proptests;

pub use config::QuadratureConfig;
pub use error::QuadratureError;
pub use integrand::{from_fn, FromFn, Integrand};
pub use table::AbscissaTable;
pub use tanh_sinh::TanhSinh;
