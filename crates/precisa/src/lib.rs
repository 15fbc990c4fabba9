//! # Precisa
//!
//! Arbitrary precision numerics on top of MPFR.
//!
//! ## Features
//!
//! - **Correctly rounded floats**: every operation rounds once, with the
//!   output's own mode, and reports which way it rounded
//! - **Scratch registers**: pooled temporaries for allocation-free
//!   expression evaluation
//! - **Tanh-sinh quadrature**: double exponential integration to the
//!   working precision, over finite or infinite intervals
//!
//! ## Quick Start
//!
//! ```rust
//! use precisa::prelude::*;
//!
//! let mut engine = TanhSinh::new(128);
//! engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
//!     Float::op_exp(out, x);
//! });
//! engine.set_bounds(0.0, 1.0);
//! engine.compile()?;
//! engine.integrate()?;
//!
//! let mut e = Float::with_val(128, 1.0);
//! e.exp_mut();
//! e.sub_mut(1.0);
//! assert!((engine.integral_approx().to_f64() - e.to_f64()).abs() < 1e-15);
//! # Ok::<(), QuadratureError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use precisa_float as float;
pub use precisa_quadrature as quadrature;
pub use precisa_registers as registers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use precisa_float::{Context, Float, FloatError, Rounding, Scalar};
    pub use precisa_quadrature::{Integrand, QuadratureConfig, QuadratureError, TanhSinh};
    pub use precisa_registers::{Operand, Register, RegisterPool};
}
