//! Elementary, special and power functions, and mathematical constants.

use std::cmp::Ordering;
use std::ffi::{c_int, c_long, c_ulong};

use gmp_mpfr_sys::mpfr;
use tracing::warn;

use crate::float::{ternary, ternary_pair};
use crate::{Float, FloatError};

unary_rounded! {
    /// Natural logarithm.
    op_log, log_mut => log;
    /// Base-2 logarithm.
    op_log2, log2_mut => log2;
    /// Base-10 logarithm.
    op_log10, log10_mut => log10;
    /// `log(1 + op)`, accurate near zero.
    op_log1p, log1p_mut => log1p;
    /// `e^op`.
    op_exp, exp_mut => exp;
    /// `2^op`.
    op_exp2, exp2_mut => exp2;
    /// `10^op`.
    op_exp10, exp10_mut => exp10;
    /// `e^op - 1`, accurate near zero.
    op_expm1, expm1_mut => expm1;
    /// Cosine.
    op_cos, cos_mut => cos;
    /// Sine.
    op_sin, sin_mut => sin;
    /// Tangent.
    op_tan, tan_mut => tan;
    /// Secant.
    op_sec, sec_mut => sec;
    /// Cosecant.
    op_csc, csc_mut => csc;
    /// Cotangent.
    op_cot, cot_mut => cot;
    /// Arc cosine.
    op_acos, acos_mut => acos;
    /// Arc sine.
    op_asin, asin_mut => asin;
    /// Arc tangent.
    op_atan, atan_mut => atan;
    /// Hyperbolic cosine.
    op_cosh, cosh_mut => cosh;
    /// Hyperbolic sine.
    op_sinh, sinh_mut => sinh;
    /// Hyperbolic tangent.
    op_tanh, tanh_mut => tanh;
    /// Hyperbolic secant.
    op_sech, sech_mut => sech;
    /// Hyperbolic cosecant.
    op_csch, csch_mut => csch;
    /// Hyperbolic cotangent.
    op_coth, coth_mut => coth;
    /// Inverse hyperbolic cosine.
    op_acosh, acosh_mut => acosh;
    /// Inverse hyperbolic sine.
    op_asinh, asinh_mut => asinh;
    /// Inverse hyperbolic tangent.
    op_atanh, atanh_mut => atanh;
    /// Exponential integral.
    op_eint, eint_mut => eint;
    /// Real part of the dilogarithm.
    op_li2, li2_mut => li2;
    /// Gamma function.
    op_gamma, gamma_mut => gamma;
    /// `log(gamma(op))`; NaN where gamma is negative.
    op_lngamma, lngamma_mut => lngamma;
    /// Digamma function.
    op_digamma, digamma_mut => digamma;
    /// Riemann zeta function.
    op_zeta, zeta_mut => zeta;
    /// Error function.
    op_erf, erf_mut => erf;
    /// Complementary error function.
    op_erfc, erfc_mut => erfc;
    /// Bessel function of the first kind, order 0.
    op_j0, j0_mut => j0;
    /// Bessel function of the first kind, order 1.
    op_j1, j1_mut => j1;
    /// Bessel function of the second kind, order 0.
    op_y0, y0_mut => y0;
    /// Bessel function of the second kind, order 1.
    op_y1, y1_mut => y1;
    /// Airy function Ai.
    op_ai, ai_mut => ai;
}

binary_rounded! {
    /// `a^b`.
    op_pow, pow_mut => pow;
    /// `atan(a / b)` in the quadrant of `(b, a)`.
    op_atan2, atan2_mut => atan2;
    /// Upper incomplete gamma function `Γ(a, b)`.
    op_gamma_inc, gamma_inc_mut => gamma_inc;
    /// Beta function.
    op_beta, beta_mut => beta;
    /// Arithmetic-geometric mean.
    op_agm, agm_mut => agm;
}

constant! {
    /// `log(2)`.
    op_const_log2 => const_log2;
    /// `π`.
    op_const_pi => const_pi;
    /// Euler's constant `γ`.
    op_const_euler => const_euler;
    /// Catalan's constant.
    op_const_catalan => const_catalan;
}

/// Returns `exp` as an `i32` when it is an integer in range.
#[allow(clippy::cast_possible_truncation)]
fn small_integer(exp: f64) -> Option<i32> {
    (exp.fract() == 0.0 && exp.abs() <= f64::from(i32::MAX)).then_some(exp as i32)
}

/// `rop = base^exp` for an integral `exp`.
///
/// # Safety
///
/// The pointers must address initialised values; `rop` may alias `base`.
unsafe fn pow_integral(rop: *mut mpfr::mpfr_t, base: *const mpfr::mpfr_t, exp: f64, rnd: mpfr::rnd_t) -> c_int {
    match small_integer(exp) {
        Some(n) => mpfr::pow_si(rop, base, c_long::from(n), rnd),
        None => {
            // 53 bits hold any double exactly.
            let exact = Float::with_val(53, exp);
            mpfr::pow(rop, base, exact.as_raw(), rnd)
        }
    }
}

/// `rop = base^exp` for a non-negative integral `base`.
///
/// # Safety
///
/// The pointers must address initialised values; `rop` may alias `exp`.
unsafe fn expow_integral(rop: *mut mpfr::mpfr_t, base: f64, exp: *const mpfr::mpfr_t, rnd: mpfr::rnd_t) -> c_int {
    match small_integer(base) {
        Some(n) => mpfr::ui_pow(rop, c_ulong::from(n.unsigned_abs()), exp, rnd),
        None => {
            let exact = Float::with_val(53, base);
            mpfr::pow(rop, exact.as_raw(), exp, rnd)
        }
    }
}

fn check_exponent(exp: f64) -> Result<(), FloatError> {
    if exp.is_finite() && exp.fract() == 0.0 {
        Ok(())
    } else {
        warn!(exp, "rejected non-integer double exponent");
        Err(FloatError::FractionalExponent(exp))
    }
}

fn check_base(base: f64) -> Result<(), FloatError> {
    check_exponent(base)?;
    if base < 0.0 {
        warn!(base, "rejected negative double base");
        return Err(FloatError::NegativeBase(base));
    }
    Ok(())
}

impl Float {
    /// `out = log(n)`.
    pub fn op_log_ui(out: &mut Float, n: u32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: `out` is initialised and exclusively borrowed.
        ternary(unsafe { mpfr::log_ui(out.as_raw_mut(), c_ulong::from(n), rnd) })
    }

    /// `out = base^n`.
    pub fn op_pow_si(out: &mut Float, base: &Float, n: i32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::pow_si(out.as_raw_mut(), base.as_raw(), c_long::from(n), rnd) })
    }

    /// `self = self^n`.
    pub fn pow_si_mut(&mut self, n: i32) -> Ordering {
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias the operand.
        ternary(unsafe { mpfr::pow_si(raw, raw, c_long::from(n), rnd) })
    }

    /// `out = base^exp`.
    pub fn op_ui_pow(out: &mut Float, base: u32, exp: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::ui_pow(out.as_raw_mut(), c_ulong::from(base), exp.as_raw(), rnd) })
    }

    /// `out = base^exp` for machine integers.
    pub fn op_ui_pow_ui(out: &mut Float, base: u32, exp: u32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: `out` is initialised and exclusively borrowed.
        ternary(unsafe {
            mpfr::ui_pow_ui(out.as_raw_mut(), c_ulong::from(base), c_ulong::from(exp), rnd)
        })
    }

    /// `out = base^exp` for a double that must hold an integer.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::FractionalExponent`] if `exp` is not an
    /// integer; `out` is left untouched.
    pub fn op_pow_f64(out: &mut Float, base: &Float, exp: f64) -> Result<Ordering, FloatError> {
        check_exponent(exp)?;
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        Ok(ternary(unsafe { pow_integral(out.as_raw_mut(), base.as_raw(), exp, rnd) }))
    }

    /// `self = self^exp` for a double that must hold an integer.
    ///
    /// # Errors
    ///
    /// As [`Float::op_pow_f64`]; `self` is left untouched.
    pub fn pow_f64_mut(&mut self, exp: f64) -> Result<Ordering, FloatError> {
        check_exponent(exp)?;
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias the operand.
        Ok(ternary(unsafe { pow_integral(raw, raw, exp, rnd) }))
    }

    /// `self = base^self`.
    pub fn expow_mut(&mut self, base: &Float) -> Ordering {
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias an operand.
        ternary(unsafe { mpfr::pow(raw, base.as_raw(), raw, rnd) })
    }

    /// `self = base^self` for a double base that must be a non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::FractionalExponent`] if `base` is not an
    /// integer and [`FloatError::NegativeBase`] if it is negative; `self`
    /// is left untouched.
    pub fn expow_f64_mut(&mut self, base: f64) -> Result<Ordering, FloatError> {
        check_base(base)?;
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias the operand.
        Ok(ternary(unsafe { expow_integral(raw, base, raw, rnd) }))
    }

    /// Sine and cosine at once, both rounded with `sin_out`'s mode.
    pub fn op_sin_cos(sin_out: &mut Float, cos_out: &mut Float, op: &Float) -> (Ordering, Ordering) {
        let rnd = sin_out.rounding().raw();
        // SAFETY: the outputs are distinct exclusive borrows.
        ternary_pair(unsafe { mpfr::sin_cos(sin_out.as_raw_mut(), cos_out.as_raw_mut(), op.as_raw(), rnd) })
    }

    /// Hyperbolic sine and cosine at once, both rounded with `sinh_out`'s mode.
    pub fn op_sinh_cosh(sinh_out: &mut Float, cosh_out: &mut Float, op: &Float) -> (Ordering, Ordering) {
        let rnd = sinh_out.rounding().raw();
        // SAFETY: the outputs are distinct exclusive borrows.
        ternary_pair(unsafe {
            mpfr::sinh_cosh(sinh_out.as_raw_mut(), cosh_out.as_raw_mut(), op.as_raw(), rnd)
        })
    }

    /// `out = log|Γ(op)|`, also returning the sign of `Γ(op)`.
    pub fn op_lgamma(out: &mut Float, op: &Float) -> (Ordering, i32) {
        let rnd = out.rounding().raw();
        let mut sign: c_int = 0;
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        let status = unsafe { mpfr::lgamma(out.as_raw_mut(), &mut sign, op.as_raw(), rnd) };
        (ternary(status), sign)
    }

    /// `out = ζ(n)`.
    pub fn op_zeta_ui(out: &mut Float, n: u32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: `out` is initialised and exclusively borrowed.
        ternary(unsafe { mpfr::zeta_ui(out.as_raw_mut(), c_ulong::from(n), rnd) })
    }

    /// Bessel function of the first kind, order `n`.
    pub fn op_jn(out: &mut Float, n: i32, op: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::jn(out.as_raw_mut(), c_long::from(n), op.as_raw(), rnd) })
    }

    /// Bessel function of the second kind, order `n`.
    pub fn op_yn(out: &mut Float, n: i32, op: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_jn`.
        ternary(unsafe { mpfr::yn(out.as_raw_mut(), c_long::from(n), op.as_raw(), rnd) })
    }
}
