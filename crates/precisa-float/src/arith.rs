//! Arithmetic, integer rounding and remainders.

use std::cmp::Ordering;
use std::ffi::{c_int, c_long, c_ulong};

use gmp_mpfr_sys::mpfr;
use rug::rand::RandState;
use smallvec::SmallVec;
use tracing::warn;

use crate::float::{raw_prec, ternary, ternary_pair};
use crate::{Float, FloatError, Rounding, Scalar};

/// Operand pointers for MPFR's fused reductions.
type Operands = SmallVec<[*mut mpfr::mpfr_t; 8]>;

fn operands<'a>(values: impl IntoIterator<Item = &'a Float>) -> Operands {
    values.into_iter().map(|v| v.as_raw().cast_mut()).collect()
}

/// Converts an operand count for MPFR.
fn operand_count(len: usize) -> Result<c_ulong, FloatError> {
    c_ulong::try_from(len).map_err(|_| FloatError::TooManyOperands(len))
}

fn status_code(status: Ordering) -> c_int {
    match status {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

scalar_binary! {
    /// `out = a + b`.
    op_add, add_mut => add, add_d;
    /// `out = a - b`.
    op_sub, sub_mut => sub, sub_d;
    /// `out = a * b`.
    op_mul, mul_mut => mul, mul_d;
    /// `out = a / b`.
    op_div, div_mut => div, div_d;
}

unary_rounded! {
    /// `out = op * op`.
    op_sqr, sqr_mut => sqr;
    /// `out = sqrt(op)`; NaN for negative `op`, `-0` for `-0`.
    op_sqrt, sqrt_mut => sqrt;
    /// `out = 1 / sqrt(op)`.
    op_rec_sqrt, rec_sqrt_mut => rec_sqrt;
    /// `out = cbrt(op)`.
    op_cbrt, cbrt_mut => cbrt;
    /// `out = -op`.
    op_neg, neg_mut => neg;
    /// `out = |op|`.
    op_abs, abs_mut => abs;
    /// Rounds to an integer in the output's rounding mode.
    op_rint, rint_mut => rint;
    /// Rounds up to an integer, then into the output precision.
    op_rint_ceil, rint_ceil_mut => rint_ceil;
    /// Rounds down to an integer, then into the output precision.
    op_rint_floor, rint_floor_mut => rint_floor;
    /// Rounds to the nearest integer, ties away from zero, then into the output precision.
    op_rint_round, rint_round_mut => rint_round;
    /// Rounds to the nearest integer, ties to even, then into the output precision.
    op_rint_roundeven, rint_roundeven_mut => rint_roundeven;
    /// Rounds toward zero to an integer, then into the output precision.
    op_rint_trunc, rint_trunc_mut => rint_trunc;
    /// `out = op - trunc(op)`, with the sign of `op`.
    op_frac, frac_mut => frac;
}

unary_exact! {
    /// Smallest integer not below `op`.
    op_ceil, ceil_mut => ceil;
    /// Largest integer not above `op`.
    op_floor, floor_mut => floor;
    /// Nearest integer, ties away from zero.
    op_round, round_mut => round;
    /// Nearest integer, ties to even.
    op_roundeven, roundeven_mut => roundeven;
    /// Integer toward zero.
    op_trunc, trunc_mut => trunc;
}

binary_rounded! {
    /// Positive difference: `a - b` if `a > b`, `+0` otherwise.
    op_dim, dim_mut => dim;
    /// `out = sqrt(a^2 + b^2)` without intermediate overflow.
    op_hypot, hypot_mut => hypot;
    /// `a - n * b` with `n` the quotient truncated toward zero.
    op_fmod, fmod_mut => fmod;
    /// `a - n * b` with `n` the quotient rounded to nearest, ties to even.
    op_remainder, remainder_mut => remainder;
    /// The smaller operand; the other one if either is NaN.
    op_min, min_mut => min;
    /// The larger operand; the other one if either is NaN.
    op_max, max_mut => max;
    /// `|a|` with the sign of `b`.
    op_copysign, copysign_mut => copysign;
}

impl Float {
    /// `self = lhs - self`.
    pub fn sub_from_mut<'a>(&mut self, lhs: impl Into<Scalar<'a>>) -> Ordering {
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias an operand.
        ternary(unsafe {
            match lhs.into() {
                Scalar::Float(a) => mpfr::sub(raw, a.as_raw(), raw, rnd),
                Scalar::Double(d) => mpfr::d_sub(raw, d, raw, rnd),
            }
        })
    }

    /// `self = lhs / self`.
    pub fn div_from_mut<'a>(&mut self, lhs: impl Into<Scalar<'a>>) -> Ordering {
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias an operand.
        ternary(unsafe {
            match lhs.into() {
                Scalar::Float(a) => mpfr::div(raw, a.as_raw(), raw, rnd),
                Scalar::Double(d) => mpfr::d_div(raw, d, raw, rnd),
            }
        })
    }

    /// `out = op^(1/n)`; NaN for even `n` and negative `op`.
    pub fn op_root_ui(out: &mut Float, op: &Float, n: u32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::rootn_ui(out.as_raw_mut(), op.as_raw(), c_ulong::from(n), rnd) })
    }

    /// In-place form of [`Float::op_root_ui`].
    pub fn root_ui_mut(&mut self, n: u32) -> Ordering {
        let rnd = self.rounding().raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias the operand.
        ternary(unsafe { mpfr::rootn_ui(raw, raw, c_ulong::from(n), rnd) })
    }

    /// `out = n!`.
    pub fn op_fac_ui(out: &mut Float, n: u32) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: `out` is initialised and exclusively borrowed.
        ternary(unsafe { mpfr::fac_ui(out.as_raw_mut(), c_ulong::from(n), rnd) })
    }

    /// `out = a * b + c` with a single rounding.
    pub fn op_fma(out: &mut Float, a: &Float, b: &Float, c: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::fma(out.as_raw_mut(), a.as_raw(), b.as_raw(), c.as_raw(), rnd) })
    }

    /// `out = a * b - c` with a single rounding.
    pub fn op_fms(out: &mut Float, a: &Float, b: &Float, c: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_fma`.
        ternary(unsafe { mpfr::fms(out.as_raw_mut(), a.as_raw(), b.as_raw(), c.as_raw(), rnd) })
    }

    /// `out = a * b + c * d` with a single rounding.
    pub fn op_fmma(out: &mut Float, a: &Float, b: &Float, c: &Float, d: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_fma`.
        ternary(unsafe {
            mpfr::fmma(out.as_raw_mut(), a.as_raw(), b.as_raw(), c.as_raw(), d.as_raw(), rnd)
        })
    }

    /// `out = a * b - c * d` with a single rounding.
    pub fn op_fmms(out: &mut Float, a: &Float, b: &Float, c: &Float, d: &Float) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_fma`.
        ternary(unsafe {
            mpfr::fmms(out.as_raw_mut(), a.as_raw(), b.as_raw(), c.as_raw(), d.as_raw(), rnd)
        })
    }

    /// Correctly rounded sum of `values`; `+0` when empty.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::TooManyOperands`] if the count does not fit
    /// MPFR's length type; `out` is left untouched.
    pub fn op_sum<'a>(
        out: &mut Float,
        values: impl IntoIterator<Item = &'a Float>,
    ) -> Result<Ordering, FloatError> {
        let rnd = out.rounding().raw();
        let tab = operands(values);
        let n = operand_count(tab.len())?;
        // SAFETY: MPFR only reads through the operand pointers, which borrow
        // live values distinct from `out`.
        Ok(ternary(unsafe { mpfr::sum(out.as_raw_mut(), tab.as_ptr(), n, rnd) }))
    }

    /// Correctly rounded dot product of `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::LengthMismatch`] if the slices differ in
    /// length and [`FloatError::TooManyOperands`] if the length does not
    /// fit MPFR's length type; `out` is left untouched.
    pub fn op_dot(out: &mut Float, a: &[Float], b: &[Float]) -> Result<Ordering, FloatError> {
        if a.len() != b.len() {
            warn!(left = a.len(), right = b.len(), "dot product operands differ in length");
            return Err(FloatError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        let rnd = out.rounding().raw();
        let lhs = operands(a);
        let rhs = operands(b);
        let n = operand_count(lhs.len())?;
        // SAFETY: as in `op_sum`.
        Ok(ternary(unsafe { mpfr::dot(out.as_raw_mut(), lhs.as_ptr(), rhs.as_ptr(), n, rnd) }))
    }

    /// Splits `op` into its integral part in `int_part` and its fractional
    /// part in `frac_part`, both rounded with `int_part`'s mode.
    pub fn op_modf(int_part: &mut Float, frac_part: &mut Float, op: &Float) -> (Ordering, Ordering) {
        let rnd = int_part.rounding().raw();
        // SAFETY: the outputs are distinct exclusive borrows.
        ternary_pair(unsafe {
            mpfr::modf(int_part.as_raw_mut(), frac_part.as_raw_mut(), op.as_raw(), rnd)
        })
    }

    /// Like [`Float::op_fmod`], also returning the low bits of the quotient.
    pub fn op_fmodquo(out: &mut Float, a: &Float, b: &Float) -> (Ordering, i64) {
        let rnd = out.rounding().raw();
        let mut quotient: c_long = 0;
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        let status = unsafe { mpfr::fmodquo(out.as_raw_mut(), &mut quotient, a.as_raw(), b.as_raw(), rnd) };
        (ternary(status), i64::from(quotient))
    }

    /// Like [`Float::op_remainder`], also returning the low bits of the quotient.
    pub fn op_remquo(out: &mut Float, a: &Float, b: &Float) -> (Ordering, i64) {
        let rnd = out.rounding().raw();
        let mut quotient: c_long = 0;
        // SAFETY: as in `op_fmodquo`.
        let status = unsafe { mpfr::remquo(out.as_raw_mut(), &mut quotient, a.as_raw(), b.as_raw(), rnd) };
        (ternary(status), i64::from(quotient))
    }

    /// `out = op` with the sign bit set to `negative`.
    pub fn op_setsign(out: &mut Float, op: &Float, negative: bool) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: all values are initialised and `out` is exclusively borrowed.
        ternary(unsafe { mpfr::setsign(out.as_raw_mut(), op.as_raw(), c_int::from(negative), rnd) })
    }

    // Rounding utilities

    /// Returns whether a value approximated by `self` with an error of at
    /// most `2^(exponent - err)` can be correctly rounded to `precision`
    /// bits in `target`, knowing the approximation was rounded in `approx`.
    #[must_use]
    pub fn can_round(&self, err: i64, approx: Rounding, target: Rounding, precision: u32) -> bool {
        let Ok(err) = mpfr::exp_t::try_from(err) else {
            return false;
        };
        // SAFETY: reads an initialised value.
        unsafe { mpfr::can_round(self.as_raw(), err, approx.raw(), target.raw(), raw_prec(precision)) != 0 }
    }

    /// Moves to the next representable value toward `target`.
    pub fn next_toward(&mut self, target: &Float) {
        // SAFETY: both values are initialised; `target` cannot alias `self`.
        unsafe { mpfr::nexttoward(self.as_raw_mut(), target.as_raw()) }
    }

    /// Moves to the next representable value toward `+inf`.
    pub fn next_above(&mut self) {
        // SAFETY: `self` is initialised and exclusively borrowed.
        unsafe { mpfr::nextabove(self.as_raw_mut()) }
    }

    /// Moves to the next representable value toward `-inf`.
    pub fn next_below(&mut self) {
        // SAFETY: as in `next_above`.
        unsafe { mpfr::nextbelow(self.as_raw_mut()) }
    }

    /// Forces the value into the current exponent range.
    ///
    /// `status` is the rounding status of the computation that produced it.
    pub fn check_range(&mut self, status: Ordering) -> Ordering {
        let rnd = self.rounding().raw();
        // SAFETY: as in `next_above`.
        ternary(unsafe { mpfr::check_range(self.as_raw_mut(), status_code(status), rnd) })
    }

    /// Rounds to the subnormal precision of the current exponent range.
    ///
    /// `status` is the rounding status of the computation that produced it.
    pub fn subnormalize(&mut self, status: Ordering) -> Ordering {
        let rnd = self.rounding().raw();
        // SAFETY: as in `next_above`.
        ternary(unsafe { mpfr::subnormalize(self.as_raw_mut(), status_code(status), rnd) })
    }

    // Random numbers

    /// Draws uniformly from `[0, 1)`, rounded into `out`.
    pub fn op_urandom(out: &mut Float, state: &mut RandState<'_>) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: `state` is a valid, exclusively borrowed GMP generator.
        ternary(unsafe { mpfr::urandom(out.as_raw_mut(), state.as_raw_mut(), rnd) })
    }

    /// Draws from the standard normal distribution.
    pub fn op_nrandom(out: &mut Float, state: &mut RandState<'_>) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_urandom`.
        ternary(unsafe { mpfr::nrandom(out.as_raw_mut(), state.as_raw_mut(), rnd) })
    }

    /// Draws from the exponential distribution with mean one.
    pub fn op_erandom(out: &mut Float, state: &mut RandState<'_>) -> Ordering {
        let rnd = out.rounding().raw();
        // SAFETY: as in `op_urandom`.
        ternary(unsafe { mpfr::erandom(out.as_raw_mut(), state.as_raw_mut(), rnd) })
    }
}
