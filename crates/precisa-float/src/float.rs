//! The arbitrary precision float type.
//!
//! A [`Float`] wraps an MPFR value together with its own rounding mode.
//! The precision is chosen at construction and never changed by arithmetic;
//! results are rounded into the destination with the destination's mode.

use std::cmp::Ordering;
use std::ffi::c_int;
use std::mem;
use std::slice;

use gmp_mpfr_sys::{gmp, mpfr};
use rug::float::prec_max;

use crate::{Context, FloatError, Rounding, PRECISION_MIN};

/// A machine word of the mantissa.
pub type Limb = gmp::limb_t;

/// Converts an MPFR ternary value into a rounding status.
pub(crate) fn ternary(raw: c_int) -> Ordering {
    raw.cmp(&0)
}

/// Converts a validated precision for MPFR.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn raw_prec(precision: u32) -> mpfr::prec_t {
    precision as mpfr::prec_t
}

fn assert_precision(precision: u32) {
    assert!(
        (PRECISION_MIN..=prec_max()).contains(&precision),
        "precision {precision} is outside {PRECISION_MIN}..={}",
        prec_max()
    );
}

/// Splits the packed status of MPFR's two-result functions.
///
/// Each half is 0 when exact, 1 when the result is above the exact value
/// and 2 when below; the second result is shifted left by two bits.
pub(crate) fn ternary_pair(raw: c_int) -> (Ordering, Ordering) {
    fn decode(code: c_int) -> Ordering {
        match code & 3 {
            1 => Ordering::Greater,
            2 => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
    (decode(raw), decode(raw >> 2))
}

/// An arbitrary precision binary floating point number.
///
/// Besides the finite values, a `Float` can hold NaN, both infinities and
/// both signed zeros.
#[derive(Clone)]
pub struct Float {
    inner: rug::Float,
    rounding: Rounding,
}

/// The right-hand operand of the mixed arithmetic functions.
#[derive(Clone, Copy, Debug)]
pub enum Scalar<'a> {
    /// Another float.
    Float(&'a Float),
    /// A native double, used exactly.
    Double(f64),
}

impl<'a> From<&'a Float> for Scalar<'a> {
    fn from(value: &'a Float) -> Self {
        Scalar::Float(value)
    }
}

impl<'a> From<&'a mut Float> for Scalar<'a> {
    fn from(value: &'a mut Float) -> Self {
        Scalar::Float(value)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

impl From<i32> for Scalar<'_> {
    fn from(value: i32) -> Self {
        Scalar::Double(f64::from(value))
    }
}

impl Float {
    /// Creates `+0` with the precision and rounding of the current [`Context`].
    #[must_use]
    pub fn new() -> Self {
        let ctx = Context::current();
        Self {
            inner: rug::Float::new(ctx.precision()),
            rounding: ctx.rounding(),
        }
    }

    /// Creates `+0` with the given precision and the context rounding.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero or above MPFR's maximum.
    #[must_use]
    pub fn with_precision(precision: u32) -> Self {
        assert_precision(precision);
        Self {
            inner: rug::Float::new(precision),
            rounding: Context::default_rounding(),
        }
    }

    /// Creates `+0` with the given precision, or an error if it is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidPrecision`] if `precision` is zero or too large.
    pub fn try_with_precision(precision: u32) -> Result<Self, FloatError> {
        if (PRECISION_MIN..=prec_max()).contains(&precision) {
            Ok(Self::with_precision(precision))
        } else {
            Err(FloatError::InvalidPrecision(u64::from(precision)))
        }
    }

    /// Creates a float holding `value` rounded to `precision` bits.
    #[must_use]
    pub fn with_val(precision: u32, value: f64) -> Self {
        let mut f = Self::with_precision(precision);
        f.set_f64(value);
        f
    }

    /// Creates a NaN.
    #[must_use]
    pub fn nan(precision: u32) -> Self {
        let mut f = Self::with_precision(precision);
        f.set_nan();
        f
    }

    /// Creates an infinity of the given sign.
    #[must_use]
    pub fn infinity(precision: u32, negative: bool) -> Self {
        let mut f = Self::with_precision(precision);
        f.set_infinity(negative);
        f
    }

    /// Returns this float with a different rounding mode.
    #[must_use]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Returns a raw pointer for use with other MPFR functions.
    #[must_use]
    pub fn as_raw(&self) -> *const mpfr::mpfr_t {
        self.inner.as_raw()
    }

    /// Returns a mutable raw pointer for use with other MPFR functions.
    pub fn as_raw_mut(&mut self) -> *mut mpfr::mpfr_t {
        self.inner.as_raw_mut()
    }

    /// Returns the wrapped `rug` value.
    #[must_use]
    pub fn as_inner(&self) -> &rug::Float {
        &self.inner
    }

    /// Unwraps into the `rug` value, dropping the rounding mode.
    #[must_use]
    pub fn into_inner(self) -> rug::Float {
        self.inner
    }

    // Rounding

    /// Returns the rounding mode used for results stored in this float.
    #[must_use]
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Sets the rounding mode.
    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.rounding = rounding;
    }

    /// Returns the name of the rounding mode.
    #[must_use]
    pub fn rounding_name(&self) -> &'static str {
        self.rounding.name()
    }

    // Precision

    /// Returns the precision in bits.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.inner.prec()
    }

    /// Reallocates with a new precision. The value becomes NaN.
    ///
    /// Use [`Float::round_to_precision`] to keep the value.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero or above MPFR's maximum.
    pub fn set_precision(&mut self, precision: u32) {
        assert_precision(precision);
        // SAFETY: the precision was checked against MPFR's limits.
        unsafe { mpfr::set_prec(self.as_raw_mut(), raw_prec(precision)) }
    }

    /// Changes the precision, rounding the current value into it.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero or above MPFR's maximum.
    pub fn round_to_precision(&mut self, precision: u32) -> Ordering {
        assert_precision(precision);
        let rnd = self.rounding.raw();
        // SAFETY: the precision was checked against MPFR's limits.
        ternary(unsafe { mpfr::prec_round(self.as_raw_mut(), raw_prec(precision), rnd) })
    }

    /// Returns the fewest bits that hold the current value exactly.
    ///
    /// Zero and the special values need no bits.
    #[must_use]
    pub fn min_precision(&self) -> u32 {
        // SAFETY: reads an initialised value.
        let bits = unsafe { mpfr::min_prec(self.as_raw()) };
        u32::try_from(bits).unwrap_or(u32::MAX)
    }

    // Exponent and sign

    /// Returns the binary exponent, with the mantissa read as `0.1xxx`.
    ///
    /// `None` for zero, infinities and NaN.
    #[must_use]
    pub fn exponent(&self) -> Option<i64> {
        if self.is_regular() {
            // SAFETY: the value is regular, so its exponent field is meaningful.
            Some(i64::from(unsafe { mpfr::get_exp(self.as_raw()) }))
        } else {
            None
        }
    }

    /// Sets the binary exponent of a regular value.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::ExponentOutOfRange`] if the value is not regular
    /// or `exp` lies outside the current exponent range. The value is
    /// unchanged in that case.
    pub fn set_exponent(&mut self, exp: i64) -> Result<(), FloatError> {
        let raw_exp = mpfr::exp_t::try_from(exp).map_err(|_| FloatError::ExponentOutOfRange(exp))?;
        // SAFETY: MPFR leaves the value untouched when it rejects the exponent.
        if unsafe { mpfr::set_exp(self.as_raw_mut(), raw_exp) } == 0 {
            Ok(())
        } else {
            Err(FloatError::ExponentOutOfRange(exp))
        }
    }

    /// Returns `-1` if the sign bit is set, `1` otherwise.
    #[must_use]
    pub fn sign(&self) -> i32 {
        if self.signbit() {
            -1
        } else {
            1
        }
    }

    /// Sets the sign bit when `sign` is negative and clears it otherwise.
    pub fn set_sign(&mut self, sign: i32) {
        let rnd = self.rounding.raw();
        let raw = self.as_raw_mut();
        // SAFETY: MPFR allows the result to alias the operand.
        unsafe {
            mpfr::setsign(raw, raw, c_int::from(sign < 0), rnd);
        }
    }

    /// Returns whether the sign bit is set, including for `-0` and NaN.
    #[must_use]
    pub fn signbit(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::signbit(self.as_raw()) != 0 }
    }

    // Mantissa

    /// Returns the byte size of the limb buffer for the current precision.
    #[must_use]
    pub fn mantissa_size(&self) -> usize {
        // SAFETY: pure arithmetic on the precision.
        unsafe { mpfr::custom_get_size(raw_prec(self.precision())) }
    }

    /// Returns the mantissa limbs, least significant first.
    ///
    /// The most significant bit of the last limb is set for regular values.
    /// The contents are unspecified for zero, infinities and NaN.
    #[must_use]
    pub fn mantissa(&self) -> &[Limb] {
        let len = self.mantissa_size() / mem::size_of::<Limb>();
        // SAFETY: MPFR allocates exactly `len` limbs for this precision and
        // the borrow of `self` keeps them alive.
        unsafe { slice::from_raw_parts((*self.as_raw()).d.as_ptr(), len) }
    }

    /// Returns the mantissa limbs for writing.
    ///
    /// # Safety
    ///
    /// The caller must leave the value normalised: for a regular value the
    /// most significant bit must stay set and the bits below the precision
    /// must stay zero.
    pub unsafe fn mantissa_mut(&mut self) -> &mut [Limb] {
        let len = self.mantissa_size() / mem::size_of::<Limb>();
        slice::from_raw_parts_mut((*self.as_raw_mut()).d.as_ptr(), len)
    }

    // Setters

    /// Stores `value`, rounded.
    pub fn set_f64(&mut self, value: f64) -> Ordering {
        let rnd = self.rounding.raw();
        // SAFETY: `self` is initialised and exclusively borrowed.
        ternary(unsafe { mpfr::set_d(self.as_raw_mut(), value, rnd) })
    }

    /// Stores `other`, rounded into this precision.
    pub fn assign(&mut self, other: &Float) -> Ordering {
        let rnd = self.rounding.raw();
        // SAFETY: both values are initialised; `other` cannot alias `self`.
        ternary(unsafe { mpfr::set(self.as_raw_mut(), other.as_raw(), rnd) })
    }

    /// Stores `value` from any [`Scalar`], rounded.
    pub fn assign_scalar<'a>(&mut self, value: impl Into<Scalar<'a>>) -> Ordering {
        match value.into() {
            Scalar::Float(f) => self.assign(f),
            Scalar::Double(d) => self.set_f64(d),
        }
    }

    /// Stores `+0`.
    pub fn set_zero(&mut self) {
        // SAFETY: `self` is initialised and exclusively borrowed.
        unsafe { mpfr::set_zero(self.as_raw_mut(), 1) }
    }

    /// Stores a NaN with a clear sign bit.
    pub fn set_nan(&mut self) {
        let rnd = self.rounding.raw();
        let raw = self.as_raw_mut();
        // SAFETY: as in `set_zero`; MPFR leaves the sign of a new NaN unspecified.
        unsafe {
            mpfr::set_nan(raw);
            mpfr::setsign(raw, raw, 0, rnd);
        }
    }

    /// Stores an infinity of the given sign.
    pub fn set_infinity(&mut self, negative: bool) {
        // SAFETY: as in `set_zero`.
        unsafe { mpfr::set_inf(self.as_raw_mut(), if negative { -1 } else { 1 }) }
    }

    /// Exchanges value, precision and rounding with `other`.
    pub fn swap(&mut self, other: &mut Float) {
        mem::swap(self, other);
    }

    // Conversions

    /// Rounds to a double with this float's rounding mode.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::get_d(self.as_raw(), self.rounding.raw()) }
    }

    /// Rounds to an integer with this float's rounding mode, saturating.
    ///
    /// NaN converts to zero.
    #[must_use]
    pub fn to_i64(&self) -> i64 {
        // SAFETY: reads an initialised value.
        i64::from(unsafe { mpfr::get_si(self.as_raw(), self.rounding.raw()) })
    }

    /// Rounds to an unsigned integer with this float's rounding mode, saturating.
    #[must_use]
    pub fn to_u64(&self) -> u64 {
        // SAFETY: reads an initialised value.
        u64::from(unsafe { mpfr::get_ui(self.as_raw(), self.rounding.raw()) })
    }

    // Classification

    /// Returns whether the value is a finite integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::integer_p(self.as_raw()) != 0 }
    }

    /// Returns whether the value is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::nan_p(self.as_raw()) != 0 }
    }

    /// Returns whether the value is an infinity.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::inf_p(self.as_raw()) != 0 }
    }

    /// Returns whether the value is neither NaN nor infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::number_p(self.as_raw()) != 0 }
    }

    /// Returns whether the value is `+0` or `-0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::zero_p(self.as_raw()) != 0 }
    }

    /// Returns whether the value is finite and nonzero.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        // SAFETY: reads an initialised value.
        unsafe { mpfr::regular_p(self.as_raw()) != 0 }
    }

    /// Returns whether the sign bit is set.
    #[must_use]
    pub fn is_sign_negative(&self) -> bool {
        self.signbit()
    }

    /// Returns `-1`, `0` or `1` following the value; zero for NaN and both zeros.
    #[must_use]
    pub fn sgn(&self) -> i32 {
        if self.is_nan() {
            return 0;
        }
        // SAFETY: reads an initialised, non-NaN value.
        unsafe { mpfr::sgn(self.as_raw()) }.signum()
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::new()
    }
}

impl From<rug::Float> for Float {
    fn from(inner: rug::Float) -> Self {
        Self {
            inner,
            rounding: Context::default_rounding(),
        }
    }
}

impl From<f64> for Float {
    /// Converts with the context precision.
    fn from(value: f64) -> Self {
        let mut f = Self::new();
        f.set_f64(value);
        f
    }
}
