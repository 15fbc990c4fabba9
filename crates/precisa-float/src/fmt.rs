//! Text conversion.
//!
//! Values print in scientific notation, `-d.ddd` followed by `e` and a
//! signed decimal exponent counted in powers of the base. Above base 10 `e`
//! is also a digit, but a digit is never followed by a sign, so parsing
//! reads a trailing `e+n` or `e-n` as the exponent in every base. Special
//! values print as `@NaN@`, `@Inf@` and `-@Inf@`. Everything printed parses
//! back.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::{c_char, CStr, CString};
use std::fmt;
use std::ptr;
use std::str::FromStr;

use gmp_mpfr_sys::mpfr;

use crate::float::ternary;
use crate::{Context, Float, FloatError, Rounding};

const BASES: std::ops::RangeInclusive<i32> = 2..=62;

fn check_base(base: i32) -> Result<(), FloatError> {
    if BASES.contains(&base) {
        Ok(())
    } else {
        Err(FloatError::InvalidBase(base))
    }
}

/// Rewrites a trailing signed `e` exponent as MPFR's `@` form in bases
/// where `e` is a digit.
fn exponent_marker(text: &str, base: i32) -> Cow<'_, str> {
    if base <= 10 {
        return Cow::Borrowed(text);
    }
    let Some(at) = text.rfind(['e', 'E']) else {
        return Cow::Borrowed(text);
    };
    let exponent = &text[at + 1..];
    match exponent.strip_prefix(['+', '-']) {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Cow::Owned(format!("{}@{exponent}", &text[..at]))
        }
        _ => Cow::Borrowed(text),
    }
}

impl Float {
    /// Formats in scientific notation with `digits` significant digits.
    ///
    /// `digits == 0` picks enough digits to read the value back exactly.
    /// Digits are rounded with this float's rounding mode.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidBase`] unless `base` is in `2..=62`.
    pub fn to_string_radix(&self, base: i32, digits: usize) -> Result<String, FloatError> {
        check_base(base)?;
        if self.is_nan() {
            return Ok("@NaN@".to_string());
        }
        if self.is_infinite() {
            return Ok(if self.signbit() { "-@Inf@" } else { "@Inf@" }.to_string());
        }

        // MPFR needs at least two digits when a count is given.
        let digits = if digits == 1 { 2 } else { digits };
        let rnd = match self.rounding() {
            Rounding::Faithful => Rounding::Nearest,
            other => other,
        };
        let mut exp: mpfr::exp_t = 0;
        // SAFETY: a null buffer makes MPFR allocate the result, which is
        // released with `free_str` below.
        let raw = unsafe { mpfr::get_str(ptr::null_mut(), &mut exp, base, digits, self.as_raw(), rnd.raw()) };
        if raw.is_null() {
            return Err(FloatError::InvalidBase(base));
        }
        // SAFETY: MPFR returned a NUL terminated string it owns.
        let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        // SAFETY: `raw` came from `get_str` and is freed once.
        unsafe { mpfr::free_str(raw) };

        let (sign, body) = match text.strip_prefix('-') {
            Some(body) => ("-", body),
            None => ("", text.as_str()),
        };
        let (lead, rest) = body.split_at(1);
        let exp = if self.is_zero() { 0 } else { i64::from(exp) - 1 };

        let mut out = String::with_capacity(text.len() + 8);
        out.push_str(sign);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push_str(&format!("e{exp:+}"));
        Ok(out)
    }

    /// Parses `text` in `base` into a new float of `precision` bits.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidBase`] for a base outside `2..=62` and
    /// [`FloatError::Parse`] unless the whole text is a numeral.
    pub fn parse_radix(text: &str, base: i32, precision: u32) -> Result<Self, FloatError> {
        let mut f = Float::with_precision(precision);
        f.set_str(text, base)?;
        Ok(f)
    }

    /// Parses `text` in `base` and stores it, rounded.
    ///
    /// Accepts MPFR's numeral syntax: an optional sign, digits with an
    /// optional point, an optional exponent (`e` up to base 10, `@` in any
    /// base, `p` for binary exponents in bases 2 and 16) and the special
    /// forms `@NaN@` and `@Inf@`. Above base 10 a trailing `e` followed by
    /// a sign and decimal digits is also an exponent, as
    /// [`Float::to_string_radix`] prints it.
    ///
    /// # Errors
    ///
    /// As [`Float::parse_radix`]; `self` is left untouched.
    pub fn set_str(&mut self, text: &str, base: i32) -> Result<Ordering, FloatError> {
        check_base(base)?;
        let parse_error = || FloatError::Parse {
            input: text.to_string(),
            base,
        };
        let c_text = CString::new(exponent_marker(text, base).as_bytes()).map_err(|_| parse_error())?;

        let mut parsed = Float::with_precision(self.precision()).with_rounding(self.rounding());
        let start = c_text.as_ptr();
        let mut end: *mut c_char = start.cast_mut();
        let rnd = self.rounding().raw();
        // SAFETY: `start` is NUL terminated and `end` receives a pointer into it.
        let status = unsafe { mpfr::strtofr(parsed.as_raw_mut(), start, &mut end, base, rnd) };
        // SAFETY: `end` points into the same NUL terminated buffer.
        let consumed_all = end.cast_const() != start && unsafe { *end } == 0;
        if !consumed_all {
            return Err(parse_error());
        }
        *self = parsed;
        Ok(ternary(status))
    }
}

impl fmt::Display for Float {
    /// Base 10; the formatter precision sets the number of digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_string_radix(10, f.precision().unwrap_or(0)).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Float")
            .field("value", &format_args!("{self}"))
            .field("precision", &self.precision())
            .field("rounding", &self.rounding())
            .finish()
    }
}

impl FromStr for Float {
    type Err = FloatError;

    /// Parses base 10 text at the context precision.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Float::parse_radix(s, 10, Context::default_precision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scientific_layout() {
        let f = Float::with_val(53, 1234.5);
        assert_eq!(f.to_string_radix(10, 6).unwrap(), "1.23450e+3");
        assert_eq!(Float::with_val(53, -0.5).to_string_radix(10, 3).unwrap(), "-5.00e-1");
        assert_eq!(Float::with_val(53, 0.75).to_string_radix(2, 4).unwrap(), "1.100e-1");
    }

    #[test]
    fn test_large_bases_use_e_marker() {
        let f = Float::with_val(53, 255.0);
        assert_eq!(f.to_string_radix(16, 2).unwrap(), "f.fe+1");
        assert_eq!(Float::with_val(53, -0.0625).to_string_radix(16, 2).unwrap(), "-1.0e-1");
        assert_eq!(Float::parse_radix("f.fe+1", 16, 53).unwrap().to_f64(), 255.0);
        assert_eq!(Float::parse_radix("-1.0e-1", 16, 53).unwrap().to_f64(), -0.0625);

        // Without a sign `e` stays a digit.
        assert_eq!(Float::parse_radix("1e", 16, 53).unwrap().to_f64(), 30.0);
        assert_eq!(Float::parse_radix("e", 36, 53).unwrap().to_f64(), 14.0);
    }

    #[test]
    fn test_zero_keeps_exponent() {
        let text = Float::with_precision(53).to_string_radix(10, 3).unwrap();
        assert_eq!(text, "0.00e+0");
    }

    #[test]
    fn test_specials() {
        assert_eq!(Float::nan(10).to_string(), "@NaN@");
        assert_eq!(Float::infinity(10, false).to_string(), "@Inf@");
        assert_eq!(Float::infinity(10, true).to_string(), "-@Inf@");

        assert!(Float::parse_radix("@NaN@", 10, 32).unwrap().is_nan());
        let neg_inf = Float::parse_radix("-@Inf@", 16, 32).unwrap();
        assert!(neg_inf.is_infinite() && neg_inf.signbit());
    }

    #[test]
    fn test_invalid_base() {
        let f = Float::with_val(53, 1.0);
        assert_eq!(f.to_string_radix(1, 0), Err(FloatError::InvalidBase(1)));
        assert_eq!(f.to_string_radix(63, 0), Err(FloatError::InvalidBase(63)));
        assert_eq!(Float::parse_radix("1", 0, 53), Err(FloatError::InvalidBase(0)));
    }

    #[test]
    fn test_parse() {
        let f: Float = "0.125".parse().unwrap();
        assert_eq!(f.to_f64(), 0.125);
        assert_eq!(f.precision(), Context::default_precision());

        let g = Float::parse_radix("1.100e-1", 2, 53).unwrap();
        assert_eq!(g.to_f64(), 0.75);
        let h = Float::parse_radix("f.f@+1", 16, 53).unwrap();
        assert_eq!(h.to_f64(), 255.0);
    }

    #[test]
    fn test_parse_rejects_partial_input() {
        for bad in ["", "1.5x", "abc", "1\u{0}2"] {
            let err = Float::parse_radix(bad, 10, 53).unwrap_err();
            assert!(matches!(err, FloatError::Parse { base: 10, .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_set_str_failure_leaves_value() {
        let mut f = Float::with_val(53, 3.0);
        assert!(f.set_str("nope", 10).is_err());
        assert_eq!(f.to_f64(), 3.0);
        assert_eq!(f.set_str("0.1", 10).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_display_round_trips() {
        let mut third = Float::with_precision(113);
        Float::op_div(&mut third, &Float::with_val(113, 1.0), 3.0);
        let text = third.to_string();
        let back = Float::parse_radix(&text, 10, 113).unwrap();
        assert_eq!(back, third);
    }

    #[test]
    fn test_display_precision_and_debug() {
        let f = Float::with_val(64, 2.0);
        assert_eq!(format!("{f:.4}"), "2.000e+0");
        let debug = format!("{f:?}");
        assert!(debug.contains("precision: 64"));
        assert!(debug.contains("Nearest"));
    }
}
