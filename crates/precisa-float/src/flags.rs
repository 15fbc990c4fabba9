//! Sticky exception flags and the exponent range.
//!
//! MPFR records exceptional events in flags that stay set until cleared,
//! much like a hardware floating point status register. The flags and the
//! exponent range are per thread.

use bitflags::bitflags;
use gmp_mpfr_sys::mpfr;

use crate::FloatError;

bitflags! {
    /// A set of MPFR exception flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// A result underflowed.
        const UNDERFLOW = 1;
        /// A result overflowed.
        const OVERFLOW = 2;
        /// A NaN was produced.
        const NAN = 4;
        /// A result was rounded.
        const INEXACT = 8;
        /// A range error, such as comparing with NaN.
        const ERANGE = 16;
        /// An exact infinite result from finite operands.
        const DIVBY0 = 32;
    }
}

fn raw(mask: Flags) -> mpfr::flags_t {
    mask.bits() as mpfr::flags_t
}

/// Clears the flags in `mask`.
pub fn clear(mask: Flags) {
    // SAFETY: flag manipulation only touches MPFR's thread state.
    unsafe { mpfr::flags_clear(raw(mask)) }
}

/// Raises the flags in `mask`.
pub fn set(mask: Flags) {
    // SAFETY: as in `clear`.
    unsafe { mpfr::flags_set(raw(mask)) }
}

/// Returns which of the flags in `mask` are raised.
#[must_use]
pub fn test(mask: Flags) -> Flags {
    // SAFETY: as in `clear`.
    let bits = unsafe { mpfr::flags_test(raw(mask)) };
    Flags::from_bits_truncate(bits as u32)
}

/// Returns every raised flag.
#[must_use]
pub fn save() -> Flags {
    // SAFETY: as in `clear`.
    let bits = unsafe { mpfr::flags_save() };
    Flags::from_bits_truncate(bits as u32)
}

/// Restores the flags in `mask` to their state in `flags`.
///
/// Flags outside `mask` are left alone.
pub fn restore(flags: Flags, mask: Flags) {
    // SAFETY: as in `clear`.
    unsafe { mpfr::flags_restore(raw(flags), raw(mask)) }
}

/// Returns the current `(emin, emax)` exponent range.
#[must_use]
pub fn exponent_range() -> (i64, i64) {
    // SAFETY: reads MPFR's thread state.
    unsafe { (i64::from(mpfr::get_emin()), i64::from(mpfr::get_emax())) }
}

/// Returns the widest exponent range MPFR supports.
#[must_use]
pub fn exponent_limits() -> (i64, i64) {
    // SAFETY: reads MPFR's compile-time limits.
    unsafe { (i64::from(mpfr::get_emin_min()), i64::from(mpfr::get_emax_max())) }
}

/// Sets the smallest allowed exponent.
///
/// # Errors
///
/// Returns [`FloatError::ExponentOutOfRange`] if MPFR rejects the value.
pub fn set_emin(exp: i64) -> Result<(), FloatError> {
    let value = mpfr::exp_t::try_from(exp).map_err(|_| FloatError::ExponentOutOfRange(exp))?;
    // SAFETY: writes MPFR's thread state; MPFR validates the value.
    if unsafe { mpfr::set_emin(value) } == 0 {
        Ok(())
    } else {
        Err(FloatError::ExponentOutOfRange(exp))
    }
}

/// Sets the largest allowed exponent.
///
/// # Errors
///
/// Returns [`FloatError::ExponentOutOfRange`] if MPFR rejects the value.
pub fn set_emax(exp: i64) -> Result<(), FloatError> {
    let value = mpfr::exp_t::try_from(exp).map_err(|_| FloatError::ExponentOutOfRange(exp))?;
    // SAFETY: as in `set_emin`.
    if unsafe { mpfr::set_emax(value) } == 0 {
        Ok(())
    } else {
        Err(FloatError::ExponentOutOfRange(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Float;

    #[test]
    fn test_set_test_clear() {
        clear(Flags::all());
        assert!(test(Flags::all()).is_empty());

        set(Flags::OVERFLOW | Flags::NAN);
        assert_eq!(test(Flags::all()), Flags::OVERFLOW | Flags::NAN);
        assert_eq!(test(Flags::NAN), Flags::NAN);

        clear(Flags::NAN);
        assert_eq!(save(), Flags::OVERFLOW);
        clear(Flags::all());
    }

    #[test]
    fn test_restore_respects_mask() {
        clear(Flags::all());
        set(Flags::INEXACT);
        restore(Flags::UNDERFLOW | Flags::DIVBY0, Flags::UNDERFLOW);
        assert_eq!(save(), Flags::INEXACT | Flags::UNDERFLOW);
        clear(Flags::all());
    }

    #[test]
    fn test_operations_raise_flags() {
        clear(Flags::all());
        let mut third = Float::with_precision(64);
        Float::op_div(&mut third, &Float::with_val(64, 1.0), 3.0);
        assert!(test(Flags::INEXACT).contains(Flags::INEXACT));

        let mut nan = Float::with_precision(64);
        Float::op_sqrt(&mut nan, &Float::with_val(64, -1.0));
        assert!(nan.is_nan());
        assert!(test(Flags::NAN).contains(Flags::NAN));

        let mut inf = Float::with_precision(64);
        Float::op_div(&mut inf, &Float::with_val(64, 1.0), 0.0);
        assert!(inf.is_infinite());
        assert!(test(Flags::DIVBY0).contains(Flags::DIVBY0));
        clear(Flags::all());
    }

    #[test]
    fn test_exponent_range() {
        let (emin, emax) = exponent_range();
        assert!(emin < 0 && emax > 0);
        let (lo, hi) = exponent_limits();
        assert!(lo <= emin && emax <= hi);

        set_emax(1000).unwrap();
        assert_eq!(exponent_range().1, 1000);
        set_emax(emax).unwrap();
        assert_eq!(exponent_range(), (emin, emax));
        assert!(set_emin(i64::MAX).is_err());
    }
}
