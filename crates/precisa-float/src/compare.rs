//! Comparisons and IEEE 754 predicates.

use std::cmp::Ordering;

use gmp_mpfr_sys::mpfr;

use crate::Float;

impl Float {
    /// `a > b`; false if either is NaN.
    #[must_use]
    pub fn op_greater_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::greater_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// `a >= b`; false if either is NaN.
    #[must_use]
    pub fn op_greaterequal_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::greaterequal_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// `a < b`; false if either is NaN.
    #[must_use]
    pub fn op_less_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::less_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// `a <= b`; false if either is NaN.
    #[must_use]
    pub fn op_lessequal_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::lessequal_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// `a == b`; false if either is NaN, true for `+0` and `-0`.
    #[must_use]
    pub fn op_equal_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::equal_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// `a < b || a > b`; false if either is NaN.
    #[must_use]
    pub fn op_lessgreater_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::lessgreater_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// True if either operand is NaN.
    #[must_use]
    pub fn op_unordered_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::unordered_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// IEEE 754 `totalOrder(a, b)`: whether `a` comes no later than `b`.
    ///
    /// `-NaN < -inf < ... < -0 < +0 < ... < +inf < +NaN`.
    #[must_use]
    pub fn op_total_order_p(a: &Float, b: &Float) -> bool {
        // SAFETY: reads initialised values.
        unsafe { mpfr::total_order_p(a.as_raw(), b.as_raw()) != 0 }
    }

    /// A total ordering following [`Float::op_total_order_p`].
    #[must_use]
    pub fn total_cmp(&self, other: &Float) -> Ordering {
        match (
            Float::op_total_order_p(self, other),
            Float::op_total_order_p(other, self),
        ) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            _ => Ordering::Greater,
        }
    }

    /// Compares magnitudes; `None` if either is NaN.
    #[must_use]
    pub fn cmp_abs(&self, other: &Float) -> Option<Ordering> {
        if Float::op_unordered_p(self, other) {
            return None;
        }
        // SAFETY: neither value is NaN.
        Some(unsafe { mpfr::cmpabs(self.as_raw(), other.as_raw()) }.cmp(&0))
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Float) -> bool {
        Float::op_equal_p(self, other)
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Float) -> Option<Ordering> {
        if Float::op_unordered_p(self, other) {
            return None;
        }
        // SAFETY: neither value is NaN, so no erange flag is raised.
        Some(unsafe { mpfr::cmp(self.as_raw(), other.as_raw()) }.cmp(&0))
    }

    fn lt(&self, other: &Float) -> bool {
        Float::op_less_p(self, other)
    }

    fn le(&self, other: &Float) -> bool {
        Float::op_lessequal_p(self, other)
    }

    fn gt(&self, other: &Float) -> bool {
        Float::op_greater_p(self, other)
    }

    fn ge(&self, other: &Float) -> bool {
        Float::op_greaterequal_p(self, other)
    }
}

impl PartialEq<f64> for Float {
    fn eq(&self, other: &f64) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd<f64> for Float {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        // SAFETY: neither value is NaN.
        Some(unsafe { mpfr::cmp_d(self.as_raw(), *other) }.cmp(&0))
    }
}
