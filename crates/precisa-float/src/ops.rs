//! Operator overloads and `num-traits` impls.
//!
//! Binary operators return a value with the left operand's precision and
//! rounding. Use the `op_*` functions to pick the output precision.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::{Context, Float};

macro_rules! arith_impls {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $in_place:ident) => {
        impl $AssignTrait<&Float> for Float {
            fn $assign(&mut self, rhs: &Float) {
                self.$in_place(rhs);
            }
        }

        impl $AssignTrait for Float {
            fn $assign(&mut self, rhs: Float) {
                self.$in_place(&rhs);
            }
        }

        impl $AssignTrait<f64> for Float {
            fn $assign(&mut self, rhs: f64) {
                self.$in_place(rhs);
            }
        }

        impl $Trait for Float {
            type Output = Float;

            fn $method(mut self, rhs: Float) -> Float {
                self.$in_place(&rhs);
                self
            }
        }

        impl $Trait<&Float> for Float {
            type Output = Float;

            fn $method(mut self, rhs: &Float) -> Float {
                self.$in_place(rhs);
                self
            }
        }

        impl $Trait<f64> for Float {
            type Output = Float;

            fn $method(mut self, rhs: f64) -> Float {
                self.$in_place(rhs);
                self
            }
        }

        impl $Trait for &Float {
            type Output = Float;

            fn $method(self, rhs: &Float) -> Float {
                let mut out = self.clone();
                out.$in_place(rhs);
                out
            }
        }

        impl $Trait<f64> for &Float {
            type Output = Float;

            fn $method(self, rhs: f64) -> Float {
                let mut out = self.clone();
                out.$in_place(rhs);
                out
            }
        }
    };
}

arith_impls!(Add, add, AddAssign, add_assign, add_mut);
arith_impls!(Sub, sub, SubAssign, sub_assign, sub_mut);
arith_impls!(Mul, mul, MulAssign, mul_assign, mul_mut);
arith_impls!(Div, div, DivAssign, div_assign, div_mut);

impl Neg for Float {
    type Output = Float;

    fn neg(mut self) -> Float {
        self.neg_mut();
        self
    }
}

impl Neg for &Float {
    type Output = Float;

    fn neg(self) -> Float {
        -self.clone()
    }
}

impl Zero for Float {
    /// `+0` at the context precision.
    fn zero() -> Self {
        Float::new()
    }

    fn is_zero(&self) -> bool {
        Float::is_zero(self)
    }
}

impl One for Float {
    /// `1` at the context precision.
    fn one() -> Self {
        Float::with_val(Context::default_precision(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let a = Float::with_val(64, 6.0);
        let b = Float::with_val(64, 4.0);
        assert_eq!((&a + &b).to_f64(), 10.0);
        assert_eq!((&a - &b).to_f64(), 2.0);
        assert_eq!((&a * 0.5).to_f64(), 3.0);
        assert_eq!((a.clone() / b.clone()).to_f64(), 1.5);
        assert_eq!((-&a).to_f64(), -6.0);

        let mut c = a.clone();
        c += &b;
        c -= 1.0;
        c *= b;
        c /= 2.0;
        assert_eq!(c.to_f64(), 18.0);
    }

    #[test]
    fn test_lhs_precision_wins() {
        let narrow = Float::with_val(8, 1.0);
        let wide = Float::with_val(200, 1e-10);
        let sum = &narrow + &wide;
        assert_eq!(sum.precision(), 8);
        assert_eq!(sum.to_f64(), 1.0);
    }

    #[test]
    fn test_zero_one() {
        let _guard = Context::new(80, crate::Rounding::Nearest).scoped();
        let zero = Float::zero();
        let one = Float::one();
        assert!(Zero::is_zero(&zero));
        assert_eq!(one.precision(), 80);
        assert_eq!(zero + &one, 1.0);
    }
}
