//! Expression arithmetic over pooled registers.
//!
//! Each operation consumes its operands and returns the result in a
//! register. A register operand doubles as the destination when it can,
//! and any other register operand is released, so chains such as
//! `pool.mul(pool.add(&a, &b), &c)` keep at most one register live.

use std::cmp::Ordering;

use precisa_float::{Float, Scalar};

use crate::{Operand, Register, RegisterPool};

#[derive(Clone, Copy, Debug)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// `target = target op rhs`.
    fn apply(self, target: &mut Float, rhs: Scalar<'_>) -> Ordering {
        match self {
            BinaryOp::Add => target.add_mut(rhs),
            BinaryOp::Sub => target.sub_mut(rhs),
            BinaryOp::Mul => target.mul_mut(rhs),
            BinaryOp::Div => target.div_mut(rhs),
        }
    }

    /// `target = lhs op target`.
    fn apply_reversed(self, target: &mut Float, lhs: Scalar<'_>) -> Ordering {
        match self {
            BinaryOp::Add => target.add_mut(lhs),
            BinaryOp::Sub => target.sub_from_mut(lhs),
            BinaryOp::Mul => target.mul_mut(lhs),
            BinaryOp::Div => target.div_from_mut(lhs),
        }
    }

    fn commutes(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Mul)
    }

    /// `out = lhs op rhs` with a single rounding.
    fn apply_into(self, out: &mut Float, lhs: &Float, rhs: Scalar<'_>) -> Ordering {
        match self {
            BinaryOp::Add => Float::op_add(out, lhs, rhs),
            BinaryOp::Sub => Float::op_sub(out, lhs, rhs),
            BinaryOp::Mul => Float::op_mul(out, lhs, rhs),
            BinaryOp::Div => Float::op_div(out, lhs, rhs),
        }
    }
}

impl RegisterPool {
    /// `lhs + rhs`.
    pub fn add<'a>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'a>>) -> Register {
        self.binary(BinaryOp::Add, lhs.into(), rhs.into())
    }

    /// `lhs - rhs`.
    pub fn sub<'a>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'a>>) -> Register {
        self.binary(BinaryOp::Sub, lhs.into(), rhs.into())
    }

    /// `lhs * rhs`.
    pub fn mul<'a>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'a>>) -> Register {
        self.binary(BinaryOp::Mul, lhs.into(), rhs.into())
    }

    /// `lhs / rhs`.
    pub fn div<'a>(&mut self, lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'a>>) -> Register {
        self.binary(BinaryOp::Div, lhs.into(), rhs.into())
    }

    fn binary(&mut self, op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>) -> Register {
        match (lhs.into_scalar(), rhs.into_scalar()) {
            (Err(dst), Err(src)) => {
                let (target, source) = self.pair_mut(&dst, &src);
                op.apply(target, Scalar::Float(source));
                self.release(src);
                dst
            }
            (Err(dst), Ok(rhs)) => {
                op.apply(self.get_mut(&dst), rhs);
                dst
            }
            (Ok(lhs), Err(dst)) => {
                op.apply_reversed(self.get_mut(&dst), lhs);
                dst
            }
            (Ok(Scalar::Float(lhs)), Ok(rhs)) => {
                let dst = self.adopt();
                op.apply_into(self.get_mut(&dst), lhs, rhs);
                dst
            }
            (Ok(Scalar::Double(lhs)), Ok(Scalar::Float(rhs))) if op.commutes() => {
                let dst = self.adopt();
                op.apply_into(self.get_mut(&dst), rhs, Scalar::Double(lhs));
                dst
            }
            (Ok(Scalar::Double(lhs)), Ok(rhs)) => {
                let exact = exact_double(lhs);
                let dst = self.adopt();
                op.apply_into(self.get_mut(&dst), &exact, rhs);
                dst
            }
        }
    }

    /// `-op`.
    pub fn neg<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_neg, Float::neg_mut)
    }

    /// `|op|`.
    pub fn abs<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_abs, Float::abs_mut)
    }

    /// `sqrt(op)`.
    pub fn sqrt<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_sqrt, Float::sqrt_mut)
    }

    /// `e^op`.
    pub fn exp<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_exp, Float::exp_mut)
    }

    /// `log(op)`.
    pub fn log<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_log, Float::log_mut)
    }

    /// `atan(op)`.
    pub fn atan<'a>(&mut self, op: impl Into<Operand<'a>>) -> Register {
        self.unary(op.into(), Float::op_atan, Float::atan_mut)
    }

    fn unary(
        &mut self,
        op: Operand<'_>,
        into: fn(&mut Float, &Float) -> Ordering,
        in_place: fn(&mut Float) -> Ordering,
    ) -> Register {
        match op.into_scalar() {
            Err(dst) => {
                in_place(self.get_mut(&dst));
                dst
            }
            Ok(Scalar::Float(src)) => {
                let dst = self.adopt();
                into(self.get_mut(&dst), src);
                dst
            }
            Ok(Scalar::Double(value)) => {
                let exact = exact_double(value);
                let dst = self.adopt();
                into(self.get_mut(&dst), &exact);
                dst
            }
        }
    }

    /// `target += rhs`, releasing `rhs` if it is a register.
    pub fn add_assign<'a>(&mut self, target: &mut Float, rhs: impl Into<Operand<'a>>) -> Ordering {
        self.fold(BinaryOp::Add, target, rhs.into())
    }

    /// `target -= rhs`, releasing `rhs` if it is a register.
    pub fn sub_assign<'a>(&mut self, target: &mut Float, rhs: impl Into<Operand<'a>>) -> Ordering {
        self.fold(BinaryOp::Sub, target, rhs.into())
    }

    /// `target *= rhs`, releasing `rhs` if it is a register.
    pub fn mul_assign<'a>(&mut self, target: &mut Float, rhs: impl Into<Operand<'a>>) -> Ordering {
        self.fold(BinaryOp::Mul, target, rhs.into())
    }

    /// `target /= rhs`, releasing `rhs` if it is a register.
    pub fn div_assign<'a>(&mut self, target: &mut Float, rhs: impl Into<Operand<'a>>) -> Ordering {
        self.fold(BinaryOp::Div, target, rhs.into())
    }

    fn fold(&mut self, op: BinaryOp, target: &mut Float, rhs: Operand<'_>) -> Ordering {
        match rhs.into_scalar() {
            Ok(rhs) => op.apply(target, rhs),
            Err(src) => {
                let status = op.apply(target, Scalar::Float(self.get(&src)));
                self.release(src);
                status
            }
        }
    }

    /// Compares two operands, releasing any registers among them.
    ///
    /// `None` if either is NaN.
    pub fn compare<'a>(&mut self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> Option<Ordering> {
        let (a, b) = (a.into(), b.into());
        let result = compare_scalars(self.view(&a), self.view(&b));
        for operand in [a, b] {
            if let Operand::Register(r) = operand {
                self.release(r);
            }
        }
        result
    }

    fn view<'s>(&'s self, operand: &'s Operand<'_>) -> Scalar<'s> {
        match operand {
            Operand::Value(v) => Scalar::Float(v),
            Operand::Double(d) => Scalar::Double(*d),
            Operand::Register(r) => Scalar::Float(self.get(r)),
        }
    }
}

/// Holds a double without rounding, so the operation it feeds rounds once
/// into the register.
fn exact_double(value: f64) -> Float {
    Float::with_val(f64::MANTISSA_DIGITS, value)
}

fn compare_scalars(a: Scalar<'_>, b: Scalar<'_>) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
        (Scalar::Float(a), Scalar::Double(b)) => a.partial_cmp(&b),
        (Scalar::Double(a), Scalar::Float(b)) => b.partial_cmp(&a).map(Ordering::reverse),
        (Scalar::Double(a), Scalar::Double(b)) => a.partial_cmp(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(v: f64) -> Float {
        Float::with_val(64, v)
    }

    #[test]
    fn test_chain_keeps_one_register() {
        let mut pool = RegisterPool::new(64);
        let (a, b, c, d) = (val(1.5), val(2.5), val(3.0), val(4.0));

        let sum = pool.add(&a, &b);
        let product = pool.mul(sum, &c);
        assert_eq!(pool.active_count(), 1);
        let quotient = pool.div(product, &d);
        assert_eq!(pool.get(&quotient).to_f64(), 3.0);
        pool.release(quotient);

        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.allocation_count(), 1);
    }

    #[test]
    fn test_two_registers_merge() {
        let mut pool = RegisterPool::new(64);
        let left = pool.add(&val(1.0), 2.0);
        let right = pool.mul(&val(2.0), 5.0);
        let diff = pool.sub(left, right);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.into_float(diff).to_f64(), -7.0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_register_on_the_right() {
        let mut pool = RegisterPool::new(64);
        let r = pool.adopt_value(4.0);
        let r = pool.sub(&val(10.0), r);
        assert_eq!(pool.get(&r).to_f64(), 6.0);
        let r = pool.div(3.0, r);
        assert_eq!(pool.get(&r).to_f64(), 0.5);
        let r = pool.add(1.0, r);
        assert_eq!(pool.into_float(r).to_f64(), 1.5);
    }

    #[test]
    fn test_doubles_only() {
        let mut pool = RegisterPool::new(64);
        let r = pool.div(1.0, 4.0);
        assert_eq!(pool.into_float(r).to_f64(), 0.25);
    }

    #[test]
    fn test_single_rounding_from_plain_values() {
        let mut pool = RegisterPool::new(8);
        // `a` sits on a rounding tie at 8 bits; rounding it first would
        // drop the sum back to 1.
        let a = Float::with_val(64, 1.0 + 1.0 / 256.0);
        let b = Float::with_val(64, 1.0 / 1024.0);
        let r = pool.add(&a, &b);
        assert_eq!(pool.into_float(r).to_f64(), 1.0 + 1.0 / 128.0);
    }

    #[test]
    fn test_single_rounding_from_doubles() {
        let mut pool = RegisterPool::new(8);
        // 1 + 2^-8 + 2^-20 rounds up to 1 + 2^-7 at 8 bits, but minus
        // 2^-20 it is the tie 1 + 2^-8, which rounds to even.
        let lhs = 1.0 + 2f64.powi(-8) + 2f64.powi(-20);
        let tiny = Float::with_val(64, 2f64.powi(-20));
        let r = pool.sub(lhs, &tiny);
        assert_eq!(pool.into_float(r).to_f64(), 1.0);
        let r = pool.add(lhs, -2f64.powi(-20));
        assert_eq!(pool.into_float(r).to_f64(), 1.0);
        let r = pool.add(lhs, &Float::with_val(64, -2f64.powi(-20)));
        assert_eq!(pool.into_float(r).to_f64(), 1.0);

        // sqrt is just above 1 + 2^-8; the argument rounded to 8 bits
        // would give a root just below it.
        let square = 1.0 + 2f64.powi(-7) + 2f64.powi(-16) + 2f64.powi(-29);
        let r = pool.sqrt(square);
        assert_eq!(pool.into_float(r).to_f64(), 1.0 + 2f64.powi(-7));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_unary_operations() {
        let mut pool = RegisterPool::new(64);
        let r = pool.sqrt(&val(16.0));
        let r = pool.neg(r);
        let r = pool.abs(r);
        assert_eq!(pool.get(&r).to_f64(), 4.0);
        let r = pool.log(r);
        let r = pool.exp(r);
        assert!((pool.get(&r).to_f64() - 4.0).abs() < 1e-15);
        pool.release(r);

        let r = pool.atan(1.0);
        assert!((pool.into_float(r).to_f64() - std::f64::consts::FRAC_PI_4).abs() < 1e-16);
    }

    #[test]
    fn test_fold_into_plain_float() {
        let mut pool = RegisterPool::new(64);
        let mut total = val(1.0);
        let r = pool.mul(&val(3.0), 4.0);
        pool.add_assign(&mut total, r);
        assert_eq!(total.to_f64(), 13.0);
        assert_eq!(pool.active_count(), 0);

        pool.sub_assign(&mut total, 1.0);
        pool.mul_assign(&mut total, &val(0.5));
        let r = pool.adopt_value(3.0);
        pool.div_assign(&mut total, r);
        assert_eq!(total.to_f64(), 2.0);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_compare_releases() {
        let mut pool = RegisterPool::new(64);
        let r = pool.adopt_value(2.0);
        assert_eq!(pool.compare(r, 3.0), Some(Ordering::Less));
        let r = pool.adopt_value(2.0);
        assert_eq!(pool.compare(5.0, r), Some(Ordering::Greater));
        let (x, y) = (pool.adopt_value(1.0), pool.adopt_value(1.0));
        assert_eq!(pool.compare(x, y), Some(Ordering::Equal));
        assert_eq!(pool.compare(&Float::nan(64), 0.0), None);
        assert_eq!(pool.active_count(), 0);
    }
}
