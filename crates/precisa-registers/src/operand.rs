//! Operands of pooled expressions.

use precisa_float::{Float, Scalar};

use crate::Register;

/// An input to [`RegisterPool`](crate::RegisterPool) arithmetic.
///
/// A `Register` operand is consumed: the operation either writes its
/// result into it or releases it.
#[derive(Debug)]
pub enum Operand<'a> {
    /// A borrowed float.
    Value(&'a Float),
    /// A live register of the pool performing the operation.
    Register(Register),
    /// A native double, used exactly.
    Double(f64),
}

impl<'a> Operand<'a> {
    /// Splits off plain values from registers.
    pub(crate) fn into_scalar(self) -> Result<Scalar<'a>, Register> {
        match self {
            Operand::Value(v) => Ok(Scalar::Float(v)),
            Operand::Double(d) => Ok(Scalar::Double(d)),
            Operand::Register(r) => Err(r),
        }
    }
}

impl<'a> From<&'a Float> for Operand<'a> {
    fn from(value: &'a Float) -> Self {
        Operand::Value(value)
    }
}

impl From<Register> for Operand<'_> {
    fn from(register: Register) -> Self {
        Operand::Register(register)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Double(value)
    }
}

impl<'a> From<Scalar<'a>> for Operand<'a> {
    fn from(value: Scalar<'a>) -> Self {
        match value {
            Scalar::Float(f) => Operand::Value(f),
            Scalar::Double(d) => Operand::Double(d),
        }
    }
}
