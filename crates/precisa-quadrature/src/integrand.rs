//! Functions to integrate.

use precisa_float::Float;

/// A function evaluated by the quadrature engine.
///
/// `evaluate` stores `f(x)` in `out`. `complement` is the distance from
/// `x` to the nearer finite end of the interval, computed without
/// cancellation; integrands with endpoint singularities such as
/// `1 / sqrt(1 - x^2)` should use it instead of forming `1 - x`.
///
/// Storing a NaN or an infinity stops the current walk of the engine
/// and contributes nothing.
///
/// Closures taking `(out, x, complement)` implement this trait:
///
/// ```
/// use precisa_float::Float;
/// use precisa_quadrature::Integrand;
///
/// let mut square = |out: &mut Float, x: &Float, _: &Float| {
///     Float::op_sqr(out, x);
/// };
/// let mut out = Float::with_precision(64);
/// square.evaluate(&mut out, &Float::with_val(64, 3.0), &Float::with_precision(64));
/// assert_eq!(out.to_f64(), 9.0);
/// ```
pub trait Integrand {
    /// Stores `f(x)` in `out`.
    fn evaluate(&mut self, out: &mut Float, x: &Float, complement: &Float);
}

impl<F> Integrand for F
where
    F: FnMut(&mut Float, &Float, &Float),
{
    fn evaluate(&mut self, out: &mut Float, x: &Float, complement: &Float) {
        self(out, x, complement);
    }
}

/// An integrand that ignores the complement.
#[derive(Clone, Debug)]
pub struct FromFn<F>(F);

/// Wraps a two-argument closure `(out, x)` as an [`Integrand`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut Float, &Float),
{
    FromFn(f)
}

impl<F> Integrand for FromFn<F>
where
    F: FnMut(&mut Float, &Float),
{
    fn evaluate(&mut self, out: &mut Float, x: &Float, _complement: &Float) {
        (self.0)(out, x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_ignores_complement() {
        let mut calls = 0;
        let mut f = from_fn(|out: &mut Float, x: &Float| {
            calls += 1;
            Float::op_neg(out, x);
        });
        let mut out = Float::with_precision(32);
        f.evaluate(&mut out, &Float::with_val(32, 2.0), &Float::nan(32));
        assert_eq!(out.to_f64(), -2.0);
        drop(f);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_trait_object() {
        let mut boxed: Box<dyn Integrand> = Box::new(|out: &mut Float, _: &Float, c: &Float| {
            out.assign(c);
        });
        let mut out = Float::with_precision(32);
        boxed.evaluate(&mut out, &Float::with_val(32, 0.0), &Float::with_val(32, 0.25));
        assert_eq!(out.to_f64(), 0.25);
    }
}
