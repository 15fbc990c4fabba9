//! Infinite intervals.
//!
//! A half line `[a, inf)` is pulled back onto `[0, 1]` with
//! `x = a + t / (1 - t)` and the whole line onto `[-1, 1]` with
//! `x = t / (1 - t^2)`. Near the ends of the finite interval `1 - |t|` is
//! taken from the complement the engine passes in, so no cancellation
//! happens where the weights blow up.

use precisa_float::Float;

use crate::Integrand;

/// Where an interval reaches infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tail {
    /// `[a, +inf)`.
    Upper,
    /// `(-inf, b]`.
    Lower,
    /// `(-inf, +inf)`.
    Both,
}

impl Tail {
    /// Classifies the ordered, non-NaN bounds `lo < hi`.
    pub(crate) fn of(lo: &Float, hi: &Float) -> Option<Self> {
        match (lo.is_infinite(), hi.is_infinite()) {
            (false, false) => None,
            (false, true) => Some(Tail::Upper),
            (true, false) => Some(Tail::Lower),
            (true, true) => Some(Tail::Both),
        }
    }

    /// Returns the finite interval the tail is mapped onto.
    pub(crate) fn domain(self) -> (f64, f64) {
        match self {
            Tail::Upper | Tail::Lower => (0.0, 1.0),
            Tail::Both => (-1.0, 1.0),
        }
    }
}

/// Wraps an integrand over an infinite interval as one over a finite one.
pub(crate) struct Mapped<'a> {
    inner: &'a mut dyn Integrand,
    tail: Tail,
    /// The finite endpoint of a half line.
    anchor: Float,
    /// `1 - |t|`, then the product `(1 - |t|)(1 + |t|)` on the whole line.
    gap: Float,
    /// Distance from the image to the anchor, or `|x|` on the whole line.
    distance: Float,
    abs_t: Float,
    image: Float,
    weight: Float,
    scratch: Float,
}

impl<'a> Mapped<'a> {
    pub(crate) fn new(inner: &'a mut dyn Integrand, tail: Tail, anchor: &Float) -> Self {
        let precision = anchor.precision();
        let scratch = || Float::with_precision(precision);
        Self {
            inner,
            tail,
            anchor: anchor.clone(),
            gap: scratch(),
            distance: scratch(),
            abs_t: scratch(),
            image: scratch(),
            weight: scratch(),
            scratch: scratch(),
        }
    }
}

/// Sets `gap = 1 - at`, reading it off the complement past the middle.
fn set_gap(gap: &mut Float, at: &Float, complement: &Float) {
    if *at > 0.5 {
        gap.assign(complement);
    } else {
        gap.assign(at);
        gap.sub_from_mut(1.0);
    }
}

impl Integrand for Mapped<'_> {
    fn evaluate(&mut self, out: &mut Float, t: &Float, complement: &Float) {
        match self.tail {
            Tail::Upper | Tail::Lower => {
                // u = t / (1 - t), dx/dt = 1 / (1 - t)^2
                set_gap(&mut self.gap, t, complement);
                Float::op_div(&mut self.distance, t, &self.gap);
                Float::op_sqr(&mut self.weight, &self.gap);
                self.weight.div_from_mut(1.0);
                if self.tail == Tail::Upper {
                    Float::op_add(&mut self.image, &self.anchor, &self.distance);
                } else {
                    Float::op_sub(&mut self.image, &self.anchor, &self.distance);
                }
            }
            Tail::Both => {
                // u = |t| / (1 - t^2), dx/dt = (1 + t^2) / (1 - t^2)^2
                Float::op_abs(&mut self.abs_t, t);
                set_gap(&mut self.gap, &self.abs_t, complement);
                Float::op_add(&mut self.scratch, &self.abs_t, 1.0);
                self.gap.mul_mut(&self.scratch);
                Float::op_div(&mut self.distance, &self.abs_t, &self.gap);
                Float::op_copysign(&mut self.image, &self.distance, t);

                Float::op_sqr(&mut self.weight, &self.abs_t);
                self.weight.add_mut(1.0);
                Float::op_sqr(&mut self.scratch, &self.gap);
                self.weight.div_mut(&self.scratch);
            }
        }
        self.inner.evaluate(out, &self.image, &self.distance);
        out.mul_mut(&self.weight);
    }
}
