//! The precomputed abscissa and weight table.
//!
//! Layout of [`AbscissaTable`], by index:
//!
//! | index | content |
//! |---|---|
//! | 2 | `eps`, the requested relative tolerance |
//! | 3 | tail factor used to stop walking towards an endpoint |
//! | 4 | `epsh`, `sqrt(efs * eps)` |
//! | 5, 6, 7 | midpoint abscissa `1/2` and its two weights |
//! | 8.. | triples `(abscissa, weight, error weight)` |
//!
//! The triples are grouped in runs of `stride` entries. Every refinement
//! level halves the step and appends the runs for the new points, so a
//! level `L > 1` starts at `8 + 2^(L-2) * stride`.
//!
//! Abscissas are stored as the distance from the lower endpoint relative
//! to the interval length, which keeps points near either endpoint exact.

use std::ops::Index;

use precisa_float::{Float, FloatError};
use tracing::debug;

/// Index of the midpoint entry; triples start three past it.
pub(crate) const OFFSET: usize = 5;

/// Accuracy target relative to `eps`.
const EFS: f64 = 0.1;

/// Step size parameter.
const HOFF: f64 = 8.5;

/// Abscissas and weights of the tanh-sinh rule at one precision.
#[derive(Clone)]
pub struct AbscissaTable {
    values: Vec<Float>,
    last: usize,
    stride: usize,
    precision: u32,
}

impl AbscissaTable {
    /// Builds a table of `len` entries at `precision` bits.
    ///
    /// `tiny` bounds how far the walk towards an endpoint goes and `eps`
    /// is the relative tolerance the rule aims for.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidPrecision`] if `precision` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `len` is below 16, the size of one header and two triples.
    pub fn build(len: usize, tiny: &Float, eps: &Float, precision: u32) -> Result<Self, FloatError> {
        assert!(len >= 16, "table length {len} is too small");
        let scratch = || Float::try_with_precision(precision);

        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(scratch()?);
        }

        let efs = {
            let mut v = scratch()?;
            v.set_f64(EFS);
            v
        };
        let mut pi2 = scratch()?;
        Float::op_const_pi(&mut pi2);
        pi2.mul_mut(0.5);

        let mut tinyln = scratch()?;
        Float::op_log(&mut tinyln, tiny);
        tinyln.neg_mut();

        let mut efs_eps = scratch()?;
        Float::op_mul(&mut efs_eps, &efs, eps);
        let mut epsln = scratch()?;
        Float::op_log(&mut epsln, &efs_eps);
        epsln.sub_from_mut(1.0);

        let mut h0 = scratch()?;
        h0.set_f64(HOFF);
        h0.div_mut(&epsln);
        let mut ehp = scratch()?;
        Float::op_exp(&mut ehp, &h0);
        let mut ehm = ehp.clone();
        ehm.div_from_mut(1.0);

        values[2].assign(eps);
        Float::op_mul(&mut values[3], &ehm, &epsln);
        values[3].neg_mut();
        values[3].exp_mut();
        Float::op_sqrt(&mut values[4], &efs_eps);

        values[OFFSET].set_f64(0.5);
        values[OFFSET + 1].assign(&h0);
        Float::op_mul(&mut values[OFFSET + 2], &pi2, &h0);
        values[OFFSET + 2].mul_mut(0.5);

        let (mut ep, mut em) = (scratch()?, scratch()?);
        let (mut xw, mut wg) = (scratch()?, scratch()?);

        // h and t are dyadic, so doubles hold them exactly.
        let mut h = 2.0_f64;
        let mut stride = 0;
        let mut k = OFFSET + 3;
        let mut j = k;
        loop {
            let mut t = h * 0.5;
            loop {
                Float::op_mul(&mut em, &h0, t);
                em.exp_mut();
                Float::op_mul(&mut ep, &pi2, &em);
                em.div_from_mut(&pi2);
                j = k;
                loop {
                    // xw = 1 / (1 + e^(ep - em)), wg = xw (1 - xw) h0
                    Float::op_sub(&mut xw, &ep, &em);
                    xw.exp_mut();
                    xw.add_mut(1.0);
                    xw.div_from_mut(1.0);
                    wg.assign(&xw);
                    wg.sub_from_mut(1.0);
                    wg.mul_mut(&xw);
                    wg.mul_mut(&h0);

                    values[j].assign(&xw);
                    Float::op_mul(&mut values[j + 1], &wg, 4.0);
                    Float::op_add(&mut values[j + 2], &ep, &em);
                    values[j + 2].mul_mut(&wg);

                    ep.mul_mut(&ehp);
                    em.mul_mut(&ehm);
                    j += 3;
                    if !(ep < tinyln && j + 3 <= len) {
                        break;
                    }
                }
                t += h;
                k += stride;
                if t >= 1.0 {
                    break;
                }
            }
            h *= 0.5;
            if stride == 0 {
                if j + 6 > len {
                    j -= 3;
                }
                stride = j - OFFSET;
                k += stride;
            }
            if 2 * k > len + OFFSET + 3 {
                break;
            }
        }

        let table = Self {
            values,
            last: k - 3,
            stride,
            precision,
        };
        debug!(
            len,
            used = table.last,
            stride,
            precision,
            levels = table.levels(),
            "compiled abscissa table"
        );
        Ok(table)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the last index refinement may read up to.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.last
    }

    /// Returns the length of one run of triples.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of refinement levels the table holds.
    #[must_use]
    pub fn levels(&self) -> u32 {
        let mut levels = 1;
        let mut limit = OFFSET + 2 * self.stride;
        while limit <= self.last {
            levels += 1;
            limit = 2 * limit - OFFSET;
        }
        levels
    }

    /// Returns the precision of the entries.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the relative tolerance.
    #[must_use]
    pub fn eps(&self) -> &Float {
        &self.values[2]
    }

    /// Returns the factor below which endpoint contributions are dropped.
    #[must_use]
    pub fn tail_factor(&self) -> &Float {
        &self.values[3]
    }

    /// Returns the convergence threshold `sqrt(efs * eps)`.
    #[must_use]
    pub fn epsh(&self) -> &Float {
        &self.values[4]
    }

    /// Returns the abscissa and weights of triple `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j + 2` is out of range.
    #[must_use]
    pub fn triple(&self, j: usize) -> (&Float, &Float, &Float) {
        (&self.values[j], &self.values[j + 1], &self.values[j + 2])
    }

    /// Returns the entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Float] {
        &self.values
    }
}

impl Index<usize> for AbscissaTable {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        &self.values[index]
    }
}

impl std::fmt::Debug for AbscissaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbscissaTable")
            .field("len", &self.values.len())
            .field("last", &self.last)
            .field("stride", &self.stride)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(precision: u32, len: usize) -> AbscissaTable {
        let tiny = {
            let mut v = Float::with_val(precision, 1.0);
            v.set_exponent(-1000).unwrap();
            v
        };
        let eps = {
            let mut v = Float::with_val(precision, 1.0);
            v.set_exponent(-i64::from(precision)).unwrap();
            v
        };
        AbscissaTable::build(len, &tiny, &eps, precision).unwrap()
    }

    #[test]
    fn test_header() {
        let t = table(80, 1000);
        assert_eq!(t.len(), 1000);
        assert_eq!(t.eps().exponent(), Some(-80));
        assert_eq!(t[OFFSET].to_f64(), 0.5);
        assert!(t.epsh() > t.eps());
        assert!(*t.tail_factor() > 0.0 && *t.tail_factor() < 1.0);
    }

    #[test]
    fn test_stride_and_bounds() {
        let t = table(80, 1000);
        assert_eq!(t.stride() % 3, 0);
        assert!(t.stride() >= 6);
        assert!(t.last_index() + 3 <= t.len());
        assert!(t.levels() >= 2);
    }

    #[test]
    fn test_first_run_decreases() {
        let t = table(64, 600);
        let mut previous = Float::with_val(64, 0.5);
        let mut j = OFFSET + 3;
        while j < OFFSET + t.stride() {
            let (x, w, e) = t.triple(j);
            assert!(*x < previous, "abscissa {j} does not decrease");
            assert!(*x >= 0.0);
            assert!(*w >= 0.0 && *e >= 0.0);
            previous = x.clone();
            j += 3;
        }
    }

    #[test]
    fn test_small_table() {
        let t = table(32, 16);
        assert_eq!(t.levels(), 1);
        assert_eq!(t.stride(), 6);
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_rejects_tiny_length() {
        let _ = table(32, 10);
    }
}
