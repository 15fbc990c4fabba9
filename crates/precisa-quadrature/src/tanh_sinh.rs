//! The tanh-sinh quadrature engine.
//!
//! The substitution `x = tanh(pi/2 sinh t)` turns the integral over a
//! finite interval into one over the real line whose integrand decays
//! double exponentially, so the trapezoidal rule converges very fast
//! even with endpoint singularities. The engine halves the step until
//! two successive estimates agree to the requested tolerance.
//!
//! # Example
//!
//! ```
//! use precisa_float::Float;
//! use precisa_quadrature::TanhSinh;
//!
//! let mut engine = TanhSinh::new(64);
//! engine.set_integrand(|out: &mut Float, x: &Float, _: &Float| {
//!     Float::op_sqr(out, x);
//! });
//! engine.set_bounds(0.0, 3.0);
//! engine.compile().unwrap();
//! engine.integrate().unwrap();
//!
//! assert!((engine.integral_approx().to_f64() - 9.0).abs() < 1e-15);
//! assert!(engine.is_convergent_error());
//! ```

use std::cmp::Ordering;
use std::fmt;

use precisa_float::{flags, Context, Float, Rounding, Scalar};
use precisa_registers::{Register, RegisterPool};
use tracing::{debug, trace};

use crate::improper::{Mapped, Tail};
use crate::table::OFFSET;
use crate::{AbscissaTable, Integrand, QuadratureConfig, QuadratureError};

/// Double exponential quadrature over a possibly infinite interval.
///
/// The engine goes through three stages: configure it, build its
/// abscissa table with [`compile`](Self::compile), then call
/// [`integrate`](Self::integrate) as often as needed. Bounds and the
/// integrand can change between integrations without recompiling;
/// changing the precision or the point count drops the table.
pub struct TanhSinh<'f> {
    config: QuadratureConfig,
    table: Option<AbscissaTable>,
    lower: Float,
    upper: Float,
    integrand: Option<Box<dyn Integrand + 'f>>,
    integral: Float,
    error: Float,
    calls: u64,
    /// Scratch registers at the safe precision.
    pool: RegisterPool,
}

impl<'f> TanhSinh<'f> {
    /// Creates an engine producing `precision` bit results with the
    /// default point count.
    #[must_use]
    pub fn new(precision: u32) -> Self {
        Self::from_config(QuadratureConfig::new(precision))
    }

    /// Creates an engine with an explicit point count.
    #[must_use]
    pub fn with_points(precision: u32, points: usize) -> Self {
        Self::from_config(QuadratureConfig::new(precision).with_points(points))
    }

    /// Creates an engine from a configuration.
    #[must_use]
    pub fn from_config(config: QuadratureConfig) -> Self {
        let (user, safe) = config.buffer_precisions();
        Self {
            config,
            table: None,
            lower: Float::with_precision(safe),
            upper: Float::with_precision(safe),
            integrand: None,
            integral: Float::nan(user).with_rounding(Rounding::Nearest),
            error: Float::nan(safe).with_rounding(Rounding::Nearest),
            calls: 0,
            pool: scratch_pool(safe),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> QuadratureConfig {
        self.config
    }

    /// Returns the precision of results.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.config.precision()
    }

    /// Returns the working precision.
    #[must_use]
    pub fn safe_precision(&self) -> u32 {
        self.config.safe_precision()
    }

    /// Returns the number of abscissa samples.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.config.points()
    }

    /// Changes the precision of results and drops the table.
    ///
    /// The bounds are re-rounded to the new working precision. An explicit
    /// point count is kept.
    pub fn set_precision(&mut self, precision: u32) {
        self.reconfigure(self.config.with_precision(precision));
    }

    /// Changes the point count and drops the table.
    pub fn set_point_count(&mut self, points: usize) {
        self.reconfigure(self.config.with_points(points));
    }

    fn reconfigure(&mut self, config: QuadratureConfig) {
        if config == self.config {
            return;
        }
        let (user, safe) = config.buffer_precisions();
        self.config = config;
        self.table = None;
        self.lower.round_to_precision(safe);
        self.upper.round_to_precision(safe);
        self.integral = Float::nan(user).with_rounding(Rounding::Nearest);
        self.error = Float::nan(safe).with_rounding(Rounding::Nearest);
        self.pool = scratch_pool(safe);
    }

    /// Returns `true` once the table is built for the current configuration.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.table.is_some()
    }

    /// Returns the abscissa table, if compiled.
    #[must_use]
    pub fn table(&self) -> Option<&AbscissaTable> {
        self.table.as_ref()
    }

    /// Sets the function to integrate.
    pub fn set_integrand(&mut self, integrand: impl Integrand + 'f) {
        self.integrand = Some(Box::new(integrand));
    }

    /// Returns `true` if an integrand is set.
    #[must_use]
    pub fn has_integrand(&self) -> bool {
        self.integrand.is_some()
    }

    /// Sets both bounds. Either may be infinite.
    pub fn set_bounds<'a>(&mut self, lower: impl Into<Scalar<'a>>, upper: impl Into<Scalar<'a>>) {
        self.set_lower_bound(lower);
        self.set_upper_bound(upper);
    }

    /// Sets the lower bound, rounded to the working precision.
    pub fn set_lower_bound<'a>(&mut self, lower: impl Into<Scalar<'a>>) {
        self.lower.assign_scalar(lower);
    }

    /// Sets the upper bound, rounded to the working precision.
    pub fn set_upper_bound<'a>(&mut self, upper: impl Into<Scalar<'a>>) {
        self.upper.assign_scalar(upper);
    }

    /// Returns the lower bound.
    #[must_use]
    pub fn lower_bound(&self) -> &Float {
        &self.lower
    }

    /// Returns the upper bound.
    #[must_use]
    pub fn upper_bound(&self) -> &Float {
        &self.upper
    }

    /// Builds the abscissa table.
    ///
    /// Does nothing if the table is already built for the current
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::TooFewPoints`] or
    /// [`QuadratureError::Float`] for an unusable configuration.
    pub fn compile(&mut self) -> Result<(), QuadratureError> {
        self.config.validate()?;
        if self.table.is_some() {
            trace!("abscissa table already compiled");
            return Ok(());
        }

        let safe = self.config.safe_precision();
        let _guard = Context::new(safe, Rounding::Nearest).scoped();

        // tiny = 2^emin, eps = 2^-(precision + 1)
        let (emin, _) = flags::exponent_range();
        let mut tiny = Float::with_val(safe, 1.0);
        tiny.set_exponent(emin + 1)?;
        let mut eps = Float::with_val(safe, 1.0);
        eps.set_exponent(-i64::from(self.config.precision()))?;

        self.table = Some(AbscissaTable::build(self.config.table_len(), &tiny, &eps, safe)?);
        Ok(())
    }

    /// Integrates the current integrand between the current bounds.
    ///
    /// Reversed bounds give the negated integral and equal bounds give
    /// zero without evaluating the integrand. The call counter restarts
    /// at zero.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::NotCompiled`] without a table,
    /// [`QuadratureError::MissingIntegrand`] without an integrand and
    /// [`QuadratureError::NanBound`] if a bound is NaN. The integrand is
    /// never evaluated in these cases.
    pub fn integrate(&mut self) -> Result<(), QuadratureError> {
        self.calls = 0;
        let Self {
            config,
            table,
            lower,
            upper,
            integrand,
            integral,
            error,
            calls,
            pool,
        } = self;
        let table = table.as_ref().ok_or(QuadratureError::NotCompiled)?;
        let integrand = integrand.as_deref_mut().ok_or(QuadratureError::MissingIntegrand)?;
        if lower.is_nan() || upper.is_nan() {
            return Err(QuadratureError::NanBound);
        }

        let safe = config.safe_precision();
        let _guard = Context::new(safe, Rounding::Nearest).scoped();
        integral.set_precision(safe);
        integral.set_zero();
        error.set_zero();

        let (lo, hi, negate) = match (*lower).partial_cmp(&*upper) {
            Some(Ordering::Less) => (&*lower, &*upper, false),
            Some(Ordering::Greater) => (&*upper, &*lower, true),
            Some(Ordering::Equal) | None => {
                integral.round_to_precision(config.precision());
                debug!("empty interval");
                return Ok(());
            }
        };

        let mut run = Run {
            table,
            pool,
            calls: 0,
        };
        match Tail::of(lo, hi) {
            None => run.intde(integrand, lo, hi, integral, error),
            Some(tail) => {
                let anchor = if tail == Tail::Lower { hi } else { lo };
                let mut mapped = Mapped::new(integrand, tail, anchor);
                let (a, b) = tail.domain();
                let (a, b) = (Float::with_val(safe, a), Float::with_val(safe, b));
                run.intde(&mut mapped, &a, &b, integral, error);
            }
        }
        *calls = run.calls;

        if negate {
            integral.neg_mut();
        }
        integral.round_to_precision(config.precision());
        pool.clean();

        debug!(
            calls = *calls,
            precision = config.precision(),
            convergent = !error.is_nan() && !error.signbit(),
            "integrated"
        );
        Ok(())
    }

    /// Returns the integral from the last [`integrate`](Self::integrate),
    /// at the result precision.
    #[must_use]
    pub fn integral_approx(&self) -> &Float {
        &self.integral
    }

    /// Returns the absolute error estimate from the last integration.
    ///
    /// Negative when the refinement ran out of table before converging;
    /// its magnitude is then a rough error bound.
    #[must_use]
    pub fn absolute_error_approx(&self) -> &Float {
        &self.error
    }

    /// Returns the exponent of the error estimate relative to the integral.
    ///
    /// `None` unless both are finite and nonzero.
    #[must_use]
    pub fn relative_error_exponent(&self) -> Option<i64> {
        Some(self.error.exponent()? - self.integral.exponent()?)
    }

    /// Returns `true` if the last integration met its tolerance.
    #[must_use]
    pub fn is_convergent_error(&self) -> bool {
        !self.error.is_nan() && !self.error.signbit()
    }

    /// Returns the number of integrand evaluations in the last integration.
    #[must_use]
    pub fn integrand_call_count(&self) -> u64 {
        self.calls
    }
}

impl Default for TanhSinh<'_> {
    /// An engine at the context precision.
    fn default() -> Self {
        Self::from_config(QuadratureConfig::default())
    }
}

impl fmt::Debug for TanhSinh<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TanhSinh")
            .field("config", &self.config)
            .field("compiled", &self.is_compiled())
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("integrand", &self.integrand.is_some())
            .field("integral", &self.integral)
            .field("error", &self.error)
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}

fn scratch_pool(precision: u32) -> RegisterPool {
    let mut pool = RegisterPool::new(precision);
    pool.set_rounding(Rounding::Nearest);
    pool
}

/// Which end of the interval a point is measured from.
#[derive(Clone, Copy)]
enum Side {
    Lower,
    Upper,
}

/// One integration pass over a compiled table.
struct Run<'a> {
    table: &'a AbscissaTable,
    pool: &'a mut RegisterPool,
    calls: u64,
}

/// `|value| > bound` for a non-negative `bound`.
fn exceeds(value: &Float, bound: &Float) -> bool {
    value.cmp_abs(bound) == Some(Ordering::Greater)
}

impl Run<'_> {
    /// Evaluates `f` at the register `x`, releasing it.
    ///
    /// A non-finite value is replaced by zero and reported as `false`.
    fn call(&mut self, f: &mut dyn Integrand, out: &mut Float, x: Register, complement: &Float) -> bool {
        f.evaluate(out, self.pool.get(&x), complement);
        self.pool.release(x);
        self.calls += 1;
        if out.is_finite() {
            true
        } else {
            trace!(call = self.calls, "non-finite integrand value");
            out.set_zero();
            false
        }
    }

    /// Evaluates `f` at `a + d` or `b - d`.
    fn eval(
        &mut self,
        f: &mut dyn Integrand,
        out: &mut Float,
        (a, b): (&Float, &Float),
        side: Side,
        d: &Float,
    ) -> bool {
        let x = match side {
            Side::Lower => self.pool.add(a, d),
            Side::Upper => self.pool.sub(b, d),
        };
        self.call(f, out, x, d)
    }

    /// `acc += (x + y) * w`.
    fn add_weighted_pair(&mut self, acc: &mut Float, x: &Float, y: &Float, w: &Float) {
        let sum = self.pool.add(x, y);
        let term = self.pool.mul(sum, w);
        self.pool.add_assign(acc, term);
    }

    /// `acc += x * w`.
    fn add_weighted(&mut self, acc: &mut Float, x: &Float, w: &Float) {
        let term = self.pool.mul(x, w);
        self.pool.add_assign(acc, term);
    }

    /// `|x - 2 back|`.
    fn drift(&mut self, x: &Float, back: &Float) -> Register {
        let twice = self.pool.mul(back, 2.0);
        let diff = self.pool.sub(x, twice);
        self.pool.abs(diff)
    }

    /// Ooura's `intde`: the integral of `f` over `[a, b]` into `integral`
    /// and a signed error estimate into `error`.
    #[allow(clippy::too_many_lines)]
    fn intde(&mut self, f: &mut dyn Integrand, a: &Float, b: &Float, integral: &mut Float, error: &mut Float) {
        let table = self.table;
        let precision = table.precision();
        let scratch = || Float::with_precision(precision);
        let (mut fa, mut fb, mut ir, mut d) = (scratch(), scratch(), scratch(), scratch());
        let (mut errt, mut errh, mut errd) = (scratch(), scratch(), scratch());
        let (mut iback, mut irback) = (scratch(), scratch());
        let mut ba = scratch();
        Float::op_sub(&mut ba, b, a);
        let ends = (a, b);
        let stride = table.stride();
        let last = table.last_index();
        let epsh = table.epsh();

        // Midpoint.
        Float::op_mul(&mut d, &ba, &table[OFFSET]);
        let mid = self.pool.add(a, b);
        let mid = self.pool.mul(mid, &table[OFFSET]);
        self.call(f, integral, mid, &d);
        Float::op_mul(&mut ir, integral, &table[OFFSET + 1]);
        integral.mul_mut(&table[OFFSET + 2]);
        Float::op_abs(error, integral);

        // Coarsest level, walking out to both ends together.
        let mut k = stride + OFFSET;
        let mut j = OFFSET;
        loop {
            j += 3;
            let (x, w, we) = table.triple(j);
            Float::op_mul(&mut d, &ba, x);
            if !self.eval(f, &mut fa, ends, Side::Lower, &d) || !self.eval(f, &mut fb, ends, Side::Upper, &d) {
                break;
            }
            self.add_weighted_pair(&mut ir, &fa, &fb, w);
            fa.mul_mut(we);
            fb.mul_mut(we);
            let sum = self.pool.add(&fa, &fb);
            self.pool.add_assign(integral, sum);
            let abs_a = self.pool.abs(&fa);
            let abs_b = self.pool.abs(&fb);
            let abs_sum = self.pool.add(abs_a, abs_b);
            self.pool.add_assign(error, abs_sum);
            if !(x > epsh && j < k) {
                break;
            }
        }
        Float::op_mul(&mut errt, error, table.tail_factor());
        Float::op_mul(&mut errh, error, epsh);
        Float::op_mul(&mut errd, &errh, 2.0);
        errd.add_mut(1.0);

        // Continue one end at a time while its terms still matter.
        let jtmp = j;
        while exceeds(&fa, &errt) && j < k {
            j += 3;
            let (x, w, we) = table.triple(j);
            Float::op_mul(&mut d, &ba, x);
            if !self.eval(f, &mut fa, ends, Side::Lower, &d) {
                break;
            }
            self.add_weighted(&mut ir, &fa, w);
            fa.mul_mut(we);
            integral.add_mut(&fa);
        }
        let mut jm = j;
        j = jtmp;
        while exceeds(&fb, &errt) && j < k {
            j += 3;
            let (x, w, we) = table.triple(j);
            Float::op_mul(&mut d, &ba, x);
            if !self.eval(f, &mut fb, ends, Side::Upper, &d) {
                break;
            }
            self.add_weighted(&mut ir, &fb, w);
            fb.mul_mut(we);
            integral.add_mut(&fb);
        }
        jm = jm.min(j) - (OFFSET + 3);

        // Halve the step until two levels agree.
        let mut h = 1.0_f64;
        let mut klim = k + stride;
        while errd > errh && klim <= last {
            iback.assign(integral);
            irback.assign(&ir);
            loop {
                let jtmp = k + jm;
                j = k + 3;
                while j <= jtmp {
                    let (x, w, we) = table.triple(j);
                    Float::op_mul(&mut d, &ba, x);
                    if !self.eval(f, &mut fa, ends, Side::Lower, &d)
                        || !self.eval(f, &mut fb, ends, Side::Upper, &d)
                    {
                        break;
                    }
                    self.add_weighted_pair(&mut ir, &fa, &fb, w);
                    self.add_weighted_pair(integral, &fa, &fb, we);
                    j += 3;
                }
                k += stride;

                j = jtmp;
                loop {
                    j += 3;
                    let (x, w, we) = table.triple(j);
                    Float::op_mul(&mut d, &ba, x);
                    if !self.eval(f, &mut fa, ends, Side::Lower, &d) {
                        break;
                    }
                    self.add_weighted(&mut ir, &fa, w);
                    fa.mul_mut(we);
                    integral.add_mut(&fa);
                    if !(exceeds(&fa, &errt) && j < k) {
                        break;
                    }
                }
                j = jtmp;
                loop {
                    j += 3;
                    let (x, w, we) = table.triple(j);
                    Float::op_mul(&mut d, &ba, x);
                    if !self.eval(f, &mut fb, ends, Side::Upper, &d) {
                        break;
                    }
                    self.add_weighted(&mut ir, &fb, w);
                    fb.mul_mut(we);
                    integral.add_mut(&fb);
                    if !(exceeds(&fb, &errt) && j < k) {
                        break;
                    }
                }
                if k >= klim {
                    break;
                }
            }
            let di = self.drift(integral, &iback);
            let dr = self.drift(&ir, &irback);
            let sum = self.pool.add(di, dr);
            let scaled = self.pool.mul(sum, h);
            errd.assign(self.pool.get(&scaled));
            self.pool.release(scaled);
            h *= 0.5;
            klim = 2 * klim - OFFSET;
        }

        // The step is h, and 1/h refinements were summed.
        Float::op_mul(&mut d, &ba, h);
        integral.mul_mut(&d);
        ba.abs_mut();
        ba.div_mut(h);
        if errd > errh {
            Float::op_mul(error, &errd, &ba);
            error.neg_mut();
        } else {
            error.mul_mut(table.eps());
            error.mul_mut(&ba);
        }
        trace!(
            calls = self.calls,
            step = h,
            points = k,
            "tanh-sinh pass"
        );
    }
}
