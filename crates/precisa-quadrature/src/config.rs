//! Engine configuration.

use precisa_float::{precision_max, Context, FloatError, PRECISION_MIN};

use crate::QuadratureError;

/// Extra bits carried by the table and the accumulators.
pub const GUARD_BITS: u32 = 16;

/// Abscissa samples per bit of precision when no count is given.
pub const POINTS_PER_BIT: usize = 16;

/// The smallest accepted point count.
pub const MIN_POINTS: usize = 4;

/// Precision and table size of a [`TanhSinh`](crate::TanhSinh) engine.
///
/// ```
/// use precisa_quadrature::QuadratureConfig;
///
/// let config = QuadratureConfig::new(128).with_points(1000);
/// assert_eq!(config.safe_precision(), 144);
/// assert_eq!(config.table_len(), 2008);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadratureConfig {
    precision: u32,
    points: Option<usize>,
}

impl QuadratureConfig {
    /// Creates a configuration for results of `precision` bits with the
    /// default point count.
    #[must_use]
    pub const fn new(precision: u32) -> Self {
        Self {
            precision,
            points: None,
        }
    }

    /// Sets the point count.
    #[must_use]
    pub const fn with_points(self, points: usize) -> Self {
        Self {
            points: Some(points),
            ..self
        }
    }

    /// Sets the precision, keeping an explicit point count.
    #[must_use]
    pub const fn with_precision(self, precision: u32) -> Self {
        Self { precision, ..self }
    }

    /// Returns the precision of results.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the precision used internally, saturating at `u32::MAX`.
    #[must_use]
    pub const fn safe_precision(&self) -> u32 {
        self.precision.saturating_add(GUARD_BITS)
    }

    fn precision_is_valid(&self) -> bool {
        self.precision >= PRECISION_MIN
            && self
                .precision
                .checked_add(GUARD_BITS)
                .is_some_and(|safe| safe <= precision_max())
    }

    /// Returns the result and working precisions an engine allocates with.
    ///
    /// An invalid precision falls back to [`PRECISION_MIN`] for both, so
    /// the engine can still be built and [`validate`](Self::validate)
    /// reports the problem on compile.
    pub(crate) fn buffer_precisions(&self) -> (u32, u32) {
        if self.precision_is_valid() {
            (self.precision, self.safe_precision())
        } else {
            (PRECISION_MIN, PRECISION_MIN)
        }
    }

    /// Returns the point count, `16 * precision` unless set explicitly.
    #[must_use]
    pub const fn points(&self) -> usize {
        match self.points {
            Some(points) => points,
            None => self.precision as usize * POINTS_PER_BIT,
        }
    }

    /// Returns the length of the abscissa table.
    #[must_use]
    pub const fn table_len(&self) -> usize {
        8 + 2 * self.points()
    }

    /// Checks the precision and point count.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::Float`] for a zero precision or one whose
    /// working precision exceeds [`precision_max`], and
    /// [`QuadratureError::TooFewPoints`] for a point count below
    /// [`MIN_POINTS`].
    pub fn validate(&self) -> Result<(), QuadratureError> {
        if !self.precision_is_valid() {
            return Err(FloatError::InvalidPrecision(u64::from(self.precision)).into());
        }
        if self.points() < MIN_POINTS {
            return Err(QuadratureError::TooFewPoints {
                points: self.points(),
                min: MIN_POINTS,
            });
        }
        Ok(())
    }
}

impl Default for QuadratureConfig {
    /// The context precision with the default point count.
    fn default() -> Self {
        Self::new(Context::default_precision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points() {
        let config = QuadratureConfig::new(64);
        assert_eq!(config.points(), 1024);
        assert_eq!(config.table_len(), 2056);
        assert_eq!(config.safe_precision(), 80);
    }

    #[test]
    fn test_explicit_points_survive_precision_change() {
        let config = QuadratureConfig::new(64).with_points(100).with_precision(200);
        assert_eq!(config.points(), 100);
        assert_eq!(config.precision(), 200);
    }

    #[test]
    fn test_validate() {
        assert!(QuadratureConfig::new(64).validate().is_ok());
        assert!(matches!(
            QuadratureConfig::new(0).validate(),
            Err(QuadratureError::Float(_))
        ));
        assert_eq!(
            QuadratureConfig::new(64).with_points(2).validate(),
            Err(QuadratureError::TooFewPoints { points: 2, min: MIN_POINTS })
        );
    }

    #[test]
    fn test_huge_precision_is_rejected() {
        let config = QuadratureConfig::new(u32::MAX);
        assert_eq!(config.safe_precision(), u32::MAX);
        assert_eq!(
            config.validate(),
            Err(QuadratureError::Float(FloatError::InvalidPrecision(u64::from(u32::MAX))))
        );
        assert_eq!(config.buffer_precisions(), (PRECISION_MIN, PRECISION_MIN));

        let edge = QuadratureConfig::new(u32::MAX - GUARD_BITS + 1).with_points(8);
        assert!(edge.validate().is_err());
        assert_eq!(QuadratureConfig::new(64).buffer_precisions(), (64, 80));
    }
}
