//! Quadrature errors.

use precisa_float::FloatError;
use thiserror::Error;

/// Errors reported before or while integrating.
///
/// Slow convergence is not an error: it shows up as a negative error
/// estimate, see [`TanhSinh::is_convergent_error`](crate::TanhSinh::is_convergent_error).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QuadratureError {
    /// `integrate` was called before `compile`, or after a change that
    /// invalidated the table.
    #[error("the abscissa table is not compiled")]
    NotCompiled,

    /// No integrand has been set.
    #[error("no integrand has been set")]
    MissingIntegrand,

    /// A bound is NaN.
    #[error("integration bound is NaN")]
    NanBound,

    /// The point count is too small to hold a single refinement level.
    #[error("{points} points requested, at least {min} are needed")]
    TooFewPoints {
        /// The requested count.
        points: usize,
        /// The smallest accepted count.
        min: usize,
    },

    /// A float operation failed.
    #[error(transparent)]
    Float(#[from] FloatError),
}
