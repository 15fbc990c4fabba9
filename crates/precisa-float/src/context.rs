//! Thread-local numeric defaults.
//!
//! New floats take their precision and rounding from the current
//! [`Context`] when none is given explicitly. Changing the context never
//! touches floats that already exist.
//!
//! Long running computations install their own context with
//! [`Context::scoped`] and get the previous one back when the guard drops:
//!
//! ```
//! use precisa_float::{Context, Float, Rounding};
//!
//! {
//!     let _guard = Context::new(256, Rounding::Nearest).scoped();
//!     assert_eq!(Float::new().precision(), 256);
//! }
//! assert_eq!(Float::new().precision(), precisa_float::DEFAULT_PRECISION);
//! ```

use std::cell::Cell;

use crate::{precision_max, FloatError, Rounding, DEFAULT_PRECISION, PRECISION_MIN};

thread_local! {
    static CURRENT: Cell<Context> = const { Cell::new(Context::DEFAULT) };
}

/// Default precision and rounding for newly created floats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    precision: u32,
    rounding: Rounding,
}

impl Context {
    /// The context every thread starts with: 53 bits, round to nearest.
    pub const DEFAULT: Context = Context {
        precision: DEFAULT_PRECISION,
        rounding: Rounding::Nearest,
    };

    /// Creates a context.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is outside [`PRECISION_MIN`] to
    /// [`precision_max`].
    #[must_use]
    pub fn new(precision: u32, rounding: Rounding) -> Self {
        assert!(
            valid_precision(precision),
            "precision {precision} is outside {PRECISION_MIN}..={}",
            precision_max()
        );
        Self {
            precision,
            rounding,
        }
    }

    /// Returns the context of the current thread.
    #[must_use]
    pub fn current() -> Self {
        CURRENT.with(Cell::get)
    }

    /// Returns the precision of this context.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the rounding of this context.
    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Returns a copy with a different precision.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidPrecision`] if `precision` is zero or
    /// too large.
    pub fn with_precision(self, precision: u32) -> Result<Self, FloatError> {
        if !valid_precision(precision) {
            return Err(FloatError::InvalidPrecision(u64::from(precision)));
        }
        Ok(Self { precision, ..self })
    }

    /// Returns a copy with a different rounding.
    #[must_use]
    pub const fn with_rounding(self, rounding: Rounding) -> Self {
        Self { rounding, ..self }
    }

    /// Returns the default precision of the current thread.
    #[must_use]
    pub fn default_precision() -> u32 {
        Self::current().precision
    }

    /// Sets the default precision of the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`FloatError::InvalidPrecision`] if `precision` is zero or
    /// too large.
    pub fn set_default_precision(precision: u32) -> Result<(), FloatError> {
        let next = Self::current().with_precision(precision)?;
        CURRENT.with(|cell| cell.set(next));
        Ok(())
    }

    /// Returns the default rounding of the current thread.
    #[must_use]
    pub fn default_rounding() -> Rounding {
        Self::current().rounding
    }

    /// Sets the default rounding of the current thread.
    pub fn set_default_rounding(rounding: Rounding) {
        let next = Self::current().with_rounding(rounding);
        CURRENT.with(|cell| cell.set(next));
    }

    /// Installs this context on the current thread until the guard drops.
    #[must_use = "the previous context is restored when the guard is dropped"]
    pub fn scoped(self) -> ContextGuard {
        let previous = CURRENT.with(|cell| cell.replace(self));
        ContextGuard { previous }
    }
}

fn valid_precision(precision: u32) -> bool {
    (PRECISION_MIN..=precision_max()).contains(&precision)
}

impl Default for Context {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Restores the previous [`Context`] on drop.
#[derive(Debug)]
pub struct ContextGuard {
    previous: Context,
}

impl ContextGuard {
    /// Returns the context that will be restored.
    #[must_use]
    pub fn previous(&self) -> Context {
        self.previous
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT.with(|cell| cell.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = Context::current();
        assert_eq!(ctx.precision(), DEFAULT_PRECISION);
        assert_eq!(ctx.rounding(), Rounding::Nearest);
    }

    #[test]
    fn test_scoped_restores() {
        let before = Context::current();
        {
            let guard = Context::new(300, Rounding::TowardZero).scoped();
            assert_eq!(guard.previous(), before);
            assert_eq!(Context::default_precision(), 300);
            assert_eq!(Context::default_rounding(), Rounding::TowardZero);

            {
                let _inner = Context::new(20, Rounding::Faithful).scoped();
                assert_eq!(Context::default_precision(), 20);
            }
            assert_eq!(Context::default_precision(), 300);
        }
        assert_eq!(Context::current(), before);
    }

    #[test]
    fn test_setters_validate() {
        let _guard = Context::current().scoped();
        assert!(Context::set_default_precision(0).is_err());
        Context::set_default_precision(128).unwrap();
        assert_eq!(Context::default_precision(), 128);
        Context::set_default_rounding(Rounding::AwayFromZero);
        assert_eq!(Context::default_rounding(), Rounding::AwayFromZero);
    }

    #[test]
    fn test_precision_upper_bound() {
        let ctx = Context::current();
        assert!(ctx.with_precision(precision_max()).is_ok());
        if let Some(over) = precision_max().checked_add(1) {
            assert_eq!(
                ctx.with_precision(over),
                Err(FloatError::InvalidPrecision(u64::from(over)))
            );
        }
    }
}
