//! Rounding modes.

use std::fmt;
use std::str::FromStr;

use gmp_mpfr_sys::mpfr::rnd_t;

use crate::FloatError;

/// The rounding applied when a result does not fit the destination precision.
///
/// The discriminants match MPFR's `mpfr_rnd_t` codes, which is what
/// [`Rounding::code`] and [`Rounding::from_code`] exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round to nearest, ties to even.
    #[default]
    Nearest,
    /// Round toward zero.
    TowardZero,
    /// Round toward positive infinity.
    TowardPositive,
    /// Round toward negative infinity.
    TowardNegative,
    /// Round away from zero.
    AwayFromZero,
    /// Faithful rounding: either neighbour of the exact value.
    ///
    /// The ternary status of an operation in this mode is not meaningful.
    Faithful,
}

impl Rounding {
    /// All modes, in code order.
    pub const ALL: [Rounding; 6] = [
        Rounding::Nearest,
        Rounding::TowardZero,
        Rounding::TowardPositive,
        Rounding::TowardNegative,
        Rounding::AwayFromZero,
        Rounding::Faithful,
    ];

    /// Returns the MPFR code of this mode.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Rounding::Nearest => 0,
            Rounding::TowardZero => 1,
            Rounding::TowardPositive => 2,
            Rounding::TowardNegative => 3,
            Rounding::AwayFromZero => 4,
            Rounding::Faithful => 5,
        }
    }

    /// Looks up a mode by its MPFR code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Rounding::Nearest),
            1 => Some(Rounding::TowardZero),
            2 => Some(Rounding::TowardPositive),
            3 => Some(Rounding::TowardNegative),
            4 => Some(Rounding::AwayFromZero),
            5 => Some(Rounding::Faithful),
            _ => None,
        }
    }

    /// Returns the short name of this mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rounding::Nearest => "Nearest",
            Rounding::TowardZero => "TowardZero",
            Rounding::TowardPositive => "TowardInfinity",
            Rounding::TowardNegative => "TowardMinusInfinity",
            Rounding::AwayFromZero => "AwayZero",
            Rounding::Faithful => "Faithful",
        }
    }

    pub(crate) const fn raw(self) -> rnd_t {
        match self {
            Rounding::Nearest => rnd_t::RNDN,
            Rounding::TowardZero => rnd_t::RNDZ,
            Rounding::TowardPositive => rnd_t::RNDU,
            Rounding::TowardNegative => rnd_t::RNDD,
            Rounding::AwayFromZero => rnd_t::RNDA,
            Rounding::Faithful => rnd_t::RNDF,
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rounding {
    type Err = FloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rounding::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FloatError::UnknownRounding(s.to_string()))
    }
}
