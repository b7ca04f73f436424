//! Angular units.
//!
//! Every controller works in one fixed angular unit chosen at construction.
//! Configuration values are given in degrees and converted once with
//! [`AngleUnit::from_deg`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Angular unit used for controller I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Degree.
    #[default]
    Deg,
    /// Arcminute.
    Arcmin,
    /// Arcsecond.
    Arcsec,
    /// Radian.
    Rad,
}

impl AngleUnit {
    /// Number of this unit in one degree.
    #[inline]
    pub const fn per_degree(self) -> f64 {
        match self {
            Self::Deg => 1.0,
            Self::Arcmin => 60.0,
            Self::Arcsec => 3600.0,
            Self::Rad => core::f64::consts::PI / 180.0,
        }
    }

    /// Factor converting a value in `from` into this unit.
    ///
    /// ```rust
    /// use antenna_common::units::AngleUnit;
    /// assert_eq!(AngleUnit::Arcsec.factor_from(AngleUnit::Deg), 3600.0);
    /// ```
    #[inline]
    pub fn factor_from(self, from: AngleUnit) -> f64 {
        self.per_degree() / from.per_degree()
    }

    /// Convert `value` given in `from` into this unit.
    #[inline]
    pub fn convert(self, value: f64, from: AngleUnit) -> f64 {
        value * self.factor_from(from)
    }

    /// Convert a value given in degrees into this unit.
    #[inline]
    pub fn from_deg(self, value: f64) -> f64 {
        value * self.per_degree()
    }

    /// Convert a value given in this unit into degrees.
    #[inline]
    pub fn to_deg(self, value: f64) -> f64 {
        value / self.per_degree()
    }

    /// One full revolution (360°) in this unit.
    #[inline]
    pub fn full_turn(self) -> f64 {
        self.from_deg(360.0)
    }

    /// Short lowercase symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Deg => "deg",
            Self::Arcmin => "arcmin",
            Self::Arcsec => "arcsec",
            Self::Rad => "rad",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
