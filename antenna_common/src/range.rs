//! Validated value intervals and the per-axis drive range.
//!
//! Bounds are never swapped silently: `[270°, 90°]` may mean
//! `[-90°, 90°]`, which is the opposite of `[90°, 270°]`. Construction with
//! `lower > upper` fails and the caller must disambiguate.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::Sub;

use thiserror::Error;

use crate::units::AngleUnit;

/// Range construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Lower bound is greater than the upper bound.
    #[error("invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange { lower: String, upper: String },

    /// Bounds cannot be ordered (e.g. NaN).
    #[error("invalid range: bounds {lower} and {upper} are not comparable")]
    Incomparable { lower: String, upper: String },
}

/// Interval bound by two values.
///
/// With `strict = true` the bounds themselves are outside the range.
/// Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeGuard<T> {
    lower: T,
    upper: T,
    strict: bool,
}

impl<T: PartialOrd + Copy + Debug> RangeGuard<T> {
    /// Inclusive range `[lower, upper]`.
    pub fn new(lower: T, upper: T) -> Result<Self, RangeError> {
        Self::with_strictness(lower, upper, false)
    }

    /// Exclusive range `(lower, upper)`.
    pub fn strict(lower: T, upper: T) -> Result<Self, RangeError> {
        Self::with_strictness(lower, upper, true)
    }

    /// Range with explicit strictness.
    pub fn with_strictness(lower: T, upper: T, strict: bool) -> Result<Self, RangeError> {
        match lower.partial_cmp(&upper) {
            Some(Ordering::Less | Ordering::Equal) => Ok(Self {
                lower,
                upper,
                strict,
            }),
            Some(Ordering::Greater) => Err(RangeError::InvalidRange {
                lower: format!("{lower:?}"),
                upper: format!("{upper:?}"),
            }),
            None => Err(RangeError::Incomparable {
                lower: format!("{lower:?}"),
                upper: format!("{upper:?}"),
            }),
        }
    }

    #[inline]
    pub fn lower(&self) -> T {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> T {
        self.upper
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether `value` lies within the range.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        if self.strict {
            self.lower < value && value < self.upper
        } else {
            self.lower <= value && value <= self.upper
        }
    }

    /// Whether every value lies within the range. True for an empty input.
    pub fn contains_all<I: IntoIterator<Item = T>>(&self, values: I) -> bool {
        values.into_iter().all(|v| self.contains(v))
    }

    /// Whether at least one value lies within the range.
    pub fn contains_any<I: IntoIterator<Item = T>>(&self, values: I) -> bool {
        values.into_iter().any(|v| self.contains(v))
    }

    /// Apply `func` to both bounds, re-validating the result.
    pub fn map<U, F>(&self, func: F) -> Result<RangeGuard<U>, RangeError>
    where
        U: PartialOrd + Copy + Debug,
        F: Fn(T) -> U,
    {
        RangeGuard::with_strictness(func(self.lower), func(self.upper), self.strict)
    }

    /// Width of the range, `None` if it cannot be represented
    /// (e.g. `inf - inf`).
    pub fn width(&self) -> Option<T::Output>
    where
        T: Sub,
        T::Output: PartialOrd,
    {
        let w = self.upper - self.lower;
        w.partial_cmp(&w).map(|_| w)
    }
}

// ─── Drive Range ────────────────────────────────────────────────────

/// Drivable range of one axis.
///
/// `preferred_limit` is a safety margin inside `limit` that may be violated
/// only to keep an observation going. Subset-ness is not enforced here;
/// configuration validation rejects it before a range is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveRange {
    /// Hard limit; optimized commands never leave it.
    pub limit: RangeGuard<f64>,
    /// Soft limit inside `limit`.
    pub preferred_limit: RangeGuard<f64>,
    /// Separation below which unwrap avoidance never triggers.
    pub max_observation_size: f64,
    /// Unit of all values above.
    pub unit: AngleUnit,
}

impl DriveRange {
    /// Create a drive range. A missing `preferred_limit` equals `limit`.
    pub fn new(
        limit: RangeGuard<f64>,
        preferred_limit: Option<RangeGuard<f64>>,
        max_observation_size: f64,
        unit: AngleUnit,
    ) -> Self {
        Self {
            limit,
            preferred_limit: preferred_limit.unwrap_or(limit),
            max_observation_size,
            unit,
        }
    }

    /// Build from degree values, converting into `unit`.
    pub fn from_deg(
        limit: [f64; 2],
        preferred_limit: Option<[f64; 2]>,
        max_observation_size: f64,
        unit: AngleUnit,
    ) -> Result<Self, RangeError> {
        let limit = RangeGuard::new(unit.from_deg(limit[0]), unit.from_deg(limit[1]))?;
        let preferred = preferred_limit
            .map(|[lo, hi]| RangeGuard::new(unit.from_deg(lo), unit.from_deg(hi)))
            .transpose()?;
        Ok(Self::new(
            limit,
            preferred,
            unit.from_deg(max_observation_size),
            unit,
        ))
    }

    /// Whether `value` is within the hard limit but outside the preferred one.
    pub fn is_unpreferred(&self, value: f64) -> bool {
        self.limit.contains(value) && !self.preferred_limit.contains(value)
    }
}
