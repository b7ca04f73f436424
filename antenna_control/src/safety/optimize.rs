//! Drive-limit optimizer: pick the unwrapped angle to command.
//!
//! An azimuth target `θ` can be reached at any `θ + k·360°` inside the hard
//! limit. Candidates are tried nearest-first:
//!
//! 1. A candidate closer than `max_observation_size` wins outright. Small
//!    moves belong to an ongoing observation, and breaking it off to honour
//!    the preferred limit costs more than the violation.
//! 2. Otherwise the nearest candidate inside the preferred limit wins.
//! 3. Otherwise there is no safe command (`None`); the caller holds.
//!
//! Equal distances keep generation order (ascending angle).

use antenna_common::range::DriveRange;
use tracing::warn;

/// Safe-target selector for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveLimitOptimizer {
    range: DriveRange,
}

impl DriveLimitOptimizer {
    pub fn new(range: DriveRange) -> Self {
        Self { range }
    }

    #[inline]
    pub fn range(&self) -> &DriveRange {
        &self.range
    }

    /// All angles congruent to `target` inside the hard limit, ascending.
    pub fn candidates(&self, target: f64) -> Vec<f64> {
        let limit = &self.range.limit;
        let (lower, upper) = (limit.lower(), limit.upper());
        if !target.is_finite() {
            return Vec::new();
        }
        if !(lower.is_finite() && upper.is_finite()) {
            return if limit.contains(target) {
                vec![target]
            } else {
                Vec::new()
            };
        }

        let turn = self.range.unit.full_turn();
        let first = target - turn * ((target - lower) / turn).floor();
        (0..)
            .map(|k| first + turn * f64::from(k))
            .take_while(|&angle| angle <= upper)
            .filter(|&angle| limit.contains(angle))
            .collect()
    }

    /// Choose among `candidates` as seen from `current`.
    pub fn select(&self, current: f64, candidates: &[f64]) -> Option<f64> {
        let mut by_distance: Vec<(f64, f64)> = candidates
            .iter()
            .map(|&angle| (angle, (angle - current).abs()))
            .collect();
        // Stable: equal distances keep ascending order.
        by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

        by_distance
            .into_iter()
            .find(|&(angle, distance)| {
                distance < self.range.max_observation_size
                    || self.range.preferred_limit.contains(angle)
            })
            .map(|(angle, _)| angle)
    }

    /// Safe angle for a single target, without logging.
    pub fn resolve(&self, current: f64, target: f64) -> Option<f64> {
        self.select(current, &self.candidates(target))
            .filter(|angle| angle.is_finite())
    }

    /// Safe angle for a single target.
    pub fn optimize(&self, current: f64, target: f64) -> Option<f64> {
        let result = self.resolve(current, target);
        match result {
            None => self.warn_out_of_range(&[target]),
            Some(angle) if self.range.is_unpreferred(angle) => self.warn_unpreferred(),
            Some(_) => {}
        }
        result
    }

    /// Safe angles for a time series of targets.
    ///
    /// Elements are resolved in order; each chosen angle is the reference
    /// for the next, so the series stays continuous. An unresolvable
    /// element keeps the previous reference. At most one warning of each
    /// kind is emitted per call.
    pub fn optimize_series(&self, current: f64, targets: &[f64]) -> Vec<Option<f64>> {
        let mut reference = current;
        let results: Vec<Option<f64>> = targets
            .iter()
            .map(|&target| {
                let result = self.resolve(reference, target);
                if let Some(angle) = result {
                    reference = angle;
                }
                result
            })
            .collect();

        if results.iter().any(Option::is_none) {
            self.warn_out_of_range(targets);
        }
        if results
            .iter()
            .flatten()
            .any(|&angle| self.range.is_unpreferred(angle))
        {
            self.warn_unpreferred();
        }
        results
    }

    fn warn_out_of_range(&self, targets: &[f64]) {
        warn!(
            ?targets,
            lower = self.range.limit.lower(),
            upper = self.range.limit.upper(),
            unit = %self.range.unit,
            "instructed coordinate out of drive range"
        );
    }

    fn warn_unpreferred(&self) {
        warn!(
            lower = self.range.preferred_limit.lower(),
            upper = self.range.preferred_limit.upper(),
            unit = %self.range.unit,
            "command position is near drive range limit"
        );
    }
}
