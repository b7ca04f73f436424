//! Stopping-distance speed cap near the hard drive limits.
//!
//! Uses constant-deceleration kinematics: an axis at distance `d` from a
//! limit can still stop in time when `|v| <= sqrt(2·a·d)`. Only motion
//! toward a limit is restricted; retreating is never capped.

use antenna_common::math::clip;
use antenna_common::range::RangeGuard;

/// Speed cap for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDecelerator {
    limit: RangeGuard<f64>,
    max_acceleration: f64,
}

impl BoundaryDecelerator {
    /// `max_acceleration` in the same unit as `limit`, per s².
    pub fn new(limit: RangeGuard<f64>, max_acceleration: f64) -> Self {
        Self {
            limit,
            max_acceleration,
        }
    }

    #[inline]
    pub fn limit(&self) -> &RangeGuard<f64> {
        &self.limit
    }

    #[inline]
    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    #[inline]
    pub fn cap_speed(&self, encoder_reading: f64, velocity: f64) -> f64 {
        cap_speed(encoder_reading, velocity, &self.limit, self.max_acceleration)
    }
}

/// Cap `velocity` so the axis can stop before either bound of `limit`.
///
/// Returns 0.0 when `encoder_reading` is already outside `limit` (or is
/// not a number): the axis must not accelerate in any direction.
pub fn cap_speed(
    encoder_reading: f64,
    velocity: f64,
    limit: &RangeGuard<f64>,
    max_acceleration: f64,
) -> f64 {
    if !limit.contains(encoder_reading) {
        return 0.0;
    }

    let a = max_acceleration.max(0.0);
    // v_safe = sqrt(2 * a * d)
    let toward_lower = (2.0 * a * (encoder_reading - limit.lower())).sqrt();
    let toward_upper = (2.0 * a * (limit.upper() - encoder_reading)).sqrt();

    clip(velocity, -toward_lower, toward_upper)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn limit() -> RangeGuard<f64> {
        RangeGuard::new(-270.0, 270.0).unwrap()
    }

    #[test]
    fn free_motion_far_from_limits() {
        assert_eq!(cap_speed(0.0, 1.5, &limit(), 1.6), 1.5);
        assert_eq!(cap_speed(0.0, -1.5, &limit(), 1.6), -1.5);
    }

    #[test]
    fn cap_follows_stopping_distance() {
        let d = 0.5;
        let a = 1.6;
        let v = cap_speed(270.0 - d, 10.0, &limit(), a);
        assert!((v - (2.0 * a * d).sqrt()).abs() < 1e-12);

        let v = cap_speed(-270.0 + d, -10.0, &limit(), a);
        assert!((v + (2.0 * a * d).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_at_boundary() {
        assert_eq!(cap_speed(270.0, 1.0, &limit(), 1.6), 0.0);
        assert_eq!(cap_speed(-270.0, -1.0, &limit(), 1.6), 0.0);
    }

    #[test]
    fn retreating_is_not_capped() {
        assert_eq!(cap_speed(270.0, -1.0, &limit(), 1.6), -1.0);
        assert_eq!(cap_speed(-269.9, 2.0, &limit(), 1.6), 2.0);
    }

    #[test]
    fn outside_limit_is_zero() {
        assert_eq!(cap_speed(271.0, -1.0, &limit(), 1.6), 0.0);
        assert_eq!(cap_speed(-300.0, 1.0, &limit(), 1.6), 0.0);
        assert_eq!(cap_speed(f64::NAN, 1.0, &limit(), 1.6), 0.0);
    }

    #[test]
    fn decelerator_wraps_free_function() {
        let dec = BoundaryDecelerator::new(limit(), 2.0);
        assert_eq!(dec.cap_speed(269.0, 5.0), 2.0);
        assert_eq!(dec.max_acceleration(), 2.0);
    }
}
