//! Small numeric helpers shared by the controllers.

/// Limit `value` to `[lower, upper]`.
///
/// Unlike [`f64::clamp`] this never panics: inverted bounds resolve to
/// `upper`, and a NaN `value` resolves to `lower`.
#[inline]
pub fn clip(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}

/// Limit `value` to `[-absmax, absmax]`.
#[inline]
pub fn clip_abs(value: f64, absmax: f64) -> f64 {
    let m = absmax.abs();
    clip(value, -m, m)
}

/// `numerator / dt`, or `0.0` when `dt` is not a positive finite interval.
#[inline]
pub fn rate(numerator: f64, dt: f64) -> f64 {
    if dt > 0.0 && dt.is_finite() {
        numerator / dt
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_inside_and_outside() {
        assert_eq!(clip(1.2, 0.0, 1.0), 1.0);
        assert_eq!(clip(0.4, 0.0, 1.0), 0.4);
        assert_eq!(clip(-4.0, -3.0, 3.0), -3.0);
    }

    #[test]
    fn clip_never_panics() {
        assert_eq!(clip(5.0, 2.0, 1.0), 1.0);
        assert_eq!(clip(f64::NAN, -1.0, 1.0), -1.0);
    }

    #[test]
    fn clip_abs_uses_magnitude() {
        assert_eq!(clip_abs(-4.0, 3.0), -3.0);
        assert_eq!(clip_abs(4.0, -3.0), 3.0);
    }

    #[test]
    fn rate_guards_degenerate_interval() {
        assert_eq!(rate(1.0, 0.5), 2.0);
        assert_eq!(rate(1.0, 0.0), 0.0);
        assert_eq!(rate(1.0, -0.1), 0.0);
        assert_eq!(rate(1.0, f64::NAN), 0.0);
    }
}
