//! Per-section control context.

/// Timing and classification of one motion section.
///
/// `start`/`stop` are UNIX times. A section authored with only a `duration`
/// gets its absolute times once its predecessor's `stop` is known, see
/// [`ControlContext::resolve_timing`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlContext {
    /// Observation section; tracking accuracy should be inspected.
    pub tight: bool,
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub duration: Option<f64>,
    /// Runs until interrupted unless a `stop` is known.
    pub infinite: bool,
    /// Intermediate point that must be reached before moving on.
    pub waypoint: bool,
}

impl ControlContext {
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Fill in absolute times.
    ///
    /// `start` falls back to `predecessor_stop`, then to `fallback_start`.
    /// `stop` is derived as `start + duration` when not set explicitly.
    /// Returns the resolved start.
    pub fn resolve_timing(&mut self, predecessor_stop: Option<f64>, fallback_start: f64) -> f64 {
        let start = self
            .start
            .or(predecessor_stop)
            .unwrap_or(fallback_start);
        self.start = Some(start);
        if self.stop.is_none() {
            self.stop = self.duration.map(|d| start + d);
        }
        start
    }

    /// Whether both ends are known.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.stop.is_some()
    }
}
