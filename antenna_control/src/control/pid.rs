//! PID drive-speed controller with feed-forward of the command rate.
//!
//! ```text
//! speed = target_speed + k_p·e + k_i·∫e dt + k_d·de/dt
//! ```
//!
//! `target_speed` is the rate of change of the command coordinate and lets
//! the drive follow sidereal motion and scans without steady lag. The
//! integral is a trapezoidal sum over the last `2·⌊N/2⌋` samples, so the
//! effective integration time depends on the call frequency.
//!
//! Every input and output is in the controller's [`AngleUnit`], fixed at
//! construction. The controller is not reentrant: each call mutates the
//! histories that describe the previous tick, so ownership is exclusive
//! (`&mut self`) and one instance serves exactly one axis.

use antenna_common::antenna::config::PidConfig;
use antenna_common::history::BoundedHistory;
use antenna_common::math::{clip, clip_abs, rate};
use antenna_common::units::AngleUnit;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Capacity of the short (two-sample) histories.
const PAIR: usize = 2;

/// Gains, limits and thresholds in the controller's unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidParams {
    /// Proportional gain.
    pub k_p: f64,
    /// Integral gain.
    pub k_i: f64,
    /// Derivative gain.
    pub k_d: f64,
    /// Speed limit [unit/s].
    pub max_speed: f64,
    /// Acceleration limit [unit/s²].
    pub max_acceleration: f64,
    /// Command jump that resets the histories [unit].
    pub cmd_coord_change: f64,
    /// Error below which acceleration limiting is skipped [unit].
    pub accel_limit_off: f64,
    /// Feed-forward acceleration above which the feed-forward is dropped [unit/s²].
    pub target_accel_ignore: f64,
}

impl PidParams {
    /// Convert a degree-based configuration into `unit`.
    pub fn from_config(config: &PidConfig, unit: AngleUnit) -> Self {
        Self {
            k_p: config.k_p,
            k_i: config.k_i,
            k_d: config.k_d,
            max_speed: unit.from_deg(config.max_speed),
            max_acceleration: unit.from_deg(config.max_acceleration),
            cmd_coord_change: unit.from_deg(config.threshold.cmd_coord_change),
            accel_limit_off: unit.from_deg(config.threshold.accel_limit_off),
            target_accel_ignore: unit.from_deg(config.threshold.target_accel_ignore),
        }
    }
}

/// Drive-speed controller for one axis.
#[derive(Debug, Clone)]
pub struct PidController<C: Clock = SystemClock> {
    params: PidParams,
    error_integ_count: usize,
    unit: AngleUnit,
    clock: C,

    /// Last two output speeds. Survives resets so the drive never jumps.
    cmd_speed: BoundedHistory,
    time: BoundedHistory,
    cmd_coord: BoundedHistory,
    enc_coord: BoundedHistory,
    error: BoundedHistory,
    target_speed: BoundedHistory,

    was_reset: bool,
}

impl PidController<SystemClock> {
    /// Controller stamped with wall-clock time.
    pub fn new(config: &PidConfig, unit: AngleUnit) -> Self {
        Self::with_clock(config, unit, SystemClock)
    }
}

impl<C: Clock> PidController<C> {
    pub fn with_clock(config: &PidConfig, unit: AngleUnit, clock: C) -> Self {
        Self::from_params(
            PidParams::from_config(config, unit),
            config.error_integ_count,
            unit,
            clock,
        )
    }

    /// Controller from already converted parameters.
    pub fn from_params(
        params: PidParams,
        error_integ_count: usize,
        unit: AngleUnit,
        clock: C,
    ) -> Self {
        let window = integral_window(error_integ_count);
        Self {
            params,
            error_integ_count,
            unit,
            clock,
            cmd_speed: BoundedHistory::new(PAIR),
            time: BoundedHistory::new(window),
            cmd_coord: BoundedHistory::new(PAIR),
            enc_coord: BoundedHistory::new(PAIR),
            error: BoundedHistory::new(window),
            target_speed: BoundedHistory::new(PAIR),
            was_reset: false,
        }
    }

    /// Bounded drive speed for this tick.
    ///
    /// `stop` forces the output (and the stored speed) to zero. Non-finite
    /// inputs are treated the same way and leave the histories untouched.
    pub fn get_speed(&mut self, cmd_coord: f64, enc_coord: f64, stop: bool) -> f64 {
        self.was_reset = false;
        if !(cmd_coord.is_finite() && enc_coord.is_finite()) {
            self.cmd_speed.push(0.0);
            return 0.0;
        }

        let first_call = self.time.is_unset();
        let jump = (cmd_coord - self.cmd_coord.last()).abs() > self.params.cmd_coord_change;
        if first_call || jump {
            debug!(
                unit = %self.unit,
                cmd_coord,
                enc_coord,
                reason = if first_call { "first call" } else { "command jump" },
                "pid histories reset"
            );
            self.restart(cmd_coord, enc_coord);
        }

        let current_speed = self.cmd_speed.last();

        self.time.push(self.clock.now());
        self.cmd_coord.push(cmd_coord);
        self.enc_coord.push(enc_coord);
        self.error.push(cmd_coord - enc_coord);
        let dt = self.dt();
        self.target_speed
            .push(rate(cmd_coord - self.cmd_coord.previous(), dt));

        let mut speed = self.raw_speed(dt);
        if self.error.last().abs() > self.params.accel_limit_off {
            let max_diff = self.params.max_acceleration * dt.max(0.0);
            speed = clip(speed, current_speed - max_diff, current_speed + max_diff);
        }
        speed = clip_abs(speed, self.params.max_speed);

        self.cmd_speed.push(if stop { 0.0 } else { speed });
        self.cmd_speed.last()
    }

    /// Feed-forward plus PID terms, after dropping an implausible feed-forward.
    fn raw_speed(&mut self, dt: f64) -> f64 {
        let target_acceleration = rate(
            self.target_speed.last() - self.target_speed.previous(),
            dt,
        );
        if target_acceleration.abs() > self.params.target_accel_ignore {
            self.target_speed.set_last(0.0);
        }

        self.target_speed.last()
            + self.params.k_p * self.error.last()
            + self.params.k_i * self.error_integral()
            + self.params.k_d * self.error_derivative()
    }

    /// Start over at this instant, keeping the last output speed.
    fn restart(&mut self, cmd_coord: f64, enc_coord: f64) {
        self.reset();
        if self.cmd_speed.is_unset() {
            self.cmd_speed.push(0.0);
        }
        self.time.push(self.clock.now());
        self.cmd_coord.push(cmd_coord);
        self.enc_coord.push(enc_coord);
        self.error.push(cmd_coord - enc_coord);
        self.target_speed.push(0.0);
        self.was_reset = true;
    }

    /// Interval between the last two ticks [s].
    #[inline]
    pub fn dt(&self) -> f64 {
        self.time.last() - self.time.previous()
    }

    /// Trapezoidal integral of the error window; unset samples are skipped.
    pub fn error_integral(&self) -> f64 {
        let samples = || self.time.iter().zip(self.error.iter());
        samples()
            .zip(samples().skip(1))
            .map(|((t0, e0), (t1, e1))| (e0 + e1) / 2.0 * (t1 - t0))
            .filter(|area| !area.is_nan())
            .sum()
    }

    /// Finite-difference derivative of the error; zero when `dt` is not positive.
    pub fn error_derivative(&self) -> f64 {
        rate(self.error.last() - self.error.previous(), self.dt())
    }

    /// Run `f` with `params` in effect, restoring the current ones afterwards.
    pub fn with_params<R>(&mut self, params: PidParams, f: impl FnOnce(&mut Self) -> R) -> R {
        let original = std::mem::replace(&mut self.params, params);
        let result = f(self);
        self.params = original;
        result
    }

    /// Shift every stored time stamp by `by` seconds.
    pub fn shift_time(&mut self, by: f64) {
        self.time = self.time.map(|t| t + by);
    }

    /// Forget the tracking state; the next call starts fresh.
    pub fn reset(&mut self) {
        self.time.reset();
        self.cmd_coord.reset();
        self.enc_coord.reset();
        self.error.reset();
        self.target_speed.reset();
    }

    #[inline]
    pub fn params(&self) -> &PidParams {
        &self.params
    }

    #[inline]
    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    #[inline]
    pub fn error_integ_count(&self) -> usize {
        self.error_integ_count
    }

    /// Most recent output speed (NaN before the first call).
    #[inline]
    pub fn last_speed(&self) -> f64 {
        self.cmd_speed.last()
    }

    /// Whether the last call started over from fresh histories.
    #[inline]
    pub fn was_reset(&self) -> bool {
        self.was_reset
    }

    #[inline]
    pub fn time_history(&self) -> &BoundedHistory {
        &self.time
    }

    #[inline]
    pub fn error_history(&self) -> &BoundedHistory {
        &self.error
    }

    #[inline]
    pub fn target_speed_history(&self) -> &BoundedHistory {
        &self.target_speed
    }
}

/// Length of the time/error windows: `2·⌊N/2⌋`, never below one pair.
fn integral_window(error_integ_count: usize) -> usize {
    (2 * (error_integ_count / 2)).max(PAIR)
}

// ─── Tests ──────────────────────────────────────────────────────────
