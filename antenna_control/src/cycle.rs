//! Per-tick drive pipeline: optimize → PID → decelerate.
//!
//! One [`AxisDrive`] owns every piece of per-axis state, so azimuth and
//! elevation never share a controller. [`AntennaDrive`] pairs the two and
//! converts the degree-based path output into the controller unit.
//!
//! A tick never fails. A target that cannot be placed inside the drive
//! range, or an encoder already past the hard limit, degrades the output to
//! zero speed and is reported through [`TickStatus`].

use std::fmt;

use antenna_common::antenna::status::TickStatus;
use antenna_common::range::DriveRange;
use antenna_common::units::AngleUnit;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LoadedConfig;
use crate::control::pid::PidController;
use crate::path::engine::AltAz;
use crate::path::generator::TimedCoordinate;
use crate::safety::decelerate::BoundaryDecelerator;
use crate::safety::optimize::DriveLimitOptimizer;

// ─── Axis ───────────────────────────────────────────────────────────

/// Altazimuth axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Az,
    El,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Az => "az",
            Self::El => "el",
        })
    }
}

// ─── Tick Output ────────────────────────────────────────────────────

/// Result of one axis tick, in the controller unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Optimized (unwrapped) target; `None` when no safe target exists.
    pub target: Option<f64>,
    /// Speed command for the actuator [unit/s].
    pub speed: f64,
    pub status: TickStatus,
}

/// Tick result of both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntennaTick {
    pub az: TickOutput,
    pub el: TickOutput,
}

impl AntennaTick {
    /// Combined status of both axes.
    pub fn status(&self) -> TickStatus {
        self.az.status | self.el.status
    }
}

// ─── Axis Drive ─────────────────────────────────────────────────────

/// Control pipeline of a single axis.
#[derive(Debug, Clone)]
pub struct AxisDrive<C: Clock = SystemClock> {
    axis: Axis,
    optimizer: DriveLimitOptimizer,
    pid: PidController<C>,
    decelerator: BoundaryDecelerator,
    holding: bool,
}

impl<C: Clock> AxisDrive<C> {
    /// `range` and `pid` must share the same angle unit.
    pub fn new(axis: Axis, range: DriveRange, pid: PidController<C>) -> Self {
        let decelerator = BoundaryDecelerator::new(range.limit, pid.params().max_acceleration);
        Self {
            axis,
            optimizer: DriveLimitOptimizer::new(range),
            pid,
            decelerator,
            holding: false,
        }
    }

    /// Speed command for this tick.
    ///
    /// `target` and `encoder` are in the controller unit. `target` may be
    /// given in any turn; it is unwrapped against `encoder`.
    pub fn tick(&mut self, target: f64, encoder: f64, stop: bool) -> TickOutput {
        let mut status = TickStatus::empty();
        if stop {
            status |= TickStatus::STOP_REQUESTED;
        }

        let optimized = self.optimizer.resolve(encoder, target);
        let speed = match optimized {
            None => {
                status |= TickStatus::NO_SAFE_TARGET;
                self.pid.get_speed(encoder, encoder, true)
            }
            Some(cmd) => {
                if self.optimizer.range().is_unpreferred(cmd) {
                    status |= TickStatus::UNPREFERRED;
                }
                let raw = self.pid.get_speed(cmd, encoder, stop);
                if self.pid.was_reset() {
                    status |= TickStatus::CONTROLLER_RESET;
                }
                let capped = self.decelerator.cap_speed(encoder, raw);
                if !self.decelerator.limit().contains(encoder) {
                    status |= TickStatus::OUTSIDE_LIMIT;
                } else if capped != raw {
                    status |= TickStatus::BOUNDARY_CAPPED;
                }
                capped
            }
        };

        self.report_transition(status, target, encoder);
        TickOutput {
            target: optimized,
            speed,
            status,
        }
    }

    /// Log only when the axis enters or leaves the hold state.
    fn report_transition(&mut self, status: TickStatus, target: f64, encoder: f64) {
        let holding = status.intersects(TickStatus::NO_SAFE_TARGET | TickStatus::OUTSIDE_LIMIT);
        if holding == self.holding {
            return;
        }
        self.holding = holding;
        let range = self.optimizer.range();
        if holding {
            warn!(
                axis = %self.axis,
                target,
                encoder,
                lower = range.limit.lower(),
                upper = range.limit.upper(),
                unit = %range.unit,
                ?status,
                "axis holding: no safe command"
            );
        } else {
            info!(axis = %self.axis, target, encoder, "axis resumed tracking");
        }
    }

    /// Unwrap a whole command group against `encoder`, warning once per group.
    pub fn optimize_series(&self, encoder: f64, targets: &[f64]) -> Vec<Option<f64>> {
        self.optimizer.optimize_series(encoder, targets)
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn range(&self) -> &DriveRange {
        self.optimizer.range()
    }

    pub fn pid(&self) -> &PidController<C> {
        &self.pid
    }

    pub fn pid_mut(&mut self) -> &mut PidController<C> {
        &mut self.pid
    }
}

// ─── Antenna Drive ──────────────────────────────────────────────────

/// Azimuth and elevation pipelines.
///
/// Takes degrees (the path and encoder convention) and returns speeds in
/// the configured controller unit per second.
#[derive(Debug, Clone)]
pub struct AntennaDrive<C: Clock = SystemClock> {
    pub az: AxisDrive<C>,
    pub el: AxisDrive<C>,
    unit: AngleUnit,
}

impl<C: Clock + Clone> AntennaDrive<C> {
    /// Both axes share `clock`.
    pub fn from_config(loaded: &LoadedConfig, clock: C) -> Self {
        let unit = loaded.unit();
        let az_pid = PidController::with_clock(&loaded.config.az.pid, unit, clock.clone());
        let el_pid = PidController::with_clock(&loaded.config.el.pid, unit, clock);
        Self {
            az: AxisDrive::new(Axis::Az, loaded.az_range, az_pid),
            el: AxisDrive::new(Axis::El, loaded.el_range, el_pid),
            unit,
        }
    }
}

impl<C: Clock> AntennaDrive<C> {
    /// Tick both axes. `command` and `encoder` in degrees.
    pub fn tick(&mut self, command: AltAz, encoder: AltAz, stop: bool) -> AntennaTick {
        let u = self.unit;
        AntennaTick {
            az: self
                .az
                .tick(u.from_deg(command.az), u.from_deg(encoder.az), stop),
            el: self
                .el
                .tick(u.from_deg(command.el), u.from_deg(encoder.el), stop),
        }
    }

    /// Unwrapped targets of one command group, in the controller unit.
    ///
    /// The azimuth series is chained from the current encoder reading so
    /// the whole group stays on one side of the cable wrap.
    pub fn optimize_group(
        &self,
        group: &TimedCoordinate,
        encoder: AltAz,
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let u = self.unit;
        let az: Vec<f64> = group.az.iter().map(|&v| u.from_deg(v)).collect();
        let el: Vec<f64> = group.el.iter().map(|&v| u.from_deg(v)).collect();
        (
            self.az.optimize_series(u.from_deg(encoder.az), &az),
            self.el.optimize_series(u.from_deg(encoder.el), &el),
        )
    }

    #[inline]
    pub fn unit(&self) -> AngleUnit {
        self.unit
    }

    /// Speed of `output` in degrees per second.
    #[inline]
    pub fn speed_deg(&self, output: &TickOutput) -> f64 {
        self.unit.to_deg(output.speed)
    }
}
