//! Motion sections.
//!
//! | kind       | tight | infinite | waypoint | commands                      |
//! |------------|-------|----------|----------|-------------------------------|
//! | Track      | yes   | yes      | no       | one group per step            |
//! | Linear     | yes   | no       | no       | `distance / speed · freq`     |
//! | Accelerate | no    | no       | no       | `2·margin / speed · freq`     |
//! | Standby    | yes   | yes      | yes      | one group per step            |
//!
//! Scan sections work in the scan frame: `start`/`stop` are absolute
//! coordinates, or offsets from `reference` when one is given.

use antenna_common::antenna::config::ControlConfig;

use super::PathError;
use super::context::ControlContext;
use super::engine::{AltAz, CoordinateEngine, Frame, Offset, Target};
use super::geometry::{cartesian_offset, lerp, standby_position};

/// Caller-supplied timing that overrides a section's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timing {
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub duration: Option<f64>,
}

/// Continuous tracking of a target, optionally offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub target: Target,
    pub offset: Option<Offset>,
    pub timing: Timing,
}

impl Track {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            offset: None,
            timing: Timing::default(),
        }
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

/// Straight scan from `start` to `stop` at constant `speed` [deg, deg/s].
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub reference: Option<Target>,
    pub start: (f64, f64),
    pub stop: (f64, f64),
    pub frame: Frame,
    pub speed: f64,
    /// Acceleration run-up; the configured scan margin when unset.
    pub margin: Option<f64>,
    pub offset: Option<Offset>,
    pub timing: Timing,
}

impl Scan {
    pub fn new(start: (f64, f64), stop: (f64, f64), frame: Frame, speed: f64) -> Self {
        Self {
            reference: None,
            start,
            stop,
            frame,
            speed,
            margin: None,
            offset: None,
            timing: Timing::default(),
        }
    }

    pub fn with_reference(mut self, reference: Target) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Run-up followed by the scan itself.
    pub fn into_sections(self) -> [Section; 2] {
        [Section::Accelerate(self.clone()), Section::Linear(self)]
    }

    fn margin(&self, config: &ControlConfig) -> f64 {
        self.margin.unwrap_or(config.scan_margin)
    }

    fn length(&self) -> f64 {
        (self.stop.0 - self.start.0).hypot(self.stop.1 - self.start.1)
    }

    fn check_speed(&self) -> Result<(), PathError> {
        if self.speed > 0.0 && self.speed.is_finite() {
            Ok(())
        } else {
            Err(PathError::InvalidSpeed(self.speed))
        }
    }

    fn check_length(&self) -> Result<f64, PathError> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Ok(length)
        } else {
            Err(PathError::ZeroLengthScan {
                lon: self.start.0,
                lat: self.start.1,
            })
        }
    }

    /// `point` in the scan frame, placed relative to the reference if any.
    fn place<E: CoordinateEngine>(
        &self,
        engine: &E,
        point: (f64, f64),
        time: f64,
    ) -> Result<(f64, f64), PathError> {
        match &self.reference {
            Some(reference) => {
                let (lon, lat) = engine.realize(reference, &self.frame, time)?;
                Ok(cartesian_offset(lon, lat, point.0, point.1))
            }
            None => Ok(point),
        }
    }

    fn resolve<E: CoordinateEngine>(
        &self,
        engine: &E,
        point: (f64, f64),
        time: f64,
    ) -> Result<AltAz, PathError> {
        let placed = self.place(engine, point, time)?;
        resolve_offset(
            engine,
            &Target::fixed(placed.0, placed.1, self.frame.clone()),
            self.offset.as_ref(),
            time,
        )
    }
}

/// One motion section of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Track(Track),
    Linear(Scan),
    Accelerate(Scan),
    Standby(Scan),
}

impl Section {
    /// Observation section whose accuracy should be inspected.
    pub fn tight(&self) -> bool {
        !matches!(self, Self::Accelerate(_))
    }

    /// Runs until interrupted.
    pub fn infinite(&self) -> bool {
        matches!(self, Self::Track(_) | Self::Standby(_))
    }

    pub fn waypoint(&self) -> bool {
        matches!(self, Self::Standby(_))
    }

    fn timing(&self) -> &Timing {
        match self {
            Self::Track(t) => &t.timing,
            Self::Linear(s) | Self::Accelerate(s) | Self::Standby(s) => &s.timing,
        }
    }

    /// Number of commands the section spans; one command group for
    /// infinite sections.
    pub fn n_cmd(&self, config: &ControlConfig) -> Result<f64, PathError> {
        let freq = config.command_frequency;
        if !(freq > 0.0 && freq.is_finite()) {
            return Err(PathError::InvalidFrequency(freq));
        }
        match self {
            Self::Track(_) => Ok(freq * config.command_group_duration),
            Self::Standby(scan) => {
                scan.check_length()?;
                Ok(freq * config.command_group_duration)
            }
            Self::Linear(scan) => {
                scan.check_speed()?;
                let length = scan.check_length()?;
                Ok(length / scan.speed * freq)
            }
            Self::Accelerate(scan) => {
                scan.check_speed()?;
                scan.check_length()?;
                // a = v² / 2m, t = sqrt(2m / a) = 2m / v
                Ok(2.0 * scan.margin(config) / scan.speed * freq)
            }
        }
    }

    /// Command count and fresh control context.
    ///
    /// Finite sections carry `duration = n_cmd / freq`; infinite ones carry
    /// none unless the caller set one. Caller timing overrides defaults.
    pub fn arguments(&self, config: &ControlConfig) -> Result<(f64, ControlContext), PathError> {
        let n_cmd = self.n_cmd(config)?;
        let timing = self.timing();
        let default_duration = if self.infinite() {
            None
        } else {
            Some(n_cmd / config.command_frequency)
        };
        let context = ControlContext {
            tight: self.tight(),
            start: timing.start,
            stop: timing.stop,
            duration: timing.duration.or(default_duration),
            infinite: self.infinite(),
            waypoint: self.waypoint(),
        };
        Ok((n_cmd, context))
    }

    /// Apparent AltAz of command `index` (out of `n_cmd`) at `time`.
    pub fn coordinate_at<E: CoordinateEngine>(
        &self,
        engine: &E,
        config: &ControlConfig,
        index: f64,
        n_cmd: f64,
        time: f64,
    ) -> Result<AltAz, PathError> {
        match self {
            Self::Track(track) => {
                resolve_offset(engine, &track.target, track.offset.as_ref(), time)
            }
            Self::Linear(scan) => {
                let point = lerp(scan.start, scan.stop, index / n_cmd);
                scan.resolve(engine, point, time)
            }
            Self::Accelerate(scan) => {
                let run_up = standby_position(scan.start, scan.stop, scan.margin(config))?;
                let ratio = index / n_cmd;
                let point = lerp(run_up, scan.start, ratio * ratio);
                scan.resolve(engine, point, time)
            }
            Self::Standby(scan) => {
                let run_up = standby_position(scan.start, scan.stop, scan.margin(config))?;
                scan.resolve(engine, run_up, time)
            }
        }
    }
}

/// Resolve `target`, first shifting it by `offset` in the offset's frame.
fn resolve_offset<E: CoordinateEngine>(
    engine: &E,
    target: &Target,
    offset: Option<&Offset>,
    time: f64,
) -> Result<AltAz, PathError> {
    match offset {
        None => Ok(engine.resolve(target, time)?),
        Some(offset) => {
            let (lon, lat) = engine.realize(target, &offset.frame, time)?;
            let (lon, lat) = cartesian_offset(lon, lat, offset.d_lon, offset.d_lat);
            Ok(engine.resolve(&Target::fixed(lon, lat, offset.frame.clone()), time)?)
        }
    }
}
