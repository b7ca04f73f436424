//! Configuration structures for the antenna drive.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Angles are given in degrees regardless of the runtime `angle_unit`;
//! runtime objects convert once at construction.
//! Optional fields use `#[serde(default)]` so partial files stay valid.

use serde::{Deserialize, Serialize};

use crate::config::SharedConfig;
use crate::consts::{
    COMMAND_FREQUENCY_MAX, COMMAND_FREQUENCY_MIN, COMMAND_GROUP_DURATION_MAX,
    COMMAND_GROUP_DURATION_MIN, DEFAULT_ACCEL_LIMIT_OFF, DEFAULT_CMD_COORD_CHANGE,
    DEFAULT_COMMAND_FREQUENCY, DEFAULT_COMMAND_GROUP_DURATION, DEFAULT_COMMAND_OFFSET,
    DEFAULT_ERROR_INTEG_COUNT, DEFAULT_K_D, DEFAULT_K_I, DEFAULT_K_P, DEFAULT_MAX_ACCELERATION,
    DEFAULT_MAX_OBSERVATION_SIZE, DEFAULT_MAX_SPEED, DEFAULT_SCAN_MARGIN,
    DEFAULT_TARGET_ACCEL_IGNORE, ERROR_INTEG_COUNT_MAX, ERROR_INTEG_COUNT_MIN, GAIN_MAX,
    MAX_ACCELERATION_MAX, MAX_SPEED_MAX,
};
use crate::range::{DriveRange, RangeError};
use crate::units::AngleUnit;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level antenna configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "antenna"
///
/// [control]
/// angle_unit = "deg"
///
/// [az.drive_range]
/// limit = [-270.0, 270.0]
/// preferred_limit = [-265.0, 265.0]
///
/// [el.drive_range]
/// limit = [0.0, 90.0]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub control: ControlConfig,
    /// Azimuth axis.
    pub az: AxisConfig,
    /// Elevation axis.
    pub el: AxisConfig,
}

impl AntennaConfig {
    /// Validate parameter bounds for every section.
    pub fn validate(&self) -> Result<(), String> {
        self.shared.validate().map_err(|e| e.to_string())?;
        self.control.validate()?;
        self.az.validate().map_err(|e| format!("az: {e}"))?;
        self.el.validate().map_err(|e| format!("el: {e}"))?;
        Ok(())
    }
}

// ─── Control / Path Generation ──────────────────────────────────────

/// Control loop and command generation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Unit of controller I/O.
    #[serde(default)]
    pub angle_unit: AngleUnit,
    /// Commands generated per second [Hz].
    #[serde(default = "default_command_frequency")]
    pub command_frequency: f64,
    /// Time span covered by one generated command group [s].
    #[serde(default = "default_command_group_duration")]
    pub command_group_duration: f64,
    /// Lead time of the first command when nothing precedes it [s].
    #[serde(default = "default_command_offset")]
    pub command_offset: f64,
    /// Acceleration margin before a scan [deg].
    #[serde(default = "default_scan_margin")]
    pub scan_margin: f64,
}

fn default_command_frequency() -> f64 {
    DEFAULT_COMMAND_FREQUENCY
}
fn default_command_group_duration() -> f64 {
    DEFAULT_COMMAND_GROUP_DURATION
}
fn default_command_offset() -> f64 {
    DEFAULT_COMMAND_OFFSET
}
fn default_scan_margin() -> f64 {
    DEFAULT_SCAN_MARGIN
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Deg,
            command_frequency: DEFAULT_COMMAND_FREQUENCY,
            command_group_duration: DEFAULT_COMMAND_GROUP_DURATION,
            command_offset: DEFAULT_COMMAND_OFFSET,
            scan_margin: DEFAULT_SCAN_MARGIN,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(COMMAND_FREQUENCY_MIN..=COMMAND_FREQUENCY_MAX).contains(&self.command_frequency) {
            return Err(format!(
                "command_frequency {} out of range [{}, {}]",
                self.command_frequency, COMMAND_FREQUENCY_MIN, COMMAND_FREQUENCY_MAX
            ));
        }
        if !(COMMAND_GROUP_DURATION_MIN..=COMMAND_GROUP_DURATION_MAX)
            .contains(&self.command_group_duration)
        {
            return Err(format!(
                "command_group_duration {} out of range [{}, {}]",
                self.command_group_duration,
                COMMAND_GROUP_DURATION_MIN,
                COMMAND_GROUP_DURATION_MAX
            ));
        }
        if !(self.command_offset >= 0.0 && self.command_offset.is_finite()) {
            return Err(format!(
                "command_offset {} must be finite and >= 0",
                self.command_offset
            ));
        }
        if !(self.scan_margin > 0.0 && self.scan_margin.is_finite()) {
            return Err(format!("scan_margin {} must be > 0", self.scan_margin));
        }
        Ok(())
    }

    /// Number of commands in one command group (at least one).
    pub fn commands_per_group(&self) -> usize {
        ((self.command_group_duration * self.command_frequency).round() as usize).max(1)
    }
}

// ─── Per-Axis Config ────────────────────────────────────────────────

/// Per-axis configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisConfig {
    /// PID speed controller parameters.
    #[serde(default)]
    pub pid: PidConfig,
    /// Hard and preferred drive range.
    pub drive_range: DriveRangeConfig,
}

impl AxisConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.pid.validate()?;
        self.drive_range.validate()?;
        Ok(())
    }
}

/// PID speed controller parameters (angles in degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    /// Proportional gain.
    #[serde(default = "default_k_p")]
    pub k_p: f64,
    /// Integral gain.
    #[serde(default = "default_k_i")]
    pub k_i: f64,
    /// Derivative gain.
    #[serde(default = "default_k_d")]
    pub k_d: f64,
    /// Drive speed limit [deg/s].
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    /// Drive acceleration limit [deg/s²].
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f64,
    /// Number of error samples used for the integral term.
    #[serde(default = "default_error_integ_count")]
    pub error_integ_count: usize,
    /// Conditional-execution thresholds.
    #[serde(default)]
    pub threshold: PidThresholds,
}

fn default_k_p() -> f64 {
    DEFAULT_K_P
}
fn default_k_i() -> f64 {
    DEFAULT_K_I
}
fn default_k_d() -> f64 {
    DEFAULT_K_D
}
fn default_max_speed() -> f64 {
    DEFAULT_MAX_SPEED
}
fn default_max_acceleration() -> f64 {
    DEFAULT_MAX_ACCELERATION
}
fn default_error_integ_count() -> usize {
    DEFAULT_ERROR_INTEG_COUNT
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            k_p: DEFAULT_K_P,
            k_i: DEFAULT_K_I,
            k_d: DEFAULT_K_D,
            max_speed: DEFAULT_MAX_SPEED,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            error_integ_count: DEFAULT_ERROR_INTEG_COUNT,
            threshold: PidThresholds::default(),
        }
    }
}

impl PidConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, gain) in [("k_p", self.k_p), ("k_i", self.k_i), ("k_d", self.k_d)] {
            if !(0.0..=GAIN_MAX).contains(&gain) {
                return Err(format!("{name} {gain} out of range [0, {GAIN_MAX}]"));
            }
        }
        if !(self.max_speed > 0.0 && self.max_speed <= MAX_SPEED_MAX) {
            return Err(format!(
                "max_speed {} out of range (0, {}]",
                self.max_speed, MAX_SPEED_MAX
            ));
        }
        if !(self.max_acceleration > 0.0 && self.max_acceleration <= MAX_ACCELERATION_MAX) {
            return Err(format!(
                "max_acceleration {} out of range (0, {}]",
                self.max_acceleration, MAX_ACCELERATION_MAX
            ));
        }
        if !(ERROR_INTEG_COUNT_MIN..=ERROR_INTEG_COUNT_MAX).contains(&self.error_integ_count) {
            return Err(format!(
                "error_integ_count {} out of range [{}, {}]",
                self.error_integ_count, ERROR_INTEG_COUNT_MIN, ERROR_INTEG_COUNT_MAX
            ));
        }
        self.threshold.validate()
    }
}

/// Thresholds for conditional controller behavior (angles in degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidThresholds {
    /// Command jump treated as a new target; resets the controller [deg].
    #[serde(default = "default_cmd_coord_change")]
    pub cmd_coord_change: f64,
    /// Error below which acceleration limiting is skipped [deg].
    #[serde(default = "default_accel_limit_off")]
    pub accel_limit_off: f64,
    /// Feed-forward acceleration above which the feed-forward is dropped [deg/s²].
    #[serde(default = "default_target_accel_ignore")]
    pub target_accel_ignore: f64,
}

fn default_cmd_coord_change() -> f64 {
    DEFAULT_CMD_COORD_CHANGE
}
fn default_accel_limit_off() -> f64 {
    DEFAULT_ACCEL_LIMIT_OFF
}
fn default_target_accel_ignore() -> f64 {
    DEFAULT_TARGET_ACCEL_IGNORE
}

impl Default for PidThresholds {
    fn default() -> Self {
        Self {
            cmd_coord_change: DEFAULT_CMD_COORD_CHANGE,
            accel_limit_off: DEFAULT_ACCEL_LIMIT_OFF,
            target_accel_ignore: DEFAULT_TARGET_ACCEL_IGNORE,
        }
    }
}

impl PidThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, v) in [
            ("cmd_coord_change", self.cmd_coord_change),
            ("accel_limit_off", self.accel_limit_off),
            ("target_accel_ignore", self.target_accel_ignore),
        ] {
            if v.is_nan() {
                return Err(format!("threshold {name} is NaN"));
            }
        }
        if self.cmd_coord_change <= 0.0 {
            return Err(format!(
                "threshold cmd_coord_change {} must be > 0",
                self.cmd_coord_change
            ));
        }
        if self.target_accel_ignore <= 0.0 {
            return Err(format!(
                "threshold target_accel_ignore {} must be > 0",
                self.target_accel_ignore
            ));
        }
        Ok(())
    }
}

/// Drive range of one axis (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveRangeConfig {
    /// Hard limit `[lower, upper]`.
    pub limit: [f64; 2],
    /// Soft limit inside `limit`; defaults to `limit`.
    #[serde(default)]
    pub preferred_limit: Option<[f64; 2]>,
    /// Separation below which unwrap avoidance never triggers [deg].
    #[serde(default = "default_max_observation_size")]
    pub max_observation_size: f64,
}

fn default_max_observation_size() -> f64 {
    DEFAULT_MAX_OBSERVATION_SIZE
}

impl DriveRangeConfig {
    /// Bounds must be ascending and the preferred range must lie inside the
    /// hard limit.
    pub fn validate(&self) -> Result<(), String> {
        let [lo, hi] = self.limit;
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(format!(
                "limit [{lo}, {hi}] must be finite and given in ascending order"
            ));
        }
        if let Some([plo, phi]) = self.preferred_limit {
            if !(plo.is_finite() && phi.is_finite()) || plo > phi {
                return Err(format!(
                    "preferred_limit [{plo}, {phi}] must be finite and given in ascending order"
                ));
            }
            if plo < lo || phi > hi {
                return Err(format!(
                    "preferred_limit [{plo}, {phi}] exceeds limit [{lo}, {hi}]"
                ));
            }
        }
        if !(self.max_observation_size >= 0.0 && self.max_observation_size.is_finite()) {
            return Err(format!(
                "max_observation_size {} must be finite and >= 0",
                self.max_observation_size
            ));
        }
        Ok(())
    }

    /// Runtime drive range in `unit`.
    pub fn build(&self, unit: AngleUnit) -> Result<DriveRange, RangeError> {
        DriveRange::from_deg(
            self.limit,
            self.preferred_limit,
            self.max_observation_size,
            unit,
        )
    }
}
