//! System-wide constants for the antenna workspace.
//!
//! Single source of truth for default control parameters and their bounds.
//! Angles are in degrees, times in seconds.

/// Default proportional gain.
pub const DEFAULT_K_P: f64 = 1.0;

/// Default integral gain.
pub const DEFAULT_K_I: f64 = 0.5;

/// Default derivative gain.
pub const DEFAULT_K_D: f64 = 0.3;

/// Default drive speed limit [deg/s].
pub const DEFAULT_MAX_SPEED: f64 = 2.0;

/// Default drive acceleration limit [deg/s²].
pub const DEFAULT_MAX_ACCELERATION: f64 = 2.0;

/// Default number of error samples kept for the integral term.
pub const DEFAULT_ERROR_INTEG_COUNT: usize = 50;

/// Command jump that resets the controller history [deg] (100 arcsec).
pub const DEFAULT_CMD_COORD_CHANGE: f64 = 100.0 / 3600.0;

/// Error below which acceleration limiting is switched off [deg] (20 arcsec).
pub const DEFAULT_ACCEL_LIMIT_OFF: f64 = 20.0 / 3600.0;

/// Feed-forward acceleration above which the term is ignored [deg/s²].
pub const DEFAULT_TARGET_ACCEL_IGNORE: f64 = 2.0;

/// Separation below which unwrap avoidance never triggers [deg].
pub const DEFAULT_MAX_OBSERVATION_SIZE: f64 = 5.0;

/// Default command frequency of the path generator [Hz].
pub const DEFAULT_COMMAND_FREQUENCY: f64 = 50.0;

/// Default duration covered by one command group [s].
pub const DEFAULT_COMMAND_GROUP_DURATION: f64 = 1.0;

/// Default lead time of the first command of an unchained section [s].
pub const DEFAULT_COMMAND_OFFSET: f64 = 0.1;

/// Default acceleration margin before a scan [deg].
pub const DEFAULT_SCAN_MARGIN: f64 = 0.1;

// ─── Parameter Bounds ───────────────────────────────────────────────

/// Maximum accepted gain magnitude.
pub const GAIN_MAX: f64 = 1.0e4;

/// Maximum accepted drive speed [deg/s].
pub const MAX_SPEED_MAX: f64 = 20.0;

/// Maximum accepted drive acceleration [deg/s²].
pub const MAX_ACCELERATION_MAX: f64 = 50.0;

/// Minimum number of error samples (one trapezoid needs two).
pub const ERROR_INTEG_COUNT_MIN: usize = 2;

/// Maximum number of error samples.
pub const ERROR_INTEG_COUNT_MAX: usize = 10_000;

/// Command frequency bounds [Hz].
pub const COMMAND_FREQUENCY_MIN: f64 = 0.1;
pub const COMMAND_FREQUENCY_MAX: f64 = 1000.0;

/// Command group duration bounds [s].
pub const COMMAND_GROUP_DURATION_MIN: f64 = 0.01;
pub const COMMAND_GROUP_DURATION_MAX: f64 = 60.0;
