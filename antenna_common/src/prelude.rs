//! Prelude module for common re-exports.
//!
//! ```rust
//! use antenna_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::antenna::config::{
    AntennaConfig, AxisConfig, ControlConfig, DriveRangeConfig, PidConfig, PidThresholds,
};
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Data Model ─────────────────────────────────────────────────────
pub use crate::antenna::status::TickStatus;
pub use crate::history::BoundedHistory;
pub use crate::range::{DriveRange, RangeError, RangeGuard};
pub use crate::units::AngleUnit;
