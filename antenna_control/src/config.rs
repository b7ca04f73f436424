//! Configuration loading into validated runtime objects.
//!
//! Parses an [`AntennaConfig`] from TOML, runs every bound check and builds
//! the per-axis [`DriveRange`]s in the configured angle unit.

use std::path::Path;

use antenna_common::antenna::config::{AntennaConfig, ControlConfig};
use antenna_common::config::{ConfigError, ConfigLoader};
use antenna_common::range::DriveRange;
use antenna_common::units::AngleUnit;
use tracing::debug;

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for runtime use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AntennaConfig,
    /// Azimuth drive range in `config.control.angle_unit`.
    pub az_range: DriveRange,
    /// Elevation drive range in `config.control.angle_unit`.
    pub el_range: DriveRange,
}

impl LoadedConfig {
    /// Validate `config` and build its drive ranges.
    pub fn from_config(config: AntennaConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::ValidationError)?;

        let unit = config.control.angle_unit;
        let az_range = config
            .az
            .drive_range
            .build(unit)
            .map_err(|e| ConfigError::ValidationError(format!("az: {e}")))?;
        let el_range = config
            .el
            .drive_range
            .build(unit)
            .map_err(|e| ConfigError::ValidationError(format!("el: {e}")))?;

        debug!(
            service = %config.shared.service_name,
            %unit,
            frequency = config.control.command_frequency,
            "configuration validated"
        );

        Ok(Self {
            config,
            az_range,
            el_range,
        })
    }

    /// Unit of controller I/O.
    #[inline]
    pub fn unit(&self) -> AngleUnit {
        self.config.control.angle_unit
    }

    #[inline]
    pub fn control(&self) -> &ControlConfig {
        &self.config.control
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the antenna configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    LoadedConfig::from_config(AntennaConfig::load(path)?)
}

/// Load and validate the antenna configuration from a TOML string.
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    LoadedConfig::from_config(AntennaConfig::parse(content)?)
}
