//! Crate-level error type.
//!
//! Runtime "no safe command" outcomes are not errors; they surface as
//! `None` targets and [`TickStatus`](antenna_common::antenna::status::TickStatus)
//! flags. Only construction and path generation fail.

use antenna_common::config::ConfigError;
use antenna_common::range::RangeError;
use thiserror::Error;

use crate::path::PathError;

#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// Loading or validating configuration failed.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// A drive range could not be built.
    #[error("drive range: {0}")]
    Range(#[from] RangeError),

    /// Path generation failed.
    #[error("path: {0}")]
    Path(#[from] PathError),
}
