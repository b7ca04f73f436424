//! Antenna Common Library
//!
//! Shared data model, angular units and configuration for the antenna
//! drive workspace.
//!
//! # Module Structure
//!
//! - [`history`] - Fixed-capacity sample windows used by the controllers
//! - [`range`] - Validated intervals and the per-axis drive range
//! - [`units`] - Angular units and conversion factors
//! - [`math`] - Small non-panicking numeric helpers
//! - [`config`] - Configuration loading traits and types
//! - [`antenna`] - Antenna control configuration and per-tick status flags
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use antenna_common::prelude::*;
//!
//! let limit = RangeGuard::new(-270.0, 270.0).unwrap();
//! assert!(limit.contains(180.0));
//! ```

pub mod antenna;
pub mod config;
pub mod consts;
pub mod history;
pub mod math;
pub mod prelude;
pub mod range;
pub mod units;
