//! Antenna drive configuration and per-tick status.
//!
//! Shared between the control core and anything that inspects its output.

pub mod config;
pub mod status;
