//! # Antenna Control Library
//!
//! Closed-loop drive control for alt-az radio telescopes. Turns a desired
//! coordinate and the live encoder reading into a bounded, safe drive
//! speed every tick, and generates the time-stamped command stream the
//! drive loop consumes.
//!
//! ## Per-Tick Pipeline
//!
//! 1. **DriveLimitOptimizer**: unwrap the target into the drive range
//! 2. **PidController**: feed-forward plus PID speed with acceleration
//!    and speed limits
//! 3. **BoundaryDecelerator**: stopping-distance cap near the hard limits
//!
//! ## Path Generation
//!
//! Motion [`path::section::Section`]s (track, scan run-up, scan, standby)
//! yield command groups through [`path::generator::PathGenerator`];
//! chained sections start exactly where their predecessor stopped.
//!
//! ## Ownership
//!
//! Nothing here spawns threads or sleeps. Each axis owns its controller
//! exclusively and every stateful call takes `&mut self`.

pub mod clock;
pub mod config;
pub mod control;
pub mod cycle;
pub mod error;
pub mod path;
pub mod safety;
pub mod simulator;
