//! # Antenna Control Simulator
//!
//! Drives the emulated mount toward a fixed AltAz target through the full
//! per-tick pipeline (optimize → PID → decelerate). Time is simulated, so a
//! long run finishes immediately and is reproducible.
//!
//! Commands come from a `Track` section played by the path generator, one
//! command group at a time, exactly as a live drive loop would consume them.

use std::path::PathBuf;
use std::process;

use antenna_common::antenna::status::TickStatus;
use antenna_common::config::LogLevel;
use antenna_control::clock::{Clock, ManualClock};
use antenna_control::config::{LoadedConfig, load_config};
use antenna_control::cycle::{AntennaDrive, Axis};
use antenna_control::error::ControlError;
use antenna_control::path::engine::{AltAz, HorizontalEngine, Target};
use antenna_control::path::generator::{PathGenerator, Repeat};
use antenna_control::path::section::{Section, Track};
use antenna_control::simulator::{EmulatorParams, EncoderEmulator};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Simulation start time [s].
const SIM_EPOCH: f64 = 1_700_000_000.0;

/// Antenna control simulator: closed-loop drive toward a fixed target
#[derive(Parser, Debug)]
#[command(name = "antenna_control")]
#[command(version)]
#[command(about = "Closed-loop antenna drive simulation")]
struct Args {
    /// Path to antenna configuration TOML.
    #[arg(default_value = "config/antenna.toml")]
    config: PathBuf,

    /// Target azimuth [deg].
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    az: f64,

    /// Target elevation [deg].
    #[arg(long, default_value_t = 60.0, allow_negative_numbers = true)]
    el: f64,

    /// Simulated duration [s].
    #[arg(long, default_value_t = 120.0)]
    duration: f64,

    /// Enable verbose logging (DEBUG level), overriding the configured level.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    // The configured level is needed before the subscriber exists.
    let loaded = load_config(&args.config);
    let level = loaded
        .as_ref()
        .map_or(LogLevel::default(), |l| l.config.shared.log_level);
    setup_tracing(&args, level);

    info!("Antenna control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(ControlError::from)
        .and_then(|loaded| run(&args, &loaded));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Antenna control shutdown complete");
}

fn run(args: &Args, loaded: &LoadedConfig) -> Result<(), ControlError> {
    let control = *loaded.control();
    info!(
        "Config OK: service={}, unit={}, frequency={} Hz, group={} commands",
        loaded.config.shared.service_name,
        loaded.unit(),
        control.command_frequency,
        control.commands_per_group(),
    );

    let clock = ManualClock::new(SIM_EPOCH);
    let mut drive = AntennaDrive::from_config(loaded, clock.clone());
    let mut encoder = EncoderEmulator::with_clock(EmulatorParams::default(), clock.clone());

    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, control, clock.clone());
    let track = Section::Track(Track::new(Target::altaz(args.az, args.el)));
    let mut groups = paths.sequential(vec![track], Repeat::Once);

    let dt = 1.0 / control.command_frequency;
    let end = SIM_EPOCH + args.duration;
    let mut ticks: u64 = 0;
    let mut last_report = SIM_EPOCH;
    let mut reading = encoder.read();

    'run: while clock.now() < end {
        let group = match groups.next() {
            Some(group) => group?,
            None => break,
        };
        // Batch-level pass only reports unreachable commands once per group;
        // each tick re-optimizes against its own encoder reading.
        let (az_targets, el_targets) = drive.optimize_group(&group, reading);
        let unresolved = az_targets
            .iter()
            .chain(&el_targets)
            .filter(|t| t.is_none())
            .count();
        if unresolved > 0 {
            debug!(unresolved, commands = group.len(), "command group partly unreachable");
        }

        for i in 0..group.len() {
            if clock.now() >= end {
                break 'run;
            }
            // Commands are stamped ahead of time; hold until due.
            if group.time[i] > clock.now() {
                clock.set(group.time[i]);
                reading = encoder.read();
            }

            let tick = drive.tick(AltAz::new(group.az[i], group.el[i]), reading, false);
            encoder.command(drive.speed_deg(&tick.az), Axis::Az);
            encoder.command(drive.speed_deg(&tick.el), Axis::El);
            ticks += 1;

            if tick.status().intersects(TickStatus::HOLD_MASK) {
                debug!(status = ?tick.status(), "tick holding");
            }

            clock.advance(dt);
            reading = encoder.read();

            if clock.now() - last_report >= 1.0 {
                last_report = clock.now();
                info!(
                    t = format_args!("{:.1}", clock.now() - SIM_EPOCH),
                    az = format_args!("{:.4}", reading.az),
                    el = format_args!("{:.4}", reading.el),
                    err_az = format_args!("{:.2e}", group.az[i] - reading.az),
                    err_el = format_args!("{:.2e}", group.el[i] - reading.el),
                    "progress"
                );
            }
        }
    }

    info!(
        "Simulation finished: {ticks} ticks, final position az={:.5} el={:.5}",
        reading.az, reading.el
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
///
/// `RUST_LOG` takes precedence when set.
fn setup_tracing(args: &Args, level: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
