//! Section chaining and target re-evaluation across command groups.

use antenna_common::antenna::config::ControlConfig;
use antenna_control::clock::ManualClock;
use antenna_control::path::engine::{
    AltAz, CoordinateEngine, EngineError, Frame, HorizontalEngine, Target,
};
use antenna_control::path::generator::{PathGenerator, Repeat, TimedCoordinate};
use antenna_control::path::section::{Scan, Section, Timing, Track};

use super::T0;

fn config() -> ControlConfig {
    ControlConfig {
        command_frequency: 50.0,
        command_group_duration: 1.0,
        command_offset: 0.1,
        scan_margin: 0.1,
        ..Default::default()
    }
}

fn hold(az: f64, el: f64, duration: f64) -> Section {
    Section::Track(Track::new(Target::altaz(az, el)).with_timing(Timing {
        duration: Some(duration),
        ..Default::default()
    }))
}

fn observation() -> Vec<Section> {
    let scan = Scan::new((10.0, 40.0), (12.0, 40.0), Frame::AltAz, 0.5);
    let mut sections = vec![hold(9.9, 40.0, 2.0)];
    sections.extend(scan.into_sections());
    sections.push(hold(12.0, 40.0, 1.0));
    sections
}

#[test]
fn chained_stream_has_no_gaps() {
    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, config(), ManualClock::new(T0));
    let groups: Vec<TimedCoordinate> = paths
        .sequential(observation(), Repeat::Times(2))
        .collect::<Result<_, _>>()
        .unwrap();

    let times: Vec<f64> = groups.iter().flat_map(|g| g.time.iter().copied()).collect();
    // 2 s hold + 0.4 s run-up + 4 s scan + 1 s hold, twice.
    assert_eq!(times.len(), 2 * (100 + 20 + 200 + 50));
    assert!((times[0] - (T0 + 0.1)).abs() < 1e-9);
    for pair in times.windows(2) {
        assert!((pair[1] - pair[0] - 0.02).abs() < 1e-5, "gap {pair:?}");
    }
    assert!(groups.iter().all(|g| g.len() <= 50));
}

#[test]
fn each_section_starts_at_predecessor_stop() {
    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, config(), ManualClock::new(T0));
    let mut contexts = Vec::new();
    for group in paths.sequential(observation(), Repeat::Once) {
        let ctx = group.unwrap().context;
        if contexts.last() != Some(&ctx) {
            contexts.push(ctx);
        }
    }

    assert_eq!(contexts.len(), 4);
    for pair in contexts.windows(2) {
        assert_eq!(pair[1].start, pair[0].stop);
    }
    let kinds: Vec<bool> = contexts.iter().map(|c| c.tight).collect();
    assert_eq!(kinds, vec![true, false, true, true]);
}

#[test]
fn scan_positions_are_continuous() {
    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, config(), ManualClock::new(T0));
    let az: Vec<f64> = paths
        .sequential(observation(), Repeat::Once)
        .flat_map(|g| g.unwrap().az)
        .collect();

    // Standby hold, run-up, scan and final hold join without jumps.
    for pair in az.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= 0.5 * 0.02 + 1e-9);
    }
    assert!((az[99] - 9.9).abs() < 1e-12);
    assert!((az[120] - 10.0).abs() < 1e-12);
    assert!((az[az.len() - 1] - 12.0).abs() < 1e-12);
}

/// Sky frame rotating in azimuth at a fixed rate, for re-evaluation tests.
struct DriftEngine {
    rate: f64,
}

impl CoordinateEngine for DriftEngine {
    fn resolve(&self, target: &Target, time: f64) -> Result<AltAz, EngineError> {
        match target {
            Target::Fixed {
                lon,
                lat,
                frame: Frame::Fk5,
            } => Ok(AltAz::new(lon + self.rate * (time - T0), *lat)),
            Target::Fixed { lon, lat, frame: Frame::AltAz } => Ok(AltAz::new(*lon, *lat)),
            Target::Fixed { frame, .. } => Err(EngineError::UnsupportedFrame(frame.clone())),
            Target::Named(name) => Err(EngineError::UnknownTarget(name.clone())),
        }
    }
}

#[test]
fn track_re_evaluates_target_per_command() {
    let engine = DriftEngine { rate: 15.0 / 3600.0 };
    let paths = PathGenerator::with_clock(&engine, config(), ManualClock::new(T0));
    let group = paths
        .section(Section::Track(Track::new(Target::fixed(83.6, 22.0, Frame::Fk5))))
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(group.len(), 50);
    for i in 0..group.len() {
        let expected = 83.6 + engine.rate * (group.time[i] - T0);
        assert!((group.az[i] - expected).abs() < 1e-9);
        assert_eq!(group.el[i], 22.0);
    }
}

#[test]
fn unsupported_frame_ends_the_stream() {
    let engine = DriftEngine { rate: 0.0 };
    let paths = PathGenerator::with_clock(&engine, config(), ManualClock::new(T0));
    let sections = vec![
        hold(0.0, 45.0, 1.0),
        Section::Track(Track::new(Target::fixed(0.0, 0.0, Frame::Galactic))),
    ];
    let results: Vec<_> = paths.sequential(sections, Repeat::Forever).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
