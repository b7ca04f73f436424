//! Closed-loop tracking against the emulated mount.

use std::path::Path;

use antenna_control::clock::Clock;
use antenna_control::config::{load_config, load_config_from_str};
use antenna_control::path::engine::{AltAz, Frame, HorizontalEngine, Target};
use antenna_control::path::generator::{PathGenerator, Repeat};
use antenna_control::path::section::{Scan, Section, Track};

use super::{P_ONLY, Rig, T0, p_only};

#[test]
fn demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/antenna.toml");
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.az_range.limit.upper(), 270.0);
    assert_eq!(loaded.el_range.preferred_limit.lower(), 10.0);
}

#[test]
fn track_section_converges() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(180.0, 45.0));
    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, *loaded.control(), rig.clock.clone());
    let track = Section::Track(Track::new(Target::altaz(30.0, 60.0)));

    let end = T0 + 100.0;
    'run: for group in paths.sequential(vec![track], Repeat::Once) {
        let group = group.unwrap();
        for i in 0..group.len() {
            if group.time[i] >= end {
                break 'run;
            }
            rig.clock.set(group.time[i]);
            let tick = rig.tick(AltAz::new(group.az[i], group.el[i]));
            assert!(tick.az.speed.abs() <= 2.0 + 1e-12);
            assert!(tick.el.speed.abs() <= 2.0 + 1e-12);
            assert!(!tick.status().is_holding());
        }
    }

    let pos = rig.mount.position();
    assert!((pos.az - 30.0).abs() < 1e-3, "az = {}", pos.az);
    assert!((pos.el - 60.0).abs() < 1e-3, "el = {}", pos.el);
}

#[test]
fn scan_is_followed_with_feed_forward() {
    let loaded = p_only();
    let scan = Scan::new((100.0, 40.0), (102.0, 40.0), Frame::AltAz, 0.5);
    // Mount waits at the run-up point.
    let mut rig = Rig::new(&loaded, AltAz::new(99.9, 40.0));
    let engine = HorizontalEngine;
    let paths = PathGenerator::with_clock(&engine, *loaded.control(), rig.clock.clone());

    let mut scan_errors = Vec::new();
    for group in paths.sequential(scan.into_sections().to_vec(), Repeat::Once) {
        let group = group.unwrap();
        for i in 0..group.len() {
            rig.clock.set(group.time[i]);
            let reading = rig.mount.read();
            rig.tick(AltAz::new(group.az[i], group.el[i]));
            if group.context.tight {
                scan_errors.push(group.az[i] - reading.az);
            }
        }
    }

    // 4 s at 50 Hz.
    assert_eq!(scan_errors.len(), 200);
    let last_second = &scan_errors[150..];
    let worst = last_second.iter().fold(0.0f64, |m, e| m.max(e.abs()));
    assert!(worst < 2e-3, "worst error {worst}");
}

#[test]
fn stop_request_zeroes_both_axes() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(180.0, 45.0));
    rig.hold(AltAz::new(170.0, 50.0), 0.1, 2.0);

    let reading = rig.mount.read();
    let tick = rig.drive.tick(AltAz::new(170.0, 50.0), reading, true);
    assert_eq!(tick.az.speed, 0.0);
    assert_eq!(tick.el.speed, 0.0);
    assert!(tick.status().is_holding());
}

#[test]
fn trajectory_is_unit_independent() {
    let run = |loaded| {
        let mut rig = Rig::new(&loaded, AltAz::new(180.0, 45.0));
        rig.hold(AltAz::new(190.0, 50.0), 0.1, 20.0);
        rig.mount.position()
    };
    let deg = run(p_only());
    let arcsec = run(
        load_config_from_str(&format!("[control]\nangle_unit = \"arcsec\"\n{P_ONLY}")).unwrap(),
    );

    assert!((deg.az - arcsec.az).abs() < 1e-6);
    assert!((deg.el - arcsec.el).abs() < 1e-6);
    assert!((deg.az - 190.0).abs() < 0.05);
}
