//! Cable-wrap unwrapping and hard-limit safety in closed loop.

use antenna_common::antenna::status::TickStatus;
use antenna_control::clock::Clock;
use antenna_control::path::engine::AltAz;

use super::{Rig, p_only};

#[test]
fn near_limit_target_unwraps_the_long_way() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(240.0, 45.0));
    let dt = 0.1;

    let first = rig.tick(AltAz::new(251.0, 45.0));
    assert!((first.az.target.unwrap() + 109.0).abs() < 1e-9);
    rig.clock.advance(dt);

    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    let end = rig.clock.now() + 200.0;
    while rig.clock.now() < end {
        let tick = rig.tick(AltAz::new(251.0, 45.0));
        assert!((tick.az.target.unwrap() + 109.0).abs() < 1e-9);
        let az = rig.mount.position().az;
        lowest = lowest.min(az);
        highest = highest.max(az);
        rig.clock.advance(dt);
    }

    assert!(highest <= 240.0 + 1e-9, "moved toward the wrap limit: {highest}");
    assert!(lowest >= -260.0);
    assert!((rig.mount.position().az + 109.0).abs() < 1e-3);
}

#[test]
fn small_offset_keeps_observation_side() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(249.0, 45.0));
    let tick = rig.tick(AltAz::new(251.0, 45.0));
    assert_eq!(tick.az.target, Some(251.0));
    assert!(tick.az.status.contains(TickStatus::UNPREFERRED));
}

#[test]
fn unreachable_elevation_holds_then_recovers() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(100.0, 30.0));

    let ticks = rig.hold(AltAz::new(100.0, -10.0), 0.1, 1.0);
    for tick in &ticks {
        assert_eq!(tick.el.target, None);
        assert_eq!(tick.el.speed, 0.0);
        assert!(tick.el.status.contains(TickStatus::NO_SAFE_TARGET));
    }
    assert!(rig.drive.el.is_holding());
    assert!((rig.mount.position().el - 30.0).abs() < 1e-12);

    rig.hold(AltAz::new(100.0, 35.0), 0.1, 30.0);
    assert!(!rig.drive.el.is_holding());
    assert!((rig.mount.position().el - 35.0).abs() < 1e-3);
}

#[test]
fn approach_to_hard_limit_never_overshoots() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(100.0, 80.0));

    let mut highest = f64::NEG_INFINITY;
    for tick in rig.hold(AltAz::new(100.0, 90.0), 0.1, 5.0) {
        assert!(!tick.el.status.contains(TickStatus::OUTSIDE_LIMIT));
        highest = highest.max(rig.mount.position().el);
    }
    let end = rig.clock.now() + 25.0;
    while rig.clock.now() < end {
        rig.tick(AltAz::new(100.0, 90.0));
        highest = highest.max(rig.mount.position().el);
        rig.clock.advance(0.1);
    }

    // Encoder quantisation alone may leave a sub-arcsecond residual.
    assert!(highest <= 90.0 + 1e-4, "overshoot to {highest}");
    assert!(rig.mount.position().el > 89.99);
}

#[test]
fn encoder_past_limit_is_not_driven() {
    let loaded = p_only();
    let mut rig = Rig::new(&loaded, AltAz::new(100.0, 90.5));
    let tick = rig.tick(AltAz::new(100.0, 89.0));
    assert_eq!(tick.el.speed, 0.0);
    assert!(tick.el.status.contains(TickStatus::OUTSIDE_LIMIT));
    assert!(tick.status().is_holding());
}
