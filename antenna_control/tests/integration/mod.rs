mod drive_limits;
mod path_chaining;
mod tracking;

use antenna_control::clock::{Clock, ManualClock};
use antenna_control::config::{LoadedConfig, load_config_from_str};
use antenna_control::cycle::{AntennaDrive, AntennaTick, Axis};
use antenna_control::path::engine::AltAz;
use antenna_control::simulator::{EmulatorParams, EncoderEmulator};

/// Start of simulated time [s].
pub const T0: f64 = 1_700_000_000.0;

/// Proportional-only controller on a ±260° azimuth wrap.
pub const P_ONLY: &str = r#"
    [shared]
    service_name = "antenna-it"

    [az.pid]
    k_p = 1.0
    k_i = 0.0
    k_d = 0.0

    [az.drive_range]
    limit = [-260.0, 260.0]
    preferred_limit = [-250.0, 250.0]

    [el.pid]
    k_p = 1.0
    k_i = 0.0
    k_d = 0.0

    [el.drive_range]
    limit = [0.0, 90.0]
"#;

pub fn p_only() -> LoadedConfig {
    load_config_from_str(P_ONLY).unwrap()
}

/// Drive, emulated mount and the clock they share.
pub struct Rig {
    pub clock: ManualClock,
    pub drive: AntennaDrive<ManualClock>,
    pub mount: EncoderEmulator<ManualClock>,
}

impl Rig {
    /// Mount at `initial` that accelerates at 5 deg/s², faster than the controller limit.
    pub fn new(loaded: &LoadedConfig, initial: AltAz) -> Self {
        let clock = ManualClock::new(T0);
        let params = EmulatorParams {
            initial,
            ..EmulatorParams::with_acceleration(5.0)
        };
        Self {
            drive: AntennaDrive::from_config(loaded, clock.clone()),
            mount: EncoderEmulator::with_clock(params, clock.clone()),
            clock,
        }
    }

    /// Read the encoder, tick both axes and command the mount.
    pub fn tick(&mut self, command: AltAz) -> AntennaTick {
        let reading = self.mount.read();
        let tick = self.drive.tick(command, reading, false);
        self.mount.command(self.drive.speed_deg(&tick.az), Axis::Az);
        self.mount.command(self.drive.speed_deg(&tick.el), Axis::El);
        tick
    }

    /// Tick at `command` every `dt` for `duration` seconds.
    pub fn hold(&mut self, command: AltAz, dt: f64, duration: f64) -> Vec<AntennaTick> {
        let end = self.clock.now() + duration;
        let mut ticks = Vec::new();
        while self.clock.now() < end {
            ticks.push(self.tick(command));
            self.clock.advance(dt);
        }
        ticks
    }
}
