//! Antenna drive and encoder emulator.
//!
//! Each axis accelerates toward its commanded speed at the constant rate
//! `torque / moment_of_inertia`, and the encoder quantises the resulting
//! position. The azimuth moment of inertia depends on elevation, so the
//! two axes are stepped together. Defaults approximate NANTEN2.
//!
//! All angles are degrees.

use crate::clock::{Clock, SystemClock};
use crate::cycle::Axis;
use crate::path::engine::AltAz;

/// Encoder step of a 23600-line, 400× interpolated ring [deg].
const NANTEN2_RESOLUTION: f64 = 360.0 / (23_600.0 * 400.0);

/// Used instead of a zero moment of inertia [kg m²].
const MIN_INERTIA: f64 = 1e-8;

// ─── Parameters ─────────────────────────────────────────────────────

/// Mechanical parameters of the emulated mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmulatorParams {
    /// Azimuth moment of inertia: `base + cos_el · cos(el)` [kg m²].
    pub az_inertia_base: f64,
    pub az_inertia_cos_el: f64,
    /// Elevation moment of inertia [kg m²].
    pub el_inertia: f64,
    /// Maximum motor torque [N m].
    pub az_torque: f64,
    pub el_torque: f64,
    /// Encoder resolution [deg]; zero disables quantisation.
    pub resolution: f64,
    /// Start position.
    pub initial: AltAz,
}

impl Default for EmulatorParams {
    fn default() -> Self {
        Self {
            az_inertia_base: 2500.0,
            az_inertia_cos_el: 3000.0,
            el_inertia: 3000.0,
            az_torque: 11.5,
            el_torque: 11.5,
            resolution: NANTEN2_RESOLUTION,
            initial: AltAz::new(180.0, 45.0),
        }
    }
}

impl EmulatorParams {
    /// Mount with the given angular acceleration on both axes [deg/s²].
    pub fn with_acceleration(acceleration: f64) -> Self {
        Self {
            az_inertia_base: 1.0,
            az_inertia_cos_el: 0.0,
            el_inertia: 1.0,
            az_torque: acceleration.to_radians(),
            el_torque: acceleration.to_radians(),
            ..Self::default()
        }
    }

    /// Magnitude of the angular acceleration at elevation `el` [deg/s²].
    pub fn acceleration(&self, el: f64) -> AltAz {
        let az_inertia = self.az_inertia_base + self.az_inertia_cos_el * el.to_radians().cos();
        AltAz::new(
            (self.az_torque / az_inertia.max(MIN_INERTIA)).to_degrees(),
            (self.el_torque / self.el_inertia.max(MIN_INERTIA)).to_degrees(),
        )
    }
}

// ─── Emulator ───────────────────────────────────────────────────────

/// Emulated two-axis mount.
#[derive(Debug, Clone)]
pub struct EncoderEmulator<C: Clock = SystemClock> {
    params: EmulatorParams,
    clock: C,
    last_read: f64,
    position: AltAz,
    speed: AltAz,
    cmd_speed: AltAz,
}

impl EncoderEmulator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(EmulatorParams::default(), SystemClock)
    }
}

impl Default for EncoderEmulator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EncoderEmulator<C> {
    pub fn with_clock(params: EmulatorParams, clock: C) -> Self {
        let last_read = clock.now();
        Self {
            params,
            clock,
            last_read,
            position: params.initial,
            speed: AltAz::default(),
            cmd_speed: AltAz::default(),
        }
    }

    /// Set the speed the drive should reach [deg/s].
    pub fn command(&mut self, speed: f64, axis: Axis) {
        match axis {
            Axis::Az => self.cmd_speed.az = speed,
            Axis::El => self.cmd_speed.el = speed,
        }
    }

    /// Encoder reading, after advancing the mount to the clock's time.
    pub fn read(&mut self) -> AltAz {
        let now = self.clock.now();
        let dt = now - self.last_read;
        self.last_read = now;
        self.step(dt);
        AltAz::new(self.quantise(self.position.az), self.quantise(self.position.el))
    }

    /// Advance the mount by `dt` seconds without touching the clock.
    pub fn step(&mut self, dt: f64) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }
        let accel = self.params.acceleration(self.position.el);
        let (az, az_speed) = advance(
            self.position.az,
            self.speed.az,
            self.cmd_speed.az,
            accel.az,
            dt,
        );
        let (el, el_speed) = advance(
            self.position.el,
            self.speed.el,
            self.cmd_speed.el,
            accel.el,
            dt,
        );
        self.position = AltAz::new(az, el);
        self.speed = AltAz::new(az_speed, el_speed);
    }

    /// True (unquantised) position.
    pub fn position(&self) -> AltAz {
        self.position
    }

    pub fn speed(&self) -> AltAz {
        self.speed
    }

    pub fn params(&self) -> &EmulatorParams {
        &self.params
    }

    fn quantise(&self, value: f64) -> f64 {
        let step = self.params.resolution;
        if step > 0.0 {
            (value / step).round() * step
        } else {
            value
        }
    }
}

/// Constant acceleration toward `target_speed`, then constant speed.
fn advance(position: f64, speed: f64, target_speed: f64, accel: f64, dt: f64) -> (f64, f64) {
    let dv = target_speed - speed;
    let t_acc = if accel > 0.0 {
        (dv.abs() / accel).min(dt)
    } else {
        0.0
    };
    let a = accel * dv.signum();
    let reached = speed + a * t_acc;
    let distance = speed * t_acc + 0.5 * a * t_acc * t_acc + reached * (dt - t_acc);
    (position + distance, reached)
}
