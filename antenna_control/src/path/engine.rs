//! Coordinate engine boundary.
//!
//! Turning a sky target into apparent AltAz (frame transforms, refraction,
//! pointing model) is delegated to an implementation of
//! [`CoordinateEngine`]. The path generator only requires it to be a pure
//! function of target and time.

use std::fmt;

use thiserror::Error;

/// Celestial coordinate frame of a longitude/latitude pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Horizontal coordinates (azimuth, elevation).
    AltAz,
    Fk5,
    Icrs,
    Galactic,
    /// Engine-specific frame, e.g. a rotated frame around an origin.
    Custom(String),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AltAz => f.write_str("altaz"),
            Self::Fk5 => f.write_str("fk5"),
            Self::Icrs => f.write_str("icrs"),
            Self::Galactic => f.write_str("galactic"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Target descriptor [deg].
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Named body (planet, catalogued source).
    Named(String),
    /// Fixed longitude/latitude in a frame.
    Fixed { lon: f64, lat: f64, frame: Frame },
}

impl Target {
    pub fn fixed(lon: f64, lat: f64, frame: Frame) -> Self {
        Self::Fixed { lon, lat, frame }
    }

    pub fn altaz(az: f64, el: f64) -> Self {
        Self::fixed(az, el, Frame::AltAz)
    }
}

/// Angular offset applied on the sky [deg].
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    pub d_lon: f64,
    pub d_lat: f64,
    pub frame: Frame,
}

/// Apparent horizontal coordinate [deg].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AltAz {
    pub az: f64,
    pub el: f64,
}

impl AltAz {
    pub const fn new(az: f64, el: f64) -> Self {
        Self { az, el }
    }
}

/// Coordinate engine failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    #[error("unsupported frame '{0}'")]
    UnsupportedFrame(Frame),

    #[error("{0}")]
    Failed(String),
}

/// Resolves targets into apparent AltAz.
pub trait CoordinateEngine {
    /// Apparent AltAz of `target` at UNIX time `time`.
    fn resolve(&self, target: &Target, time: f64) -> Result<AltAz, EngineError>;

    /// Longitude/latitude of `target` in `frame` at `time`.
    ///
    /// The default only handles fixed targets already given in `frame`.
    fn realize(
        &self,
        target: &Target,
        frame: &Frame,
        time: f64,
    ) -> Result<(f64, f64), EngineError> {
        let _ = time;
        match target {
            Target::Fixed { lon, lat, frame: own } if own == frame => Ok((*lon, *lat)),
            Target::Fixed { .. } => Err(EngineError::UnsupportedFrame(frame.clone())),
            Target::Named(name) => Err(EngineError::UnknownTarget(name.clone())),
        }
    }
}

impl<E: CoordinateEngine + ?Sized> CoordinateEngine for &E {
    fn resolve(&self, target: &Target, time: f64) -> Result<AltAz, EngineError> {
        (**self).resolve(target, time)
    }

    fn realize(
        &self,
        target: &Target,
        frame: &Frame,
        time: f64,
    ) -> Result<(f64, f64), EngineError> {
        (**self).realize(target, frame, time)
    }
}

/// Engine that understands horizontal coordinates only.
///
/// Fixed AltAz targets resolve to themselves at every time. Useful for
/// antenna tests, the simulator and any site without an astrometry backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalEngine;

impl CoordinateEngine for HorizontalEngine {
    fn resolve(&self, target: &Target, _time: f64) -> Result<AltAz, EngineError> {
        match target {
            Target::Fixed {
                lon,
                lat,
                frame: Frame::AltAz,
            } => Ok(AltAz::new(*lon, *lat)),
            Target::Fixed { frame, .. } => Err(EngineError::UnsupportedFrame(frame.clone())),
            Target::Named(name) => Err(EngineError::UnknownTarget(name.clone())),
        }
    }
}
