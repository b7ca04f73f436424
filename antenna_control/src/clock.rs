//! Time sources for the controllers.
//!
//! Controllers stamp every tick with [`Clock::now`]. Production code uses the
//! wall clock; tests and the simulator drive a [`ManualClock`] so that `dt`
//! is exact and runs are reproducible.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of UNIX timestamps [s].
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Manually advanced clock.
///
/// Clones share the same time, so one handle can be given to every
/// controller of an antenna while the driving loop advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    /// Move the clock forward by `dt` seconds.
    pub fn advance(&self, dt: f64) {
        self.0.set(self.0.get() + dt);
    }

    pub fn set(&self, t: f64) {
        self.0.set(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}
