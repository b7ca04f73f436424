//! Per-tick status flags reported alongside each drive command.
//!
//! None of these are faults by themselves: "no safe target" and boundary
//! capping are expected outcomes that degrade the command to hold/zero.
//! The caller decides what to report.

use bitflags::bitflags;

bitflags! {
    /// Outcome flags of one axis control tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TickStatus: u8 {
        /// Caller requested an immediate stop.
        const STOP_REQUESTED   = 0x01;
        /// Target could not be placed inside the drive range; holding.
        const NO_SAFE_TARGET   = 0x02;
        /// Optimized target lies between the preferred and the hard limit.
        const UNPREFERRED      = 0x04;
        /// Encoder reading is outside the hard limit; speed forced to zero.
        const OUTSIDE_LIMIT    = 0x08;
        /// Speed reduced by the boundary stopping-distance cap.
        const BOUNDARY_CAPPED  = 0x10;
        /// Controller history was reset this tick (first call or command jump).
        const CONTROLLER_RESET = 0x20;
    }
}

impl TickStatus {
    /// Flags meaning the axis is not following its target this tick.
    pub const HOLD_MASK: Self = Self::from_bits_truncate(
        Self::STOP_REQUESTED.bits() | Self::NO_SAFE_TARGET.bits() | Self::OUTSIDE_LIMIT.bits(),
    );

    /// Returns true if the axis is holding instead of tracking.
    #[inline]
    pub const fn is_holding(&self) -> bool {
        self.intersects(Self::HOLD_MASK)
    }
}

impl Default for TickStatus {
    fn default() -> Self {
        Self::empty()
    }
}
