//! Flight mode selection from the mode-switch channel
//!
//! A three-position transmitter switch selects the authority level. Two
//! fixed pulse-width thresholds split the channel range into autopilot,
//! stabilized and manual bands. Selection itself is a pure function;
//! transition side effects (the altitude-hold baseline latch) are applied
//! by the control loop, which holds the previous-mode memory.

/// Pulse widths below this select [`FlightMode::Autopilot`]
pub const AUTOPILOT_THRESHOLD_US: u16 = 1333;

/// Pulse widths below this (and at or above the autopilot threshold)
/// select [`FlightMode::Stabilized`]
pub const STABILIZED_THRESHOLD_US: u16 = 1666;

/// Pilot-selectable authority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightMode {
    /// Sticks drive the mixer directly, no feedback
    #[default]
    Manual,
    /// Sticks command a desired attitude, PID holds it
    Stabilized,
    /// Desired attitude comes from navigation error
    Autopilot,
}

/// Map the mode-switch channel value to a flight mode
pub fn select_mode(mode_channel_us: u16) -> FlightMode {
    if mode_channel_us < AUTOPILOT_THRESHOLD_US {
        FlightMode::Autopilot
    } else if mode_channel_us < STABILIZED_THRESHOLD_US {
        FlightMode::Stabilized
    } else {
        FlightMode::Manual
    }
}

impl FlightMode {
    /// True for the modes that hold a latched target altitude
    pub fn uses_altitude_baseline(&self) -> bool {
        matches!(self, FlightMode::Stabilized | FlightMode::Autopilot)
    }
}
