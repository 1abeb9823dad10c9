//! Host-side platform services: clock and recording servo driver

use std::time::Instant;

use skylark_core::servo::{ServoDriver, SERVO_COUNT};
use skylark_core::traits::TimeSource;

/// Monotonic host clock backed by `std::time::Instant`
pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimeSource for HostClock {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Servo driver that records every commanded frame
///
/// The latest frame is available immediately; the full history is kept
/// for assertions over whole scenarios.
#[derive(Debug, Default)]
pub struct RecordingServoDriver {
    latest: [u16; SERVO_COUNT],
    history: Vec<[u16; SERVO_COUNT]>,
    writes_in_frame: usize,
}

impl RecordingServoDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent complete frame
    pub fn latest(&self) -> [u16; SERVO_COUNT] {
        self.latest
    }

    /// All completed frames, oldest first
    pub fn history(&self) -> &[[u16; SERVO_COUNT]] {
        &self.history
    }
}

impl ServoDriver for RecordingServoDriver {
    fn set_servo(&mut self, channel: usize, pulse_us: u16) -> Result<(), &'static str> {
        if channel >= SERVO_COUNT {
            return Err("channel out of range");
        }
        self.latest[channel] = pulse_us;
        self.writes_in_frame += 1;
        if self.writes_in_frame == SERVO_COUNT {
            self.history.push(self.latest);
            self.writes_in_frame = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_clock_is_monotonic() {
        let clock = HostClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }

    #[test]
    fn recording_driver_collects_complete_frames() {
        let mut driver = RecordingServoDriver::new();
        for ch in 0..SERVO_COUNT {
            driver.set_servo(ch, 1500 + ch as u16).unwrap();
        }
        assert_eq!(driver.history().len(), 1);
        assert_eq!(driver.latest()[5], 1505);
    }
}
