//! Actuator driver seam and pulse-width constants
//!
//! The core never talks to PWM hardware. It hands each mixed, clamped
//! servo command to a [`ServoDriver`] implementation by physical channel
//! index; the driver converts the microsecond value into a pulse.
//!
//! ## Safety
//!
//! Implementations must latch a safe output (motor channel at idle) when
//! the vehicle is disarmed. That enforcement belongs to the platform
//! layer, not to the mixer.

/// Number of physical output channels driven every tick
pub const SERVO_COUNT: usize = 6;

/// Shortest pulse a servo accepts
pub const PULSE_MIN_US: u16 = 1000;

/// Centered / neutral pulse
pub const PULSE_CENTER_US: u16 = 1500;

/// Longest pulse a servo accepts
pub const PULSE_MAX_US: u16 = 2000;

/// Physical actuator output interface
///
/// One call per channel per tick, always [`SERVO_COUNT`] calls regardless
/// of airframe topology; channels a topology does not mix receive their
/// configured neutral.
pub trait ServoDriver {
    /// Command one output channel to the given pulse width
    ///
    /// `channel` is the physical index (0-5). Values are already clamped
    /// to the configured travel, but drivers may apply their own hardware
    /// bound as a final guard.
    fn set_servo(&mut self, channel: usize, pulse_us: u16) -> Result<(), &'static str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingDriver {
        calls: usize,
        last: [u16; SERVO_COUNT],
    }

    impl ServoDriver for CountingDriver {
        fn set_servo(&mut self, channel: usize, pulse_us: u16) -> Result<(), &'static str> {
            if channel >= SERVO_COUNT {
                return Err("channel out of range");
            }
            self.calls += 1;
            self.last[channel] = pulse_us;
            Ok(())
        }
    }

    #[test]
    fn driver_receives_per_channel_values() {
        let mut drv = CountingDriver {
            calls: 0,
            last: [0; SERVO_COUNT],
        };
        for ch in 0..SERVO_COUNT {
            drv.set_servo(ch, 1500 + ch as u16).unwrap();
        }
        assert_eq!(drv.calls, SERVO_COUNT);
        assert_eq!(drv.last[5], 1505);
    }

    #[test]
    fn driver_rejects_out_of_range_channel() {
        let mut drv = CountingDriver {
            calls: 0,
            last: [0; SERVO_COUNT],
        };
        assert!(drv.set_servo(6, 1500).is_err());
    }
}
