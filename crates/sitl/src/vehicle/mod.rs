//! Minimal kinematic airframe model
//!
//! Just enough physics to close the control loop in tests: servo
//! deflections drive attitude rates, bank drives turn rate, pitch drives
//! climb. Assumes the conventional topology's channel assignment
//! (servo 0/1 ailerons, servo 2 elevator, servo 3 motor).

use libm::{sinf, tanf};
use skylark_core::servo::{PULSE_CENTER_US, SERVO_COUNT};

const GRAVITY_MS2: f32 = 9.81;

/// Simulated airframe state
#[derive(Debug, Clone, Copy)]
pub struct Airframe {
    /// Bank angle, radians
    pub roll: f32,
    /// Pitch angle, radians
    pub pitch: f32,
    /// Course, radians, wrapped to [0, 2pi)
    pub heading: f32,
    /// Height above the reference, meters
    pub height: f32,
    /// Airspeed, m/s, held constant by the model
    pub speed: f32,
    /// Body rates observed last step
    pub p: f32,
    pub q: f32,
    pub r: f32,
}

impl Default for Airframe {
    fn default() -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            heading: 0.0,
            height: 100.0,
            speed: 20.0,
            p: 0.0,
            q: 0.0,
            r: 0.0,
        }
    }
}

/// Full-scale servo offset (matches the mixer's nominal axis range)
const FULL_SCALE: f32 = 500.0;

/// Attitude rate at full surface deflection, rad/s
const MAX_ATTITUDE_RATE: f32 = 2.0;

impl Airframe {
    /// Advance the model by `dt` seconds under one servo frame
    pub fn step(&mut self, frame: &[u16; SERVO_COUNT], dt: f32) {
        let aileron = (frame[0] as f32 - PULSE_CENTER_US as f32) / FULL_SCALE;
        let elevator = (frame[2] as f32 - PULSE_CENTER_US as f32) / FULL_SCALE;

        self.p = aileron * MAX_ATTITUDE_RATE;
        self.q = elevator * MAX_ATTITUDE_RATE;
        self.roll += self.p * dt;
        self.pitch += self.q * dt;
        self.roll = self.roll.clamp(-1.2, 1.2);
        self.pitch = self.pitch.clamp(-0.8, 0.8);

        // coordinated turn: heading rate from bank angle
        self.r = GRAVITY_MS2 * tanf(self.roll) / self.speed.max(1.0);
        self.heading = (self.heading + self.r * dt).rem_euclid(core::f32::consts::TAU);

        self.height += self.speed * sinf(self.pitch) * dt;
    }
}
