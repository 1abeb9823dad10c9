//! Attitude-to-actuator converter
//!
//! Takes the desired roll/pitch produced by the stabilized or navigate
//! path, saturates it against the configured authority, runs the per-axis
//! attitude-error controller and converts the radian-domain deflections
//! into mixer offset units. Two control laws exist, selected once at
//! startup:
//!
//! - **Fixed wing**: full PID on attitude error; yaw and throttle are
//!   always flown manually from the sticks.
//! - **Multirotor**: proportional term on attitude error with gyro rate
//!   damping subtracted directly. Error-derivative alone is noisier and
//!   rate sensors are directly available, so the derivative gain scales
//!   the measured rate instead. Yaw gets the same rate damping, scaled by
//!   the heading controller's derivative gain.

use core::f32::consts::FRAC_PI_4;

use pid::Pid;

use crate::control::ControlState;
use crate::mixer::AxisCommands;
use crate::parameters::{ControlLawVariant, ControlParams, PidGains};
use crate::rc::{stick_offset, ChannelRole};
use crate::snapshot::{ChannelSnapshot, SensorSnapshot};

/// Radians of control-surface deflection per mixer offset unit, inverted:
/// +-45 degrees of deflection maps to the +-500 full-scale offset
pub const RAD_TO_SERVO_OFFSET: f32 = 630.0;

/// Deflection bound for the PID outputs, matching the +-45 degree
/// full-scale mapping above
pub const MAX_SURFACE_DEFLECTION_RAD: f32 = FRAC_PI_4;

fn attitude_pid(gains: &PidGains) -> Pid<f32> {
    *Pid::new(0.0, MAX_SURFACE_DEFLECTION_RAD)
        .p(gains.p, MAX_SURFACE_DEFLECTION_RAD)
        .i(gains.i, gains.i_limit)
        .d(gains.d, MAX_SURFACE_DEFLECTION_RAD)
}

/// Per-variant controller state for the converter
///
/// The fixed-wing law owns the external PID primitive's integrator and
/// derivative memory; the multirotor law is stateless between ticks.
enum Law {
    FixedWing {
        pitch_to_elevator: Pid<f32>,
        roll_to_aileron: Pid<f32>,
    },
    Multirotor,
}

/// Desired-attitude to axis-command converter
pub struct AttitudeConverter {
    law: Law,
}

impl AttitudeConverter {
    /// Build the converter for the configured control-law variant
    pub fn new(params: &ControlParams) -> Self {
        let law = match params.variant {
            ControlLawVariant::FixedWing => Law::FixedWing {
                pitch_to_elevator: attitude_pid(&params.pitch_to_elevator),
                roll_to_aileron: attitude_pid(&params.roll_to_aileron),
            },
            ControlLawVariant::Multirotor => Law::Multirotor,
        };
        Self { law }
    }

    /// Convert desired attitude into axis commands
    ///
    /// Saturates `desired_pitch`/`desired_roll` in place first, so the
    /// clamped values are what the next tick's hysteresis sees. Motor is
    /// always the raw throttle stick; yaw is the raw stick too, with rate
    /// damping added in the multirotor law.
    pub fn convert(
        &mut self,
        state: &mut ControlState,
        channels: &ChannelSnapshot,
        sensors: &SensorSnapshot,
        params: &ControlParams,
    ) -> AxisCommands {
        state.desired_pitch = state.desired_pitch.clamp(-params.max_pitch, params.max_pitch);
        state.desired_roll = state.desired_roll.clamp(-params.max_roll, params.max_roll);

        let map = &params.channel_map;
        let neutrals = &params.channel_neutral;
        let motor = stick_offset(channels, map, neutrals, ChannelRole::Motor);
        let mut yaw = stick_offset(channels, map, neutrals, ChannelRole::Yaw);

        let (elevator_rad, aileron_rad) = match &mut self.law {
            Law::FixedWing {
                pitch_to_elevator,
                roll_to_aileron,
            } => {
                pitch_to_elevator.setpoint = state.desired_pitch;
                let elevator = pitch_to_elevator.next_control_output(sensors.pitch).output;
                roll_to_aileron.setpoint = state.desired_roll;
                let aileron = roll_to_aileron.next_control_output(sensors.roll).output;
                (elevator, aileron)
            }
            Law::Multirotor => {
                let elevator = params.pitch_to_elevator.p * (state.desired_pitch - sensors.pitch)
                    - sensors.q * params.pitch_to_elevator.d;
                let aileron = params.roll_to_aileron.p * (state.desired_roll - sensors.roll)
                    - sensors.p * params.roll_to_aileron.d;
                let yaw_damping = sensors.r * params.heading_to_roll.d * RAD_TO_SERVO_OFFSET;
                yaw = yaw.saturating_sub(yaw_damping as i16);
                (elevator, aileron)
            }
        };

        AxisCommands {
            elevator: (elevator_rad * RAD_TO_SERVO_OFFSET) as i16,
            aileron: (aileron_rad * RAD_TO_SERVO_OFFSET) as i16,
            yaw,
            motor,
        }
    }
}
