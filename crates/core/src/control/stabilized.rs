//! Stabilized control path
//!
//! The sticks command a desired attitude instead of a surface deflection.
//! Roll maps the full stick throw onto the configured roll authority.
//! Pitch follows one of two policies: direct stick pitch, or altitude
//! hold with a stick-override hysteresis, where a non-neutral pitch
//! command defeats the hold rather than fighting it.

use libm::fabsf;

use crate::control::ControlState;
use crate::parameters::ControlParams;
use crate::rc::{stick_offset, ChannelRole};
use crate::snapshot::{ChannelSnapshot, SensorSnapshot};

/// Stick offset corresponding to full attitude authority
pub const STICK_FULL_SCALE: f32 = 500.0;

/// Divisor of the height error feeding desired pitch; acts as the
/// proportional law's time constant in seconds
pub const HEIGHT_TO_PITCH_TIME_CONSTANT: f32 = 20.0;

/// Fraction of max pitch above which the stick is considered active and
/// overrides the altitude hold
pub const STICK_OVERRIDE_FRACTION: f32 = 1.0 / 5.0;

/// Proportional height-error-to-pitch law shared with the navigate path
pub fn height_error_to_pitch(desired_height: f32, current_height: f32, max_pitch: f32) -> f32 {
    (desired_height - current_height) / HEIGHT_TO_PITCH_TIME_CONSTANT * max_pitch
}

fn stick_to_attitude(offset: i16, max_attitude: f32) -> f32 {
    offset as f32 / STICK_FULL_SCALE * max_attitude
}

/// Update desired roll/pitch from the sticks (and optionally the latched
/// altitude baseline)
///
/// The altitude-hold branch inspects the *previous* desired pitch: while
/// its magnitude exceeds `max_pitch * STICK_OVERRIDE_FRACTION` the pilot
/// is actively commanding pitch, so the stick stays authoritative and the
/// height baseline re-latches to wherever the aircraft currently is.
pub fn update_desired(
    state: &mut ControlState,
    channels: &ChannelSnapshot,
    sensors: &SensorSnapshot,
    params: &ControlParams,
    altitude_hold: bool,
) {
    let map = &params.channel_map;
    let neutrals = &params.channel_neutral;

    let roll_stick = stick_offset(channels, map, neutrals, ChannelRole::Roll);
    state.desired_roll = stick_to_attitude(roll_stick, params.max_roll);

    let pitch_stick = stick_offset(channels, map, neutrals, ChannelRole::Pitch);
    if altitude_hold {
        if fabsf(state.desired_pitch) > params.max_pitch * STICK_OVERRIDE_FRACTION {
            state.desired_pitch = stick_to_attitude(pitch_stick, params.max_pitch);
            // keep height for when the stick returns to neutral
            state.desired_height = sensors.pressure_height;
        } else {
            state.desired_pitch = height_error_to_pitch(
                state.desired_height,
                sensors.pressure_height,
                params.max_pitch,
            );
        }
    } else {
        state.desired_pitch = stick_to_attitude(pitch_stick, params.max_pitch);
    }
}
