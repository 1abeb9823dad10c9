//! Init/trim calibrator
//!
//! One-shot startup routine, run before the periodic loop begins. With
//! manual trim enabled, whatever static trim the pilot has dialed into
//! the transmitter is baked into the servo neutrals: current stick
//! positions become the channel neutrals, and mixing their offset from
//! pulse center once yields the per-servo neutral position.
//!
//! Operational precondition, documented not enforced: the sticks must not
//! be touched while this runs.

use crate::mixer::{mix, AxisCommands};
use crate::parameters::ControlParams;
use crate::rc::ChannelRole;
use crate::servo::{PULSE_CENTER_US, SERVO_COUNT};
use crate::snapshot::ChannelSnapshot;

/// Derive servo neutrals from the transmitter's resting trim
///
/// No-op unless `manual_trim` is configured. Mutates only
/// `channel_neutral` and `mixer.servo_neutral`; this is the single
/// sanctioned configuration mutation before the loop starts.
pub fn calibrate_trim(params: &mut ControlParams, channels: &ChannelSnapshot) {
    if !params.manual_trim {
        return;
    }

    params.mixer.servo_neutral = [PULSE_CENTER_US; SERVO_COUNT];
    params.channel_neutral.values = channels.channels;

    // Trim offsets relative to pulse center; mixing them around centered
    // servos produces each servo's trimmed neutral.
    let offset = |role: ChannelRole| {
        let idx = params.channel_map.index_of(role);
        params.channel_neutral.values[idx] as i16 - PULSE_CENTER_US as i16
    };
    let axes = AxisCommands {
        elevator: offset(ChannelRole::Pitch),
        aileron: offset(ChannelRole::Roll),
        yaw: offset(ChannelRole::Yaw),
        motor: offset(ChannelRole::Motor),
    };

    params.mixer.servo_neutral = mix(&axes, &params.mixer);
}
