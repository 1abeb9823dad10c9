//! Manual control path
//!
//! Raw passthrough: each axis command is the stick offset from its
//! configured neutral, no clamping, no filtering. The mixer's travel
//! limits are the only saturation between the pilot and the servos.

use crate::mixer::AxisCommands;
use crate::parameters::ControlParams;
use crate::rc::{stick_offset, ChannelRole};
use crate::snapshot::ChannelSnapshot;

/// Axis commands straight from the sticks
pub fn axis_commands(channels: &ChannelSnapshot, params: &ControlParams) -> AxisCommands {
    let map = &params.channel_map;
    let neutrals = &params.channel_neutral;
    AxisCommands {
        elevator: stick_offset(channels, map, neutrals, ChannelRole::Pitch),
        aileron: stick_offset(channels, map, neutrals, ChannelRole::Roll),
        yaw: stick_offset(channels, map, neutrals, ChannelRole::Yaw),
        motor: stick_offset(channels, map, neutrals, ChannelRole::Motor),
    }
}
