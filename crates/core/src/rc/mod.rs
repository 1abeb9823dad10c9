//! RC channel role mapping and stick offset math
//!
//! The receiver decoder publishes 8 raw pulse widths per frame; which
//! channel drives which logical axis is a configuration decision. This
//! module holds that mapping plus the per-channel neutral values used to
//! turn a raw pulse into a signed stick offset.

use crate::snapshot::{ChannelSnapshot, RC_CHANNEL_COUNT};

/// Logical role a raw RC channel can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    Pitch,
    Roll,
    Yaw,
    Motor,
    /// Three-position flight mode switch
    ModeSwitch,
}

/// Which raw channel index serves each logical role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    pub pitch: usize,
    pub roll: usize,
    pub yaw: usize,
    pub motor: usize,
    pub mode_switch: usize,
}

impl Default for ChannelMap {
    /// Common AETR transmitter layout with the mode switch on channel 5
    fn default() -> Self {
        Self {
            roll: 0,
            pitch: 1,
            motor: 2,
            yaw: 3,
            mode_switch: 4,
        }
    }
}

impl ChannelMap {
    /// Raw channel index assigned to `role`
    pub fn index_of(&self, role: ChannelRole) -> usize {
        match role {
            ChannelRole::Pitch => self.pitch,
            ChannelRole::Roll => self.roll,
            ChannelRole::Yaw => self.yaw,
            ChannelRole::Motor => self.motor,
            ChannelRole::ModeSwitch => self.mode_switch,
        }
    }

    /// True if every mapped index addresses one of the 8 raw channels
    pub fn is_valid(&self) -> bool {
        [self.pitch, self.roll, self.yaw, self.motor, self.mode_switch]
            .iter()
            .all(|&i| i < RC_CHANNEL_COUNT)
    }
}

/// Per-channel neutral pulse widths
///
/// Captured once by the trim calibrator (or left at center). The offset of
/// a stick from its neutral is the raw control input for every path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelNeutrals {
    pub values: [u16; RC_CHANNEL_COUNT],
}

impl Default for ChannelNeutrals {
    fn default() -> Self {
        Self {
            values: [crate::servo::PULSE_CENTER_US; RC_CHANNEL_COUNT],
        }
    }
}

/// Signed offset of one stick from its configured neutral
///
/// Positive means up-pitch / right-roll / right-yaw / more throttle under
/// the usual transmitter conventions. No clamping is applied here.
pub fn stick_offset(
    channels: &ChannelSnapshot,
    map: &ChannelMap,
    neutrals: &ChannelNeutrals,
    role: ChannelRole,
) -> i16 {
    let idx = map.index_of(role);
    channels.channels[idx] as i16 - neutrals.values[idx] as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_valid() {
        assert!(ChannelMap::default().is_valid());
    }

    #[test]
    fn map_with_out_of_range_index_is_invalid() {
        let map = ChannelMap {
            mode_switch: 8,
            ..ChannelMap::default()
        };
        assert!(!map.is_valid());
    }

    #[test]
    fn stick_offset_is_raw_minus_neutral() {
        let mut snap = ChannelSnapshot::default();
        snap.channels[0] = 1700;
        snap.channels[1] = 1400;
        let map = ChannelMap::default();
        let neutrals = ChannelNeutrals::default();
        assert_eq!(stick_offset(&snap, &map, &neutrals, ChannelRole::Roll), 200);
        assert_eq!(
            stick_offset(&snap, &map, &neutrals, ChannelRole::Pitch),
            -100
        );
    }

    #[test]
    fn stick_offset_respects_captured_neutral() {
        let mut snap = ChannelSnapshot::default();
        snap.channels[3] = 1520;
        let map = ChannelMap::default();
        let mut neutrals = ChannelNeutrals::default();
        neutrals.values[3] = 1520;
        assert_eq!(stick_offset(&snap, &map, &neutrals, ChannelRole::Yaw), 0);
    }
}
