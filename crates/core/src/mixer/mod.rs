//! Airframe-specific servo mixing
//!
//! Maps the four logical axis commands (aileron, elevator, yaw, motor)
//! onto up to six physical servo channels according to the configured
//! airframe topology, per-servo reversal flags and neutral offsets, then
//! clamps every channel to its configured travel. Mixing is a pure
//! function: out-of-range inputs saturate, they are never rejected.

use crate::servo::{ServoDriver, PULSE_CENTER_US, PULSE_MAX_US, PULSE_MIN_US, SERVO_COUNT};

/// Divisor for roll/pitch/yaw authority in the quad cross-mix
///
/// Each motor receives 1/5 of the axis command on top of the common
/// throttle; full stick therefore shifts a motor by +-100 units.
pub const QUAD_MIX_ATTENUATION: i32 = 5;

/// Airframe topology selecting the mixing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixerKind {
    /// Independent aileron servos, elevator, motor, yaw servo
    #[default]
    Conventional,
    /// Elevon plane, first sign convention
    DeltaPlus,
    /// Elevon plane, opposite elevator sign
    DeltaMinus,
    /// Four motors in X configuration, no reversal flags
    QuadX,
}

/// Per-servo reversal flags
///
/// Indexed by the mixing slot they affect, not by axis. The quad mix
/// ignores them: motor rotation direction is fixed by mounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServoReversal {
    pub aileron_right: bool,
    pub aileron_left: bool,
    pub elevator: bool,
    pub motor: bool,
    pub yaw: bool,
}

/// Mixer configuration: topology, reversal, neutrals and travel limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerConfig {
    pub kind: MixerKind,
    pub reversal: ServoReversal,
    /// Per-servo neutral pulse, the output at zero axis command
    pub servo_neutral: [u16; SERVO_COUNT],
    /// Per-servo lower travel limit
    pub servo_min: [u16; SERVO_COUNT],
    /// Per-servo upper travel limit
    pub servo_max: [u16; SERVO_COUNT],
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            kind: MixerKind::default(),
            reversal: ServoReversal::default(),
            servo_neutral: [PULSE_CENTER_US; SERVO_COUNT],
            servo_min: [PULSE_MIN_US; SERVO_COUNT],
            servo_max: [PULSE_MAX_US; SERVO_COUNT],
        }
    }
}

impl MixerConfig {
    /// True if every travel window is ordered and contains its neutral
    pub fn is_valid(&self) -> bool {
        (0..SERVO_COUNT).all(|i| {
            self.servo_min[i] <= self.servo_neutral[i] && self.servo_neutral[i] <= self.servo_max[i]
        })
    }
}

/// Logical axis commands entering the mixer
///
/// Control axes are offsets around zero (nominal +-500), motor is
/// 0..1000. Recomputed every tick by the active control path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisCommands {
    pub elevator: i16,
    pub aileron: i16,
    pub yaw: i16,
    pub motor: i16,
}

/// One mixed output frame, clamped, ready for the driver
pub type ServoFrame = [u16; SERVO_COUNT];

fn signed(value: i32, reversed: bool) -> i32 {
    if reversed {
        -value
    } else {
        value
    }
}

fn clamp_to_travel(value: i32, min: u16, max: u16) -> u16 {
    value.clamp(min as i32, max as i32) as u16
}

/// Mix axis commands into a clamped servo frame
///
/// Channels the topology does not drive stay at their configured neutral.
/// Aileron is applied symmetrically to both sides; the left/right split
/// exists so a differential could be configured later.
pub fn mix(axes: &AxisCommands, config: &MixerConfig) -> ServoFrame {
    let aileron_right = axes.aileron as i32;
    let aileron_left = axes.aileron as i32;
    let elevator = axes.elevator as i32;
    let yaw = axes.yaw as i32;
    let motor = axes.motor as i32;
    let rev = &config.reversal;

    let mut raw = [0i32; SERVO_COUNT];
    for (slot, &neutral) in raw.iter_mut().zip(config.servo_neutral.iter()) {
        *slot = neutral as i32;
    }

    match config.kind {
        MixerKind::Conventional => {
            raw[0] += signed(aileron_right, rev.aileron_right);
            raw[1] += signed(-aileron_left, rev.aileron_left);
            raw[2] += signed(elevator, rev.elevator);
            raw[3] += signed(motor, rev.motor);
            raw[4] += signed(-yaw, rev.yaw);
        }
        MixerKind::DeltaPlus => {
            raw[0] += signed(-(aileron_right + elevator), rev.aileron_right);
            raw[1] += signed(-aileron_left + elevator, rev.aileron_left);
            raw[3] += signed(motor, rev.motor);
        }
        MixerKind::DeltaMinus => {
            raw[0] += signed(-aileron_right + elevator, rev.aileron_right);
            raw[1] += signed(-(aileron_left + elevator), rev.aileron_left);
            raw[3] += signed(motor, rev.motor);
        }
        MixerKind::QuadX => {
            raw[0] += motor + aileron_right / QUAD_MIX_ATTENUATION + yaw / QUAD_MIX_ATTENUATION;
            raw[1] += motor + elevator / QUAD_MIX_ATTENUATION - yaw / QUAD_MIX_ATTENUATION;
            raw[2] += motor - aileron_left / QUAD_MIX_ATTENUATION + yaw / QUAD_MIX_ATTENUATION;
            raw[3] += motor - elevator / QUAD_MIX_ATTENUATION - yaw / QUAD_MIX_ATTENUATION;
        }
    }

    let mut frame: ServoFrame = [0; SERVO_COUNT];
    for i in 0..SERVO_COUNT {
        frame[i] = clamp_to_travel(raw[i], config.servo_min[i], config.servo_max[i]);
    }
    frame
}

/// Dispatch one frame to the actuator driver, one call per channel
pub fn write_frame(frame: &ServoFrame, driver: &mut dyn ServoDriver) -> Result<(), &'static str> {
    for (channel, &pulse_us) in frame.iter().enumerate() {
        driver.set_servo(channel, pulse_us)?;
    }
    Ok(())
}
