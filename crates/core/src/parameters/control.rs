//! Control-loop parameter definitions
//!
//! Maps every field of [`ControlParams`] to a named parameter store entry
//! so the whole control surface is tunable without recompilation. Names
//! follow ArduPilot conventions where an equivalent exists.
//!
//! # Parameters
//!
//! - `RC_MAP_*` - raw channel index per logical role
//! - `RC_NEUT_n` - per-channel neutral pulse
//! - `CTL_MAN_TRIM` - derive servo neutrals from transmitter trim at init
//! - `CTL_ALT_HOLD` - altitude-hold policy in stabilized mode
//! - `CTL_MAX_ROLL` / `CTL_MAX_PITCH` - attitude authority, radians
//! - `CTL_VARIANT` - control-law variant (0 fixed-wing, 1 multirotor)
//! - `HDG2ROL_*`, `PIT2ELE_*`, `ROL2AIL_*` - per-axis PID gain sets
//! - `MIX_TYPE`, `MIX_REV_*` - airframe topology and reversal flags
//! - `SRVn_NEUT` / `SRVn_MIN` / `SRVn_MAX` - per-servo neutral and travel

use core::fmt::Write;

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore, PARAM_NAME_LEN};
use crate::mixer::{MixerConfig, MixerKind, ServoReversal};
use crate::rc::{ChannelMap, ChannelNeutrals};
use crate::servo::SERVO_COUNT;
use crate::snapshot::RC_CHANNEL_COUNT;

/// Which attitude-to-actuator law the firmware flies with
///
/// Chosen once at startup; both variants are always compiled so they can
/// be unit-tested side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlLawVariant {
    /// Full PID on attitude error; yaw and throttle stay manual
    #[default]
    FixedWing,
    /// P-only attitude error with direct gyro rate damping
    Multirotor,
}

/// One per-axis PID gain set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub p: f32,
    pub i: f32,
    /// Derivative gain; in the multirotor variant this scales the direct
    /// gyro-rate damping term instead of an error derivative
    pub d: f32,
    /// Integral windup bound (absolute)
    pub i_limit: f32,
}

impl PidGains {
    pub const fn p_only(p: f32, d: f32) -> Self {
        Self {
            p,
            i: 0.0,
            d,
            i_limit: 0.0,
        }
    }

    fn is_valid(&self) -> bool {
        let finite =
            self.p.is_finite() && self.i.is_finite() && self.d.is_finite() && self.i_limit.is_finite();
        finite && self.p >= 0.0 && self.i >= 0.0 && self.i_limit >= 0.0
    }
}

// --- Defaults ---

const DEFAULT_MAX_ROLL_RAD: f32 = 0.6;
const DEFAULT_MAX_PITCH_RAD: f32 = 0.4;

const DEFAULT_HEADING_TO_ROLL: PidGains = PidGains::p_only(0.6, 0.1);
const DEFAULT_PITCH_TO_ELEVATOR: PidGains = PidGains {
    p: 0.6,
    i: 0.05,
    d: 0.05,
    i_limit: 0.2,
};
const DEFAULT_ROLL_TO_AILERON: PidGains = PidGains {
    p: 0.6,
    i: 0.05,
    d: 0.05,
    i_limit: 0.2,
};

// --- Ranges ---

const MIN_ATTITUDE_AUTHORITY_RAD: f32 = 0.05;
const MAX_ATTITUDE_AUTHORITY_RAD: f32 = core::f32::consts::FRAC_PI_2;

/// Immutable-in-flight configuration for the whole control core
///
/// Owned by the configuration collaborator, handed to the control loop at
/// startup. The only sanctioned mutation is the one-shot trim calibration
/// before the periodic loop begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParams {
    pub channel_map: ChannelMap,
    pub channel_neutral: ChannelNeutrals,
    /// Capture transmitter trim as servo neutrals at init
    pub manual_trim: bool,
    /// Hold a latched altitude in stabilized mode instead of stick pitch
    pub altitude_hold: bool,
    /// Maximum commanded roll, radians
    pub max_roll: f32,
    /// Maximum commanded pitch, radians
    pub max_pitch: f32,
    pub variant: ControlLawVariant,
    pub heading_to_roll: PidGains,
    pub pitch_to_elevator: PidGains,
    pub roll_to_aileron: PidGains,
    pub mixer: MixerConfig,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            channel_map: ChannelMap::default(),
            channel_neutral: ChannelNeutrals::default(),
            manual_trim: false,
            altitude_hold: false,
            max_roll: DEFAULT_MAX_ROLL_RAD,
            max_pitch: DEFAULT_MAX_PITCH_RAD,
            variant: ControlLawVariant::FixedWing,
            heading_to_roll: DEFAULT_HEADING_TO_ROLL,
            pitch_to_elevator: DEFAULT_PITCH_TO_ELEVATOR,
            roll_to_aileron: DEFAULT_ROLL_TO_AILERON,
            mixer: MixerConfig::default(),
        }
    }
}

impl ControlParams {
    /// Validate ranges and internal consistency
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.channel_map.is_valid() {
            return Err(ParameterError::InvalidConfig);
        }
        for max in [self.max_roll, self.max_pitch] {
            if !(MIN_ATTITUDE_AUTHORITY_RAD..=MAX_ATTITUDE_AUTHORITY_RAD).contains(&max) {
                return Err(ParameterError::InvalidConfig);
            }
        }
        for gains in [
            &self.heading_to_roll,
            &self.pitch_to_elevator,
            &self.roll_to_aileron,
        ] {
            if !gains.is_valid() {
                return Err(ParameterError::InvalidConfig);
            }
        }
        if !self.mixer.is_valid() {
            return Err(ParameterError::InvalidConfig);
        }
        Ok(())
    }

    /// Register every control parameter with its default value
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let d = ControlParams::default();

        store.register(
            "RC_MAP_ROLL",
            ParamValue::Int(d.channel_map.roll as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "RC_MAP_PITCH",
            ParamValue::Int(d.channel_map.pitch as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "RC_MAP_YAW",
            ParamValue::Int(d.channel_map.yaw as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "RC_MAP_MOTOR",
            ParamValue::Int(d.channel_map.motor as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "RC_MAP_MODE",
            ParamValue::Int(d.channel_map.mode_switch as i32),
            ParamFlags::empty(),
        )?;

        for (i, &neutral) in d.channel_neutral.values.iter().enumerate() {
            store.register(
                &indexed_name("RC_NEUT_", i)?,
                ParamValue::Int(neutral as i32),
                ParamFlags::empty(),
            )?;
        }

        store.register(
            "CTL_MAN_TRIM",
            ParamValue::Bool(d.manual_trim),
            ParamFlags::empty(),
        )?;
        store.register(
            "CTL_ALT_HOLD",
            ParamValue::Bool(d.altitude_hold),
            ParamFlags::empty(),
        )?;
        store.register(
            "CTL_MAX_ROLL",
            ParamValue::Float(d.max_roll),
            ParamFlags::empty(),
        )?;
        store.register(
            "CTL_MAX_PITCH",
            ParamValue::Float(d.max_pitch),
            ParamFlags::empty(),
        )?;
        store.register("CTL_VARIANT", ParamValue::Int(0), ParamFlags::READ_ONLY)?;

        register_gains(store, "HDG2ROL", &d.heading_to_roll)?;
        register_gains(store, "PIT2ELE", &d.pitch_to_elevator)?;
        register_gains(store, "ROL2AIL", &d.roll_to_aileron)?;

        store.register("MIX_TYPE", ParamValue::Int(0), ParamFlags::empty())?;
        store.register(
            "MIX_REV_AIL_R",
            ParamValue::Bool(false),
            ParamFlags::empty(),
        )?;
        store.register(
            "MIX_REV_AIL_L",
            ParamValue::Bool(false),
            ParamFlags::empty(),
        )?;
        store.register("MIX_REV_ELE", ParamValue::Bool(false), ParamFlags::empty())?;
        store.register("MIX_REV_MOT", ParamValue::Bool(false), ParamFlags::empty())?;
        store.register("MIX_REV_YAW", ParamValue::Bool(false), ParamFlags::empty())?;

        for i in 0..SERVO_COUNT {
            store.register(
                &servo_name("SRV", i, "_NEUT")?,
                ParamValue::Int(d.mixer.servo_neutral[i] as i32),
                ParamFlags::empty(),
            )?;
            store.register(
                &servo_name("SRV", i, "_MIN")?,
                ParamValue::Int(d.mixer.servo_min[i] as i32),
                ParamFlags::empty(),
            )?;
            store.register(
                &servo_name("SRV", i, "_MAX")?,
                ParamValue::Int(d.mixer.servo_max[i] as i32),
                ParamFlags::empty(),
            )?;
        }
        Ok(())
    }

    /// Build a validated `ControlParams` from the store
    pub fn load_from_store(store: &ParameterStore) -> Result<Self, ParameterError> {
        let mut params = ControlParams {
            channel_map: ChannelMap {
                roll: get_index(store, "RC_MAP_ROLL", RC_CHANNEL_COUNT)?,
                pitch: get_index(store, "RC_MAP_PITCH", RC_CHANNEL_COUNT)?,
                yaw: get_index(store, "RC_MAP_YAW", RC_CHANNEL_COUNT)?,
                motor: get_index(store, "RC_MAP_MOTOR", RC_CHANNEL_COUNT)?,
                mode_switch: get_index(store, "RC_MAP_MODE", RC_CHANNEL_COUNT)?,
            },
            channel_neutral: ChannelNeutrals::default(),
            manual_trim: get_bool(store, "CTL_MAN_TRIM")?,
            altitude_hold: get_bool(store, "CTL_ALT_HOLD")?,
            max_roll: get_float(store, "CTL_MAX_ROLL")?,
            max_pitch: get_float(store, "CTL_MAX_PITCH")?,
            variant: match get_int(store, "CTL_VARIANT")? {
                0 => ControlLawVariant::FixedWing,
                1 => ControlLawVariant::Multirotor,
                _ => return Err(ParameterError::InvalidConfig),
            },
            heading_to_roll: load_gains(store, "HDG2ROL")?,
            pitch_to_elevator: load_gains(store, "PIT2ELE")?,
            roll_to_aileron: load_gains(store, "ROL2AIL")?,
            mixer: MixerConfig {
                kind: match get_int(store, "MIX_TYPE")? {
                    0 => MixerKind::Conventional,
                    1 => MixerKind::DeltaPlus,
                    2 => MixerKind::DeltaMinus,
                    3 => MixerKind::QuadX,
                    _ => return Err(ParameterError::InvalidConfig),
                },
                reversal: ServoReversal {
                    aileron_right: get_bool(store, "MIX_REV_AIL_R")?,
                    aileron_left: get_bool(store, "MIX_REV_AIL_L")?,
                    elevator: get_bool(store, "MIX_REV_ELE")?,
                    motor: get_bool(store, "MIX_REV_MOT")?,
                    yaw: get_bool(store, "MIX_REV_YAW")?,
                },
                servo_neutral: [0; SERVO_COUNT],
                servo_min: [0; SERVO_COUNT],
                servo_max: [0; SERVO_COUNT],
            },
        };

        for i in 0..RC_CHANNEL_COUNT {
            params.channel_neutral.values[i] = get_pulse(store, &indexed_name("RC_NEUT_", i)?)?;
        }
        for i in 0..SERVO_COUNT {
            params.mixer.servo_neutral[i] = get_pulse(store, &servo_name("SRV", i, "_NEUT")?)?;
            params.mixer.servo_min[i] = get_pulse(store, &servo_name("SRV", i, "_MIN")?)?;
            params.mixer.servo_max[i] = get_pulse(store, &servo_name("SRV", i, "_MAX")?)?;
        }

        params.validate()?;
        Ok(params)
    }
}

type Name = heapless::String<PARAM_NAME_LEN>;

fn indexed_name(prefix: &str, index: usize) -> Result<Name, ParameterError> {
    let mut name = Name::new();
    write!(name, "{prefix}{index}").map_err(|_| ParameterError::InvalidConfig)?;
    Ok(name)
}

fn servo_name(prefix: &str, index: usize, suffix: &str) -> Result<Name, ParameterError> {
    let mut name = Name::new();
    write!(name, "{prefix}{index}{suffix}").map_err(|_| ParameterError::InvalidConfig)?;
    Ok(name)
}

fn register_gains(
    store: &mut ParameterStore,
    prefix: &str,
    gains: &PidGains,
) -> Result<(), ParameterError> {
    store.register(
        &concat_name(prefix, "_P")?,
        ParamValue::Float(gains.p),
        ParamFlags::empty(),
    )?;
    store.register(
        &concat_name(prefix, "_I")?,
        ParamValue::Float(gains.i),
        ParamFlags::empty(),
    )?;
    store.register(
        &concat_name(prefix, "_D")?,
        ParamValue::Float(gains.d),
        ParamFlags::empty(),
    )?;
    store.register(
        &concat_name(prefix, "_IMAX")?,
        ParamValue::Float(gains.i_limit),
        ParamFlags::empty(),
    )?;
    Ok(())
}

fn load_gains(store: &ParameterStore, prefix: &str) -> Result<PidGains, ParameterError> {
    Ok(PidGains {
        p: get_float(store, &concat_name(prefix, "_P")?)?,
        i: get_float(store, &concat_name(prefix, "_I")?)?,
        d: get_float(store, &concat_name(prefix, "_D")?)?,
        i_limit: get_float(store, &concat_name(prefix, "_IMAX")?)?,
    })
}

fn concat_name(prefix: &str, suffix: &str) -> Result<Name, ParameterError> {
    let mut name = Name::new();
    write!(name, "{prefix}{suffix}").map_err(|_| ParameterError::InvalidConfig)?;
    Ok(name)
}

fn get_bool(store: &ParameterStore, name: &str) -> Result<bool, ParameterError> {
    store
        .get(name)
        .ok_or(ParameterError::InvalidConfig)?
        .as_bool()
}

fn get_int(store: &ParameterStore, name: &str) -> Result<i32, ParameterError> {
    store
        .get(name)
        .ok_or(ParameterError::InvalidConfig)?
        .as_int()
}

fn get_float(store: &ParameterStore, name: &str) -> Result<f32, ParameterError> {
    store
        .get(name)
        .ok_or(ParameterError::InvalidConfig)?
        .as_float()
}

fn get_index(store: &ParameterStore, name: &str, bound: usize) -> Result<usize, ParameterError> {
    let raw = get_int(store, name)?;
    if raw < 0 || raw as usize >= bound {
        return Err(ParameterError::InvalidConfig);
    }
    Ok(raw as usize)
}

fn get_pulse(store: &ParameterStore, name: &str) -> Result<u16, ParameterError> {
    let raw = get_int(store, name)?;
    u16::try_from(raw).map_err(|_| ParameterError::InvalidConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ControlParams::default().validate().is_ok());
    }

    #[test]
    fn zero_authority_is_rejected() {
        let mut params = ControlParams::default();
        params.max_pitch = 0.0;
        assert_eq!(params.validate(), Err(ParameterError::InvalidConfig));
    }

    #[test]
    fn negative_gain_is_rejected() {
        let mut params = ControlParams::default();
        params.roll_to_aileron.p = -1.0;
        assert_eq!(params.validate(), Err(ParameterError::InvalidConfig));
    }

    #[test]
    fn register_then_load_round_trips_defaults() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();
        let loaded = ControlParams::load_from_store(&store).unwrap();
        assert_eq!(loaded, ControlParams::default());
    }

    #[test]
    fn store_override_reaches_loaded_params() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();
        store.set("MIX_TYPE", ParamValue::Int(3)).unwrap();
        store.set("CTL_MAX_ROLL", ParamValue::Float(0.8)).unwrap();
        store.set("MIX_REV_ELE", ParamValue::Bool(true)).unwrap();
        let loaded = ControlParams::load_from_store(&store).unwrap();
        assert_eq!(loaded.mixer.kind, MixerKind::QuadX);
        assert_eq!(loaded.max_roll, 0.8);
        assert!(loaded.mixer.reversal.elevator);
    }

    #[test]
    fn variant_is_read_only() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();
        assert_eq!(
            store.set("CTL_VARIANT", ParamValue::Int(1)),
            Err(ParameterError::ReadOnly)
        );
    }

    #[test]
    fn bad_mix_type_fails_load() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();
        store.set("MIX_TYPE", ParamValue::Int(9)).unwrap();
        assert_eq!(
            ControlParams::load_from_store(&store),
            Err(ParameterError::InvalidConfig)
        );
    }

    #[test]
    fn bad_channel_index_fails_load() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();
        store.set("RC_MAP_MODE", ParamValue::Int(12)).unwrap();
        assert_eq!(
            ControlParams::load_from_store(&store),
            Err(ParameterError::InvalidConfig)
        );
    }
}
