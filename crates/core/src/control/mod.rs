//! Control-law engine: per-tick orchestration of the three control paths
//!
//! One [`ControlLoop`] instance is owned by the periodic control task.
//! Every tick it reads the two input snapshots, selects the flight mode,
//! runs exactly one of the three paths and pushes the mixed frame to the
//! actuator driver. The loop performs no allocation and no blocking; all
//! per-tick values are recomputed, the only carried state is
//! [`ControlState`], the converter's PID memory and the previous-mode
//! latch.
//!
//! # Components
//!
//! - [`manual`]: stick passthrough
//! - [`stabilized`]: stick-commanded attitude with optional altitude hold
//! - [`navigate`]: heading/height-error-commanded attitude
//! - [`attitude`]: desired-attitude to axis-command conversion
//! - [`trim`]: one-shot startup trim calibration

pub mod attitude;
pub mod manual;
pub mod navigate;
pub mod stabilized;
pub mod trim;

pub use attitude::{AttitudeConverter, MAX_SURFACE_DEFLECTION_RAD, RAD_TO_SERVO_OFFSET};
pub use trim::calibrate_trim;

use crate::mixer::{self, AxisCommands, ServoFrame};
use crate::mode::{select_mode, FlightMode};
use crate::parameters::{ControlLawVariant, ControlParams, ParameterError};
use crate::scheduler::{
    TaskMetadata, TickStats, CONTROL_RATE_HZ_FIXED_WING, CONTROL_RATE_HZ_MULTIROTOR,
};
use crate::servo::ServoDriver;
use crate::snapshot::{ChannelSnapshot, SensorSnapshot};

/// Mutable working state of the control core
///
/// Created at init, overwritten every tick, alive for the lifetime of
/// the control task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlState {
    pub flight_mode: FlightMode,
    /// Desired roll, radians, clamped to the configured authority
    pub desired_roll: f32,
    /// Desired pitch, radians, clamped to the configured authority
    pub desired_pitch: f32,
    /// Latched altitude-hold baseline, meters
    pub desired_height: f32,
}

/// Execution-time budget for one control tick, microseconds
const TICK_BUDGET_US: u32 = 1_000;

/// The per-tick control engine
pub struct ControlLoop {
    params: ControlParams,
    state: ControlState,
    converter: AttitudeConverter,
    last_mode: FlightMode,
    last_axes: AxisCommands,
    metadata: TaskMetadata,
    stats: TickStats,
}

impl ControlLoop {
    /// Build the loop for a validated configuration
    pub fn new(params: ControlParams) -> Result<Self, ParameterError> {
        params.validate()?;
        let rate_hz = match params.variant {
            ControlLawVariant::FixedWing => CONTROL_RATE_HZ_FIXED_WING,
            ControlLawVariant::Multirotor => CONTROL_RATE_HZ_MULTIROTOR,
        };
        Ok(Self {
            converter: AttitudeConverter::new(&params),
            params,
            state: ControlState::default(),
            last_mode: FlightMode::Manual,
            last_axes: AxisCommands::default(),
            metadata: TaskMetadata {
                name: "control",
                rate_hz,
                budget_us: TICK_BUDGET_US,
            },
            stats: TickStats::default(),
        })
    }

    /// Run one control tick and dispatch the resulting frame
    ///
    /// The caller (the periodic task) reads each snapshot buffer exactly
    /// once and passes the copies in, so the whole tick observes one
    /// consistent input set.
    pub fn tick(
        &mut self,
        channels: &ChannelSnapshot,
        sensors: &SensorSnapshot,
        driver: &mut dyn ServoDriver,
    ) -> Result<ServoFrame, &'static str> {
        let mode_value = channels.channels[self.params.channel_map.mode_switch];
        let mode = select_mode(mode_value);
        self.state.flight_mode = mode;

        // altitude-hold baseline capture on mode entry, same tick
        if mode.uses_altitude_baseline() && self.last_mode != mode {
            self.state.desired_height = sensors.pressure_height;
        }

        let axes = match mode {
            FlightMode::Manual => manual::axis_commands(channels, &self.params),
            FlightMode::Stabilized => {
                stabilized::update_desired(
                    &mut self.state,
                    channels,
                    sensors,
                    &self.params,
                    self.params.altitude_hold,
                );
                self.converter
                    .convert(&mut self.state, channels, sensors, &self.params)
            }
            FlightMode::Autopilot => {
                navigate::update_desired(&mut self.state, sensors, &self.params);
                self.converter
                    .convert(&mut self.state, channels, sensors, &self.params)
            }
        };
        self.last_mode = mode;
        self.last_axes = axes;

        let frame = mixer::mix(&axes, &self.params.mixer);
        mixer::write_frame(&frame, driver)?;
        Ok(frame)
    }

    /// Record one measured tick execution time
    pub fn record_timing(&mut self, execution_us: u32) {
        self.stats.record(execution_us, &self.metadata);
    }

    /// Loop time step in seconds, derived from the variant's rate
    pub fn dt(&self) -> f32 {
        self.metadata.dt()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn params(&self) -> &ControlParams {
        &self.params
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// Axis commands produced by the most recent tick
    pub fn last_axes(&self) -> &AxisCommands {
        &self.last_axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::SERVO_COUNT;

    struct FrameCapture {
        calls: usize,
        frame: [u16; SERVO_COUNT],
    }

    impl FrameCapture {
        fn new() -> Self {
            Self {
                calls: 0,
                frame: [0; SERVO_COUNT],
            }
        }
    }

    impl ServoDriver for FrameCapture {
        fn set_servo(&mut self, channel: usize, pulse_us: u16) -> Result<(), &'static str> {
            self.calls += 1;
            self.frame[channel] = pulse_us;
            Ok(())
        }
    }

    fn mode_channel(params: &ControlParams, value: u16) -> ChannelSnapshot {
        let mut snap = ChannelSnapshot::default();
        snap.channels[params.channel_map.mode_switch] = value;
        snap
    }

    #[test]
    fn invalid_params_are_rejected_at_construction() {
        let mut params = ControlParams::default();
        params.max_roll = -1.0;
        assert!(ControlLoop::new(params).is_err());
    }

    #[test]
    fn variant_selects_loop_rate() {
        let fixed = ControlLoop::new(ControlParams::default()).unwrap();
        assert_eq!(fixed.metadata().rate_hz, CONTROL_RATE_HZ_FIXED_WING);
        let quad = ControlLoop::new(ControlParams {
            variant: ControlLawVariant::Multirotor,
            ..ControlParams::default()
        })
        .unwrap();
        assert_eq!(quad.metadata().rate_hz, CONTROL_RATE_HZ_MULTIROTOR);
        assert!((quad.dt() - 0.005).abs() < 1e-9);
    }

    #[test]
    fn mode_switch_value_drives_flight_mode() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        let sensors = SensorSnapshot::default();
        let mut driver = FrameCapture::new();

        let snap = mode_channel(ctl.params(), 2000);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().flight_mode, FlightMode::Manual);

        let snap = mode_channel(ctl.params(), 1500);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().flight_mode, FlightMode::Stabilized);

        let snap = mode_channel(ctl.params(), 1100);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().flight_mode, FlightMode::Autopilot);
    }

    #[test]
    fn every_tick_commands_all_six_servos() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        let mut driver = FrameCapture::new();
        ctl.tick(
            &ChannelSnapshot::default(),
            &SensorSnapshot::default(),
            &mut driver,
        )
        .unwrap();
        assert_eq!(driver.calls, SERVO_COUNT);
    }

    #[test]
    fn entering_stabilized_latches_current_height() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        let mut driver = FrameCapture::new();
        let mut sensors = SensorSnapshot::default();

        sensors.pressure_height = 77.0;
        let snap = mode_channel(ctl.params(), 2000);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().desired_height, 0.0);

        // transition tick: the latch must happen this tick, at this height
        sensors.pressure_height = 123.0;
        let snap = mode_channel(ctl.params(), 1500);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().desired_height, 123.0);

        // staying in the mode must not re-latch
        sensors.pressure_height = 200.0;
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().desired_height, 123.0);
    }

    #[test]
    fn stabilized_to_autopilot_latches_again() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        let mut driver = FrameCapture::new();
        let mut sensors = SensorSnapshot::default();

        sensors.pressure_height = 50.0;
        let snap = mode_channel(ctl.params(), 1500);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().desired_height, 50.0);

        sensors.pressure_height = 90.0;
        let snap = mode_channel(ctl.params(), 1100);
        ctl.tick(&snap, &sensors, &mut driver).unwrap();
        assert_eq!(ctl.state().desired_height, 90.0);
    }

    #[test]
    fn manual_tick_mixes_sticks_directly() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        let mut driver = FrameCapture::new();
        let mut snap = mode_channel(ctl.params(), 2000);
        snap.channels[ctl.params().channel_map.roll] = 1700;
        ctl.tick(&snap, &SensorSnapshot::default(), &mut driver)
            .unwrap();
        assert_eq!(driver.frame[0], 1700);
        assert_eq!(driver.frame[1], 1300);
    }

    #[test]
    fn frame_stays_within_travel_in_every_mode() {
        let mut params = ControlParams::default();
        params.mixer.servo_min = [1100; SERVO_COUNT];
        params.mixer.servo_max = [1900; SERVO_COUNT];
        let mut ctl = ControlLoop::new(params).unwrap();
        let mut driver = FrameCapture::new();
        let mut sensors = SensorSnapshot::default();
        sensors.pitch = -1.5;
        sensors.roll = 1.5;
        sensors.desired_heading = 3.0;
        sensors.gps_speed = 40.0;
        sensors.pressure_height = -500.0;

        for mode_value in [2000u16, 1500, 1100] {
            let mut snap = mode_channel(ctl.params(), mode_value);
            snap.channels[ctl.params().channel_map.roll] = 2000;
            snap.channels[ctl.params().channel_map.pitch] = 1000;
            let frame = ctl.tick(&snap, &sensors, &mut driver).unwrap();
            for value in frame {
                assert!((1100..=1900).contains(&value));
            }
        }
    }

    #[test]
    fn timing_records_flow_into_stats() {
        let mut ctl = ControlLoop::new(ControlParams::default()).unwrap();
        ctl.record_timing(400);
        ctl.record_timing(1_200);
        assert_eq!(ctl.stats().execution_count, 2);
        assert_eq!(ctl.stats().overruns, 1);
    }
}
