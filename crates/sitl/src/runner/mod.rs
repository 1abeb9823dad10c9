//! Fixed-cadence loop runner
//!
//! Wires the snapshot buffers, the airframe model, the recording driver
//! and the control loop together, stepping simulated time at the loop's
//! own rate. Snapshots are published through
//! [`skylark_core::snapshot::SnapshotBuffer`] exactly as the receiver and
//! fusion tasks would, and read once per tick.

use skylark_core::control::ControlLoop;
use skylark_core::parameters::ControlParams;
use skylark_core::snapshot::{ChannelSnapshot, SensorSnapshot, SnapshotBuffer};
use skylark_core::traits::TimeSource;

use crate::error::SimError;
use crate::platform::{HostClock, RecordingServoDriver};
use crate::vehicle::Airframe;

/// Scripted stick input for a scenario step
#[derive(Debug, Clone, Copy)]
pub struct StickScript {
    pub mode_switch_us: u16,
    pub roll_us: u16,
    pub pitch_us: u16,
    pub yaw_us: u16,
    pub motor_us: u16,
}

impl Default for StickScript {
    fn default() -> Self {
        Self {
            mode_switch_us: 2000, // manual
            roll_us: 1500,
            pitch_us: 1500,
            yaw_us: 1500,
            motor_us: 1500,
        }
    }
}

/// Simulation harness around one [`ControlLoop`]
pub struct LoopRunner {
    control: ControlLoop,
    airframe: Airframe,
    channels: SnapshotBuffer<ChannelSnapshot>,
    sensors: SnapshotBuffer<SensorSnapshot>,
    driver: RecordingServoDriver,
    clock: HostClock,
    /// Navigation target heading handed to the fusion snapshot, radians
    pub desired_heading: f32,
    ticks: u64,
}

impl LoopRunner {
    pub fn new(params: ControlParams) -> Result<Self, SimError> {
        Ok(Self {
            control: ControlLoop::new(params)?,
            airframe: Airframe::default(),
            channels: SnapshotBuffer::new(ChannelSnapshot::default()),
            sensors: SnapshotBuffer::new(SensorSnapshot::default()),
            driver: RecordingServoDriver::new(),
            clock: HostClock::new(),
            desired_heading: 0.0,
            ticks: 0,
        })
    }

    /// Run one simulated tick under the given stick positions
    pub fn step(&mut self, script: &StickScript) -> Result<(), SimError> {
        let params = self.control.params();
        let map = params.channel_map;

        let mut frame = ChannelSnapshot::default();
        frame.channels[map.mode_switch] = script.mode_switch_us;
        frame.channels[map.roll] = script.roll_us;
        frame.channels[map.pitch] = script.pitch_us;
        frame.channels[map.yaw] = script.yaw_us;
        frame.channels[map.motor] = script.motor_us;
        self.channels.publish(frame);

        self.sensors.publish(SensorSnapshot {
            roll: self.airframe.roll,
            pitch: self.airframe.pitch,
            p: self.airframe.p,
            q: self.airframe.q,
            r: self.airframe.r,
            pressure_height: self.airframe.height,
            gps_heading: self.airframe.heading,
            gps_speed: self.airframe.speed,
            desired_heading: self.desired_heading,
        });

        // one read per buffer per tick
        let channels = self.channels.read();
        let sensors = self.sensors.read();

        let started_us = self.clock.now_us();
        let servo_frame = self
            .control
            .tick(&channels, &sensors, &mut self.driver)
            .map_err(SimError::Tick)?;
        let execution_us = self.clock.elapsed_since(started_us) as u32;
        self.control.record_timing(execution_us);

        self.airframe.step(&servo_frame, self.control.dt());
        self.ticks += 1;
        Ok(())
    }

    /// Run `seconds` of simulated time under a constant script
    pub fn run_for(&mut self, seconds: f32, script: &StickScript) -> Result<(), SimError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SimError::Scenario(format!(
                "scenario duration must be a non-negative number of seconds, got {seconds}"
            )));
        }
        let steps = (seconds / self.control.dt()).round() as u64;
        for _ in 0..steps {
            self.step(script)?;
        }
        Ok(())
    }

    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    pub fn airframe(&self) -> &Airframe {
        &self.airframe
    }

    /// Mutable model access for scenario setup (disturbances, initial state)
    pub fn airframe_mut(&mut self) -> &mut Airframe {
        &mut self.airframe
    }

    pub fn driver(&self) -> &RecordingServoDriver {
        &self.driver
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_duration_is_a_scenario_error() {
        let mut runner = LoopRunner::new(ControlParams::default()).unwrap();
        let script = StickScript::default();
        assert!(matches!(
            runner.run_for(-1.0, &script),
            Err(SimError::Scenario(_))
        ));
        assert!(matches!(
            runner.run_for(f32::NAN, &script),
            Err(SimError::Scenario(_))
        ));
        assert_eq!(runner.ticks(), 0);
    }

    #[test]
    fn runner_steps_and_records_frames() {
        let mut runner = LoopRunner::new(ControlParams::default()).unwrap();
        runner.run_for(0.1, &StickScript::default()).unwrap();
        assert_eq!(runner.ticks(), 10);
        assert_eq!(runner.driver().history().len(), 10);
        assert_eq!(runner.control().stats().execution_count, 10);
    }
}
