//! skylark_sitl - Software-in-the-loop harness for the control core
//!
//! Hosts the pieces the embedded build gets from hardware: a monotonic
//! clock, a servo driver that records frames instead of driving PWM, a
//! small kinematic airframe model to close the loop, and a fixed-cadence
//! runner that feeds snapshots into [`skylark_core::control::ControlLoop`].

pub mod error;
pub mod platform;
pub mod runner;
pub mod vehicle;

pub use error::SimError;
pub use platform::{HostClock, RecordingServoDriver};
pub use runner::{LoopRunner, StickScript};
pub use vehicle::Airframe;
