//! Platform-agnostic trait abstractions
//!
//! - [`time`]: `TimeSource` for timestamping tick execution on platforms
//!   that have a clock, with a controllable `MockTime` for tests

pub mod time;

pub use time::{MockTime, TimeSource};
