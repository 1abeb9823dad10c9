//! skylark_core - Pure no_std flight-control core
//!
//! This crate converts pilot stick input and fused sensor state into
//! per-servo actuator commands at a fixed control-loop rate, across three
//! pilot-selectable authority levels (manual, stabilized, autopilot) and
//! four airframe geometries (conventional, two elevon sign conventions,
//! X-configuration quadrocopter).
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//! - **Saturate, never reject**: out-of-envelope numeric results are
//!   clamped; a dropped control tick is more dangerous than a saturated one
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`snapshot`]: Per-tick input snapshots and single-writer publishing
//! - [`rc`]: RC channel role mapping and stick offset math
//! - [`mode`]: Flight mode selection from the mode-switch channel
//! - [`control`]: Control-law engine (manual / stabilized / navigate) and
//!   the attitude-to-actuator converter
//! - [`mixer`]: Airframe-specific servo mixing with reversal and travel clamps
//! - [`servo`]: Actuator driver seam and pulse-width constants
//! - [`parameters`]: Parameter store and control-loop configuration
//! - [`scheduler`]: Tick timing metadata and overrun statistics

#![no_std]

pub mod control;
pub mod mixer;
pub mod mode;
pub mod parameters;
pub mod rc;
pub mod scheduler;
pub mod servo;
pub mod snapshot;
pub mod traits;
