//! Parameter store and control-loop configuration
//!
//! # Components
//!
//! - [`storage`]: key-value [`ParameterStore`] with flags and dirty tracking
//! - [`control`]: [`ControlParams`] definitions, defaults and validation
//! - [`error`]: [`ParameterError`]
//!
//! Flash persistence and ground-station parameter transfer stay outside
//! the core; collaborators read the dirty flag and the name iterator.

pub mod control;
pub mod error;
pub mod storage;

pub use control::{ControlLawVariant, ControlParams, PidGains};
pub use error::ParameterError;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
