//! Tick timing metadata and overrun statistics
//!
//! Scheduling itself lives outside the core: a periodic task wakes the
//! control loop at a fixed absolute-time cadence. What the core provides
//! is the timing contract ([`TaskMetadata`]) and the observability for
//! the one failure a control law cannot absorb silently, the tick that
//! does not finish before its next wake ([`TickStats`]).

pub mod types;

pub use types::{TaskMetadata, TickStats, CONTROL_RATE_HZ_FIXED_WING, CONTROL_RATE_HZ_MULTIROTOR};
