//! Time abstraction for platform-agnostic timing operations
//!
//! The control core never waits on time; it only timestamps tick
//! execution for the overrun statistics. The trait abstracts over the
//! platform clock (an async-runtime instant source in firmware, an
//! `Instant` wrapper on hosts) and a controllable mock for tests.

use core::cell::Cell;

/// Platform-agnostic monotonic time source
pub trait TimeSource {
    /// Current time in microseconds since system start
    fn now_us(&self) -> u64;

    /// Current time in milliseconds since system start
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Elapsed microseconds since a reference point, saturating
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Mock time source with controllable advancement
///
/// Single-threaded test use only.
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Create a `MockTime` starting at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time to an absolute value
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advance the current time
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
