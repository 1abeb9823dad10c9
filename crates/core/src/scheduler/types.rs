//! Core types for control-tick scheduling and monitoring

/// Control loop rate for the fixed-wing build
pub const CONTROL_RATE_HZ_FIXED_WING: u32 = 100;

/// Control loop rate for the multirotor build
pub const CONTROL_RATE_HZ_MULTIROTOR: u32 = 200;

/// Timing contract for one periodic task
#[derive(Debug, Clone, Copy)]
pub struct TaskMetadata {
    /// Human-readable task name for logging and debugging
    pub name: &'static str,
    /// Target execution rate in Hz
    pub rate_hz: u32,
    /// Execution time budget in microseconds
    ///
    /// Set below the period so scheduler overhead and other tasks fit in
    /// the remainder. An execution above the budget counts as an overrun.
    pub budget_us: u32,
}

impl TaskMetadata {
    /// Task period in microseconds
    #[inline]
    pub const fn period_us(&self) -> u32 {
        1_000_000 / self.rate_hz
    }

    /// Loop time step in seconds
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.rate_hz as f32
    }

    /// Check if an execution time fits the budget
    #[inline]
    pub const fn is_within_budget(&self, execution_us: u32) -> bool {
        execution_us <= self.budget_us
    }
}

/// Runtime statistics for the control tick
///
/// Updated after each execution. The overrun counter is the surfaced
/// signal for a missed deadline; there is no recovery policy, the next
/// tick simply runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickStats {
    /// Last execution time in microseconds
    pub last_execution_us: u32,
    /// Average execution time (exponential moving average, alpha = 1/8)
    pub avg_execution_us: u32,
    /// Maximum execution time observed
    pub max_execution_us: u32,
    /// Executions that exceeded the budget
    pub overruns: u32,
    /// Total number of executions
    pub execution_count: u64,
}

impl TickStats {
    /// Record one execution measurement
    pub fn record(&mut self, execution_us: u32, metadata: &TaskMetadata) {
        self.last_execution_us = execution_us;
        self.max_execution_us = self.max_execution_us.max(execution_us);
        if self.execution_count == 0 {
            self.avg_execution_us = execution_us;
        } else {
            // EMA with alpha = 1/8, integer arithmetic
            self.avg_execution_us = (self.avg_execution_us * 7 + execution_us) / 8;
        }
        if !metadata.is_within_budget(execution_us) {
            self.overruns = self.overruns.saturating_add(1);
        }
        self.execution_count += 1;
    }
}
