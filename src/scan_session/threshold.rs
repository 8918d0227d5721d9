//! FailureMonitor - consecutive decode-miss tracking
//!
//! Only the threshold crossing is reported, so a client searching for a code
//! is not spammed with one warning per empty frame.

/// Default number of consecutive misses before the advisory fires
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 100;

/// Outcome of recording a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissOutcome {
    /// Still below threshold
    Counted(u32),
    /// Threshold reached; counter was reset to 0
    ThresholdReached,
}

/// Edge-triggered consecutive-failure counter
#[derive(Debug, Clone)]
pub struct FailureMonitor {
    threshold: u32,
    consecutive_failures: u32,
}

impl FailureMonitor {
    /// Create a monitor. A threshold of 0 is raised to 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Successful decode
    pub fn record_hit(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Decode miss
    pub fn record_miss(&mut self) -> MissOutcome {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.threshold {
            self.consecutive_failures = 0;
            MissOutcome::ThresholdReached
        } else {
            MissOutcome::Counted(self.consecutive_failures)
        }
    }
}

impl Default for FailureMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD)
    }
}
