//! ScanSession - per-connection state
//!
//! Owned by exactly one `SessionRunner`; nothing here is shared between
//! connections.

use super::threshold::{FailureMonitor, MissOutcome};
use super::types::{Outbound, SessionConfig, SessionEnd, SessionSummary};
use crate::frame_decoder::DecodeResult;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Mutable state of one connection
#[derive(Debug, Clone)]
pub struct ScanSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    monitor: FailureMonitor,
    /// Decoded payloads in detection order
    result_log: Vec<String>,
    frames_processed: u64,
    advisories_sent: u64,
}

impl ScanSession {
    /// Create new session
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            monitor: FailureMonitor::new(config.failure_threshold),
            result_log: Vec::new(),
            frames_processed: 0,
            advisories_sent: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.monitor.consecutive_failures()
    }

    pub fn threshold(&self) -> u32 {
        self.monitor.threshold()
    }

    pub fn result_log(&self) -> &[String] {
        &self.result_log
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Apply one decode result, returning the message to send (if any)
    pub fn apply(&mut self, result: DecodeResult) -> Option<Outbound> {
        self.frames_processed += 1;

        match result {
            DecodeResult::Found(payload) => {
                tracing::info!(session_id = %self.id, code = %payload, "Code detected");
                self.monitor.record_hit();
                self.result_log.push(payload.clone());
                Some(Outbound::Payload(payload))
            }
            DecodeResult::NotFound => match self.monitor.record_miss() {
                MissOutcome::Counted(count) => {
                    tracing::debug!(
                        session_id = %self.id,
                        consecutive_failures = count,
                        "No code detected"
                    );
                    None
                }
                MissOutcome::ThresholdReached => {
                    self.advisories_sent += 1;
                    tracing::warn!(
                        session_id = %self.id,
                        threshold = self.monitor.threshold(),
                        "Failure threshold reached, sending advisory"
                    );
                    Some(Outbound::Advisory)
                }
            },
        }
    }

    /// Consume the session into its final summary
    pub fn finish(self, end: SessionEnd) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            started_at: self.started_at,
            ended_at: Utc::now(),
            frames_processed: self.frames_processed,
            advisories_sent: self.advisories_sent,
            consecutive_failures: self.monitor.consecutive_failures(),
            result_log: self.result_log,
            end,
        }
    }
}
