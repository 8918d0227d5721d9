//! ScanSession types

use super::threshold::DEFAULT_FAILURE_THRESHOLD;
use crate::error::FrameErrorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Sent once per `failure_threshold` consecutive misses
pub const ADVISORY_MESSAGE: &str = "Unable to detect a code after repeated attempts.";

/// Sent right before a session is terminated by a frame error
pub const PROCESSING_ERROR_MESSAGE: &str = "Error while processing the image.";

/// Per-session policy
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Consecutive decode misses that trigger the advisory
    pub failure_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

/// Outbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Decoded payload, sent verbatim
    Payload(String),
    /// Sustained decode failure
    Advisory,
    /// Fatal frame error notice
    ProcessingError,
}

impl Outbound {
    pub fn into_text(self) -> String {
        match self {
            Outbound::Payload(payload) => payload,
            Outbound::Advisory => ADVISORY_MESSAGE.to_string(),
            Outbound::ProcessingError => PROCESSING_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Why a session terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "error", rename_all = "snake_case")]
pub enum SessionEnd {
    /// Client sent a close frame or the stream ended
    ClientClosed,
    /// Receive or send failed at the transport level
    TransportLost,
    /// Frame could not be processed; one notice was sent
    Fatal(FrameErrorKind),
}

impl SessionEnd {
    pub fn is_clean(&self) -> bool {
        matches!(self, SessionEnd::ClientClosed)
    }
}

/// Final state of a session, flushed to the operational log
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub frames_processed: u64,
    pub advisories_sent: u64,
    pub consecutive_failures: u32,
    pub result_log: Vec<String>,
    pub end: SessionEnd,
}

impl SessionSummary {
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_text() {
        assert_eq!(Outbound::Payload("ABC123".into()).into_text(), "ABC123");
        assert_eq!(Outbound::Advisory.into_text(), ADVISORY_MESSAGE);
        assert_eq!(Outbound::ProcessingError.into_text(), PROCESSING_ERROR_MESSAGE);
    }

    #[test]
    fn test_session_end_serialization() {
        let json = serde_json::to_value(SessionEnd::Fatal(FrameErrorKind::Envelope)).unwrap();
        assert_eq!(json["reason"], "fatal");
        assert_eq!(json["error"], "envelope");

        let json = serde_json::to_value(SessionEnd::ClientClosed).unwrap();
        assert_eq!(json["reason"], "client_closed");
    }
}
