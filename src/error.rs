//! Error handling for codescan-server
//!
//! Two layers:
//!
//! - `Error`: process-level failures (configuration, socket binding)
//! - `FrameError`: per-frame failures inside a scan session. Every variant is
//!   session-fatal; a decode miss is not an error and never appears here.

use serde::Serialize;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while turning one inbound frame into a decode result
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Text frame carried no payload
    #[error("Empty frame")]
    EmptyFrame,

    /// Transport envelope is not valid base64
    #[error("Envelope error: {0}")]
    Envelope(#[from] base64::DecodeError),

    /// Decoded bytes are not a supported image
    #[error("Image parse error: {0}")]
    ImageParse(#[from] image::ImageError),

    /// Binary websocket message (protocol expects base64 text)
    #[error("Unexpected binary frame ({0} bytes)")]
    UnexpectedBinary(usize),

    /// Decoder backend failed for a reason other than "no code"
    #[error("Decoder error: {0}")]
    Decoder(String),

    /// Blocking decode worker panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Coarse classification of a `FrameError`, kept in session summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameErrorKind {
    Envelope,
    ImageParse,
    UnexpectedBinary,
    Decoder,
    Worker,
}

impl FrameError {
    pub fn kind(&self) -> FrameErrorKind {
        match self {
            FrameError::EmptyFrame | FrameError::Envelope(_) => FrameErrorKind::Envelope,
            FrameError::ImageParse(_) => FrameErrorKind::ImageParse,
            FrameError::UnexpectedBinary(_) => FrameErrorKind::UnexpectedBinary,
            FrameError::Decoder(_) => FrameErrorKind::Decoder,
            FrameError::Worker(_) => FrameErrorKind::Worker,
        }
    }
}

/// Transport-level failure (connection reset, protocol violation)
#[derive(Debug, Clone, thiserror::Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl From<axum::Error> for TransportError {
    fn from(e: axum::Error) -> Self {
        Self(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_empty_frame_classified_as_envelope() {
        assert_eq!(FrameError::EmptyFrame.kind(), FrameErrorKind::Envelope);
    }

    #[test]
    fn test_base64_error_converts() {
        let err = base64::engine::general_purpose::STANDARD
            .decode("@@not base64@@")
            .unwrap_err();
        let frame_err: FrameError = err.into();
        assert_eq!(frame_err.kind(), FrameErrorKind::Envelope);
        assert!(frame_err.to_string().starts_with("Envelope error"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: taken");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FrameErrorKind::ImageParse).unwrap();
        assert_eq!(json, "\"image_parse\"");
    }
}
