//! codescan-server Library
//!
//! Streams camera frames over a WebSocket, decodes an optical code from each
//! frame and reports results back incrementally.
//!
//! ## Architecture
//!
//! 1. FrameDecoder - Envelope decoding and code extraction (black box)
//! 2. ScanSession - Per-connection state, threshold advisory, session loop
//! 3. WebAPI - Router and WebSocket accept entrypoint
//!
//! ## Design Principles
//!
//! - Session isolation: each connection owns its state, nothing is shared
//! - Fail fast: a malformed frame ends its session after one notice

pub mod error;
pub mod frame_decoder;
pub mod models;
pub mod scan_session;
pub mod state;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;
