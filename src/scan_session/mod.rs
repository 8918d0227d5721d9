//! ScanSession - Per-Connection Decode Session
//!
//! ## Responsibilities
//!
//! - Session state (consecutive-failure counter, result log)
//! - Threshold advisory (one-shot per run of misses)
//! - Session loop over a `ScanTransport` (Active -> Terminated)
//! - Log flush on termination
//!
//! ## Design
//!
//! - One session per connection, owned by its runner; no cross-session state
//! - Frames processed strictly in arrival order, one outbound message at most
//! - Every frame error is session-fatal: one notice, then close

mod runner;
mod state;
mod threshold;
mod types;

pub use runner::{InboundMessage, ScanTransport, SessionRunner};
pub use state::ScanSession;
pub use threshold::{FailureMonitor, MissOutcome, DEFAULT_FAILURE_THRESHOLD};
pub use types::*;
