//! Application state
//!
//! Holds configuration and the shared (stateless) frame decoder. Sessions
//! keep their own state; nothing mutable lives here.

use crate::error::{Error, Result};
use crate::frame_decoder::FrameDecoder;
use crate::scan_session::{SessionConfig, DEFAULT_FAILURE_THRESHOLD};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Default maximum inbound websocket message size (16 MiB)
const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Consecutive decode misses before the advisory is sent
    pub failure_threshold: u32,
    /// Maximum inbound frame size in bytes (base64 text)
    pub max_frame_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            failure_threshold: std::env::var("FAILURE_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .filter(|t: &u32| *t > 0)
                .unwrap_or(DEFAULT_FAILURE_THRESHOLD),
            max_frame_bytes: std::env::var("MAX_FRAME_BYTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .filter(|m: &usize| *m > 0)
                .unwrap_or(DEFAULT_MAX_FRAME_BYTES),
        }
    }
}

impl AppConfig {
    /// `host:port` string, resolved at bind time (hostnames allowed)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Bind the listening socket
    pub async fn bind(&self) -> Result<TcpListener> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("HOST is empty".to_string()));
        }
        let addr = self.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        Ok(listener)
    }

    /// Policy applied to each new session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            failure_threshold: self.failure_threshold,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Frame decoder backend
    pub decoder: Arc<dyn FrameDecoder>,
}

impl AppState {
    pub fn new(config: AppConfig, decoder: Arc<dyn FrameDecoder>) -> Self {
        Self { config, decoder }
    }
}
