//! SessionRunner - drives one connection from accept to termination
//!
//! States: Active (awaiting the next frame) and Terminated. Terminated is
//! absorbing: once the loop breaks, no more frames are read, the result log
//! is flushed to tracing, and the transport is closed if it is still open.

use super::state::ScanSession;
use super::types::{Outbound, SessionConfig, SessionEnd, SessionSummary};
use crate::error::{FrameError, TransportError};
use crate::frame_decoder::{decode_envelope, load_image, DecodeResult, FrameDecoder};
use std::future::Future;
use std::sync::Arc;

/// Inbound message as seen by the session loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Base64 image frame
    Text(String),
    /// Binary payload (not part of the protocol)
    Binary(Vec<u8>),
    /// Ping/pong keepalive, answered by the transport
    Keepalive,
    /// Client close frame
    Close,
}

/// Bidirectional message channel for one session
///
/// `recv` returning `None` means the peer is gone.
pub trait ScanTransport: Send {
    fn recv(
        &mut self,
    ) -> impl Future<Output = Option<Result<InboundMessage, TransportError>>> + Send;

    fn send_text(&mut self, text: String)
        -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close an open channel. Only called when the peer has not closed it.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Runs the session loop over a transport
pub struct SessionRunner<T> {
    transport: T,
    decoder: Arc<dyn FrameDecoder>,
    session: ScanSession,
}

impl<T: ScanTransport> SessionRunner<T> {
    /// Create runner with a fresh session
    pub fn new(transport: T, decoder: Arc<dyn FrameDecoder>, config: &SessionConfig) -> Self {
        Self {
            transport,
            decoder,
            session: ScanSession::new(config),
        }
    }

    /// Run to completion. Returns after cleanup.
    pub async fn run(mut self) -> SessionSummary {
        let session_id = self.session.id();
        tracing::info!(
            session_id = %session_id,
            failure_threshold = self.session.threshold(),
            "Scan session started"
        );

        let end = loop {
            let message = match self.transport.recv().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    tracing::info!(session_id = %session_id, error = %e, "Transport lost");
                    break SessionEnd::TransportLost;
                }
                None => {
                    tracing::info!(session_id = %session_id, "Client disconnected");
                    break SessionEnd::ClientClosed;
                }
            };

            let text = match message {
                InboundMessage::Text(text) => text,
                InboundMessage::Keepalive => continue,
                InboundMessage::Close => {
                    tracing::info!(session_id = %session_id, "Client closed session");
                    break SessionEnd::ClientClosed;
                }
                InboundMessage::Binary(data) => {
                    break self.fail(FrameError::UnexpectedBinary(data.len())).await;
                }
            };

            match self.process_frame(text).await {
                Ok(Some(outbound)) => {
                    if let Err(e) = self.transport.send_text(outbound.into_text()).await {
                        tracing::info!(session_id = %session_id, error = %e, "Send failed, client gone");
                        break SessionEnd::TransportLost;
                    }
                }
                Ok(None) => {}
                Err(err) => break self.fail(err).await,
            }
        };

        self.terminate(end).await
    }

    /// Envelope -> image -> decode -> session update
    async fn process_frame(&mut self, text: String) -> Result<Option<Outbound>, FrameError> {
        let bytes = decode_envelope(&text)?;
        drop(text);

        let decoder = Arc::clone(&self.decoder);
        let result: DecodeResult = tokio::task::spawn_blocking(move || {
            let image = load_image(&bytes)?;
            decoder.decode(&image)
        })
        .await
        .map_err(|e| FrameError::Worker(e.to_string()))??;

        Ok(self.session.apply(result))
    }

    /// Report a fatal frame error to the client once
    async fn fail(&mut self, err: FrameError) -> SessionEnd {
        let session_id = self.session.id();
        tracing::error!(
            session_id = %session_id,
            error = %err,
            frames_processed = self.session.frames_processed(),
            "Frame processing failed, terminating session"
        );

        let notice = Outbound::ProcessingError.into_text();
        if let Err(e) = self.transport.send_text(notice).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to send error notice");
            return SessionEnd::TransportLost;
        }
        SessionEnd::Fatal(err.kind())
    }

    /// Flush the log and release the connection
    async fn terminate(mut self, end: SessionEnd) -> SessionSummary {
        if matches!(end, SessionEnd::Fatal(_)) {
            self.transport.close().await;
        }

        let summary = self.session.finish(end);
        tracing::info!(
            session_id = %summary.session_id,
            end = ?summary.end,
            frames_processed = summary.frames_processed,
            advisories_sent = summary.advisories_sent,
            duration_ms = summary.duration_ms(),
            codes = ?summary.result_log,
            "Scan session closed"
        );
        summary
    }
}
