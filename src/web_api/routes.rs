//! API Routes

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use crate::error::TransportError;
use crate::scan_session::{InboundMessage, ScanTransport, SessionRunner};
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(super::index))
        .route("/healthz", get(super::health_check))
        // WebSocket
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

// ========================================
// WebSocket Handler
// ========================================

/// WebSocket upgrade handler
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let max_bytes = state.config.max_frame_bytes;
    ws.max_message_size(max_bytes)
        .max_frame_size(max_bytes)
        .on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Run one scan session on an accepted socket
async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (sender, receiver) = socket.split();
    let transport = WsTransport { sender, receiver };

    let runner = SessionRunner::new(
        transport,
        state.decoder.clone(),
        &state.config.session_config(),
    );
    runner.run().await;
}

/// `ScanTransport` over an axum WebSocket
struct WsTransport {
    sender: SplitSink<WebSocket, Message>,
    receiver: SplitStream<WebSocket>,
}

impl ScanTransport for WsTransport {
    async fn recv(&mut self) -> Option<Result<InboundMessage, TransportError>> {
        let message = match self.receiver.next().await? {
            Ok(message) => message,
            Err(e) => return Some(Err(e.into())),
        };

        let inbound = match message {
            Message::Text(text) => InboundMessage::Text(text),
            Message::Binary(data) => InboundMessage::Binary(data),
            // Pong is handled automatically by axum
            Message::Ping(_) | Message::Pong(_) => InboundMessage::Keepalive,
            Message::Close(_) => InboundMessage::Close,
        };
        Some(Ok(inbound))
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sender.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn close(&mut self) {
        let frame = CloseFrame {
            code: close_code::ERROR,
            reason: "frame processing error".into(),
        };
        if let Err(e) = self.sender.send(Message::Close(Some(frame))).await {
            tracing::debug!(error = %e, "WebSocket close frame not delivered");
        }
    }
}
