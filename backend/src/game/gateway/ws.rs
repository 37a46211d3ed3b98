use crate::game::core::messages::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const CHANNEL_CAPACITY: usize = 16;
const MALFORMED_MESSAGE: &str = "malformed message";

/// Context for a WebSocket connection
pub struct ConnectionContext {
    pub connection_id: String,
}

impl ConnectionContext {
    pub fn new() -> Self {
        Self {
            connection_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Trait for handling WebSocket messages and disconnections
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Handle an incoming client message
    fn handle_message(
        self: Arc<Self>,
        msg: ClientMessage,
        tx: broadcast::Sender<ServerMessage>,
        ctx: &ConnectionContext,
    ) -> impl Future<Output = ()> + Send;

    /// Handle client disconnection
    fn handle_disconnect(&self, connection_id: &str);

    /// Name for logging purposes
    fn name(&self) -> &'static str;
}

/// Run a WebSocket connection with the given handler.
/// Splits the socket into a send task fed by the connection's broadcast
/// channel and a receive task dispatching to the handler. Disconnect cleanup
/// runs however the receive task ends, including a panic in a handler.
pub async fn run_connection<H: ConnectionHandler>(socket: WebSocket, handler: Arc<H>) {
    let ctx = ConnectionContext::new();
    let connection_id = ctx.connection_id.clone();
    info!(connection_id, "New {} connection", handler.name());

    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = broadcast::channel::<ServerMessage>(CHANNEL_CAPACITY);

    let mut send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            debug!(?msg, "Sending message to client");
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(err) => {
                    error!(%err, "Failed to serialize server message");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(receive_loop(receiver, tx, handler.clone(), ctx));

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        result = &mut recv_task => {
            if let Err(err) = result {
                error!(connection_id, %err, "Connection handler failed");
            }
            send_task.abort();
        },
    }

    handler.handle_disconnect(&connection_id);
    info!(connection_id, "{} connection closed", handler.name());
}

async fn receive_loop<H: ConnectionHandler>(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    tx: broadcast::Sender<ServerMessage>,
    handler: Arc<H>,
    ctx: ConnectionContext,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(connection_id = ctx.connection_id, raw = %text, "Failed to parse client message");
            let _ = tx.send(ServerMessage::error(MALFORMED_MESSAGE));
            continue;
        };

        handler.clone().handle_message(client_msg, tx.clone(), &ctx).await;
    }
}
