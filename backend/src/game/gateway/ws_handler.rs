use super::state::GatewayState;
use super::ws::{ConnectionContext, ConnectionHandler, run_connection};
use crate::game::core::RoomError;
use crate::game::core::messages::{ClientMessage, ServerMessage};
use axum::extract::ws::WebSocket;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// Sent for both a missing and a full room so clients cannot probe which.
const ROOM_UNAVAILABLE: &str = "room is full or does not exist";

impl ConnectionHandler for GatewayState {
    async fn handle_message(
        self: Arc<Self>,
        msg: ClientMessage,
        tx: broadcast::Sender<ServerMessage>,
        ctx: &ConnectionContext,
    ) {
        let connection_id = ctx.connection_id.as_str();

        match msg {
            ClientMessage::CreateRoom => {
                let room_id = self.create_room(connection_id, tx.clone());
                let _ = tx.send(ServerMessage::RoomCreated { room_id });
            }
            ClientMessage::JoinRoom { room_id } => {
                match self.join_room(&room_id, connection_id, tx.clone()) {
                    Ok(role) => {
                        let _ = tx.send(ServerMessage::JoinedRoom { role });
                    }
                    Err(err) => {
                        warn!(connection_id, room_id, %err, "Join rejected");
                        let message = match err {
                            RoomError::NotFound(_) | RoomError::RoomFull(_) => ROOM_UNAVAILABLE.to_string(),
                            other => other.to_string(),
                        };
                        let _ = tx.send(ServerMessage::error(message));
                    }
                }
            }
            ClientMessage::SetSecretNumber {
                room_id,
                role,
                number,
            } => match self.set_secret_number(&room_id, role, number, connection_id) {
                Ok(()) => {
                    let _ = tx.send(ServerMessage::NumberSet);
                }
                Err(err) => {
                    warn!(connection_id, room_id, %role, %err, "Secret number rejected");
                    let _ = tx.send(ServerMessage::error(err.to_string()));
                }
            },
            ClientMessage::MakeGuess {
                room_id,
                role,
                guess,
            } => match self.make_guess(&room_id, role, guess, connection_id) {
                Ok(outcome) => {
                    let winner = outcome.winner;
                    let _ = tx.send(ServerMessage::GuessResult(outcome));
                    if let Some(winner) = winner {
                        self.broadcast_to_room(&room_id, ServerMessage::GameOver { winner });
                    }
                }
                Err(err) => {
                    warn!(connection_id, room_id, %role, %err, "Guess rejected");
                    let _ = tx.send(ServerMessage::error(err.to_string()));
                }
            },
        }
    }

    fn handle_disconnect(&self, connection_id: &str) {
        self.handle_disconnect(connection_id);
    }

    fn name(&self) -> &'static str {
        "gateway"
    }
}

pub async fn handle_connection(socket: WebSocket, state: Arc<GatewayState>) {
    run_connection(socket, state).await;
}
