pub mod config;
mod game;

pub use game::core::{GuessOutcome, Role, RoomError, RoomRegistry, RoomSummary};
pub use game::messages;

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade, ws::WebSocket},
    http::Method,
    response::Response,
    routing::get,
};
use game::gateway::GatewayState;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<GatewayState>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    game::gateway::handle_connection(socket, state.gateway).await;
}

/// Rooms that still have a free seat
#[derive(Debug, Serialize)]
pub struct RoomList {
    pub rooms: Vec<RoomSummary>,
}

async fn rooms_handler(State(state): State<AppState>) -> Json<RoomList> {
    Json(RoomList {
        rooms: state.gateway.open_rooms(),
    })
}

pub fn app() -> Router {
    let state = AppState {
        gateway: Arc::new(GatewayState::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(rooms_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}
