#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use guessduel::messages::{ClientMessage, ServerMessage};
use guessduel::Role;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, guessduel::app()).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

fn to_message(msg: &ClientMessage) -> Message {
    let json = serde_json::to_string(msg).unwrap();
    Message::Text(json.into())
}

pub fn create_room_msg() -> Message {
    to_message(&ClientMessage::CreateRoom)
}

pub fn join_room_msg(room_id: &str) -> Message {
    to_message(&ClientMessage::JoinRoom {
        room_id: room_id.to_string(),
    })
}

pub fn set_number_msg(room_id: &str, role: Role, number: i64) -> Message {
    to_message(&ClientMessage::SetSecretNumber {
        room_id: room_id.to_string(),
        role,
        number,
    })
}

pub fn guess_msg(room_id: &str, role: Role, guess: i64) -> Message {
    to_message(&ClientMessage::MakeGuess {
        room_id: room_id.to_string(),
        role,
        guess,
    })
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = ws.next().await.unwrap().unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

/// Assert nothing arrives within a short window
pub async fn assert_silent(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "Expected no message, got {:?}", result);
}

pub async fn create_room(ws: &mut WsStream) -> String {
    ws.send(create_room_msg()).await.unwrap();
    match recv(ws).await {
        ServerMessage::RoomCreated { room_id } => room_id,
        other => panic!("Expected RoomCreated, got {:?}", other),
    }
}

pub async fn join_room(ws: &mut WsStream, room_id: &str) -> ServerMessage {
    ws.send(join_room_msg(room_id)).await.unwrap();
    recv(ws).await
}

/// Host and guest connected to one room, host holding `host_number`
/// and guest holding `guest_number`.
pub async fn ready_game(
    server: &TestServer,
    host_number: i64,
    guest_number: i64,
) -> (String, WsStream, WsStream) {
    let mut host_ws = connect(server).await;
    let room_id = create_room(&mut host_ws).await;
    assert_eq!(
        join_room(&mut host_ws, &room_id).await,
        ServerMessage::JoinedRoom { role: Role::Host }
    );

    let mut guest_ws = connect(server).await;
    assert_eq!(
        join_room(&mut guest_ws, &room_id).await,
        ServerMessage::JoinedRoom { role: Role::Guest }
    );

    host_ws.send(set_number_msg(&room_id, Role::Host, host_number)).await.unwrap();
    assert_eq!(recv(&mut host_ws).await, ServerMessage::NumberSet);

    guest_ws.send(set_number_msg(&room_id, Role::Guest, guest_number)).await.unwrap();
    assert_eq!(recv(&mut guest_ws).await, ServerMessage::NumberSet);

    (room_id, host_ws, guest_ws)
}
