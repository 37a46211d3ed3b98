use super::room::{GuessOutcome, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom {
        room_id: String,
    },
    SetSecretNumber {
        room_id: String,
        role: Role,
        number: i64,
    },
    MakeGuess {
        room_id: String,
        role: Role,
        guess: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_id: String,
    },
    JoinedRoom {
        role: Role,
    },
    NumberSet,
    GuessResult(GuessOutcome),
    GameOver {
        winner: Role,
    },
    OpponentLeft {
        role: Role,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
