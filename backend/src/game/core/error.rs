use super::room::Role;

/// Errors returned by room operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoomError {
    #[error("room {0} not found")]
    NotFound(String),

    #[error("room {0} is full")]
    RoomFull(String),

    #[error("you are not seated as {0} in this room")]
    NotSeated(Role),

    #[error("opponent has not chosen a number yet")]
    OpponentNotReady,

    #[error("game is already over, {0} won")]
    GameOver(Role),
}
