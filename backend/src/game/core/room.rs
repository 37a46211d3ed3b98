use super::error::RoomError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CORRECT_GUESS: &str = "You guessed it!";
pub const OPPONENT_GREATER: &str = "opponent's number is greater";
pub const OPPONENT_SMALLER: &str = "opponent's number is smaller";

/// One of the two seats in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn opponent(self) -> Role {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => f.write_str("host"),
            Role::Guest => f.write_str("guest"),
        }
    }
}

/// Result of a guess that was evaluated against the opponent's number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Role>,
}

impl GuessOutcome {
    fn hit(role: Role) -> Self {
        Self {
            success: true,
            message: CORRECT_GUESS.to_string(),
            winner: Some(role),
        }
    }

    fn miss(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            winner: None,
        }
    }
}

/// State of a two-player room (pure logic, no I/O)
#[derive(Debug, Default)]
pub struct Room {
    host: Option<String>,
    guest: Option<String>,
    host_number: Option<i64>,
    guest_number: Option<i64>,
    winner: Option<Role>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a connection in the first free slot, host before guest.
    pub fn seat(&mut self, connection_id: &str) -> Option<Role> {
        if self.host.is_none() {
            self.host = Some(connection_id.to_string());
            Some(Role::Host)
        } else if self.guest.is_none() {
            self.guest = Some(connection_id.to_string());
            Some(Role::Guest)
        } else {
            None
        }
    }

    pub fn occupant(&self, role: Role) -> Option<&str> {
        match role {
            Role::Host => self.host.as_deref(),
            Role::Guest => self.guest.as_deref(),
        }
    }

    pub fn seat_of(&self, connection_id: &str) -> Option<Role> {
        if self.host.as_deref() == Some(connection_id) {
            Some(Role::Host)
        } else if self.guest.as_deref() == Some(connection_id) {
            Some(Role::Guest)
        } else {
            None
        }
    }

    pub fn open_seats(&self) -> usize {
        [&self.host, &self.guest]
            .iter()
            .filter(|seat| seat.is_none())
            .count()
    }

    /// Store a secret number, overwriting any earlier one for the role.
    pub fn set_number(&mut self, role: Role, number: i64) {
        match role {
            Role::Host => self.host_number = Some(number),
            Role::Guest => self.guest_number = Some(number),
        }
    }

    pub fn number(&self, role: Role) -> Option<i64> {
        match role {
            Role::Host => self.host_number,
            Role::Guest => self.guest_number,
        }
    }

    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    /// Compare a guess against the opponent's number. A hit ends the game.
    pub fn guess(&mut self, role: Role, guess: i64) -> Result<GuessOutcome, RoomError> {
        if let Some(winner) = self.winner {
            return Err(RoomError::GameOver(winner));
        }

        let opponent_number = self
            .number(role.opponent())
            .ok_or(RoomError::OpponentNotReady)?;

        let outcome = match guess.cmp(&opponent_number) {
            std::cmp::Ordering::Equal => {
                self.winner = Some(role);
                GuessOutcome::hit(role)
            }
            std::cmp::Ordering::Less => GuessOutcome::miss(OPPONENT_GREATER),
            std::cmp::Ordering::Greater => GuessOutcome::miss(OPPONENT_SMALLER),
        };

        Ok(outcome)
    }
}
