use super::error::RoomError;
use super::room::{GuessOutcome, Role, Room};
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;
use tracing::info;

/// A room that can still be joined, as shown in the room listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub open_seats: usize,
}

/// In-memory store of every room, keyed by room ID.
/// Each operation runs under the room's shard lock, so a read-modify-write
/// on one room is never interleaved with another.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty room and return its ID
    pub fn create_room(&self) -> String {
        loop {
            let room_id = uuid::Uuid::new_v4().to_string();
            if let Entry::Vacant(entry) = self.rooms.entry(room_id.clone()) {
                entry.insert(Room::new());
                info!(room_id, "Created room");
                return room_id;
            }
        }
    }

    pub fn room_exists(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Seat a connection in a room. The first joiner is host, the second guest.
    pub fn join_room(&self, room_id: &str, connection_id: &str) -> Result<Role, RoomError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;

        let role = room
            .seat(connection_id)
            .ok_or_else(|| RoomError::RoomFull(room_id.to_string()))?;

        info!(room_id, connection_id, %role, "Player joined room");
        Ok(role)
    }

    pub fn set_secret_number(&self, room_id: &str, role: Role, number: i64) -> Result<(), RoomError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;

        room.set_number(role, number);
        Ok(())
    }

    pub fn make_guess(&self, room_id: &str, role: Role, guess: i64) -> Result<GuessOutcome, RoomError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;

        let outcome = room.guess(role, guess)?;

        if let Some(winner) = outcome.winner {
            info!(room_id, %winner, "Room won");
        }

        Ok(outcome)
    }

    /// Connection holding the given seat, if any
    pub fn occupant(&self, room_id: &str, role: Role) -> Result<Option<String>, RoomError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;

        Ok(room.occupant(role).map(str::to_string))
    }

    pub fn seat_of(&self, room_id: &str, connection_id: &str) -> Option<Role> {
        self.rooms.get(room_id)?.seat_of(connection_id)
    }

    pub fn remove_room(&self, room_id: &str) -> Option<Room> {
        self.rooms.remove(room_id).map(|(_, room)| room)
    }

    /// Rooms with a free seat and no winner yet
    pub fn open_rooms(&self) -> Vec<RoomSummary> {
        self.rooms
            .iter()
            .filter(|entry| entry.open_seats() > 0 && entry.winner().is_none())
            .map(|entry| RoomSummary {
                room_id: entry.key().clone(),
                open_seats: entry.open_seats(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
