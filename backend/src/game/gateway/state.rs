use crate::game::core::messages::ServerMessage;
use crate::game::core::{GuessOutcome, Role, RoomError, RoomRegistry, RoomSummary};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use tokio::sync::broadcast;
use tracing::{debug, info};

type Group = HashMap<String, broadcast::Sender<ServerMessage>>;

/// Registry plus the transport side of every room: which connections
/// receive a room's broadcasts, and which rooms each connection is in.
#[derive(Default)]
pub struct GatewayState {
    pub registry: RoomRegistry,
    groups: DashMap<String, Group>, // room_id -> members
    connection_rooms: DashMap<String, HashSet<String>>, // connection_id -> room_ids
}

impl GatewayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room and add the creator to its broadcast group
    pub fn create_room(&self, connection_id: &str, tx: broadcast::Sender<ServerMessage>) -> String {
        let room_id = self.registry.create_room();
        self.subscribe(&room_id, connection_id, tx);
        room_id
    }

    /// Take a seat in a room and join its broadcast group
    pub fn join_room(
        &self,
        room_id: &str,
        connection_id: &str,
        tx: broadcast::Sender<ServerMessage>,
    ) -> Result<Role, RoomError> {
        let role = self.registry.join_room(room_id, connection_id)?;
        self.subscribe(room_id, connection_id, tx);
        Ok(role)
    }

    pub fn set_secret_number(
        &self,
        room_id: &str,
        role: Role,
        number: i64,
        connection_id: &str,
    ) -> Result<(), RoomError> {
        self.authorize(room_id, role, connection_id)?;
        self.registry.set_secret_number(room_id, role, number)?;
        debug!(room_id, %role, "Secret number set");
        Ok(())
    }

    pub fn make_guess(
        &self,
        room_id: &str,
        role: Role,
        guess: i64,
        connection_id: &str,
    ) -> Result<GuessOutcome, RoomError> {
        self.authorize(room_id, role, connection_id)?;
        let outcome = self.registry.make_guess(room_id, role, guess)?;
        debug!(room_id, %role, guess, success = outcome.success, "Guess evaluated");
        Ok(outcome)
    }

    /// The client names its role on every message; only accept the role
    /// whose seat this connection actually holds.
    fn authorize(&self, room_id: &str, role: Role, connection_id: &str) -> Result<(), RoomError> {
        match self.registry.occupant(room_id, role)? {
            Some(occupant) if occupant == connection_id => Ok(()),
            _ => Err(RoomError::NotSeated(role)),
        }
    }

    fn subscribe(&self, room_id: &str, connection_id: &str, tx: broadcast::Sender<ServerMessage>) {
        self.groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string(), tx);
        self.connection_rooms
            .entry(connection_id.to_string())
            .or_default()
            .insert(room_id.to_string());
    }

    /// Send a message to every connection in a room
    pub fn broadcast_to_room(&self, room_id: &str, msg: ServerMessage) {
        let Some(group) = self.groups.get(room_id) else {
            return;
        };
        debug!(room_id, members = group.len(), "Broadcasting to room");
        for tx in group.values() {
            let _ = tx.send(msg.clone());
        }
    }

    pub fn open_rooms(&self) -> Vec<RoomSummary> {
        self.registry.open_rooms()
    }

    /// Release everything a connection held. A room whose seated player
    /// leaves is abandoned and the remaining members are told; a room
    /// nobody is connected to any more is dropped.
    pub fn handle_disconnect(&self, connection_id: &str) {
        let Some((_, room_ids)) = self.connection_rooms.remove(connection_id) else {
            return;
        };

        for room_id in room_ids {
            let seat = self.registry.seat_of(&room_id, connection_id);

            let remaining = self.groups.get_mut(&room_id).map(|mut group| {
                group.remove(connection_id);
                group.len()
            });

            match seat {
                Some(role) => {
                    let group = self
                        .groups
                        .remove(&room_id)
                        .map(|(_, group)| group)
                        .unwrap_or_default();
                    self.abandon_room(&room_id, role, group);
                }
                None if remaining.unwrap_or(0) == 0 => {
                    self.groups.remove(&room_id);
                    self.registry.remove_room(&room_id);
                    info!(room_id, "Room closed, no connections left");
                }
                None => {}
            }
        }
    }

    fn abandon_room(&self, room_id: &str, role: Role, remaining: Group) {
        self.registry.remove_room(room_id);
        info!(room_id, %role, remaining = remaining.len(), "Room abandoned");

        for (member_id, tx) in remaining {
            let _ = tx.send(ServerMessage::OpponentLeft { role });
            if let Some(mut rooms) = self.connection_rooms.get_mut(&member_id) {
                rooms.remove(room_id);
            }
        }
    }
}
