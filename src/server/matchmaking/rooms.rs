use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

use super::types::ConnectionId;

/// An active pairing of exactly two distinct connections.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: Uuid,
    members: [ConnectionId; 2],
    pub created_at: Instant,
}

impl Room {
    /// The other member of the room, if `id` is a member at all.
    pub fn partner_of(&self, id: &ConnectionId) -> Option<ConnectionId> {
        let [a, b] = self.members;
        if *id == a {
            Some(b)
        } else if *id == b {
            Some(a)
        } else {
            None
        }
    }

    pub fn members(&self) -> [ConnectionId; 2] {
        self.members
    }
}

/// The controller keeps paired connections out of the queue and each room
/// disjoint from the others, so these conditions indicate a bug upstream.
#[derive(Debug, Error, PartialEq)]
pub enum RoomCreateError {
    #[error("connection {0} is already in a room")]
    AlreadyPaired(ConnectionId),
    #[error("a room needs two distinct connections")]
    NotDistinct,
}

/// Table of active rooms, keyed by room id.
///
/// Rooms are created whole by a successful match and destroyed whole when
/// either member leaves. Ids are fresh v4 uuids and never reused.
#[derive(Default)]
pub struct RoomTable {
    rooms: HashMap<Uuid, Room>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Pair `a` and `b` in a new room and return its id.
    pub fn create_room(
        &mut self,
        a: ConnectionId,
        b: ConnectionId,
    ) -> Result<Uuid, RoomCreateError> {
        if a == b {
            return Err(RoomCreateError::NotDistinct);
        }
        for id in [a, b] {
            if self.find_by_member(&id).is_some() {
                return Err(RoomCreateError::AlreadyPaired(id));
            }
        }
        let room_id = Uuid::new_v4();
        self.rooms.insert(
            room_id,
            Room {
                id: room_id,
                members: [a, b],
                created_at: Instant::now(),
            },
        );
        Ok(room_id)
    }

    pub fn get(&self, room_id: &Uuid) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The room `id` currently belongs to, if any.
    pub fn find_by_member(&self, id: &ConnectionId) -> Option<&Room> {
        self.rooms.values().find(|room| room.partner_of(id).is_some())
    }

    /// Remove the room entirely; both members become unpaired.
    pub fn destroy(&mut self, room_id: &Uuid) -> Option<Room> {
        self.rooms.remove(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
