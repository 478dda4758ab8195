use actix::Recipient;
use std::collections::HashMap;

use super::messages::ServerWsMessage;
use super::types::ConnectionId;

/// Maps a connection id to the live transport handle of its session actor.
///
/// A missing entry means the connection is already gone; callers treat a
/// lookup miss as benign, never as an error.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Recipient<ServerWsMessage>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Insert or replace the transport handle for `id`.
    pub fn register(&mut self, id: ConnectionId, handle: Recipient<ServerWsMessage>) {
        self.connections.insert(id, handle);
    }

    /// Resolve the transport handle for `id`, if the connection is still live.
    pub fn lookup(&self, id: &ConnectionId) -> Option<&Recipient<ServerWsMessage>> {
        self.connections.get(id)
    }

    /// Remove the handle for `id`. No-op if absent.
    pub fn deregister(&mut self, id: &ConnectionId) {
        self.connections.remove(id);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
