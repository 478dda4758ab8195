/// Matchmaking server actor.
///
/// Owns the connection registry, the waiting queue and the room table, and
/// drives every find/match/leave/next/disconnect transition. Routing all
/// mutations through this actor's mailbox serializes them: a transition runs
/// to completion before the next event is taken, so two concurrent
/// find-requests can never dequeue the same waiting connection.
use actix::prelude::*;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use super::messages::ServerWsMessage;
use super::queue::WaitingQueue;
use super::registry::ConnectionRegistry;
use super::relay::{self, Signal};
use super::rooms::RoomTable;
use super::types::ConnectionId;
use crate::config::matchmaking::NEXT_REDIAL_DELAY_MS;

/// Main matchmaking server actor.
pub struct MatchmakingServer {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) queue: WaitingQueue,
    pub(crate) rooms: RoomTable,
    /// Pending automatic re-dial timers, at most one per connection.
    redials: HashMap<ConnectionId, SpawnHandle>,
    redial_delay: Duration,
}

impl MatchmakingServer {
    /// Create a new matchmaking server with the configured re-dial delay.
    pub fn new() -> Self {
        Self::with_redial_delay(Duration::from_millis(NEXT_REDIAL_DELAY_MS))
    }

    /// Like `new`, with a custom delay before the automatic re-dial fires.
    pub fn with_redial_delay(redial_delay: Duration) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            queue: WaitingQueue::new(),
            rooms: RoomTable::new(),
            redials: HashMap::new(),
            redial_delay,
        }
    }

    /// Send `msg` to `id` if its transport is still registered.
    fn notify(&self, id: &ConnectionId, msg: ServerWsMessage) {
        if let Some(handle) = self.registry.lookup(id) {
            handle.do_send(msg);
        }
    }

    /// Run the find transition for `id`: tear down any current pairing, then
    /// match against the oldest waiting connection or park the requester in
    /// the queue.
    fn on_find_request(&mut self, id: ConnectionId) {
        self.leave_room(&id);
        // A waiting client re-sending find must never be paired with itself.
        self.queue.remove(&id);

        if let Some(other_id) = self.queue.dequeue_oldest() {
            // The head may have disconnected between enqueue and now; a dead
            // head means this attempt falls through to waiting.
            if self.registry.lookup(&other_id).is_some() {
                match self.rooms.create_room(id, other_id) {
                    Ok(room_id) => {
                        self.notify(&id, ServerWsMessage::stranger_found(room_id, other_id));
                        self.notify(&other_id, ServerWsMessage::stranger_found(room_id, id));
                        info!(
                            "[Matchmaking] Room {} created for {} and {}",
                            room_id, id, other_id
                        );
                        return;
                    }
                    Err(err) => {
                        warn!(
                            "[Matchmaking] Refused to pair {} with {}: {}",
                            id, other_id, err
                        );
                    }
                }
            } else {
                debug!("[Matchmaking] Dropping stale queue head {}", other_id);
            }
        }

        self.queue.enqueue(id);
        self.notify(&id, ServerWsMessage::WaitingForStranger);
        debug!("[Matchmaking] {} is waiting for a stranger", id);
    }

    /// Remove `id` from its room, if any, notifying the partner.
    ///
    /// Idempotent: without a room this is a no-op. The whole room is
    /// destroyed; the partner is left unpaired and must issue its own new
    /// find request to be matched again.
    fn leave_room(&mut self, id: &ConnectionId) {
        let Some(room) = self.rooms.find_by_member(id) else {
            return;
        };
        let room_id = room.id;
        let created_at = room.created_at;
        let partner_id = room.partner_of(id);
        if let Some(partner_id) = partner_id {
            self.notify(&partner_id, ServerWsMessage::StrangerDisconnected);
        }
        self.rooms.destroy(&room_id);
        info!(
            "[Matchmaking] Room {} destroyed after {:?}, {} left",
            room_id,
            created_at.elapsed(),
            id
        );
    }

    /// Drop the pending re-dial timer for `id`, if any.
    fn cancel_redial(&mut self, id: &ConnectionId, ctx: &mut Context<Self>) {
        if let Some(handle) = self.redials.remove(id) {
            ctx.cancel_future(handle);
        }
    }
}

impl Default for MatchmakingServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Message: a new socket was accepted.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: ConnectionId,
    pub handle: Recipient<ServerWsMessage>,
}

/// Message: the client asked to be paired with a stranger.
#[derive(Message)]
#[rtype(result = "()")]
pub struct FindStranger {
    pub id: ConnectionId,
}

/// Message: relay an opaque payload to the sender's room partner.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RelaySignal {
    pub id: ConnectionId,
    pub room_id: Uuid,
    pub signal: Signal,
}

/// Message: the client asked to skip to the next stranger.
#[derive(Message)]
#[rtype(result = "()")]
pub struct NextStranger {
    pub id: ConnectionId,
}

/// Message: the client's transport is gone.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: ConnectionId,
}

/// Snapshot of store sizes, for introspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchmakingStats {
    pub connections: usize,
    pub waiting: usize,
    pub rooms: usize,
}

#[derive(Message)]
#[rtype(result = "MatchmakingStats")]
pub struct GetStats;

impl Actor for MatchmakingServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for MatchmakingServer {
    type Result = ();

    /// Registers the connection's transport handle.
    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        self.registry.register(msg.id, msg.handle);
        debug!("[Matchmaking] {} connected", msg.id);
    }
}

impl Handler<FindStranger> for MatchmakingServer {
    type Result = ();

    fn handle(&mut self, msg: FindStranger, _ctx: &mut Self::Context) -> Self::Result {
        debug!("[Matchmaking] {} is looking for a stranger", msg.id);
        self.on_find_request(msg.id);
    }
}

impl Handler<RelaySignal> for MatchmakingServer {
    type Result = ();

    /// Forwarding only; no state transition.
    fn handle(&mut self, msg: RelaySignal, _ctx: &mut Self::Context) -> Self::Result {
        relay::relay(&self.rooms, &self.registry, &msg.room_id, msg.id, msg.signal);
    }
}

impl Handler<NextStranger> for MatchmakingServer {
    type Result = ();

    /// Tears down the current pairing and schedules an automatic re-run of
    /// the find transition on the requester's behalf.
    fn handle(&mut self, msg: NextStranger, ctx: &mut Self::Context) -> Self::Result {
        let id = msg.id;
        self.leave_room(&id);
        self.notify(&id, ServerWsMessage::Disconnected);

        // At most one pending re-dial per connection; a second "next"
        // restarts the timer.
        self.cancel_redial(&id, ctx);
        let handle = ctx.run_later(self.redial_delay, move |act, _ctx| {
            act.redials.remove(&id);
            // The connection may have dropped while the timer was pending;
            // stay silent in that case.
            if act.registry.lookup(&id).is_none() {
                return;
            }
            debug!("[Matchmaking] Automatic re-dial for {}", id);
            act.on_find_request(id);
        });
        self.redials.insert(id, handle);
    }
}

impl Handler<Disconnect> for MatchmakingServer {
    type Result = ();

    /// Cascades removal from room, queue and registry, and cancels any
    /// pending re-dial.
    fn handle(&mut self, msg: Disconnect, ctx: &mut Self::Context) -> Self::Result {
        let id = msg.id;
        self.leave_room(&id);
        self.queue.remove(&id);
        self.registry.deregister(&id);
        self.cancel_redial(&id, ctx);
        debug!("[Matchmaking] {} disconnected", id);
    }
}

impl Handler<GetStats> for MatchmakingServer {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(MatchmakingStats {
            connections: self.registry.len(),
            waiting: self.queue.len(),
            rooms: self.rooms.len(),
        })
    }
}
