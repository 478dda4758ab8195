// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the address of the matchmaking server actor. Used to share state
//! between HTTP/WebSocket handlers and the actor system.

use crate::server::matchmaking::server::MatchmakingServer;
use actix::Addr;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the matchmaking server actor (owns the queue, rooms and registry).
    pub matchmaking_addr: Addr<MatchmakingServer>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(matchmaking_addr: Addr<MatchmakingServer>) -> Self {
        AppState { matchmaking_addr }
    }
}
