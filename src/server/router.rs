//! HTTP and WebSocket routing configuration.
//!
//! Defines the signaling WebSocket endpoint and the health check route.

use actix_web::web;

use crate::server::health::health;
use crate::server::matchmaking::session::ws_matchmaking;

/// Configure the application's HTTP/WebSocket routes.
///
/// The WebSocket route is handled by a per-connection session actor, which
/// manages the connection lifecycle and forwards events to the matchmaking
/// server.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_matchmaking))
        .service(web::resource("/health").to(health));
}
