//! Main entry point for the signaling backend.
//!
//! Initializes the actor system, configures application state, and launches the HTTP server
//! with the WebSocket endpoint for matchmaking/signaling and the health check route.

use actix::Actor;
use actix_web::{App, HttpServer, web};
use log::info;
use server::matchmaking::server::MatchmakingServer;

pub mod config;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Start the MatchmakingServer actor (owns the waiting queue, room table and registry).
    let matchmaking_addr = MatchmakingServer::new().start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(matchmaking_addr));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config::server::DEFAULT_PORT);

    info!("Signaling server listening on {}:{}", config::server::HOST, port);

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((config::server::HOST, port))?
    .run()
    .await
}
