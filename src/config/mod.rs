/// Main configuration module.
///
/// Re-exports submodules for matchmaking and HTTP server configuration.
pub mod matchmaking;
pub mod server;
