/// Matchmaking module: pairs anonymous connections into rooms and relays
/// signaling and chat between partners.
pub mod messages;
pub mod queue;
pub mod registry;
pub mod relay;
pub mod rooms;
pub mod server;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;
