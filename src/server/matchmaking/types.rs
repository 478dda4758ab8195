use uuid::Uuid;

/// Identifier of a connected client, minted server-side when the socket is
/// accepted. Clients are anonymous; the id is their only name.
pub type ConnectionId = Uuid;
