//! Signal relay: forwards opaque payloads from a sender to its room partner.
//!
//! The relay never parses or validates the carried payload; the trust
//! boundary is between the two paired clients, not between client and server.

use chrono::Utc;
use log::debug;
use serde_json::Value;
use uuid::Uuid;

use super::messages::ServerWsMessage;
use super::registry::ConnectionRegistry;
use super::rooms::RoomTable;
use super::types::ConnectionId;

/// A payload on its way to the sender's room partner.
#[derive(Debug, Clone)]
pub enum Signal {
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),
    Chat(Value),
}

impl Signal {
    /// Wrap the payload in the outbound event for the partner, attaching the
    /// sender id (and a receive timestamp for chat messages).
    fn into_server_message(self, from: ConnectionId) -> ServerWsMessage {
        match self {
            Signal::Offer(offer) => ServerWsMessage::WebrtcOffer { offer, from },
            Signal::Answer(answer) => ServerWsMessage::WebrtcAnswer { answer, from },
            Signal::IceCandidate(candidate) => {
                ServerWsMessage::WebrtcIceCandidate { candidate, from }
            }
            Signal::Chat(message) => ServerWsMessage::ReceiveMessage {
                message,
                from,
                timestamp: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Forward `signal` from `from` to the other member of `room_id`.
///
/// Every lookup miss (room already torn down, sender not a member, partner
/// transport gone) is a silent no-op: the dominant failure mode is "the other
/// party already left". Delivery is fire-and-forget; a closed partner mailbox
/// is not reported back to the sender and there is no retry.
pub fn relay(
    rooms: &RoomTable,
    registry: &ConnectionRegistry,
    room_id: &Uuid,
    from: ConnectionId,
    signal: Signal,
) {
    let Some(room) = rooms.get(room_id) else {
        debug!("[Relay] Dropping signal from {}: room {} is gone", from, room_id);
        return;
    };
    let Some(partner_id) = room.partner_of(&from) else {
        debug!(
            "[Relay] Dropping signal from {}: not a member of room {}",
            from, room_id
        );
        return;
    };
    if let Some(partner) = registry.lookup(&partner_id) {
        partner.do_send(signal.into_server_message(from));
    }
}
