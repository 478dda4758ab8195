use actix::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::types::ConnectionId;

/// Message client -> server.
///
/// The `offer`/`answer`/`candidate`/`message` payloads are opaque to the
/// server: they are carried as raw JSON values and forwarded verbatim.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientWsMessage {
    FindStranger,
    #[serde(rename_all = "camelCase")]
    WebrtcOffer { room_id: Uuid, offer: Value },
    #[serde(rename_all = "camelCase")]
    WebrtcAnswer { room_id: Uuid, answer: Value },
    #[serde(rename_all = "camelCase")]
    WebrtcIceCandidate { room_id: Uuid, candidate: Value },
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: Uuid, message: Value },
    NextStranger,
}

/// Message server -> client.
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerWsMessage {
    WaitingForStranger,
    #[serde(rename_all = "camelCase")]
    StrangerFound {
        room_id: Uuid,
        partner_id: ConnectionId,
    },
    WebrtcOffer {
        offer: Value,
        from: ConnectionId,
    },
    WebrtcAnswer {
        answer: Value,
        from: ConnectionId,
    },
    WebrtcIceCandidate {
        candidate: Value,
        from: ConnectionId,
    },
    ReceiveMessage {
        message: Value,
        from: ConnectionId,
        timestamp: String,
    },
    StrangerDisconnected,
    Disconnected,
}

impl ServerWsMessage {
    pub fn stranger_found(room_id: Uuid, partner_id: ConnectionId) -> Self {
        Self::StrangerFound {
            room_id,
            partner_id,
        }
    }
}
