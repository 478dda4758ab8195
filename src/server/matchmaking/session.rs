/// WebSocket session handler for a single anonymous client.
///
/// This actor owns one client's connection: it mints a fresh connection id,
/// registers the transport with the matchmaking server, forwards parsed
/// client events to it, and writes server events back to the socket as JSON
/// text frames.
use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use log::{debug, error};
use uuid::Uuid;

use super::messages::{ClientWsMessage, ServerWsMessage};
use super::relay::Signal;
use super::server::{
    Connect, Disconnect, FindStranger, MatchmakingServer, NextStranger, RelaySignal,
};
use super::types::ConnectionId;

/// Represents one client's WebSocket session.
pub struct WsSession {
    pub id: ConnectionId,
    pub matchmaking_addr: Addr<MatchmakingServer>,
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Registers the connection with the
    /// matchmaking server.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.matchmaking_addr.do_send(Connect {
            id: self.id,
            handle: ctx.address().recipient(),
        });
    }

    /// Called when the session stops. Cascades removal from queue, room and
    /// registry.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.matchmaking_addr.do_send(Disconnect { id: self.id });
    }
}

impl WsSession {
    /// Forward a parsed client event to the matchmaking server.
    fn dispatch(&self, event: ClientWsMessage) {
        let id = self.id;
        match event {
            ClientWsMessage::FindStranger => {
                self.matchmaking_addr.do_send(FindStranger { id });
            }
            ClientWsMessage::WebrtcOffer { room_id, offer } => {
                self.matchmaking_addr.do_send(RelaySignal {
                    id,
                    room_id,
                    signal: Signal::Offer(offer),
                });
            }
            ClientWsMessage::WebrtcAnswer { room_id, answer } => {
                self.matchmaking_addr.do_send(RelaySignal {
                    id,
                    room_id,
                    signal: Signal::Answer(answer),
                });
            }
            ClientWsMessage::WebrtcIceCandidate { room_id, candidate } => {
                self.matchmaking_addr.do_send(RelaySignal {
                    id,
                    room_id,
                    signal: Signal::IceCandidate(candidate),
                });
            }
            ClientWsMessage::SendMessage { room_id, message } => {
                self.matchmaking_addr.do_send(RelaySignal {
                    id,
                    room_id,
                    signal: Signal::Chat(message),
                });
            }
            ClientWsMessage::NextStranger => {
                self.matchmaking_addr.do_send(NextStranger { id });
            }
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    /// Handles incoming WebSocket messages from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                match serde_json::from_str::<ClientWsMessage>(&text) {
                    Ok(event) => self.dispatch(event),
                    Err(_e) => {
                        // Unknown event or malformed envelope; dropped, never fatal.
                        debug!("[Session] {} sent an unparseable frame", self.id);
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for WsSession {
    type Result = ();

    /// Handles messages sent from the server to this session.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serializing our own enum cannot fail short of a bug; drop
                // the session rather than the process.
                error!("[Session] Failed to serialize server message: {}", e);
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the signaling relay.
///
/// Accepts the upgrade and starts a session actor with a fresh anonymous
/// connection id. No query parameters, no identity.
pub async fn ws_matchmaking(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(
        WsSession {
            id: Uuid::new_v4(),
            matchmaking_addr: data.matchmaking_addr.clone(),
        },
        &req,
        stream,
    )
}
