//! Actor-level scenarios for the matchmaking core.
//!
//! Each "client" is a collector actor whose recipient is registered with the
//! server, so every event a real socket would receive can be inspected. A
//! `send(...).await` to the server completes only after the transition ran,
//! and the collector's own mailbox orders notifications before the drain
//! request, which makes the assertions deterministic.

use actix::prelude::*;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use super::messages::ServerWsMessage;
use super::relay::Signal;
use super::server::{
    Connect, Disconnect, FindStranger, GetStats, MatchmakingServer, NextStranger, RelaySignal,
};
use super::types::ConnectionId;

/// Test stand-in for a client socket: records everything the server sends.
#[derive(Default)]
struct Collector {
    received: Vec<ServerWsMessage>,
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<ServerWsMessage> for Collector {
    type Result = ();

    fn handle(&mut self, msg: ServerWsMessage, _ctx: &mut Self::Context) -> Self::Result {
        self.received.push(msg);
    }
}

/// Drains the collector's log of received events.
#[derive(Message)]
#[rtype(result = "Vec<ServerWsMessage>")]
struct TakeReceived;

impl Handler<TakeReceived> for Collector {
    type Result = MessageResult<TakeReceived>;

    fn handle(&mut self, _msg: TakeReceived, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(std::mem::take(&mut self.received))
    }
}

struct TestClient {
    id: ConnectionId,
    collector: Addr<Collector>,
}

impl TestClient {
    async fn connect(server: &Addr<MatchmakingServer>) -> Self {
        let id = Uuid::new_v4();
        let collector = Collector::default().start();
        server
            .send(Connect {
                id,
                handle: collector.clone().recipient(),
            })
            .await
            .unwrap();
        Self { id, collector }
    }

    async fn find(&self, server: &Addr<MatchmakingServer>) {
        server.send(FindStranger { id: self.id }).await.unwrap();
    }

    async fn received(&self) -> Vec<ServerWsMessage> {
        self.collector.send(TakeReceived).await.unwrap()
    }
}

fn stranger_found(messages: &[ServerWsMessage]) -> Option<(Uuid, ConnectionId)> {
    messages.iter().find_map(|msg| match msg {
        ServerWsMessage::StrangerFound {
            room_id,
            partner_id,
        } => Some((*room_id, *partner_id)),
        _ => None,
    })
}

/// Pair two fresh clients and return them with their shared room id.
async fn paired_clients(server: &Addr<MatchmakingServer>) -> (TestClient, TestClient, Uuid) {
    let a = TestClient::connect(server).await;
    let b = TestClient::connect(server).await;
    a.find(server).await;
    b.find(server).await;
    let (room_id, _) = stranger_found(&a.received().await).unwrap();
    b.received().await;
    (a, b, room_id)
}

#[actix_web::test]
async fn first_finder_waits_then_pair_matches() {
    let server = MatchmakingServer::new().start();
    let a = TestClient::connect(&server).await;
    let b = TestClient::connect(&server).await;

    a.find(&server).await;
    assert_eq!(a.received().await, vec![ServerWsMessage::WaitingForStranger]);

    b.find(&server).await;
    let (room_a, partner_a) = stranger_found(&a.received().await).unwrap();
    let (room_b, partner_b) = stranger_found(&b.received().await).unwrap();
    assert_eq!(room_a, room_b);
    assert_eq!(partner_a, b.id);
    assert_eq!(partner_b, a.id);

    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 0);
    assert_eq!(stats.rooms, 1);
}

#[actix_web::test]
async fn offer_is_relayed_verbatim_to_partner() {
    let server = MatchmakingServer::new().start();
    let (a, b, room_id) = paired_clients(&server).await;

    server
        .send(RelaySignal {
            id: a.id,
            room_id,
            signal: Signal::Offer(json!("X")),
        })
        .await
        .unwrap();

    assert_eq!(
        b.received().await,
        vec![ServerWsMessage::WebrtcOffer {
            offer: json!("X"),
            from: a.id,
        }]
    );
    // The sender hears nothing back.
    assert!(a.received().await.is_empty());
}

#[actix_web::test]
async fn chat_message_carries_sender_and_timestamp() {
    let server = MatchmakingServer::new().start();
    let (a, b, room_id) = paired_clients(&server).await;

    server
        .send(RelaySignal {
            id: a.id,
            room_id,
            signal: Signal::Chat(json!("hello")),
        })
        .await
        .unwrap();

    let received = b.received().await;
    match received.as_slice() {
        [ServerWsMessage::ReceiveMessage {
            message,
            from,
            timestamp,
        }] => {
            assert_eq!(message, &json!("hello"));
            assert_eq!(*from, a.id);
            assert!(!timestamp.is_empty());
        }
        other => panic!("expected one receive-message, got {:?}", other),
    }
}

#[actix_web::test]
async fn disconnect_tears_down_room_and_drops_late_signals() {
    let server = MatchmakingServer::new().start();
    let (a, b, room_id) = paired_clients(&server).await;

    server.send(Disconnect { id: a.id }).await.unwrap();
    assert_eq!(
        b.received().await,
        vec![ServerWsMessage::StrangerDisconnected]
    );

    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.rooms, 0);
    assert_eq!(stats.connections, 1);

    // A late offer into the destroyed room goes nowhere.
    server
        .send(RelaySignal {
            id: b.id,
            room_id,
            signal: Signal::Offer(json!({"sdp": "late"})),
        })
        .await
        .unwrap();
    assert!(a.received().await.is_empty());
    assert!(b.received().await.is_empty());
}

#[actix_web::test]
async fn next_requeues_requester_after_delay() {
    let server = MatchmakingServer::with_redial_delay(Duration::from_millis(50)).start();
    let (a, b, _room_id) = paired_clients(&server).await;

    server.send(NextStranger { id: a.id }).await.unwrap();
    assert_eq!(a.received().await, vec![ServerWsMessage::Disconnected]);
    assert_eq!(
        b.received().await,
        vec![ServerWsMessage::StrangerDisconnected]
    );

    // No one else is waiting, so the automatic re-dial parks the requester.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(a.received().await, vec![ServerWsMessage::WaitingForStranger]);

    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.rooms, 0);
}

#[actix_web::test]
async fn fifo_matches_oldest_waiter_first() {
    let server = MatchmakingServer::new().start();
    let a = TestClient::connect(&server).await;
    let b = TestClient::connect(&server).await;
    let c = TestClient::connect(&server).await;

    a.find(&server).await;
    b.find(&server).await;
    c.find(&server).await;

    let (_, partner_a) = stranger_found(&a.received().await).unwrap();
    let (_, partner_b) = stranger_found(&b.received().await).unwrap();
    assert_eq!(partner_a, b.id);
    assert_eq!(partner_b, a.id);
    assert_eq!(c.received().await, vec![ServerWsMessage::WaitingForStranger]);

    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.rooms, 1);

    // The next finder pairs with the connection that has waited longest.
    let d = TestClient::connect(&server).await;
    d.find(&server).await;
    let (_, partner_d) = stranger_found(&d.received().await).unwrap();
    assert_eq!(partner_d, c.id);
}

#[actix_web::test]
async fn repeated_disconnect_is_idempotent() {
    let server = MatchmakingServer::new().start();
    let (a, b, _room_id) = paired_clients(&server).await;

    server.send(Disconnect { id: a.id }).await.unwrap();
    server.send(Disconnect { id: a.id }).await.unwrap();

    // The partner is told exactly once, and the end state is the same.
    assert_eq!(
        b.received().await,
        vec![ServerWsMessage::StrangerDisconnected]
    );
    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.rooms, 0);
    assert_eq!(stats.waiting, 0);
    assert_eq!(stats.connections, 1);
}

#[actix_web::test]
async fn waiting_client_re_sending_find_stays_single() {
    let server = MatchmakingServer::new().start();
    let a = TestClient::connect(&server).await;

    a.find(&server).await;
    a.find(&server).await;

    assert_eq!(
        a.received().await,
        vec![
            ServerWsMessage::WaitingForStranger,
            ServerWsMessage::WaitingForStranger,
        ]
    );
    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.rooms, 0);
}

#[actix_web::test]
async fn stale_queue_head_is_dropped() {
    // Seed the queue with an id that was never registered, standing in for a
    // connection whose transport vanished.
    let mut server = MatchmakingServer::new();
    let ghost = Uuid::new_v4();
    server.queue.enqueue(ghost);
    let server = server.start();

    let a = TestClient::connect(&server).await;
    a.find(&server).await;

    // The dead head is discarded and this attempt falls through to waiting.
    assert_eq!(a.received().await, vec![ServerWsMessage::WaitingForStranger]);
    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.rooms, 0);
}

#[actix_web::test]
async fn disconnect_cancels_pending_redial() {
    let server = MatchmakingServer::with_redial_delay(Duration::from_millis(50)).start();
    let (a, b, _room_id) = paired_clients(&server).await;

    server.send(NextStranger { id: a.id }).await.unwrap();
    server.send(Disconnect { id: a.id }).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    // The timer never fired against the deregistered connection.
    assert_eq!(a.received().await, vec![ServerWsMessage::Disconnected]);
    assert_eq!(
        b.received().await,
        vec![ServerWsMessage::StrangerDisconnected]
    );
    let stats = server.send(GetStats).await.unwrap();
    assert_eq!(stats.waiting, 0);
    assert_eq!(stats.rooms, 0);
    assert_eq!(stats.connections, 1);
}

#[actix_web::test]
async fn next_pairs_with_new_waiter_after_delay() {
    let server = MatchmakingServer::with_redial_delay(Duration::from_millis(50)).start();
    let (a, b, _room_id) = paired_clients(&server).await;

    server.send(NextStranger { id: a.id }).await.unwrap();
    a.received().await;
    b.received().await;

    // The abandoned partner asks again and is waiting when the re-dial fires.
    b.find(&server).await;
    assert_eq!(b.received().await, vec![ServerWsMessage::WaitingForStranger]);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let (room_a, partner_a) = stranger_found(&a.received().await).unwrap();
    let (room_b, partner_b) = stranger_found(&b.received().await).unwrap();
    assert_eq!(room_a, room_b);
    assert_eq!(partner_a, b.id);
    assert_eq!(partner_b, a.id);
}
