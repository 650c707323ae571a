//! WebSocket subscription tests against a live server.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use std::time::Duration;

use common::TestServer;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no websocket message within timeout");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                panic!("non-JSON frame: {}", text.as_str());
            };
            return value;
        }
    }
}

async fn subscribe(server: &TestServer, addresses: &[&str]) -> Socket {
    let url = format!("ws://{}/ws", server.addr);
    let Ok((mut socket, _)) = connect_async(url).await else {
        panic!("websocket connect failed");
    };
    let command = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": "2025-01-01T00:00:00Z",
        "payload": {"command": "subscribe", "addresses": addresses},
    });
    let Ok(()) = socket.send(Message::text(command.to_string())).await else {
        panic!("send subscribe failed");
    };
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "response");
    assert_eq!(ack["id"], "sub-1");
    socket
}

#[tokio::test]
async fn migration_events_reach_address_subscribers() {
    let server = TestServer::start().await;
    server.create_pool("0xA", "0xo", 500).await;
    server.create_pool("0xB", "0xo", 200).await;

    let mut socket = subscribe(&server, &["0xB"]).await;

    let (status, _) = server.migrate("0xA", "0xB", 100).await;
    assert_eq!(status, 201);

    let migrated = next_json(&mut socket).await;
    assert_eq!(migrated["type"], "event");
    assert_eq!(migrated["payload"]["event_type"], "liquidity_migrated");
    assert_eq!(migrated["payload"]["source_liquidity"], 400);
    assert_eq!(migrated["payload"]["destination_liquidity"], 300);

    let recorded = next_json(&mut socket).await;
    assert_eq!(recorded["payload"]["event_type"], "transaction_recorded");
}

#[tokio::test]
async fn wildcard_subscriber_sees_pool_creation() {
    let server = TestServer::start().await;
    let mut socket = subscribe(&server, &["*"]).await;

    server.create_pool("0xnew", "0xo", 7).await;

    let event = next_json(&mut socket).await;
    assert_eq!(event["payload"]["event_type"], "pool_created");
    assert_eq!(event["payload"]["address"], "0xnew");
}
