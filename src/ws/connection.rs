//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{Address, LedgerEvent};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and updates its subscriptions.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<LedgerEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(text.as_str(), &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(ledger_event) => {
                        if subs.matches(&ledger_event) {
                            let msg = WsMessage::new(
                                uuid::Uuid::new_v4().to_string(),
                                WsMessageType::Event,
                                serde_json::to_value(&ledger_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn error_message(id: String, code: u16, message: &str) -> Option<String> {
    let err = WsMessage::new(
        id,
        WsMessageType::Error,
        serde_json::json!({ "code": code, "message": message }),
    );
    serde_json::to_string(&err).ok()
}

/// Splits raw address strings into parsed addresses and the wildcard flag.
/// Blank entries are skipped.
fn parse_addresses(raw: &[String]) -> (Vec<Address>, bool) {
    let wildcard = raw.iter().any(|s| s.trim() == "*");
    let addresses = raw
        .iter()
        .filter(|s| s.trim() != "*")
        .filter_map(|s| Address::parse(s).ok())
        .collect();
    (addresses, wildcard)
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return error_message(String::new(), 400, "malformed JSON");
    };

    if msg.msg_type != WsMessageType::Command {
        return error_message(msg.id, 400, "expected a command message");
    }

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return error_message(msg.id, 404, "unknown command");
    };

    let payload = match command {
        WsCommand::Subscribe { addresses } => {
            let (addresses, wildcard) = parse_addresses(&addresses);
            subs.subscribe(&addresses, wildcard);
            serde_json::json!({
                "subscribed": addresses.iter().map(Address::as_str).collect::<Vec<_>>(),
                "count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            })
        }
        WsCommand::Unsubscribe { addresses } => {
            let (addresses, wildcard) = parse_addresses(&addresses);
            subs.unsubscribe(&addresses, wildcard);
            serde_json::json!({
                "unsubscribed": addresses.iter().map(Address::as_str).collect::<Vec<_>>(),
                "remaining_count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
            })
        }
    };

    let response = WsMessage::new(msg.id, WsMessageType::Response, payload);
    serde_json::to_string(&response).ok()
}
