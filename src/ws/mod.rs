//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams ledger events to clients that
//! subscribe to pool or account addresses.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
