//! # liquidity-ledger
//!
//! REST API and WebSocket service for a liquidity ledger: pools holding an
//! integer balance, and an append-only log of transactions between
//! addresses.
//!
//! Recording a `migrate_liquidity` transaction moves the amount from the
//! source pool to the destination pool. The record and both balance changes
//! commit together or not at all, and a balance that changed underneath the
//! migration is reported as a conflict instead of being overwritten.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── LedgerService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── LedgerStore (storage/)
//!     │     ├── MemoryStore
//!     │     └── PostgresStore
//! ```

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod ws;
