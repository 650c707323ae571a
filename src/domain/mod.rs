//! Domain layer: ledger records, migration planning, and the event system.
//!
//! This module contains the server-side domain model: addresses, pools,
//! transactions, the balance plan applied by migrations, the simulated
//! wallet, and the event bus broadcasting committed changes.

pub mod address;
pub mod event_bus;
pub mod ledger_event;
pub mod migration;
pub mod pool;
pub mod transaction;
pub mod wallet;

pub use address::Address;
pub use event_bus::EventBus;
pub use ledger_event::LedgerEvent;
pub use migration::{BalanceUpdate, MigrationPlan};
pub use pool::{MAX_AMOUNT, NewPool, Pool};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionStatus};
pub use wallet::SimulatedWallet;
