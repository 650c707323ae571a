//! Service layer: business logic orchestration.
//!
//! [`LedgerService`] validates ledger operations, delegates persistence to
//! the [`crate::storage::LedgerStore`], and emits events through the
//! [`crate::domain::EventBus`].

pub mod ledger_service;

pub use ledger_service::LedgerService;
