//! Storage layer: the [`LedgerStore`] capability and its two backends.
//!
//! [`PostgresStore`] keeps the ledger in PostgreSQL via `sqlx::PgPool`;
//! [`MemoryStore`] keeps it in process memory and loses it on restart.
//! Exactly one is chosen at startup by [`open_store`] and shared by all
//! handlers as an `Arc<dyn LedgerStore>`.

pub mod memory;
pub mod models;
pub mod postgres;

#[cfg(test)]
pub(crate) mod conformance;

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::{LedgerConfig, StorageBackend};
use crate::domain::{Address, MigrationPlan, NewPool, NewTransaction, Pool, Transaction};
use crate::error::LedgerError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// CRUD operations over pools and transactions, plus the atomic migration
/// unit of work.
///
/// Both backends must behave identically; the shared conformance suite in
/// `storage::conformance` is run against each of them.
#[async_trait]
pub trait LedgerStore: Send + Sync + fmt::Debug {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new pool with `created_at = now`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PoolAlreadyExists`] if the address is taken,
    /// or [`LedgerError::Storage`] on backend failure.
    async fn create_pool(&self, pool: NewPool) -> Result<Pool, LedgerError>;

    /// Returns every pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn get_all_pools(&self) -> Result<Vec<Pool>, LedgerError>;

    /// Returns the pools whose owner equals `owner` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn get_pools_by_owner(&self, owner: &Address) -> Result<Vec<Pool>, LedgerError>;

    /// Looks up one pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn get_pool_by_address(&self, address: &Address) -> Result<Option<Pool>, LedgerError>;

    /// Overwrites a pool balance unconditionally. Returns `None` if the pool
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn update_pool_liquidity(
        &self,
        address: &Address,
        new_liquidity: u64,
    ) -> Result<Option<Pool>, LedgerError>;

    /// Returns every transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;

    /// Returns the transactions where `address` is the sender or receiver.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn get_transactions_by_address(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Records a transaction with a fresh id and `created_at = now`. No pool
    /// balance is touched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] on backend failure.
    async fn create_transaction(&self, record: NewTransaction) -> Result<Transaction, LedgerError>;

    /// Applies both sides of `plan` and records `record`, all or nothing.
    ///
    /// Each side is only written if the pool still holds its `expected`
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StaleBalance`] naming the first pool whose
    /// balance no longer matches, or [`LedgerError::Storage`] on backend
    /// failure. In both cases nothing is persisted.
    async fn apply_migration(
        &self,
        record: NewTransaction,
        plan: &MigrationPlan,
    ) -> Result<Transaction, LedgerError>;
}

/// Opens the storage backend selected by `config`.
///
/// - `memory`: always the in-process store.
/// - `postgres`: connects to `DATABASE_URL` and fails if it is unreachable.
/// - `auto`: tries PostgreSQL when `DATABASE_URL` is set and falls back to
///   memory on any connection or migration failure.
///
/// # Errors
///
/// Returns an error only for the `postgres` backend when the database is
/// missing, unreachable, or migrations fail.
pub async fn open_store(config: &LedgerConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("STORAGE_BACKEND=postgres requires DATABASE_URL")?;
            let store = PostgresStore::connect(url, config)
                .await
                .context("failed to open PostgreSQL storage")?;
            tracing::info!("using PostgreSQL storage");
            Ok(Arc::new(store))
        }
        StorageBackend::Auto => {
            let Some(url) = config.database_url.as_deref() else {
                tracing::info!("DATABASE_URL not set, using in-memory storage");
                return Ok(Arc::new(MemoryStore::new()));
            };
            match PostgresStore::connect(url, config).await {
                Ok(store) => {
                    tracing::info!("using PostgreSQL storage");
                    Ok(Arc::new(store))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "database unavailable, falling back to in-memory storage");
                    Ok(Arc::new(MemoryStore::new()))
                }
            }
        }
    }
}
