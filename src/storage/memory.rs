//! In-process ledger storage.
//!
//! [`MemoryStore`] keeps pools in a `HashMap` keyed by address and
//! transactions in an append-only `Vec`, all behind one
//! [`tokio::sync::RwLock`]. Data does not survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::LedgerStore;
use crate::domain::pool::check_amount;
use crate::domain::{Address, MigrationPlan, NewPool, NewTransaction, Pool, Transaction};
use crate::error::LedgerError;

/// Ledger contents guarded by the store lock.
#[derive(Debug, Default)]
struct LedgerTables {
    pools: HashMap<Address, Pool>,
    /// Insertion order of `pools`, so listings are stable.
    pool_order: Vec<Address>,
    transactions: Vec<Transaction>,
    next_tx_id: u64,
}

impl LedgerTables {
    fn ordered_pools(&self) -> impl Iterator<Item = &Pool> {
        self.pool_order.iter().filter_map(|a| self.pools.get(a))
    }

    fn push_transaction(&mut self, record: NewTransaction) -> Transaction {
        self.next_tx_id = self.next_tx_id.saturating_add(1);
        let tx = record.into_transaction(self.next_tx_id, Utc::now());
        self.transactions.push(tx.clone());
        tx
    }

    fn balance_matches(&self, address: &Address, expected: u64) -> bool {
        self.pools
            .get(address)
            .is_some_and(|p| p.total_liquidity == expected)
    }

    fn set_balance(&mut self, address: &Address, value: u64) -> Option<Pool> {
        let pool = self.pools.get_mut(address)?;
        pool.total_liquidity = value;
        Some(pool.clone())
    }
}

/// Ephemeral [`LedgerStore`] used when no database is reachable, and in tests.
///
/// # Concurrency
///
/// Reads share the lock; every mutation, including the whole migration
/// unit of work, holds the write lock for its full duration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<LedgerTables>,
}

impl MemoryStore {
    /// Creates an empty store. Transaction ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_pool(&self, pool: NewPool) -> Result<Pool, LedgerError> {
        let mut tables = self.tables.write().await;
        if tables.pools.contains_key(&pool.address) {
            return Err(LedgerError::PoolAlreadyExists(pool.address));
        }
        let pool = pool.into_pool(Utc::now());
        tables.pool_order.push(pool.address.clone());
        tables.pools.insert(pool.address.clone(), pool.clone());
        Ok(pool)
    }

    async fn get_all_pools(&self) -> Result<Vec<Pool>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.ordered_pools().cloned().collect())
    }

    async fn get_pools_by_owner(&self, owner: &Address) -> Result<Vec<Pool>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .ordered_pools()
            .filter(|p| &p.owner == owner)
            .cloned()
            .collect())
    }

    async fn get_pool_by_address(&self, address: &Address) -> Result<Option<Pool>, LedgerError> {
        Ok(self.tables.read().await.pools.get(address).cloned())
    }

    async fn update_pool_liquidity(
        &self,
        address: &Address,
        new_liquidity: u64,
    ) -> Result<Option<Pool>, LedgerError> {
        check_amount("newLiquidity", new_liquidity)?;
        Ok(self.tables.write().await.set_balance(address, new_liquidity))
    }

    async fn get_all_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.tables.read().await.transactions.clone())
    }

    async fn get_transactions_by_address(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .filter(|tx| tx.involves(address))
            .cloned()
            .collect())
    }

    async fn create_transaction(&self, record: NewTransaction) -> Result<Transaction, LedgerError> {
        Ok(self.tables.write().await.push_transaction(record))
    }

    async fn apply_migration(
        &self,
        record: NewTransaction,
        plan: &MigrationPlan,
    ) -> Result<Transaction, LedgerError> {
        let mut tables = self.tables.write().await;

        // Check both sides before touching anything.
        for side in [&plan.source, &plan.destination] {
            if !tables.balance_matches(&side.address, side.expected) {
                return Err(LedgerError::StaleBalance(side.address.clone()));
            }
        }

        tables.set_balance(&plan.source.address, plan.source.new);
        tables.set_balance(&plan.destination.address, plan.destination.new);
        Ok(tables.push_transaction(record))
    }
}
