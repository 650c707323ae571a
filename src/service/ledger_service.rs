//! Ledger service: pool creation, transaction recording, and migrations.

use std::sync::Arc;

use crate::config::MissingPoolPolicy;
use crate::domain::pool::check_amount;
use crate::domain::{
    Address, EventBus, LedgerEvent, MigrationPlan, NewPool, NewTransaction, Pool, Transaction,
    TransactionKind,
};
use crate::error::LedgerError;
use crate::storage::LedgerStore;

/// Orchestration layer for all ledger operations.
///
/// Owns a handle to the [`LedgerStore`] for state and the [`EventBus`] for
/// event emission. Every mutation follows the pattern: validate → write to
/// the store → emit events → return the stored record. Events are only
/// published after the store accepted the write.
#[derive(Debug, Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    event_bus: EventBus,
    missing_pool_policy: MissingPoolPolicy,
}

impl LedgerService {
    /// Creates a new `LedgerService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        event_bus: EventBus,
        missing_pool_policy: MissingPoolPolicy,
    ) -> Self {
        Self {
            store,
            event_bus,
            missing_pool_policy,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the name of the active storage backend.
    #[must_use]
    pub fn storage_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Creates a new pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PoolAlreadyExists`] if the address is taken,
    /// or a storage error.
    pub async fn create_pool(&self, new_pool: NewPool) -> Result<Pool, LedgerError> {
        let pool = self.store.create_pool(new_pool).await?;

        self.event_bus.publish(LedgerEvent::pool_created(&pool));
        tracing::info!(
            address = %pool.address,
            owner = %pool.owner,
            total_liquidity = pool.total_liquidity,
            "pool created"
        );
        Ok(pool)
    }

    /// Returns every pool.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_pools(&self) -> Result<Vec<Pool>, LedgerError> {
        self.store.get_all_pools().await
    }

    /// Returns the pools owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn pools_by_owner(&self, owner: &Address) -> Result<Vec<Pool>, LedgerError> {
        self.store.get_pools_by_owner(owner).await
    }

    /// Returns one pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PoolNotFound`] if no pool has that address.
    pub async fn pool(&self, address: &Address) -> Result<Pool, LedgerError> {
        self.store
            .get_pool_by_address(address)
            .await?
            .ok_or_else(|| LedgerError::PoolNotFound(address.clone()))
    }

    /// Overwrites a pool balance. No concurrency check: callers that derive
    /// `new_liquidity` from a prior read race with migrations.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if `new_liquidity` exceeds
    /// [`MAX_AMOUNT`](crate::domain::MAX_AMOUNT), or
    /// [`LedgerError::PoolNotFound`] if no pool has that address.
    pub async fn update_pool_liquidity(
        &self,
        address: &Address,
        new_liquidity: u64,
    ) -> Result<Pool, LedgerError> {
        check_amount("newLiquidity", new_liquidity)?;
        let pool = self
            .store
            .update_pool_liquidity(address, new_liquidity)
            .await?
            .ok_or_else(|| LedgerError::PoolNotFound(address.clone()))?;
        tracing::debug!(%address, new_liquidity, "pool liquidity overwritten");
        Ok(pool)
    }

    /// Returns every transaction.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        self.store.get_all_transactions().await
    }

    /// Returns the transactions sent from or to `address`.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn transactions_for(&self, address: &Address) -> Result<Vec<Transaction>, LedgerError> {
        self.store.get_transactions_by_address(address).await
    }

    /// Records a transaction. A `migrate_liquidity` record also moves the
    /// amount between the two pools in the same unit of work.
    ///
    /// # Errors
    ///
    /// For migrations: [`LedgerError::InvalidRequest`] when both sides are
    /// the same pool, [`LedgerError::InsufficientLiquidity`],
    /// [`LedgerError::StaleBalance`] if a pool changed concurrently, and
    /// [`LedgerError::PoolNotFound`] under [`MissingPoolPolicy::Reject`].
    /// Storage errors for every kind.
    pub async fn record_transaction(
        &self,
        record: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let tx = match record.kind {
            TransactionKind::MigrateLiquidity => self.record_migration(record).await?,
            TransactionKind::CreatePool
            | TransactionKind::AddLiquidity
            | TransactionKind::Other(_) => self.store.create_transaction(record).await?,
        };

        self.event_bus.publish(LedgerEvent::transaction_recorded(&tx));
        tracing::info!(
            tx_id = tx.id,
            kind = %tx.kind,
            from = %tx.from_address,
            to = %tx.to_address,
            amount = tx.amount,
            "transaction recorded"
        );
        Ok(tx)
    }

    async fn record_migration(&self, record: NewTransaction) -> Result<Transaction, LedgerError> {
        if record.from_address == record.to_address {
            return Err(LedgerError::InvalidRequest(
                "source and destination pools must differ".to_string(),
            ));
        }

        let source = self.store.get_pool_by_address(&record.from_address).await?;
        let destination = self.store.get_pool_by_address(&record.to_address).await?;

        let (source, destination) = match (source, destination) {
            (Some(s), Some(d)) => (s, d),
            (source, _) => {
                let missing = if source.is_none() {
                    &record.from_address
                } else {
                    &record.to_address
                };
                return match self.missing_pool_policy {
                    MissingPoolPolicy::Reject => Err(LedgerError::PoolNotFound(missing.clone())),
                    MissingPoolPolicy::Record => {
                        tracing::warn!(
                            %missing,
                            amount = record.amount,
                            "migration references unknown pool; recording without balance change"
                        );
                        self.store.create_transaction(record).await
                    }
                };
            }
        };

        let plan = MigrationPlan::new(&source, &destination, record.amount)?;
        let amount = record.amount;
        let tx = self.store.apply_migration(record, &plan).await?;

        self.event_bus.publish(LedgerEvent::LiquidityMigrated {
            transaction_id: tx.id,
            from_address: plan.source.address.clone(),
            to_address: plan.destination.address.clone(),
            amount,
            source_liquidity: plan.source.new,
            destination_liquidity: plan.destination.new,
            timestamp: tx.created_at,
        });
        tracing::info!(
            tx_id = tx.id,
            from = %plan.source.address,
            to = %plan.destination.address,
            amount,
            source_liquidity = plan.source.new,
            destination_liquidity = plan.destination.new,
            "liquidity migrated"
        );
        Ok(tx)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use crate::storage::MemoryStore;

    fn addr(s: &str) -> Address {
        let Ok(a) = Address::parse(s) else {
            panic!("valid address");
        };
        a
    }

    fn make_service(policy: MissingPoolPolicy) -> LedgerService {
        LedgerService::new(Arc::new(MemoryStore::new()), EventBus::new(64), policy)
    }

    async fn seed(service: &LedgerService, address: &str, liquidity: u64) {
        let Ok(new_pool) = NewPool::new(addr(address), addr("0xowner"), Some(liquidity)) else {
            panic!("valid pool");
        };
        let Ok(_) = service.create_pool(new_pool).await else {
            panic!("pool creation failed");
        };
    }

    fn migrate(from: &str, to: &str, amount: u64) -> NewTransaction {
        let Ok(record) = NewTransaction::new(
            TransactionKind::MigrateLiquidity,
            addr(from),
            addr(to),
            amount,
            TransactionStatus::Completed,
        ) else {
            panic!("valid record");
        };
        record
    }

    async fn balance(service: &LedgerService, address: &str) -> u64 {
        let Ok(pool) = service.pool(&addr(address)).await else {
            panic!("pool {address} should exist");
        };
        pool.total_liquidity
    }

    #[tokio::test]
    async fn create_pool_round_trip_and_event() {
        let service = make_service(MissingPoolPolicy::Record);
        let mut rx = service.event_bus().subscribe();

        seed(&service, "0xa", 750).await;

        let Ok(pool) = service.pool(&addr("0xa")).await else {
            panic!("pool not found");
        };
        assert_eq!(pool.total_liquidity, 750);

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "pool_created");
    }

    #[tokio::test]
    async fn duplicate_pool_keeps_first() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 10).await;

        let Ok(dup) = NewPool::new(addr("0xa"), addr("0xsomeone"), Some(99)) else {
            panic!("valid pool");
        };
        let result = service.create_pool(dup).await;
        assert!(matches!(result, Err(LedgerError::PoolAlreadyExists(_))));
        assert_eq!(balance(&service, "0xa").await, 10);
    }

    #[tokio::test]
    async fn migration_moves_balance() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 500).await;
        seed(&service, "0xb", 200).await;

        let Ok(tx) = service.record_transaction(migrate("0xa", "0xb", 100)).await else {
            panic!("migration failed");
        };
        assert_eq!(tx.amount, 100);
        assert_eq!(balance(&service, "0xa").await, 400);
        assert_eq!(balance(&service, "0xb").await, 300);
    }

    #[tokio::test]
    async fn migration_emits_balances() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 500).await;
        seed(&service, "0xb", 200).await;
        let mut rx = service.event_bus().subscribe();

        let Ok(_) = service.record_transaction(migrate("0xa", "0xb", 100)).await else {
            panic!("migration failed");
        };

        let Ok(LedgerEvent::LiquidityMigrated {
            source_liquidity,
            destination_liquidity,
            ..
        }) = rx.recv().await
        else {
            panic!("expected liquidity_migrated first");
        };
        assert_eq!((source_liquidity, destination_liquidity), (400, 300));

        let Ok(event) = rx.recv().await else {
            panic!("expected transaction_recorded");
        };
        assert_eq!(event.event_type_str(), "transaction_recorded");
    }

    #[tokio::test]
    async fn missing_pool_is_recorded_without_balance_change() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 500).await;

        let Ok(tx) = service.record_transaction(migrate("0xa", "0xghost", 100)).await else {
            panic!("record policy must accept");
        };
        assert_eq!(tx.kind, TransactionKind::MigrateLiquidity);
        assert_eq!(balance(&service, "0xa").await, 500);

        let Ok(all) = service.list_transactions().await else {
            panic!("listing failed");
        };
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn missing_source_is_recorded_without_balance_change() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xb", 200).await;

        let Ok(tx) = service.record_transaction(migrate("0xghost", "0xb", 100)).await else {
            panic!("record policy must accept");
        };
        assert_eq!(tx.from_address, addr("0xghost"));
        assert_eq!(balance(&service, "0xb").await, 200);

        let Ok(history) = service.transactions_for(&addr("0xb")).await else {
            panic!("listing failed");
        };
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn missing_pool_is_rejected_under_reject_policy() {
        let service = make_service(MissingPoolPolicy::Reject);
        seed(&service, "0xb", 500).await;

        let result = service.record_transaction(migrate("0xghost", "0xb", 100)).await;
        let Err(LedgerError::PoolNotFound(missing)) = result else {
            panic!("expected pool not found");
        };
        assert_eq!(missing.as_str(), "0xghost");

        let Ok(all) = service.list_transactions().await else {
            panic!("listing failed");
        };
        assert!(all.is_empty());
        assert_eq!(balance(&service, "0xb").await, 500);
    }

    #[tokio::test]
    async fn overdraw_records_nothing() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 50).await;
        seed(&service, "0xb", 0).await;

        let result = service.record_transaction(migrate("0xa", "0xb", 51)).await;
        assert!(matches!(result, Err(LedgerError::InsufficientLiquidity { .. })));
        assert_eq!(balance(&service, "0xa").await, 50);

        let Ok(all) = service.list_transactions().await else {
            panic!("listing failed");
        };
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn self_migration_is_invalid() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 50).await;
        let result = service.record_transaction(migrate("0xa", "0xa", 5)).await;
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn other_kinds_do_not_touch_pools() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 500).await;

        let Ok(record) = NewTransaction::new(
            TransactionKind::AddLiquidity,
            addr("0xwallet"),
            addr("0xa"),
            100,
            TransactionStatus::Completed,
        ) else {
            panic!("valid record");
        };
        let Ok(_) = service.record_transaction(record).await else {
            panic!("record failed");
        };
        assert_eq!(balance(&service, "0xa").await, 500);
    }

    #[tokio::test]
    async fn concurrent_migrations_never_lose_updates() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 1_000).await;
        seed(&service, "0xb", 0).await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let svc = service.clone();
            handles.push(tokio::spawn(async move {
                svc.record_transaction(migrate("0xa", "0xb", 10)).await
            }));
        }

        let mut applied = 0u64;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => applied += 1,
                Ok(Err(LedgerError::StaleBalance(_))) => {}
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        let a = balance(&service, "0xa").await;
        let b = balance(&service, "0xb").await;
        assert_eq!(a + b, 1_000);
        assert_eq!(b, applied * 10);

        let Ok(txs) = service.transactions_for(&addr("0xb")).await else {
            panic!("listing failed");
        };
        assert_eq!(txs.len() as u64, applied);
    }

    #[tokio::test]
    async fn update_pool_liquidity_is_bounded() {
        let service = make_service(MissingPoolPolicy::Record);
        seed(&service, "0xa", 500).await;

        let result = service.update_pool_liquidity(&addr("0xa"), u64::MAX).await;
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
        assert_eq!(balance(&service, "0xa").await, 500);

        let Ok(pool) = service.update_pool_liquidity(&addr("0xa"), 42).await else {
            panic!("in-range update must succeed");
        };
        assert_eq!(pool.total_liquidity, 42);
    }

    #[tokio::test]
    async fn update_pool_liquidity_unknown_pool_is_not_found() {
        let service = make_service(MissingPoolPolicy::Record);
        let result = service.update_pool_liquidity(&addr("0xnone"), 5).await;
        assert!(matches!(result, Err(LedgerError::PoolNotFound(_))));
    }
}
