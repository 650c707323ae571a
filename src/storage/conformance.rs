//! Behaviour every [`LedgerStore`] backend must share.
//!
//! Each check uses fresh random addresses so it can run against a shared
//! PostgreSQL database as well as a new memory store.

#![allow(clippy::panic)]

use tokio_test::{assert_err, assert_ok};

use super::LedgerStore;
use crate::domain::{
    Address, MAX_AMOUNT, MigrationPlan, NewPool, NewTransaction, Pool, Transaction, TransactionKind,
    TransactionStatus,
};
use crate::error::LedgerError;

/// Random address with a readable prefix.
pub(crate) fn unique(prefix: &str) -> Address {
    let Ok(address) = Address::parse(&format!("{prefix}-{}", Address::random())) else {
        panic!("valid address");
    };
    address
}

fn addr(raw: &str) -> Address {
    let Ok(address) = Address::parse(raw) else {
        panic!("valid address");
    };
    address
}

pub(crate) async fn pool(
    store: &dyn LedgerStore,
    address: &Address,
    owner: &Address,
    liquidity: u64,
) -> Pool {
    let new_pool = assert_ok!(NewPool::new(address.clone(), owner.clone(), Some(liquidity)));
    assert_ok!(store.create_pool(new_pool).await)
}

fn migration(from: &Address, to: &Address, amount: u64) -> NewTransaction {
    assert_ok!(NewTransaction::new(
        TransactionKind::MigrateLiquidity,
        from.clone(),
        to.clone(),
        amount,
        TransactionStatus::Completed,
    ))
}

pub(crate) async fn record(
    store: &dyn LedgerStore,
    from: &str,
    to: &str,
    amount: u64,
) -> Transaction {
    let new_tx = assert_ok!(NewTransaction::new(
        TransactionKind::AddLiquidity,
        addr(from),
        addr(to),
        amount,
        TransactionStatus::Completed,
    ));
    assert_ok!(store.create_transaction(new_tx).await)
}

async fn balance(store: &dyn LedgerStore, address: &Address) -> u64 {
    let Some(pool) = assert_ok!(store.get_pool_by_address(address).await) else {
        panic!("pool {address} should exist");
    };
    pool.total_liquidity
}

pub(crate) async fn create_and_fetch_pool(store: &dyn LedgerStore) {
    let address = unique("pool");
    let owner = unique("owner");
    let created = pool(store, &address, &owner, 1_250).await;

    let Some(fetched) = assert_ok!(store.get_pool_by_address(&address).await) else {
        panic!("created pool must be readable");
    };
    assert_eq!(fetched.total_liquidity, 1_250);
    assert_eq!(fetched.owner, owner);
    assert_eq!(
        fetched.created_at.timestamp_micros(),
        created.created_at.timestamp_micros()
    );

    let missing = assert_ok!(store.get_pool_by_address(&unique("nope")).await);
    assert!(missing.is_none());

    let all = assert_ok!(store.get_all_pools().await);
    assert!(all.iter().any(|p| p.address == address));
}

pub(crate) async fn duplicate_pool_is_rejected(store: &dyn LedgerStore) {
    let address = unique("pool");
    pool(store, &address, &unique("first"), 10).await;

    let second = assert_ok!(NewPool::new(address.clone(), unique("second"), Some(99)));
    let err = assert_err!(store.create_pool(second).await);
    assert!(matches!(err, LedgerError::PoolAlreadyExists(ref a) if *a == address));

    assert_eq!(balance(store, &address).await, 10);
    let all = assert_ok!(store.get_all_pools().await);
    assert_eq!(all.iter().filter(|p| p.address == address).count(), 1);
}

pub(crate) async fn owner_filter_is_exact(store: &dyn LedgerStore) {
    let owner = unique("owner");
    let similar = assert_ok!(Address::parse(&format!("{owner}x")));
    let mine = unique("mine");
    pool(store, &mine, &owner, 1).await;
    pool(store, &unique("theirs"), &similar, 1).await;

    let found = assert_ok!(store.get_pools_by_owner(&owner).await);
    assert_eq!(found.len(), 1);
    assert!(found.iter().all(|p| p.owner == owner && p.address == mine));
}

pub(crate) async fn update_pool_liquidity_sets_absolute_value(store: &dyn LedgerStore) {
    let address = unique("pool");
    pool(store, &address, &unique("owner"), 500).await;

    let Some(updated) = assert_ok!(store.update_pool_liquidity(&address, 42).await) else {
        panic!("existing pool must update");
    };
    assert_eq!(updated.total_liquidity, 42);
    assert_eq!(balance(store, &address).await, 42);

    let missing = assert_ok!(store.update_pool_liquidity(&unique("nope"), 1).await);
    assert!(missing.is_none());
}

pub(crate) async fn update_beyond_max_amount_is_rejected(store: &dyn LedgerStore) {
    let address = unique("pool");
    pool(store, &address, &unique("owner"), 500).await;

    let err = assert_err!(store.update_pool_liquidity(&address, MAX_AMOUNT + 1).await);
    assert!(matches!(err, LedgerError::InvalidRequest(_)), "{err:?}");
    let err = assert_err!(store.update_pool_liquidity(&address, u64::MAX).await);
    assert!(matches!(err, LedgerError::InvalidRequest(_)), "{err:?}");
    assert_eq!(balance(store, &address).await, 500);

    let Some(updated) = assert_ok!(store.update_pool_liquidity(&address, MAX_AMOUNT).await) else {
        panic!("existing pool must update");
    };
    assert_eq!(updated.total_liquidity, MAX_AMOUNT);
}

pub(crate) async fn transaction_ids_increase(store: &dyn LedgerStore) {
    let a = unique("a");
    let b = unique("b");
    let first = record(store, a.as_str(), b.as_str(), 1).await;
    let second = record(store, a.as_str(), b.as_str(), 2).await;
    assert!(second.id > first.id);
    assert!(second.created_at >= first.created_at);
    assert_eq!(second.amount, 2);
}

pub(crate) async fn address_filter_matches_both_sides(store: &dyn LedgerStore) {
    let x = unique("x");
    let y = unique("y");
    let z = unique("z");
    let t1 = record(store, x.as_str(), y.as_str(), 10).await;
    let t2 = record(store, y.as_str(), z.as_str(), 20).await;
    record(store, x.as_str(), z.as_str(), 30).await;

    let mut ids: Vec<u64> = assert_ok!(store.get_transactions_by_address(&y).await)
        .iter()
        .map(|tx| tx.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![t1.id, t2.id]);
}

pub(crate) async fn migration_applies_atomically(store: &dyn LedgerStore) {
    let a = unique("a");
    let b = unique("b");
    let owner = unique("owner");
    let pool_a = pool(store, &a, &owner, 500).await;
    let pool_b = pool(store, &b, &owner, 200).await;

    let plan = assert_ok!(MigrationPlan::new(&pool_a, &pool_b, 100));
    let tx = assert_ok!(store.apply_migration(migration(&a, &b, 100), &plan).await);

    assert_eq!(tx.kind, TransactionKind::MigrateLiquidity);
    assert_eq!(balance(store, &a).await, 400);
    assert_eq!(balance(store, &b).await, 300);

    let recorded = assert_ok!(store.get_transactions_by_address(&a).await);
    assert_eq!(recorded.len(), 1);
}

pub(crate) async fn stale_migration_changes_nothing(store: &dyn LedgerStore) {
    let a = unique("a");
    let b = unique("b");
    let owner = unique("owner");
    let pool_a = pool(store, &a, &owner, 500).await;
    let pool_b = pool(store, &b, &owner, 200).await;
    let plan = assert_ok!(MigrationPlan::new(&pool_a, &pool_b, 100));

    // Another writer moves the destination after the plan was computed.
    assert_ok!(store.update_pool_liquidity(&b, 250).await);

    let err = assert_err!(store.apply_migration(migration(&a, &b, 100), &plan).await);
    assert!(matches!(err, LedgerError::StaleBalance(ref s) if *s == b));

    assert_eq!(balance(store, &a).await, 500);
    assert_eq!(balance(store, &b).await, 250);
    let recorded = assert_ok!(store.get_transactions_by_address(&a).await);
    assert!(recorded.is_empty());
}
