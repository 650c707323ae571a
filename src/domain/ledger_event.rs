//! Domain events reflecting ledger mutations.
//!
//! Every committed mutation emits a [`LedgerEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers, who
//! filter them by the addresses involved.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, Pool, Transaction, TransactionKind, TransactionStatus};

/// Domain event emitted after every committed mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Emitted when a new pool is created.
    PoolCreated {
        /// Pool address.
        address: Address,
        /// Controlling account.
        owner: Address,
        /// Initial balance.
        total_liquidity: u64,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a transaction row is recorded.
    TransactionRecorded {
        /// Transaction identifier.
        id: u64,
        /// Transaction type.
        kind: TransactionKind,
        /// Source side.
        from_address: Address,
        /// Destination side.
        to_address: Address,
        /// Amount in smallest units.
        amount: u64,
        /// Settlement status.
        status: TransactionStatus,
        /// Recording timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a migration moved liquidity between two pools.
    LiquidityMigrated {
        /// Transaction that carried the migration.
        transaction_id: u64,
        /// Source pool.
        from_address: Address,
        /// Destination pool.
        to_address: Address,
        /// Amount moved.
        amount: u64,
        /// Source balance after the migration.
        source_liquidity: u64,
        /// Destination balance after the migration.
        destination_liquidity: u64,
        /// Timestamp of the migration.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Builds a [`LedgerEvent::PoolCreated`] from a stored pool.
    #[must_use]
    pub fn pool_created(pool: &Pool) -> Self {
        Self::PoolCreated {
            address: pool.address.clone(),
            owner: pool.owner.clone(),
            total_liquidity: pool.total_liquidity,
            timestamp: pool.created_at,
        }
    }

    /// Builds a [`LedgerEvent::TransactionRecorded`] from a stored transaction.
    #[must_use]
    pub fn transaction_recorded(tx: &Transaction) -> Self {
        Self::TransactionRecorded {
            id: tx.id,
            kind: tx.kind.clone(),
            from_address: tx.from_address.clone(),
            to_address: tx.to_address.clone(),
            amount: tx.amount,
            status: tx.status,
            timestamp: tx.created_at,
        }
    }

    /// Returns `true` if the event concerns `address`, either as a pool, an
    /// owner, or a transaction side.
    #[must_use]
    pub fn involves(&self, address: &Address) -> bool {
        match self {
            Self::PoolCreated {
                address: pool,
                owner,
                ..
            } => pool == address || owner == address,
            Self::TransactionRecorded {
                from_address,
                to_address,
                ..
            }
            | Self::LiquidityMigrated {
                from_address,
                to_address,
                ..
            } => from_address == address || to_address == address,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::TransactionRecorded { .. } => "transaction_recorded",
            Self::LiquidityMigrated { .. } => "liquidity_migrated",
        }
    }
}
