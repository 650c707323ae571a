//! Database rows for the `liquidity_pools` and `transactions` tables.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{Address, Pool, Transaction, TransactionKind};
use crate::error::LedgerError;

/// A row from the `liquidity_pools` table.
#[derive(Debug, Clone, FromRow)]
pub struct PoolRow {
    /// Pool address (unique).
    pub address: String,
    /// Controlling account.
    pub owner: String,
    /// Balance in smallest units.
    pub total_liquidity: i64,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Transaction type discriminator (e.g. `"migrate_liquidity"`).
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Source side.
    pub from_address: String,
    /// Destination side.
    pub to_address: String,
    /// Amount in smallest units.
    pub amount: i64,
    /// Status string.
    pub status: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PoolRow> for Pool {
    type Error = LedgerError;

    fn try_from(row: PoolRow) -> Result<Self, Self::Error> {
        Ok(Self {
            address: stored_address(&row.address)?,
            owner: stored_address(&row.owner)?,
            total_liquidity: stored_amount(row.total_liquidity)?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: u64::try_from(row.id)
                .map_err(|_| LedgerError::Storage(format!("negative transaction id {}", row.id)))?,
            kind: TransactionKind::parse(&row.kind)
                .map_err(|e| LedgerError::Storage(format!("corrupt transaction row: {e}")))?,
            from_address: stored_address(&row.from_address)?,
            to_address: stored_address(&row.to_address)?,
            amount: stored_amount(row.amount)?,
            status: row
                .status
                .parse()
                .map_err(|e| LedgerError::Storage(format!("corrupt transaction row: {e}")))?,
            created_at: row.created_at,
        })
    }
}

/// Converts a domain amount to the `BIGINT` column type.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRequest`] for values above `i64::MAX`.
pub fn to_db_amount(value: u64) -> Result<i64, LedgerError> {
    i64::try_from(value)
        .map_err(|_| LedgerError::InvalidRequest(format!("amount {value} out of range")))
}

fn stored_amount(value: i64) -> Result<u64, LedgerError> {
    u64::try_from(value).map_err(|_| LedgerError::Storage(format!("negative amount {value} in storage")))
}

fn stored_address(value: &str) -> Result<Address, LedgerError> {
    Address::parse(value).map_err(|e| LedgerError::Storage(format!("corrupt address column: {e}")))
}
