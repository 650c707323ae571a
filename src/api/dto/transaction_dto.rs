//! Transaction DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, NewTransaction, Transaction, TransactionKind, TransactionStatus};
use crate::error::LedgerError;

/// Request body for `POST /api/transactions`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// `create_pool`, `migrate_liquidity`, `add_liquidity`, or any other
    /// non-empty type string.
    #[serde(rename = "type")]
    #[schema(example = "migrate_liquidity")]
    pub kind: String,
    /// Funding account or source pool.
    pub from_address: String,
    /// New pool or destination pool.
    pub to_address: String,
    /// Amount in smallest units.
    pub amount: u64,
    /// `pending`, `completed` or `failed`. Defaults to `completed`.
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateTransactionRequest {
    /// Validates the request into a [`NewTransaction`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] for blank fields or an
    /// out-of-range amount, and [`LedgerError::InvalidStatus`] for an
    /// unknown status.
    pub fn into_new_transaction(self) -> Result<NewTransaction, LedgerError> {
        let kind = TransactionKind::parse(&self.kind)?;
        let from_address = Address::parse(&self.from_address)
            .map_err(|_| LedgerError::InvalidRequest("fromAddress must not be empty".to_string()))?;
        let to_address = Address::parse(&self.to_address)
            .map_err(|_| LedgerError::InvalidRequest("toAddress must not be empty".to_string()))?;
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => TransactionStatus::default(),
        };
        NewTransaction::new(kind, from_address, to_address, self.amount, status)
    }
}

/// A transaction as returned by every transaction endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Monotonically increasing identifier.
    pub id: u64,
    /// Transaction type string.
    #[serde(rename = "type")]
    pub kind: String,
    /// Funding account or source pool.
    pub from_address: String,
    /// New pool or destination pool.
    pub to_address: String,
    /// Amount in smallest units.
    pub amount: u64,
    /// Status string.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind.into(),
            from_address: tx.from_address.into(),
            to_address: tx.to_address.into(),
            amount: tx.amount,
            status: tx.status.as_str().to_string(),
            created_at: tx.created_at,
        }
    }
}
