//! Ledger transaction records.
//!
//! [`TransactionKind`] and [`TransactionStatus`] are closed enums inside the
//! crate. They are converted to and from plain strings only at the JSON and
//! SQL boundaries; unknown kinds found there are kept verbatim in
//! [`TransactionKind::Other`] so older or newer rows still load.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Address;
use super::pool::check_amount;
use crate::error::LedgerError;

/// What a transaction represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionKind {
    /// Funding account created a new pool.
    CreatePool,
    /// Liquidity moved from one pool to another.
    MigrateLiquidity,
    /// Liquidity was added to a pool.
    AddLiquidity,
    /// Any other non-empty type string.
    Other(String),
}

impl TransactionKind {
    /// Returns the wire/storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreatePool => "create_pool",
            Self::MigrateLiquidity => "migrate_liquidity",
            Self::AddLiquidity => "add_liquidity",
            Self::Other(raw) => raw,
        }
    }

    /// Parses a type string. Unknown non-empty values map to [`Self::Other`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] for a blank string.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        match raw.trim() {
            "" => Err(LedgerError::InvalidRequest(
                "transaction type must not be empty".to_string(),
            )),
            "create_pool" => Ok(Self::CreatePool),
            "migrate_liquidity" => Ok(Self::MigrateLiquidity),
            "add_liquidity" => Ok(Self::AddLiquidity),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Settlement status, set once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Submitted but not settled.
    Pending,
    /// Settled.
    #[default]
    Completed,
    /// Rejected or reverted.
    Failed,
}

impl TransactionStatus {
    /// Returns the wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(LedgerError::InvalidStatus(other.to_string())),
        }
    }
}

/// A persisted, immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Monotonically increasing identifier.
    pub id: u64,
    /// Transaction type.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Funding account or source pool.
    pub from_address: Address,
    /// New pool or destination pool.
    pub to_address: Address,
    /// Amount in smallest units.
    pub amount: u64,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns `true` if `address` is either side of the transaction.
    #[must_use]
    pub fn involves(&self, address: &Address) -> bool {
        &self.from_address == address || &self.to_address == address
    }
}

/// Validated input for recording a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Transaction type.
    pub kind: TransactionKind,
    /// Funding account or source pool.
    pub from_address: Address,
    /// New pool or destination pool.
    pub to_address: Address,
    /// Amount in smallest units.
    pub amount: u64,
    /// Settlement status.
    pub status: TransactionStatus,
}

impl NewTransaction {
    /// Builds a transaction input.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if `amount` is out of range.
    pub fn new(
        kind: TransactionKind,
        from_address: Address,
        to_address: Address,
        amount: u64,
        status: TransactionStatus,
    ) -> Result<Self, LedgerError> {
        check_amount("amount", amount)?;
        Ok(Self {
            kind,
            from_address,
            to_address,
            amount,
            status,
        })
    }

    /// Materializes the record with its assigned id and creation time.
    #[must_use]
    pub fn into_transaction(self, id: u64, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            from_address: self.from_address,
            to_address: self.to_address,
            amount: self.amount,
            status: self.status,
            created_at,
        }
    }
}
