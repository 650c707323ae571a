//! Liquidity pool record and creation input.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Address;
use crate::error::LedgerError;

/// Upper bound for balances and amounts, in smallest units.
///
/// Matches the range of the relational `BIGINT` columns so both storage
/// backends accept exactly the same values.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// A named account holding a quantity of liquidity.
///
/// `total_liquidity` is expressed in the smallest unit; clients divide by
/// 100 for display. The address never changes after creation and the
/// balance is only mutated by migrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Unique pool address (primary key, immutable).
    pub address: Address,
    /// Controlling account.
    pub owner: Address,
    /// Current balance in smallest units.
    pub total_liquidity: u64,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
}

/// Validated input for pool creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPool {
    /// Address of the pool to create.
    pub address: Address,
    /// Controlling account.
    pub owner: Address,
    /// Initial balance in smallest units.
    pub total_liquidity: u64,
}

impl NewPool {
    /// Builds a pool creation input. A missing balance defaults to zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if the balance exceeds
    /// [`MAX_AMOUNT`].
    pub fn new(
        address: Address,
        owner: Address,
        total_liquidity: Option<u64>,
    ) -> Result<Self, LedgerError> {
        let total_liquidity = total_liquidity.unwrap_or(0);
        check_amount("totalLiquidity", total_liquidity)?;
        Ok(Self {
            address,
            owner,
            total_liquidity,
        })
    }

    /// Materializes the pool with the given creation time.
    #[must_use]
    pub fn into_pool(self, created_at: DateTime<Utc>) -> Pool {
        Pool {
            address: self.address,
            owner: self.owner,
            total_liquidity: self.total_liquidity,
            created_at,
        }
    }
}

/// Rejects amounts above [`MAX_AMOUNT`].
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRequest`] naming `field` when out of range.
pub fn check_amount(field: &str, value: u64) -> Result<(), LedgerError> {
    if value > MAX_AMOUNT {
        return Err(LedgerError::InvalidRequest(format!(
            "{field} must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}
