//! Balance plan for a pool-to-pool migration.
//!
//! A [`MigrationPlan`] is computed from the two pool records read before the
//! write. Each side carries the balance it was computed from so the store
//! can refuse to apply the plan if either pool moved in the meantime.

use super::pool::MAX_AMOUNT;
use super::{Address, Pool};
use crate::error::LedgerError;

/// Compare-and-set instruction for a single pool balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    /// Pool to update.
    pub address: Address,
    /// Balance the plan was computed from.
    pub expected: u64,
    /// Balance to store.
    pub new: u64,
}

/// Debit of the source pool and credit of the destination pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Source pool debit.
    pub source: BalanceUpdate,
    /// Destination pool credit.
    pub destination: BalanceUpdate,
}

impl MigrationPlan {
    /// Plans moving `amount` from `source` to `destination`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidRequest`] if both pools are the same.
    /// - [`LedgerError::InsufficientLiquidity`] if the source balance is
    ///   below `amount`.
    /// - [`LedgerError::InvalidRequest`] if the destination balance would
    ///   exceed [`MAX_AMOUNT`].
    pub fn new(source: &Pool, destination: &Pool, amount: u64) -> Result<Self, LedgerError> {
        if source.address == destination.address {
            return Err(LedgerError::InvalidRequest(
                "source and destination pools must differ".to_string(),
            ));
        }

        let debited = source.total_liquidity.checked_sub(amount).ok_or_else(|| {
            LedgerError::InsufficientLiquidity {
                address: source.address.clone(),
                available: source.total_liquidity,
                requested: amount,
            }
        })?;

        let credited = destination
            .total_liquidity
            .checked_add(amount)
            .filter(|v| *v <= MAX_AMOUNT)
            .ok_or_else(|| {
                LedgerError::InvalidRequest(format!(
                    "pool {} balance would exceed {MAX_AMOUNT}",
                    destination.address
                ))
            })?;

        Ok(Self {
            source: BalanceUpdate {
                address: source.address.clone(),
                expected: source.total_liquidity,
                new: debited,
            },
            destination: BalanceUpdate {
                address: destination.address.clone(),
                expected: destination.total_liquidity,
                new: credited,
            },
        })
    }
}
