//! Pool-related DTOs for create, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, NewPool, Pool};
use crate::error::LedgerError;

/// Request body for `POST /api/pools`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    /// Pool address; must be non-empty and unused.
    #[schema(example = "0x3f5e0c2a9b7d4e1f8a6c3b2d1e0f9a8b7c6d5e4f")]
    pub address: String,
    /// Controlling account.
    pub owner: String,
    /// Initial balance in smallest units. Defaults to 0.
    #[serde(default)]
    pub total_liquidity: Option<u64>,
}

impl CreatePoolRequest {
    /// Validates the request into a [`NewPool`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] for blank addresses or an
    /// out-of-range balance.
    pub fn into_new_pool(self) -> Result<NewPool, LedgerError> {
        let address = Address::parse(&self.address)
            .map_err(|_| LedgerError::InvalidRequest("address must not be empty".to_string()))?;
        let owner = Address::parse(&self.owner)
            .map_err(|_| LedgerError::InvalidRequest("owner must not be empty".to_string()))?;
        NewPool::new(address, owner, self.total_liquidity)
    }
}

/// A pool as returned by every pool endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolDto {
    /// Pool address.
    pub address: String,
    /// Controlling account.
    pub owner: String,
    /// Balance in smallest units.
    pub total_liquidity: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Pool> for PoolDto {
    fn from(pool: Pool) -> Self {
        Self {
            address: pool.address.into(),
            owner: pool.owner.into(),
            total_liquidity: pool.total_liquidity,
            created_at: pool.created_at,
        }
    }
}
