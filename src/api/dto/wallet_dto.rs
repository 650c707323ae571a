//! Simulated wallet DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SimulatedWallet;

/// Response body for `POST /api/wallet/connect`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletResponse {
    /// Random account address.
    pub address: String,
    /// Starting balance in smallest units.
    pub balance: u64,
}

impl From<SimulatedWallet> for WalletResponse {
    fn from(wallet: SimulatedWallet) -> Self {
        Self {
            address: wallet.address.into(),
            balance: wallet.balance,
        }
    }
}
