//! Simulated wallet: random addresses and a fixed starting balance.
//!
//! There is no chain behind this. It exists so clients can obtain account
//! and pool addresses without a real wallet extension.

use serde::Serialize;

use super::Address;

/// Balance granted to every simulated wallet, in smallest units (100 tokens).
pub const SIMULATED_WALLET_BALANCE: u64 = 10_000;

/// A freshly connected simulated wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedWallet {
    /// Random account address.
    pub address: Address,
    /// Starting balance in smallest units.
    pub balance: u64,
}

impl SimulatedWallet {
    /// "Connects" a wallet by generating a new account.
    #[must_use]
    pub fn connect() -> Self {
        Self {
            address: Address::random(),
            balance: SIMULATED_WALLET_BALANCE,
        }
    }
}
