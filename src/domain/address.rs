//! Type-safe account and pool address.
//!
//! [`Address`] is a newtype wrapper around a non-empty string. Addresses are
//! opaque to the ledger: they come from the wallet simulator or from clients
//! and are compared byte-for-byte.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Opaque identifier of a pool or an account.
///
/// Immutable once created. Used as the primary key of pools, as the
/// `from`/`to` side of transactions, and as the WebSocket subscription
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parses an address. The input is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if the input is blank or has
    /// leading or trailing whitespace.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        if raw.trim().is_empty() {
            return Err(LedgerError::InvalidRequest(
                "address must not be empty".to_string(),
            ));
        }
        if raw.trim() != raw {
            return Err(LedgerError::InvalidRequest(format!(
                "address {raw:?} must not have surrounding whitespace"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Generates a random `0x`-prefixed address with 40 lowercase hex digits.
    #[must_use]
    pub fn random() -> Self {
        let hi = uuid::Uuid::new_v4().simple().to_string();
        let lo = uuid::Uuid::new_v4().simple().to_string();
        let digits: String = hi.chars().chain(lo.chars()).take(40).collect();
        Self(format!("0x{digits}"))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
