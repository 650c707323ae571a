//! Per-connection subscription manager.
//!
//! Tracks which addresses a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::{Address, LedgerEvent};

/// Manages the set of address subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Followed addresses. Ignored while `subscribe_all` is set.
    addresses: HashSet<Address>,
    /// Whether the client follows everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds addresses to the subscription set and optionally enables the
    /// wildcard.
    pub fn subscribe(&mut self, addresses: &[Address], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.addresses.extend(addresses.iter().cloned());
    }

    /// Removes addresses from the subscription set. `"*"` clears the
    /// wildcard.
    pub fn unsubscribe(&mut self, addresses: &[Address], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for address in addresses {
            self.addresses.remove(address);
        }
    }

    /// Returns `true` if the event involves a followed address.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.subscribe_all || self.addresses.iter().any(|a| event.involves(a))
    }

    /// Returns the number of explicitly followed addresses.
    #[must_use]
    pub fn count(&self) -> usize {
        self.addresses.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
