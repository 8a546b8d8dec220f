//! Balance tracking types for the LedgerDex reserved-balance model.
//!
//! Every account has an `available` balance (usable for new orders and
//! withdrawal) and a `reserved` balance (locked against open orders).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single balance entry for an (account, asset) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    /// Available for new orders / withdrawal.
    pub available: Decimal,
    /// Reserved against open orders' potential settlement.
    pub reserved: Decimal,
}

impl BalanceEntry {
    /// Create a zero balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: Decimal::ZERO,
            reserved: Decimal::ZERO,
        }
    }

    /// Total balance (available + reserved).
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.available + self.reserved
    }

    /// Whether this entry has no balance at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.reserved.is_zero()
    }
}

impl Default for BalanceEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for asset identifiers (e.g., "ETH", "LINK").
pub type Asset = String;
