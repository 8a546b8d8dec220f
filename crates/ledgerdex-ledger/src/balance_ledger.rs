//! The reserved-balance ledger.
//!
//! Tracks per-(account, asset) balances with available/reserved accounting.
//! All mutations are atomic: either the full operation succeeds or the
//! balance is unchanged. `available` and `reserved` never go negative.

use std::collections::HashMap;

use ledgerdex_types::{AccountId, Asset, BalanceEntry, LedgerdexError, Result};
use rust_decimal::Decimal;

/// The source of truth for all balance state.
///
/// The matching engine calls `reserve` when an order locks funds and
/// `settle_fill` for every match; the custody surface (deposit/withdraw)
/// only ever touches `available`.
pub struct BalanceLedger {
    /// Per-(account, asset) balances.
    balances: HashMap<(AccountId, Asset), BalanceEntry>,
}

impl BalanceLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Deposit funds (increases available balance). Custody surface.
    pub fn deposit(&mut self, account: AccountId, asset: &str, amount: Decimal) {
        let entry = self
            .balances
            .entry((account, asset.to_string()))
            .or_default();
        entry.available += amount;
    }

    /// Withdraw funds from the available balance. Custody surface.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount; reserved funds
    /// cannot be withdrawn.
    pub fn withdraw(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        let entry = self.balances.get_mut(&(account, asset.to_string())).ok_or(
            LedgerdexError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            },
        )?;

        if entry.available < amount {
            return Err(LedgerdexError::InsufficientBalance {
                needed: amount,
                available: entry.available,
            });
        }

        entry.available -= amount;
        Ok(())
    }

    /// Reserve funds (available → reserved). Used when an order locks its
    /// required funds. No partial reservation.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn reserve(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        let entry = self.balances.get_mut(&(account, asset.to_string())).ok_or(
            LedgerdexError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            },
        )?;

        if entry.available < amount {
            return Err(LedgerdexError::InsufficientBalance {
                needed: amount,
                available: entry.available,
            });
        }

        entry.available -= amount;
        entry.reserved += amount;
        Ok(())
    }

    /// Release funds (reserved → available). The inverse of `reserve`;
    /// required for a complete model of order withdrawal, though no engine
    /// path currently calls it (there is no cancellation operation).
    ///
    /// # Errors
    /// Returns `InsufficientReserved` if reserved < amount.
    pub fn release(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        let entry = self.balances.get_mut(&(account, asset.to_string())).ok_or(
            LedgerdexError::InsufficientReserved {
                needed: amount,
                reserved: Decimal::ZERO,
            },
        )?;

        if entry.reserved < amount {
            return Err(LedgerdexError::InsufficientReserved {
                needed: amount,
                reserved: entry.reserved,
            });
        }

        entry.reserved -= amount;
        entry.available += amount;
        Ok(())
    }

    /// Settle one fill atomically:
    /// - buyer's reserved currency −= quantity × price,
    ///   seller's available currency += quantity × price
    /// - seller's reserved instrument −= quantity,
    ///   buyer's available instrument += quantity
    ///
    /// Both legs are validated before anything is touched; a half-applied
    /// settlement would corrupt the ledger.
    ///
    /// # Errors
    /// Returns `InsufficientReserved` if either debit leg is not fully
    /// covered. Reservations are sized to cover settlement, so this
    /// indicates corrupted bookkeeping upstream, not caller error.
    pub fn settle_fill(
        &mut self,
        buyer: AccountId,
        seller: AccountId,
        instrument: &str,
        currency: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<()> {
        let cost = quantity * price;

        let buyer_reserved = self
            .balances
            .get(&(buyer, currency.to_string()))
            .map_or(Decimal::ZERO, |e| e.reserved);
        if buyer_reserved < cost {
            return Err(LedgerdexError::InsufficientReserved {
                needed: cost,
                reserved: buyer_reserved,
            });
        }

        let seller_reserved = self
            .balances
            .get(&(seller, instrument.to_string()))
            .map_or(Decimal::ZERO, |e| e.reserved);
        if seller_reserved < quantity {
            return Err(LedgerdexError::InsufficientReserved {
                needed: quantity,
                reserved: seller_reserved,
            });
        }

        // Currency leg: buyer's reserved → seller's available.
        self.balances
            .entry((buyer, currency.to_string()))
            .or_default()
            .reserved -= cost;
        self.balances
            .entry((seller, currency.to_string()))
            .or_default()
            .available += cost;

        // Instrument leg: seller's reserved → buyer's available.
        self.balances
            .entry((seller, instrument.to_string()))
            .or_default()
            .reserved -= quantity;
        self.balances
            .entry((buyer, instrument.to_string()))
            .or_default()
            .available += quantity;

        tracing::debug!(
            buyer = %buyer,
            seller = %seller,
            instrument,
            qty = %quantity,
            price = %price,
            cost = %cost,
            "Fill settled"
        );
        Ok(())
    }

    /// Get the balance for an (account, asset) pair.
    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: &str) -> BalanceEntry {
        self.balances
            .get(&(account, asset.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Total supply of an asset (sum of all accounts' available + reserved).
    /// Settlement moves balances between accounts, so this is invariant
    /// under matching.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, entry)| entry.total())
            .sum()
    }
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
