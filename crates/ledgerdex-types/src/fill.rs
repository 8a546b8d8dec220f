//! Fill types produced by the LedgerDex matching engine.
//!
//! A [`Fill`] is the immutable record of one match between an incoming
//! taker order and a resting maker order, always priced at the maker's
//! limit price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Asset, FillId, OrderId, OrderSide};

/// A fill produced by the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Globally unique fill identifier.
    pub id: FillId,
    /// The instrument traded.
    pub instrument: Asset,
    /// The resting (maker) order ID.
    pub maker_order: OrderId,
    /// The incoming (taker) order ID.
    pub taker_order: OrderId,
    /// The account receiving the instrument.
    pub buyer: AccountId,
    /// The account receiving the currency.
    pub seller: AccountId,
    /// Execution price — always the maker's limit price.
    pub price: Decimal,
    /// Executed quantity in the instrument asset.
    pub quantity: Decimal,
    /// Currency amount = price × quantity.
    pub quote_amount: Decimal,
    /// Which side the taker was on.
    pub taker_side: OrderSide,
    /// When this fill was executed.
    pub executed_at: DateTime<Utc>,
}

impl Fill {
    /// Returns the currency notional of this fill.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.quote_amount
    }

    /// Returns `true` if the taker was buying.
    #[must_use]
    pub fn taker_is_buyer(&self) -> bool {
        self.taker_side == OrderSide::Buy
    }
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fill[{}] {} {} {} @ {} = {}",
            self.id, self.instrument, self.taker_side, self.quantity, self.price, self.quote_amount,
        )
    }
}
