//! Order types for the LedgerDex exchange core.
//!
//! Status is **derived**, never stored: a limit order is `Open` while it has
//! unfilled quantity and `Closed` from the moment `filled_qty == quantity`.
//! Market orders execute (possibly partially) within their creating
//! operation and are always `Closed`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, Asset, OrderId};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// The side this order matches against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    Market,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// Derived lifecycle status of an order. See [`Order::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    /// A limit order resting in the book with unfilled quantity.
    Open,
    /// Fully filled, or a market order (terminal from creation).
    Closed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Core order struct. Mutated in place as fills accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub account: AccountId,
    pub instrument: Asset,
    pub side: OrderSide,
    pub kind: OrderKind,
    /// Present iff `kind == Limit`.
    pub limit_price: Option<Decimal>,
    pub quantity: Decimal,
    pub filled_qty: Decimal,
    /// Monotonic creation order, assigned by the registry.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Construct a fresh limit order with nothing filled.
    #[must_use]
    pub fn limit(
        account: AccountId,
        instrument: impl Into<Asset>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        sequence: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            account,
            instrument: instrument.into(),
            side,
            kind: OrderKind::Limit,
            limit_price: Some(price),
            quantity,
            filled_qty: Decimal::ZERO,
            sequence,
            created_at: now,
            updated_at: now,
        }
    }

    /// Construct a fresh market order. Carries no price.
    #[must_use]
    pub fn market(
        account: AccountId,
        instrument: impl Into<Asset>,
        side: OrderSide,
        quantity: Decimal,
        sequence: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            account,
            instrument: instrument.into(),
            side,
            kind: OrderKind::Market,
            limit_price: None,
            quantity,
            filled_qty: Decimal::ZERO,
            sequence,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn remaining_qty(&self) -> Decimal {
        self.quantity - self.filled_qty
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.filled_qty == self.quantity
    }

    /// Derived status: `Open` iff this is a limit order with unfilled
    /// quantity. Market orders are terminal from creation.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        if self.kind == OrderKind::Market || self.is_filled() {
            OrderStatus::Closed
        } else {
            OrderStatus::Open
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == OrderStatus::Open
    }

    /// Record a fill against this order.
    ///
    /// Callers must size fills with `remaining_qty()`; overfilling breaks
    /// the `filled_qty <= quantity` invariant.
    pub fn fill(&mut self, qty: Decimal) {
        debug_assert!(qty <= self.remaining_qty(), "fill exceeds remaining");
        self.filled_qty += qty;
        self.updated_at = Utc::now();
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy_limit(side: OrderSide, price: Decimal, qty: Decimal) -> Self {
        Self::limit(AccountId::new(), "LINK", side, qty, price, 0)
    }

    pub fn dummy_limit_for_account(
        account: AccountId,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        Self::limit(account, "LINK", side, qty, price, 0)
    }

    pub fn dummy_market(side: OrderSide, qty: Decimal) -> Self {
        Self::market(AccountId::new(), "LINK", side, qty, 0)
    }
}
