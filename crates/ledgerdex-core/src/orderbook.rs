//! The order book for a single instrument.
//!
//! Uses `BTreeMap<Decimal, PriceLevel>` per side. Both sides use the
//! natural price key; the side determines which end of the map is best:
//! - **Bids** (buys): best = highest price = last key
//! - **Asks** (sells): best = lowest price = first key
//!
//! The snapshot contract follows the same convention outward: BUY side is
//! returned ascending by price, SELL side descending by price, so the best
//! price always sits at the **tail** of the returned sequence, and within a
//! price level the next-to-match (earliest) order is nearest the tail.
//!
//! An auxiliary `HashMap<OrderId, (Side, Price)>` enables removal by ID
//! without scanning levels.

use std::collections::{BTreeMap, HashMap};

use ledgerdex_types::{Asset, LedgerdexError, Order, OrderId, OrderSide, Result};
use rust_decimal::Decimal;

use crate::price_level::PriceLevel;

/// The order book for a single instrument. Holds only Open limit orders,
/// by ID; the registry owns the `Order` values.
#[derive(Debug)]
pub struct OrderBook {
    /// The instrument this book serves.
    pub instrument: Asset,
    /// Buy side, keyed ascending by price (best bid = last).
    bids: BTreeMap<Decimal, PriceLevel>,
    /// Sell side, keyed ascending by price (best ask = first).
    asks: BTreeMap<Decimal, PriceLevel>,
    /// Fast lookup: `OrderId -> (side, price)` for removal.
    index: HashMap<OrderId, (OrderSide, Decimal)>,
}

impl OrderBook {
    /// Create a new empty order book for the given instrument.
    #[must_use]
    pub fn new(instrument: impl Into<Asset>) -> Self {
        Self {
            instrument: instrument.into(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    // =================================================================
    // Insertion / removal
    // =================================================================

    /// Insert an open limit order at its price-time position.
    pub fn insert(&mut self, order: &Order) -> Result<()> {
        if self.index.contains_key(&order.id) {
            return Err(LedgerdexError::DuplicateOrder(order.id));
        }
        let Some(price) = order.limit_price else {
            return Err(LedgerdexError::InvalidQuantity {
                reason: "market orders never rest in the book".to_string(),
            });
        };

        self.index.insert(order.id, (order.side, price));
        self.side_mut(order.side)
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order.id);
        Ok(())
    }

    /// Remove an order by ID (used the instant a maker is fully filled).
    pub fn remove(&mut self, order_id: &OrderId) -> Result<()> {
        let (side, price) = self
            .index
            .remove(order_id)
            .ok_or(LedgerdexError::OrderNotFound(*order_id))?;

        let levels = self.side_mut(side);
        let level = levels
            .get_mut(&price)
            .ok_or(LedgerdexError::OrderNotFound(*order_id))?;
        if !level.remove(order_id) {
            return Err(LedgerdexError::OrderNotFound(*order_id));
        }
        if level.is_empty() {
            levels.remove(&price);
        }
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The next order to match on the given side, with its price: highest
    /// bid or lowest ask, oldest first within the level.
    #[must_use]
    pub fn peek_best(&self, side: OrderSide) -> Option<(OrderId, Decimal)> {
        let level = match side {
            OrderSide::Buy => self.bids.values().next_back(),
            OrderSide::Sell => self.asks.values().next(),
        }?;
        level.front().map(|id| (id, level.price))
    }

    /// Best (highest) bid price, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Best (lowest) ask price, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Snapshot of one side in the book's stored order: BUY ascending by
    /// price, SELL descending by price — best price at the tail. Within a
    /// price level the earliest (next-to-match) order is nearest the tail,
    /// so the last element is always the next order the engine consumes.
    #[must_use]
    pub fn side_ids(&self, side: OrderSide) -> Vec<OrderId> {
        let within = |level: &PriceLevel| level.orders.iter().rev().copied().collect::<Vec<_>>();
        match side {
            OrderSide::Buy => self.bids.values().flat_map(|l| within(l)).collect(),
            OrderSide::Sell => self.asks.values().rev().flat_map(|l| within(l)).collect(),
        }
    }

    /// Total number of orders currently in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the book has no orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct bid price levels.
    #[must_use]
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of distinct ask price levels.
    #[must_use]
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// Check if an order rests in the book.
    #[must_use]
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.contains_key(order_id)
    }

    fn side_mut(&mut self, side: OrderSide) -> &mut BTreeMap<Decimal, PriceLevel> {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }
}
