//! The append-only order registry.
//!
//! Single owner of every `Order` ever created, limit and market. Orders
//! are never deleted: a fully filled limit order leaves its book but stays
//! here, and its `Closed` status falls out of `filled_qty == quantity`.
//! The live order-book view and the audit-history view are both
//! projections over this one order set.

use std::collections::HashMap;

use ledgerdex_types::{AccountId, Order, OrderId};

/// Append-only store of every order, in creation order.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: HashMap<OrderId, Order>,
    by_creation: Vec<OrderId>,
    next_sequence: u64,
}

impl OrderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next monotonic creation sequence.
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    /// Append a newly created order.
    pub fn append(&mut self, order: Order) {
        self.by_creation.push(order.id);
        self.orders.insert(order.id, order);
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Mutable lookup, used by the engine to advance `filled_qty`.
    pub fn get_mut(&mut self, order_id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(&order_id)
    }

    /// All orders for an instrument in creation order, optionally filtered
    /// to one account. Open and Closed, limit and market.
    pub fn orders_for(
        &self,
        instrument: &str,
        account: Option<AccountId>,
    ) -> impl Iterator<Item = &Order> {
        self.by_creation
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(move |o| {
                o.instrument == instrument && account.is_none_or(|a| o.account == a)
            })
    }

    /// Total number of orders ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_creation.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_creation.is_empty()
    }
}
