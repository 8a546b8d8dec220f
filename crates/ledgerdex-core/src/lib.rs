//! # ledgerdex-core
//!
//! **Matching core for LedgerDex.**
//!
//! The [`Exchange`] aggregate owns all shared mutable state — the balance
//! ledger, one order book per instrument, the append-only order registry,
//! and the fill tape — and exposes the public operations:
//!
//! - **Limit orders**: funds reserved up front, inserted at price-time
//!   position, never matched on creation
//! - **Market orders**: walk the opposing book best-price-first, settle
//!   each fill at the resting maker's limit price, never revert on
//!   unfilled remainder
//! - **Read surface**: order-book snapshots, order history, fills,
//!   balances
//!
//! Each public operation is an indivisible unit: it either fully completes
//! or has no observable effect. The core performs no locking — exclusive
//! ownership (`&mut Exchange`) is the critical section, and a concurrent
//! host wraps the aggregate in its own transaction boundary.

pub mod exchange;
pub mod orderbook;
pub mod price_level;
pub mod registry;

pub use exchange::Exchange;
pub use orderbook::OrderBook;
pub use price_level::PriceLevel;
pub use registry::OrderRegistry;
