//! # ledgerdex-types
//!
//! Shared types, errors, and configuration for the **LedgerDex** exchange core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`AccountId`], [`FillId`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderKind`], [`OrderStatus`]
//! - **Fill model**: [`Fill`]
//! - **Balance model**: [`BalanceEntry`], [`Asset`]
//! - **Configuration**: [`ExchangeConfig`]
//! - **Errors**: [`LedgerdexError`] with `LD_ERR_` prefix codes

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod fill;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use ledgerdex_types::{Order, OrderSide, BalanceEntry, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use fill::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `ledgerdex_types::constants::FOO`
// (not re-exported to avoid name collisions).
