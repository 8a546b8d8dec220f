//! # ledgerdex-ledger
//!
//! **Balance plane**: per-(account, asset) accounting with an explicit
//! available/reserved split, plus the registry of tradable instruments.
//!
//! ## Architecture
//!
//! The ledger sits underneath the matching core:
//! 1. **BalanceLedger**: tracks available/reserved balances per
//!    (account, asset); owns the reserve/release/settle primitives
//! 2. **InstrumentRegistry**: membership check for tradable instruments
//!    (who may register is an external authorization concern)
//!
//! ## Balance Flow
//!
//! ```text
//! deposit → available ─reserve→ reserved ─settle_fill→ counterparty available
//!                      ←release─
//! ```
//!
//! `available + reserved` for an (account, asset) changes only via
//! deposit/withdraw (custody surface) or settle (core-owned).

pub mod balance_ledger;
pub mod instruments;

pub use balance_ledger::BalanceLedger;
pub use instruments::InstrumentRegistry;
