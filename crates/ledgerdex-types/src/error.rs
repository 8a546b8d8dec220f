//! Error types for the LedgerDex exchange core.
//!
//! All errors use the `LD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance errors
//! - 3xx: Instrument errors
//!
//! Every failure is fail-fast and fail-atomic: it is detected before any
//! mutation, and the whole operation aborts with no change to ledger, book,
//! or registry. There is no "fatal" class — every variant is a well-typed,
//! caller-recoverable rejection.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Asset, OrderId};

/// Central error enum for all LedgerDex operations.
#[derive(Debug, Error)]
pub enum LedgerdexError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// Quantity must be positive; limit prices must be positive too.
    #[error("LD_ERR_100: Invalid quantity: {reason}")]
    InvalidQuantity { reason: String },

    /// An order with this ID already rests in the book.
    #[error("LD_ERR_101: Order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// The requested order was not found in the book or registry.
    #[error("LD_ERR_102: Order not found: {0}")]
    OrderNotFound(OrderId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough available balance to perform the operation.
    #[error("LD_ERR_200: Insufficient available balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// Not enough reserved balance to release or settle. Reservations are
    /// sized to cover settlement, so hitting this means the engine's
    /// bookkeeping is corrupt, not that the caller did anything wrong.
    #[error("LD_ERR_201: Insufficient reserved balance: need {needed}, have {reserved}")]
    InsufficientReserved { needed: Decimal, reserved: Decimal },

    // =================================================================
    // Instrument Errors (3xx)
    // =================================================================
    /// The asset is not the base currency and has not been registered.
    #[error("LD_ERR_300: Unknown instrument: {0}")]
    UnknownInstrument(Asset),

    /// The asset cannot be registered as a tradable instrument.
    #[error("LD_ERR_301: Invalid instrument: {reason}")]
    InvalidInstrument { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerdexError>;
