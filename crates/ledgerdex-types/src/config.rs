//! Configuration types for the LedgerDex exchange core.

use serde::{Deserialize, Serialize};

use crate::{Asset, constants};

/// Configuration for a single exchange instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// The base-currency asset every instrument trades against.
    pub currency: Asset,
    /// Maximum decimal places accepted in limit prices.
    pub price_scale: u32,
    /// Maximum decimal places accepted in order quantities.
    pub qty_scale: u32,
}

impl ExchangeConfig {
    /// Create a config with the given base currency and default scales.
    #[must_use]
    pub fn with_currency(currency: impl Into<Asset>) -> Self {
        Self {
            currency: currency.into(),
            ..Self::default()
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            currency: constants::DEFAULT_CURRENCY.to_string(),
            price_scale: constants::PRICE_SCALE,
            qty_scale: constants::QTY_SCALE,
        }
    }
}
