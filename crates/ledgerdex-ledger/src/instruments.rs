//! The registry of tradable instruments.
//!
//! The base currency is distinguished: every instrument trades against it,
//! and it is itself never a tradable instrument. Authorization of who may
//! register an instrument is an external concern; the core only asks
//! "is this asset known".

use std::collections::BTreeSet;

use ledgerdex_types::{Asset, LedgerdexError, Result};

/// Membership registry for tradable instruments.
#[derive(Debug, Clone)]
pub struct InstrumentRegistry {
    currency: Asset,
    instruments: BTreeSet<Asset>,
}

impl InstrumentRegistry {
    /// Create a registry with the given base currency and no instruments.
    #[must_use]
    pub fn new(currency: impl Into<Asset>) -> Self {
        Self {
            currency: currency.into(),
            instruments: BTreeSet::new(),
        }
    }

    /// Register a tradable instrument. Registering an already-known
    /// instrument is a no-op.
    ///
    /// # Errors
    /// Returns `InvalidInstrument` for the base currency.
    pub fn register(&mut self, asset: impl Into<Asset>) -> Result<()> {
        let asset = asset.into();
        if asset == self.currency {
            return Err(LedgerdexError::InvalidInstrument {
                reason: format!("{asset} is the base currency"),
            });
        }
        self.instruments.insert(asset);
        Ok(())
    }

    /// Whether the asset is the base currency or a registered instrument.
    #[must_use]
    pub fn is_known(&self, asset: &str) -> bool {
        asset == self.currency || self.instruments.contains(asset)
    }

    /// Require a registered tradable instrument. The base currency is not
    /// an instrument.
    ///
    /// # Errors
    /// Returns `UnknownInstrument` otherwise.
    pub fn require_instrument(&self, asset: &str) -> Result<()> {
        if self.instruments.contains(asset) {
            Ok(())
        } else {
            Err(LedgerdexError::UnknownInstrument(asset.to_string()))
        }
    }

    /// The base-currency asset.
    #[must_use]
    pub fn currency(&self) -> &Asset {
        &self.currency
    }

    /// Registered instruments, in sorted order.
    pub fn instruments(&self) -> impl Iterator<Item = &Asset> {
        self.instruments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut registry = InstrumentRegistry::new("ETH");
        registry.register("LINK").unwrap();

        assert!(registry.is_known("LINK"));
        assert!(registry.is_known("ETH"));
        assert!(!registry.is_known("AAVE"));
        registry.require_instrument("LINK").unwrap();
    }

    #[test]
    fn currency_is_not_an_instrument() {
        let registry = InstrumentRegistry::new("ETH");
        let err = registry.require_instrument("ETH").unwrap_err();
        assert!(matches!(err, LedgerdexError::UnknownInstrument(_)));
    }

    #[test]
    fn registering_currency_fails() {
        let mut registry = InstrumentRegistry::new("ETH");
        let err = registry.register("ETH").unwrap_err();
        assert!(matches!(err, LedgerdexError::InvalidInstrument { .. }));
    }

    #[test]
    fn unknown_instrument_rejected() {
        let registry = InstrumentRegistry::new("ETH");
        let err = registry.require_instrument("AAVE").unwrap_err();
        assert!(matches!(err, LedgerdexError::UnknownInstrument(_)));
    }

    #[test]
    fn duplicate_registration_is_noop() {
        let mut registry = InstrumentRegistry::new("ETH");
        registry.register("LINK").unwrap();
        registry.register("LINK").unwrap();
        assert_eq!(registry.instruments().count(), 1);
    }

    #[test]
    fn instruments_iterate_sorted() {
        let mut registry = InstrumentRegistry::new("ETH");
        registry.register("LINK").unwrap();
        registry.register("AAVE").unwrap();
        let names: Vec<&Asset> = registry.instruments().collect();
        assert_eq!(names, ["AAVE", "LINK"]);
    }
}
