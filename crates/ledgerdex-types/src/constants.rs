//! System-wide constants for the LedgerDex exchange core.

/// Maximum decimal precision for prices (8 decimal places).
pub const PRICE_SCALE: u32 = 8;

/// Maximum decimal precision for quantities (8 decimal places).
pub const QTY_SCALE: u32 = 8;

/// Default base-currency asset identifier.
pub const DEFAULT_CURRENCY: &str = "ETH";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "LedgerDex";
