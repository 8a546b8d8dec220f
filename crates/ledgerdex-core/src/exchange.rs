//! The `Exchange` aggregate and its matching engine.
//!
//! All shared mutable state — ledger, per-instrument books, registry,
//! fill tape — is owned here and mutated only inside a single public
//! operation at a time. Every failure is detected before any mutation.
//!
//! ## Order Flow
//!
//! ```text
//! create_limit_order:  validate → reserve → insert into book → append
//! create_market_order: validate → precheck → walk opposing book,
//!                      settling each fill at the maker's limit price
//!                      → append with final filled_qty (never reverts)
//! ```

use std::collections::HashMap;

use chrono::Utc;
use ledgerdex_ledger::{BalanceLedger, InstrumentRegistry};
use ledgerdex_types::{
    AccountId, Asset, BalanceEntry, ExchangeConfig, Fill, FillId, LedgerdexError, Order, OrderId,
    OrderSide, Result,
};
use rust_decimal::Decimal;

use crate::orderbook::OrderBook;
use crate::registry::OrderRegistry;

/// The exchange core: balance ledger, order books, order registry, and
/// the matching engine over them.
///
/// `&mut self` on every mutating operation is the concurrency contract:
/// operations never overlap, so each one is an indivisible unit. A
/// multi-threaded host wraps the whole aggregate in its own lock.
pub struct Exchange {
    config: ExchangeConfig,
    instruments: InstrumentRegistry,
    ledger: BalanceLedger,
    books: HashMap<Asset, OrderBook>,
    registry: OrderRegistry,
    fills: Vec<Fill>,
}

impl Exchange {
    /// Create an exchange with the given configuration and no instruments.
    #[must_use]
    pub fn new(config: ExchangeConfig) -> Self {
        let instruments = InstrumentRegistry::new(config.currency.clone());
        Self {
            config,
            instruments,
            ledger: BalanceLedger::new(),
            books: HashMap::new(),
            registry: OrderRegistry::new(),
            fills: Vec::new(),
        }
    }

    /// The base-currency asset.
    #[must_use]
    pub fn currency(&self) -> &Asset {
        &self.config.currency
    }

    // =================================================================
    // Instruments & custody surface
    // =================================================================

    /// Register a tradable instrument and create its book. Authorization
    /// of the caller is the host's concern.
    pub fn register_instrument(&mut self, asset: &str) -> Result<()> {
        self.instruments.register(asset)?;
        self.books
            .entry(asset.to_string())
            .or_insert_with(|| OrderBook::new(asset));
        Ok(())
    }

    /// Deposit into an account's available balance.
    pub fn deposit(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        self.require_known(asset)?;
        Self::require_positive(amount, "deposit amount")?;
        self.ledger.deposit(account, asset, amount);
        Ok(())
    }

    /// Withdraw from an account's available balance. Reserved funds stay
    /// locked until their orders settle.
    pub fn withdraw(&mut self, account: AccountId, asset: &str, amount: Decimal) -> Result<()> {
        self.require_known(asset)?;
        Self::require_positive(amount, "withdrawal amount")?;
        self.ledger.withdraw(account, asset, amount)
    }

    /// Get the (available, reserved) balance for an (account, asset) pair.
    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: &str) -> BalanceEntry {
        self.ledger.balance_of(account, asset)
    }

    // =================================================================
    // Order creation
    // =================================================================

    /// Place a resting limit order.
    ///
    /// BUY locks `quantity × price` of currency; SELL locks `quantity` of
    /// the instrument. On reservation failure nothing is created. Limit
    /// orders are inserted at their price-time position, never matched on
    /// creation.
    pub fn create_limit_order(
        &mut self,
        account: AccountId,
        instrument: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderId> {
        self.instruments.require_instrument(instrument)?;
        Self::require_positive(quantity, "quantity")?;
        Self::require_positive(price, "limit price")?;
        if quantity.scale() > self.config.qty_scale {
            return Err(LedgerdexError::InvalidQuantity {
                reason: format!("quantity {quantity} exceeds {} decimal places", self.config.qty_scale),
            });
        }
        if price.scale() > self.config.price_scale {
            return Err(LedgerdexError::InvalidQuantity {
                reason: format!("price {price} exceeds {} decimal places", self.config.price_scale),
            });
        }

        let cost = quantity
            .checked_mul(price)
            .ok_or(LedgerdexError::InvalidQuantity {
                reason: format!("notional {quantity} x {price} overflows"),
            })?;

        let currency = self.config.currency.clone();
        match side {
            OrderSide::Buy => self.ledger.reserve(account, &currency, cost)?,
            OrderSide::Sell => self.ledger.reserve(account, instrument, quantity)?,
        }

        let sequence = self.registry.next_sequence();
        let order = Order::limit(account, instrument, side, quantity, price, sequence);
        let order_id = order.id;

        self.books
            .get_mut(instrument)
            .ok_or_else(|| LedgerdexError::UnknownInstrument(instrument.to_string()))?
            .insert(&order)?;
        self.registry.append(order);

        tracing::info!(
            order = %order_id,
            account = %account,
            instrument,
            %side,
            qty = %quantity,
            %price,
            "Limit order placed"
        );
        Ok(order_id)
    }

    /// Execute a market order against the opposing book.
    ///
    /// Preconditions are asymmetric by design: a SELL's committed quantity
    /// is known up front, so it requires `available(instrument) >=
    /// quantity`; a BUY's total cost depends on book prices, so any
    /// positive currency balance may attempt it and the matching loop
    /// self-limits by available funds.
    ///
    /// An unmatched or partially matched market order is recorded, not
    /// reverted: only the upfront checks fail the operation.
    pub fn create_market_order(
        &mut self,
        account: AccountId,
        instrument: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderId> {
        self.instruments.require_instrument(instrument)?;
        Self::require_positive(quantity, "quantity")?;
        if quantity.scale() > self.config.qty_scale {
            return Err(LedgerdexError::InvalidQuantity {
                reason: format!("quantity {quantity} exceeds {} decimal places", self.config.qty_scale),
            });
        }

        let currency = self.config.currency.clone();
        match side {
            OrderSide::Sell => {
                let available = self.ledger.balance_of(account, instrument).available;
                if available < quantity {
                    return Err(LedgerdexError::InsufficientBalance {
                        needed: quantity,
                        available,
                    });
                }
            }
            OrderSide::Buy => {
                let available = self.ledger.balance_of(account, &currency).available;
                if available <= Decimal::ZERO {
                    return Err(LedgerdexError::InsufficientBalance {
                        needed: Decimal::ZERO,
                        available,
                    });
                }
            }
        }

        let sequence = self.registry.next_sequence();
        let mut taker = Order::market(account, instrument, side, quantity, sequence);

        while taker.remaining_qty() > Decimal::ZERO {
            let Some((maker_id, maker_price)) = self
                .books
                .get(instrument)
                .and_then(|book| book.peek_best(side.opposite()))
            else {
                break;
            };

            let maker = self
                .registry
                .get(maker_id)
                .ok_or(LedgerdexError::OrderNotFound(maker_id))?;
            let maker_account = maker.account;

            let mut match_qty = taker.remaining_qty().min(maker.remaining_qty());
            if side == OrderSide::Buy {
                // A market BUY must never settle a fill it cannot afford:
                // cap the fill to what available currency buys at the
                // maker's price. Truncation keeps cap x price <= available.
                let available = self.ledger.balance_of(account, &currency).available;
                if match_qty * maker_price > available {
                    let affordable =
                        (available / maker_price).trunc_with_scale(self.config.qty_scale);
                    match_qty = match_qty.min(affordable);
                }
            }
            if match_qty <= Decimal::ZERO {
                // Funds exhausted with liquidity remaining; the order
                // still completes with whatever it filled so far.
                tracing::warn!(
                    order = %taker.id,
                    account = %account,
                    instrument,
                    filled = %taker.filled_qty,
                    "Market BUY stopped by affordability cap"
                );
                break;
            }

            // Reserve the taker's leg for exactly this fill, then settle
            // at the maker's limit price. The maker's leg was reserved
            // when its limit order was placed.
            let cost = match_qty * maker_price;
            let (buyer, seller) = match side {
                OrderSide::Buy => {
                    self.ledger.reserve(account, &currency, cost)?;
                    (account, maker_account)
                }
                OrderSide::Sell => {
                    self.ledger.reserve(account, instrument, match_qty)?;
                    (maker_account, account)
                }
            };
            self.ledger
                .settle_fill(buyer, seller, instrument, &currency, match_qty, maker_price)?;

            let maker = self
                .registry
                .get_mut(maker_id)
                .ok_or(LedgerdexError::OrderNotFound(maker_id))?;
            maker.fill(match_qty);
            let maker_filled = maker.is_filled();
            taker.fill(match_qty);

            self.fills.push(Fill {
                id: FillId::new(),
                instrument: instrument.to_string(),
                maker_order: maker_id,
                taker_order: taker.id,
                buyer,
                seller,
                price: maker_price,
                quantity: match_qty,
                quote_amount: cost,
                taker_side: side,
                executed_at: Utc::now(),
            });
            tracing::debug!(
                maker = %maker_id,
                taker = %taker.id,
                price = %maker_price,
                qty = %match_qty,
                "Fill executed"
            );

            if maker_filled {
                self.books
                    .get_mut(instrument)
                    .ok_or_else(|| LedgerdexError::UnknownInstrument(instrument.to_string()))?
                    .remove(&maker_id)?;
            }
        }

        let order_id = taker.id;
        tracing::info!(
            order = %order_id,
            account = %account,
            instrument,
            %side,
            qty = %quantity,
            filled = %taker.filled_qty,
            "Market order executed"
        );
        self.registry.append(taker);
        Ok(order_id)
    }

    // =================================================================
    // Read surface
    // =================================================================

    /// Open limit orders for one side of an instrument's book, in stored
    /// order: BUY ascending by price, SELL descending, best at the tail.
    pub fn order_book(&self, instrument: &str, side: OrderSide) -> Result<Vec<Order>> {
        self.instruments.require_instrument(instrument)?;
        let Some(book) = self.books.get(instrument) else {
            return Ok(Vec::new());
        };
        Ok(book
            .side_ids(side)
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .cloned()
            .collect())
    }

    /// Every order ever created for an instrument (open and closed, limit
    /// and market), in creation order, optionally filtered to one account.
    pub fn orders(&self, instrument: &str, account: Option<AccountId>) -> Result<Vec<Order>> {
        self.instruments.require_instrument(instrument)?;
        Ok(self
            .registry
            .orders_for(instrument, account)
            .cloned()
            .collect())
    }

    /// The fill tape for an instrument, in execution order.
    #[must_use]
    pub fn fills(&self, instrument: &str) -> Vec<Fill> {
        self.fills
            .iter()
            .filter(|f| f.instrument == instrument)
            .cloned()
            .collect()
    }

    // =================================================================
    // Validation helpers
    // =================================================================

    fn require_known(&self, asset: &str) -> Result<()> {
        if self.instruments.is_known(asset) {
            Ok(())
        } else {
            Err(LedgerdexError::UnknownInstrument(asset.to_string()))
        }
    }

    fn require_positive(value: Decimal, what: &str) -> Result<()> {
        if value > Decimal::ZERO {
            Ok(())
        } else {
            Err(LedgerdexError::InvalidQuantity {
                reason: format!("{what} must be positive, got {value}"),
            })
        }
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new(ExchangeConfig::default())
    }
}
