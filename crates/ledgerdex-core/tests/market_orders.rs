//! Market-order integration tests.
//!
//! Mirrors realistic taker flows on both sides: full and partial fills,
//! maker removal on full fill, book exhaustion without revert, the
//! affordability cap on market BUYs, and end-to-end settlement
//! bookkeeping across all four balance legs.

use ledgerdex_core::Exchange;
use ledgerdex_types::{AccountId, LedgerdexError, OrderKind, OrderSide, OrderStatus};
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn setup() -> (Exchange, AccountId, AccountId) {
    let mut exchange = Exchange::default();
    exchange.register_instrument("LINK").unwrap();
    (exchange, AccountId::new(), AccountId::new())
}

// =============================================================================
// Market BUY
// =============================================================================

#[test]
fn market_buy_reverts_with_no_currency() {
    let (mut exchange, buyer, _) = setup();
    assert!(exchange.balance_of(buyer, "ETH").is_zero());

    let err = exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(100))
        .unwrap_err();
    assert!(matches!(err, LedgerdexError::InsufficientBalance { .. }));
    assert!(exchange.orders("LINK", None).unwrap().is_empty());
}

#[test]
fn market_buy_on_empty_book_is_recorded_unfilled() {
    let (mut exchange, buyer, _) = setup();
    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();
    assert!(exchange.order_book("LINK", OrderSide::Sell).unwrap().is_empty());

    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(20))
        .unwrap();

    // Unmatched is success, not an error: the order is recorded terminal.
    let orders = exchange.orders("LINK", None).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].kind, OrderKind::Market);
    assert_eq!(orders[0].filled_qty, Decimal::ZERO);
    assert_eq!(orders[0].status(), OrderStatus::Closed);

    // And no funds moved.
    assert_eq!(exchange.balance_of(buyer, "ETH").available, dec(1000));
}

#[test]
fn market_buy_fills_fully_against_deeper_maker() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(30)).unwrap();
    exchange
        .create_limit_order(seller, "LINK", OrderSide::Sell, dec(30), dec(5))
        .unwrap();

    exchange.deposit(buyer, "ETH", dec(50)).unwrap();
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(10))
        .unwrap();

    // Taker fully filled.
    let orders = exchange.orders("LINK", Some(buyer)).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::Buy);
    assert_eq!(orders[0].quantity, dec(10));
    assert_eq!(orders[0].filled_qty, dec(10));

    // Maker advanced but still open and resting.
    let book = exchange.order_book("LINK", OrderSide::Sell).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book[0].filled_qty, dec(10));
    assert_eq!(book[0].remaining_qty(), dec(20));
    assert_eq!(book[0].status(), OrderStatus::Open);
}

#[test]
fn market_buy_settles_all_four_balance_legs() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(100)).unwrap();
    exchange
        .create_limit_order(seller, "LINK", OrderSide::Sell, dec(100), dec(20))
        .unwrap();

    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(20))
        .unwrap();

    // Buyer: paid 20 x 20 = 400 of currency, received 20 LINK.
    let buyer_eth = exchange.balance_of(buyer, "ETH");
    assert_eq!(buyer_eth.available, dec(600));
    assert_eq!(buyer_eth.reserved, Decimal::ZERO);
    assert_eq!(exchange.balance_of(buyer, "LINK").available, dec(20));

    // Seller: received 400 currency; 80 LINK still reserved for the rest.
    let seller_link = exchange.balance_of(seller, "LINK");
    assert_eq!(exchange.balance_of(seller, "ETH").available, dec(400));
    assert_eq!(seller_link.available, Decimal::ZERO);
    assert_eq!(seller_link.reserved, dec(80));
}

#[test]
fn market_buy_empties_the_book_and_stops() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(20)).unwrap();
    for _ in 0..2 {
        exchange
            .create_limit_order(seller, "LINK", OrderSide::Sell, dec(10), dec(20))
            .unwrap();
    }

    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(30))
        .unwrap();

    // Both makers fully consumed and removed; taker liquidity-bounded at
    // 20 of 30, recorded without revert.
    assert!(exchange.order_book("LINK", OrderSide::Sell).unwrap().is_empty());
    let orders = exchange.orders("LINK", Some(buyer)).unwrap();
    let taker = &orders[0];
    assert_eq!(taker.filled_qty, dec(20));
    assert_eq!(taker.quantity, dec(30));
}

#[test]
fn market_buys_walk_partially_filled_makers_in_time_priority() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(60)).unwrap();
    for _ in 0..3 {
        exchange
            .create_limit_order(seller, "LINK", OrderSide::Sell, dec(20), dec(20))
            .unwrap();
    }
    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();

    // The tail of the snapshot is always the order being consumed next.
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Sell).unwrap();
    assert_eq!(book.len(), 3);
    assert_eq!(book.last().unwrap().filled_qty, dec(15));

    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Sell).unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(book.last().unwrap().filled_qty, dec(10));

    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Sell).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book.last().unwrap().filled_qty, dec(5));
}

#[test]
fn fully_filled_makers_remain_in_order_history() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(45)).unwrap();
    for _ in 0..3 {
        exchange
            .create_limit_order(seller, "LINK", OrderSide::Sell, dec(15), dec(20))
            .unwrap();
    }

    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();
    for _ in 0..3 {
        exchange
            .create_market_order(buyer, "LINK", OrderSide::Buy, dec(20))
            .unwrap();
    }

    // Book exhausted (45 of liquidity against 60 demanded).
    assert!(exchange.order_book("LINK", OrderSide::Sell).unwrap().is_empty());

    // Makers stay queryable, all fully filled.
    let maker_history = exchange.orders("LINK", Some(seller)).unwrap();
    assert_eq!(maker_history.len(), 3);
    for order in &maker_history {
        assert_eq!(order.filled_qty, order.quantity);
        assert_eq!(order.status(), OrderStatus::Closed);
    }

    // Taker history records the liquidity-bounded final fill.
    let taker_history = exchange.orders("LINK", Some(buyer)).unwrap();
    let fills: Vec<Decimal> = taker_history.iter().map(|o| o.filled_qty).collect();
    assert_eq!(fills, vec![dec(20), dec(20), dec(5)]);
}

#[test]
fn market_buy_is_capped_by_available_currency() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(100)).unwrap();
    exchange
        .create_limit_order(seller, "LINK", OrderSide::Sell, dec(100), dec(20))
        .unwrap();

    // 100 of currency affords 5 of the 10 requested at the maker's 20.
    exchange.deposit(buyer, "ETH", dec(100)).unwrap();
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(10))
        .unwrap();

    let orders = exchange.orders("LINK", Some(buyer)).unwrap();
    let taker = &orders[0];
    assert_eq!(taker.filled_qty, dec(5));
    assert!(exchange.balance_of(buyer, "ETH").is_zero());
    assert_eq!(exchange.balance_of(buyer, "LINK").available, dec(5));

    // Liquidity remains; the loop stopped on funds, not on the book.
    let book = exchange.order_book("LINK", OrderSide::Sell).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book[0].filled_qty, dec(5));
}

// =============================================================================
// Market SELL
// =============================================================================

#[test]
fn market_sell_reverts_when_quantity_exceeds_instrument_balance() {
    let (mut exchange, seller, _) = setup();
    exchange.deposit(seller, "LINK", dec(20)).unwrap();

    let err = exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(100))
        .unwrap_err();
    assert!(matches!(err, LedgerdexError::InsufficientBalance { .. }));
    assert!(exchange.orders("LINK", None).unwrap().is_empty());
}

#[test]
fn market_sell_on_empty_book_is_recorded_unfilled() {
    let (mut exchange, seller, _) = setup();
    exchange.deposit(seller, "LINK", dec(20)).unwrap();
    assert!(exchange.order_book("LINK", OrderSide::Buy).unwrap().is_empty());

    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(20))
        .unwrap();

    let orders = exchange.orders("LINK", None).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].kind, OrderKind::Market);
    assert_eq!(orders[0].filled_qty, Decimal::ZERO);
    assert_eq!(exchange.balance_of(seller, "LINK").available, dec(20));
}

#[test]
fn market_sell_settles_at_the_makers_price() {
    let (mut exchange, buyer, seller) = setup();

    // Resting BUY 20 @ 20 reserves 400 of currency.
    exchange.deposit(buyer, "ETH", dec(400)).unwrap();
    exchange
        .create_limit_order(buyer, "LINK", OrderSide::Buy, dec(20), dec(20))
        .unwrap();
    assert_eq!(exchange.balance_of(buyer, "ETH").reserved, dec(400));

    exchange.deposit(seller, "LINK", dec(20)).unwrap();
    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(20))
        .unwrap();

    // Buyer: reservation fully consumed, instrument received.
    let buyer_eth = exchange.balance_of(buyer, "ETH");
    assert_eq!(buyer_eth.reserved, Decimal::ZERO);
    assert_eq!(buyer_eth.available, Decimal::ZERO);
    assert_eq!(exchange.balance_of(buyer, "LINK").available, dec(20));

    // Seller: currency received at the maker's price, instrument gone.
    assert_eq!(exchange.balance_of(seller, "ETH").available, dec(400));
    assert!(exchange.balance_of(seller, "LINK").is_zero());

    // Maker left the book the instant it filled.
    assert!(exchange.order_book("LINK", OrderSide::Buy).unwrap().is_empty());
}

#[test]
fn market_sell_advances_the_matching_buy_order() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(buyer, "ETH", dec(2000)).unwrap();
    exchange
        .create_limit_order(buyer, "LINK", OrderSide::Buy, dec(100), dec(20))
        .unwrap();

    exchange.deposit(seller, "LINK", dec(20)).unwrap();
    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(20))
        .unwrap();

    let orders = exchange.orders("LINK", Some(seller)).unwrap();
    let taker = &orders[0];
    assert_eq!(taker.filled_qty, taker.quantity);

    let book = exchange.order_book("LINK", OrderSide::Buy).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book[0].quantity, dec(100));
    assert_eq!(book[0].filled_qty, dec(20));
}

#[test]
fn market_sell_empties_the_buy_book_and_stops() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(buyer, "ETH", dec(400)).unwrap();
    for _ in 0..2 {
        exchange
            .create_limit_order(buyer, "LINK", OrderSide::Buy, dec(10), dec(20))
            .unwrap();
    }

    exchange.deposit(seller, "LINK", dec(30)).unwrap();
    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(30))
        .unwrap();

    assert!(exchange.order_book("LINK", OrderSide::Buy).unwrap().is_empty());
    let orders = exchange.orders("LINK", Some(seller)).unwrap();
    let taker = &orders[0];
    assert_eq!(taker.filled_qty, dec(20));
    // The unfilled remainder stays available, never reserved.
    assert_eq!(exchange.balance_of(seller, "LINK").available, dec(10));
    assert_eq!(exchange.balance_of(seller, "LINK").reserved, Decimal::ZERO);
}

#[test]
fn market_sells_walk_partially_filled_buys_in_time_priority() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(buyer, "ETH", dec(1200)).unwrap();
    for _ in 0..3 {
        exchange
            .create_limit_order(buyer, "LINK", OrderSide::Buy, dec(20), dec(20))
            .unwrap();
    }
    exchange.deposit(seller, "LINK", dec(45)).unwrap();

    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Buy).unwrap();
    assert_eq!(book.len(), 3);
    assert_eq!(book.last().unwrap().filled_qty, dec(15));

    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Buy).unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(book.last().unwrap().filled_qty, dec(10));

    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(15))
        .unwrap();
    let book = exchange.order_book("LINK", OrderSide::Buy).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book.last().unwrap().filled_qty, dec(5));
}

// =============================================================================
// Fill tape & pricing
// =============================================================================

#[test]
fn fills_record_maker_price_and_participants() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(seller, "LINK", dec(20)).unwrap();
    exchange
        .create_limit_order(seller, "LINK", OrderSide::Sell, dec(10), dec(5))
        .unwrap();
    exchange
        .create_limit_order(seller, "LINK", OrderSide::Sell, dec(10), dec(7))
        .unwrap();

    exchange.deposit(buyer, "ETH", dec(1000)).unwrap();
    exchange
        .create_market_order(buyer, "LINK", OrderSide::Buy, dec(15))
        .unwrap();

    // Best ask first (5), then the next level (7) — maker prices, never a
    // taker-supplied price.
    let fills = exchange.fills("LINK");
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].price, dec(5));
    assert_eq!(fills[0].quantity, dec(10));
    assert_eq!(fills[1].price, dec(7));
    assert_eq!(fills[1].quantity, dec(5));
    for fill in &fills {
        assert_eq!(fill.buyer, buyer);
        assert_eq!(fill.seller, seller);
        assert!(fill.taker_is_buyer());
        assert_eq!(fill.quote_amount, fill.quantity * fill.price);
    }
}

#[test]
fn market_order_walks_price_levels_best_first() {
    let (mut exchange, buyer, seller) = setup();

    exchange.deposit(buyer, "ETH", dec(10_000)).unwrap();
    for price in [15, 25, 20] {
        exchange
            .create_limit_order(buyer, "LINK", OrderSide::Buy, dec(10), dec(price))
            .unwrap();
    }

    exchange.deposit(seller, "LINK", dec(15)).unwrap();
    exchange
        .create_market_order(seller, "LINK", OrderSide::Sell, dec(15))
        .unwrap();

    // Highest bid (25) consumed first, then 5 into the 20 level.
    let fills = exchange.fills("LINK");
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].price, dec(25));
    assert_eq!(fills[0].quantity, dec(10));
    assert_eq!(fills[1].price, dec(20));
    assert_eq!(fills[1].quantity, dec(5));

    // Seller received 10 x 25 + 5 x 20 = 350.
    assert_eq!(exchange.balance_of(seller, "ETH").available, dec(350));
}
