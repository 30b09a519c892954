use canonical::balance::sum_present;
use canonical::{
    BalanceEntry, Balances, Order, OrderBook, OrderState, PriceLevel, Status, Ticker, TimeInForce,
    Trade,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn spot_ticker_scenario() {
    let ticker = Ticker {
        high: Some(d("49496.95")),
        low: Some(d("46918.4")),
        bid: Some(d("49297.64")),
        ask: Some(d("49297.75")),
        open: Some(d("48764.9")),
        last: Some(d("49297.73")),
        ..Default::default()
    }
    .derive();
    assert_eq!(ticker.change, Some(d("532.83")));
    assert_eq!(ticker.average, Some(d("49031.315")));
    assert_eq!(ticker.close, Some(d("49297.73")));
    let pct = ticker.percentage.unwrap();
    assert!((pct - d("1.0925")).abs() < d("0.001"), "{pct}");
    assert!(ticker.vwap.is_none());
}

#[test]
fn missing_operands_leave_fields_unset() {
    let ticker = Ticker {
        last: Some(d("10")),
        ..Default::default()
    }
    .derive();
    assert!(ticker.change.is_none());
    assert!(ticker.percentage.is_none());
    assert!(ticker.average.is_none());
    assert!(ticker.open.is_none());
}

#[test]
fn reported_values_are_kept() {
    let ticker = Ticker {
        open: Some(d("100")),
        last: Some(d("110")),
        change: Some(d("9")),
        percentage: Some(d("9")),
        ..Default::default()
    }
    .derive();
    assert_eq!(ticker.change, Some(d("9")));
    assert_eq!(ticker.percentage, Some(d("9")));
}

#[test]
fn open_and_percentage_from_change() {
    let ticker = Ticker {
        close: Some(d("110")),
        change: Some(d("10")),
        ..Default::default()
    }
    .derive();
    assert_eq!(ticker.last, Some(d("110")));
    assert_eq!(ticker.open, Some(d("100")));
    assert_eq!(ticker.percentage, Some(d("10")));
    assert_eq!(ticker.average, Some(d("105")));
}

#[test]
fn change_from_percentage_and_open() {
    let ticker = Ticker {
        open: Some(d("200")),
        percentage: Some(d("5")),
        ..Default::default()
    }
    .derive();
    assert_eq!(ticker.change, Some(d("10")));
}

#[test]
fn vwap_needs_nonzero_base_volume() {
    let t = Ticker {
        base_volume: Some(d("2")),
        quote_volume: Some(d("100")),
        ..Default::default()
    }
    .derive();
    assert_eq!(t.vwap, Some(d("50")));
    let zero = Ticker {
        base_volume: Some(Decimal::ZERO),
        quote_volume: Some(d("100")),
        ..Default::default()
    }
    .derive();
    assert!(zero.vwap.is_none());
}

#[test]
fn zero_open_gives_no_percentage() {
    let t = Ticker {
        open: Some(Decimal::ZERO),
        last: Some(d("1")),
        ..Default::default()
    }
    .derive();
    assert_eq!(t.change, Some(d("1")));
    assert!(t.percentage.is_none());
}

#[test]
fn reported_trade_cost_is_kept() {
    let t = Trade {
        price: Some(d("2")),
        amount: Some(d("3")),
        cost: Some(d("5.99")),
        ..Default::default()
    }
    .derive();
    assert_eq!(t.cost, Some(d("5.99")));
}

#[test]
fn order_quantities_fill_in() {
    let o = Order {
        status: Some(Status::Known(OrderState::Open)),
        amount: Some(d("1")),
        filled: Some(d("0.4")),
        price: Some(d("100")),
        ..Default::default()
    }
    .derive();
    assert_eq!(o.remaining, Some(d("0.6")));
    assert_eq!(o.cost, Some(d("40")));
    assert!(o.average.is_none());

    let o = Order {
        filled: Some(d("2")),
        remaining: Some(d("1")),
        cost: Some(d("50")),
        ..Default::default()
    }
    .derive();
    assert_eq!(o.amount, Some(d("3")));
    assert_eq!(o.average, Some(d("25")));
}

#[test]
fn closed_order_amount_defaults_to_filled() {
    let o = Order {
        status: Some(Status::Known(OrderState::Closed)),
        filled: Some(d("5")),
        time_in_force: Some(TimeInForce::Po),
        ..Default::default()
    }
    .derive();
    assert_eq!(o.amount, Some(d("5")));
    assert_eq!(o.remaining, Some(Decimal::ZERO));
    assert_eq!(o.post_only, Some(true));
}

#[test]
fn zero_filled_has_no_average() {
    let o = Order {
        amount: Some(d("1")),
        filled: Some(Decimal::ZERO),
        cost: Some(Decimal::ZERO),
        ..Default::default()
    }
    .derive();
    assert!(o.average.is_none());
}

#[test]
fn balance_fills_missing_figure() {
    let e = BalanceEntry::new(Some(d("1")), Some(d("2")), None);
    assert_eq!(e.total, Some(d("3")));
    let e = BalanceEntry::new(None, Some(d("2")), Some(d("5")));
    assert_eq!(e.free, Some(d("3")));
    let e = BalanceEntry::new(Some(d("4")), None, Some(d("5")));
    assert_eq!(e.used, Some(d("1")));
    let e = BalanceEntry::new(Some(d("4")), None, None);
    assert_eq!(e.total, None);
}

#[test]
fn sub_balances_fold_into_used() {
    assert_eq!(sum_present(&[Some(d("1")), None, Some(d("2"))]), Some(d("3")));
    assert_eq!(sum_present(&[None, None]), None);
}

#[test]
fn repeated_currency_accumulates() {
    let mut b = Balances::default();
    b.insert("USDT", BalanceEntry::new(Some(d("1")), Some(d("1")), None));
    b.insert("USDT", BalanceEntry::new(Some(d("2")), Some(Decimal::ZERO), None));
    let e = b.get("USDT").unwrap();
    assert_eq!(e.free, Some(d("3")));
    assert_eq!(e.total, Some(d("4")));
    assert_eq!(b.len(), 1);
}

#[test]
fn order_book_sorts_sides() {
    let level = |p: &str| PriceLevel {
        price: d(p),
        amount: d("1"),
    };
    let book = OrderBook::new(
        Some("BTC/USDT".into()),
        vec![level("1"), level("3"), level("2")],
        vec![level("6"), level("4"), level("5")],
        None,
        Some(7),
    );
    assert!(book.is_sorted());
    assert_eq!(book.best_bid().unwrap().price, d("3"));
    assert_eq!(book.best_ask().unwrap().price, d("4"));
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000, 0u32..8).prop_map(|(m, s)| Decimal::new(m, s))
}

proptest! {
    #[test]
    fn trade_cost_is_exact_product(price in amount(), qty in amount()) {
        let t = Trade { price: Some(price), amount: Some(qty), ..Default::default() }.derive();
        prop_assert_eq!(t.cost, Some(price * qty));
    }

    #[test]
    fn balance_total_is_free_plus_used(free in amount(), frozen in amount(), locked in amount()) {
        let used = sum_present(&[Some(frozen), Some(locked)]);
        let e = BalanceEntry::new(Some(free), used, None);
        prop_assert_eq!(e.total.unwrap(), e.free.unwrap() + e.used.unwrap());
    }

    #[test]
    fn balance_free_from_total(total in amount(), used in amount()) {
        let e = BalanceEntry::new(None, Some(used), Some(total));
        prop_assert_eq!(e.total.unwrap(), e.free.unwrap() + e.used.unwrap());
    }
}
