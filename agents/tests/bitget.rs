use std::str::FromStr;

use agents::adapter::bitget::Bitget;
use agents::adapter::ExchangeAdapter;
use agents::endpoint::{HttpMethod, Scope};
use agents::request::{Call, OrderRequest, Placement};
use agents::Normalized;
use canonical::{MarketTable, MarketType, OrderState, Side, Status, TimeInForce};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use unify_core::config::ExchangeConfig;
use unify_core::ErrorKind;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn adapter() -> Bitget {
    Bitget::new(ExchangeConfig::new("bitget"))
}

fn spot_row() -> Value {
    json!({
        "symbol": "BTCUSDT_SPBL",
        "baseCoin": "BTC",
        "quoteCoin": "USDT",
        "priceScale": "2",
        "quantityScale": "4",
        "minTradeAmount": "0.0001",
        "maxTradeAmount": "10000",
        "minTradeUSDT": "5",
        "takerFeeRate": "0.001",
        "makerFeeRate": "0.001",
        "status": "online"
    })
}

fn swap_row() -> Value {
    json!({
        "symbol": "BTCUSDT_UMCBL",
        "baseCoin": "BTC",
        "quoteCoin": "USDT",
        "supportMarginCoins": ["USDT"],
        "priceEndStep": "5",
        "pricePlace": "1",
        "minTradeNum": "0.001",
        "volumePlace": "3",
        "sizeMultiplier": "0.001",
        "takerFeeRate": "0.0006",
        "makerFeeRate": "0.0002"
    })
}

fn table() -> MarketTable {
    let adapter = adapter();
    let mut markets = adapter
        .parse_markets(Scope::Spot, &json!([spot_row()]))
        .unwrap();
    markets.extend(
        adapter
            .parse_markets(Scope::Swap, &json!([swap_row()]))
            .unwrap(),
    );
    MarketTable::new(markets, vec![]).unwrap()
}

#[test]
fn spot_market_precision_from_digit_counts() {
    let markets = adapter()
        .parse_markets(Scope::Spot, &json!([spot_row()]))
        .unwrap();
    let m = &markets[0];
    assert_eq!(m.symbol, "BTC/USDT");
    assert_eq!(m.market_type, MarketType::Spot);
    assert_eq!(m.precision.price, d("0.01"));
    assert_eq!(m.precision.amount, d("0.0001"));
    assert_eq!(m.limits.cost.min, Some(d("5")));
    assert_eq!(m.active, Some(true));
}

#[test]
fn contract_step_widened_by_place_count() {
    let markets = adapter()
        .parse_markets(Scope::Swap, &json!([swap_row()]))
        .unwrap();
    let m = &markets[0];
    assert_eq!(m.symbol, "BTC/USDT:USDT");
    assert_eq!(m.market_type, MarketType::Swap);
    assert_eq!(m.precision.price, d("0.5"));
    assert_eq!(m.precision.amount, d("0.001"));
    assert_eq!(m.linear, Some(true));
    assert_eq!(m.contract_size, Some(d("0.001")));
}

#[test]
fn market_without_precision_is_skipped() {
    let mut row = spot_row();
    row["priceScale"] = Value::Null;
    let markets = adapter().parse_markets(Scope::Spot, &json!([row])).unwrap();
    assert!(markets.is_empty());
}

#[test]
fn ticker_percentage_is_scaled_and_derived() {
    let markets = table();
    let raw = json!({
        "symbol": "BTCUSDT",
        "high24h": "31000",
        "low24h": "29000",
        "close": "30000",
        "quoteVol": "300000",
        "baseVol": "10",
        "buyOne": "29999",
        "sellOne": "30001",
        "ts": "1690000000000",
        "priceChangePercent": "0.05"
    });
    let ticker = adapter().parse_ticker(&raw, &markets);
    assert_eq!(ticker.symbol.as_deref(), Some("BTC/USDT"));
    assert_eq!(ticker.percentage, Some(d("5")));
    assert_eq!(ticker.last, Some(d("30000")));
    assert_eq!(ticker.vwap, Some(d("30000")));
    assert_eq!(ticker.bid, Some(d("29999")));
    assert_eq!(ticker.timestamp, Some(1_690_000_000_000));
}

#[test]
fn unknown_suffixed_id_leaves_symbol_unset() {
    let adapter = adapter();
    let empty = MarketTable::default();
    for id in ["BTCUSDT_UMCBL", "ETHUSDT_SPBL", "XRPUSDT"] {
        let ticker = adapter.parse_ticker(&json!({"symbol": id, "close": "1"}), &empty);
        assert_eq!(ticker.symbol, None, "{id}");
    }
    let known = adapter.parse_ticker(&json!({"symbol": "BTCUSDT", "close": "1"}), &table());
    assert_eq!(known.symbol.as_deref(), Some("BTC/USDT"));
}

#[test]
fn spot_market_buy_sends_cost_as_quantity() {
    let markets = table();
    let order = OrderRequest::market("BTC/USDT", Side::Buy, d("0.5")).with_price(d("30000"));
    let request = adapter()
        .build_request(&Call::CreateOrder(order), &markets)
        .unwrap();
    assert_eq!(request.verb, HttpMethod::Post);
    assert_eq!(request.placement, Placement::Json);
    assert_eq!(request.path, "/trade/orders");
    assert_eq!(request.param_str("quantity").as_deref(), Some("15000"));
    assert_eq!(request.param_str("force").as_deref(), Some("gtc"));
}

#[test]
fn market_buy_without_price_rejected() {
    let markets = table();
    let order = OrderRequest::market("BTC/USDT", Side::Buy, d("0.5"));
    let err = adapter()
        .build_request(&Call::CreateOrder(order), &markets)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOrder);
}

#[test]
fn swap_reduce_only_sell_closes_long() {
    let markets = table();
    let mut order = OrderRequest::limit("BTC/USDT:USDT", Side::Sell, d("1.2345"), d("30002.7"))
        .with_time_in_force(TimeInForce::Ioc);
    order.reduce_only = true;
    let request = adapter()
        .build_request(&Call::CreateOrder(order), &markets)
        .unwrap();
    assert_eq!(request.path, "/order/placeOrder");
    assert_eq!(request.param_str("side").as_deref(), Some("close_long"));
    assert_eq!(request.param_str("size").as_deref(), Some("1.234"));
    assert_eq!(request.param_str("price").as_deref(), Some("30002.5"));
    assert_eq!(request.param_str("timeInForceValue").as_deref(), Some("ioc"));
    assert_eq!(request.param_str("marginCoin").as_deref(), Some("USDT"));
}

#[test]
fn cancel_requires_symbol() {
    let call = Call::CancelOrder {
        id: "1".into(),
        symbol: None,
    };
    let err = adapter().build_request(&call, &table()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentsRequired);
}

#[test]
fn deposits_require_code() {
    let call = Call::FetchDeposits {
        code: None,
        since: None,
        limit: None,
    };
    let err = adapter().build_request(&call, &table()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentsRequired);
}

#[test]
fn message_wins_over_code() {
    let body = json!({"code": "40014", "err_msg": "user locked"});
    let err = adapter()
        .translate_error(400, Some(&body), &body.to_string())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::AccountSuspended);
    assert!(err.message().starts_with("bitget "));
}

#[test]
fn code_used_when_message_unknown() {
    let body = json!({"code": "40109", "msg": "order does not exist"});
    let err = adapter()
        .translate_error(400, Some(&body), &body.to_string())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::OrderNotFound);
}

#[test]
fn success_code_is_not_an_error() {
    let body = json!({"code": "00000", "data": []});
    assert!(adapter()
        .translate_error(200, Some(&body), &body.to_string())
        .is_none());
}

#[test]
fn unknown_code_falls_back_to_exchange_error() {
    let body = json!({"code": "99999", "err_msg": "something odd"});
    let err = adapter()
        .translate_error(200, Some(&body), &body.to_string())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::ExchangeError);
}

#[test]
fn swap_order_side_from_position_direction() {
    let markets = table();
    let raw = json!({
        "orderId": "802382049422487552",
        "clientOid": "c1",
        "symbol": "BTCUSDT_UMCBL",
        "side": "open_long",
        "orderType": "limit",
        "price": "30000",
        "size": "2",
        "filledQty": "0.5",
        "priceAvg": "30010",
        "state": "new",
        "cTime": "1690000000000"
    });
    let order = adapter().parse_order(&raw, &markets);
    assert_eq!(order.symbol.as_deref(), Some("BTC/USDT:USDT"));
    assert_eq!(order.side, Some(Side::Buy));
    assert_eq!(order.state(), Some(OrderState::Open));
    assert_eq!(order.remaining, Some(d("1.5")));
    assert_eq!(order.client_order_id.as_deref(), Some("c1"));
}

#[test]
fn unknown_order_status_kept_raw() {
    let raw = json!({"orderId": "1", "status": "mystery"});
    let order = adapter().parse_order(&raw, &table());
    assert_eq!(order.status, Some(Status::Unrecognized("mystery".into())));
}

#[test]
fn balance_folds_frozen_and_locked() {
    let markets = table();
    let body = json!({
        "code": "00000",
        "data": [{"coinName": "USDT", "available": "100", "frozen": "5", "lock": "1"}]
    });
    let normalized = adapter()
        .normalize_response(&Call::FetchBalance, &body, &markets)
        .unwrap();
    let Normalized::Balance(balances) = normalized else {
        panic!("expected balance");
    };
    let usdt = balances.get("USDT").unwrap();
    assert_eq!(usdt.free, Some(d("100")));
    assert_eq!(usdt.used, Some(d("6")));
    assert_eq!(usdt.total, Some(d("106")));
}

#[test]
fn order_book_sorted_best_first() {
    let body = json!({
        "code": "00000",
        "data": {
            "bids": [["29990", "1"], ["29999", "2"]],
            "asks": [["30010", "1"], ["30001", "3"]],
            "timestamp": "1690000000000"
        }
    });
    let call = Call::FetchOrderBook {
        symbol: "BTC/USDT".into(),
        limit: None,
    };
    let normalized = adapter().normalize_response(&call, &body, &table()).unwrap();
    let Normalized::OrderBook(book) = normalized else {
        panic!("expected order book");
    };
    assert!(book.is_sorted());
    assert_eq!(book.best_bid().unwrap().price, d("29999"));
    assert_eq!(book.best_ask().unwrap().price, d("30001"));
}
