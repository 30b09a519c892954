use std::str::FromStr;

use agents::adapter::ndax::Ndax;
use agents::adapter::ExchangeAdapter;
use agents::endpoint::{HttpMethod, Scope};
use agents::request::{Call, OrderRequest, Placement};
use agents::Normalized;
use canonical::{
    MarketTable, OrderState, OrderType, Side, TakerOrMaker, TimeInForce, TransactionState,
    TransactionType,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use unify_core::config::ExchangeConfig;
use unify_core::ErrorKind;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn config() -> ExchangeConfig {
    let mut config = ExchangeConfig::new("ndax");
    config.account_id = Some("7".into());
    config
}

fn adapter() -> Ndax {
    Ndax::new(config())
}

fn instruments() -> Value {
    json!([
        {
            "OMSId": 1,
            "InstrumentId": 1,
            "Symbol": "BTCCAD",
            "Product1": 1,
            "Product1Symbol": "BTC",
            "Product2": 3,
            "Product2Symbol": "CAD",
            "QuantityIncrement": 0.0001,
            "PriceIncrement": 1,
            "MinimumQuantity": 0.0001,
            "MinimumPrice": 15000,
            "SessionStatus": "Running",
            "IsDisable": false
        },
        {
            "OMSId": 1,
            "InstrumentId": 2,
            "Symbol": "ETHCAD",
            "Product1": 2,
            "Product1Symbol": "ETH",
            "Product2": 3,
            "Product2Symbol": "CAD",
            "QuantityIncrement": 0.001,
            "PriceIncrement": 0.1,
            "SessionStatus": "Stopped",
            "IsDisable": false
        }
    ])
}

fn table() -> MarketTable {
    let normalized = adapter()
        .normalize_response(&Call::FetchMarkets { scope: Scope::Spot }, &instruments(), &MarketTable::default())
        .unwrap();
    let Normalized::Markets { markets, currencies } = normalized else {
        panic!("expected markets");
    };
    MarketTable::new(markets, currencies).unwrap()
}

#[test]
fn instruments_become_markets_with_flat_fees() {
    let markets = table();
    let btc = markets.market("BTC/CAD").unwrap();
    assert_eq!(btc.id, "1");
    assert_eq!(btc.base_id.as_deref(), Some("1"));
    assert_eq!(btc.precision.amount, d("0.0001"));
    assert_eq!(btc.precision.price, d("1"));
    assert_eq!(btc.limits.price.min, Some(d("15000")));
    assert_eq!(btc.maker, Some(d("0.002")));
    assert_eq!(btc.taker, Some(d("0.0025")));
    assert_eq!(btc.active, Some(true));

    let eth = markets.market("ETH/CAD").unwrap();
    assert_eq!(eth.active, Some(false));
}

#[test]
fn currencies_named_by_product_ids() {
    let markets = table();
    assert_eq!(markets.currency_code("1"), "BTC");
    assert_eq!(markets.currency_code("2"), "ETH");
    assert_eq!(markets.currency_code("3"), "CAD");
}

#[test]
fn every_request_carries_oms_id() {
    let call = Call::FetchTicker {
        symbol: "BTC/CAD".into(),
    };
    let request = adapter().build_request(&call, &table()).unwrap();
    assert_eq!(request.verb, HttpMethod::Get);
    assert_eq!(request.path, "/GetLevel1");
    assert_eq!(request.param_str("omsId").as_deref(), Some("1"));
    assert_eq!(request.param_str("InstrumentId").as_deref(), Some("1"));
}

#[test]
fn order_book_depth_defaults() {
    let call = Call::FetchOrderBook {
        symbol: "BTC/CAD".into(),
        limit: None,
    };
    let request = adapter().build_request(&call, &table()).unwrap();
    assert_eq!(request.param_str("Depth").as_deref(), Some("100"));
}

#[test]
fn private_call_needs_account_id() {
    let ndax = Ndax::new(ExchangeConfig::new("ndax"));
    let err = ndax
        .build_request(&Call::FetchBalance, &table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentsRequired);
    assert!(err.message().contains("account_id"));

    let request = adapter()
        .build_request(&Call::FetchBalance, &table())
        .unwrap();
    assert_eq!(request.param_str("AccountId").as_deref(), Some("7"));
}

#[test]
fn limit_order_encoding() {
    let order = OrderRequest::limit("BTC/CAD", Side::Sell, d("0.12345"), d("40000.6"))
        .with_time_in_force(TimeInForce::Ioc)
        .with_client_order_id("42");
    let request = adapter()
        .build_request(&Call::CreateOrder(order), &table())
        .unwrap();
    assert_eq!(request.verb, HttpMethod::Post);
    assert_eq!(request.placement, Placement::Json);
    assert_eq!(request.path, "/SendOrder");
    assert_eq!(request.param_str("Side").as_deref(), Some("1"));
    assert_eq!(request.param_str("OrderType").as_deref(), Some("2"));
    assert_eq!(request.param_str("TimeInForce").as_deref(), Some("3"));
    assert_eq!(request.param_str("Quantity").as_deref(), Some("0.1234"));
    assert_eq!(request.param_str("LimitPrice").as_deref(), Some("40001"));
    assert_eq!(request.param_str("ClientOrderId").as_deref(), Some("42"));
}

#[test]
fn market_order_has_no_limit_price() {
    let order = OrderRequest::market("BTC/CAD", Side::Buy, d("0.5")).with_price(d("40000"));
    let request = adapter()
        .build_request(&Call::CreateOrder(order), &table())
        .unwrap();
    assert_eq!(request.param_str("OrderType").as_deref(), Some("1"));
    assert_eq!(request.param_str("Side").as_deref(), Some("0"));
    assert_eq!(request.param_str("TimeInForce").as_deref(), Some("1"));
    assert!(request.get_param("LimitPrice").is_none());
}

#[test]
fn client_order_id_must_be_numeric() {
    let order = OrderRequest::limit("BTC/CAD", Side::Buy, d("1"), d("40000"))
        .with_client_order_id("abc");
    let err = adapter()
        .build_request(&Call::CreateOrder(order), &table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOrder);
}

#[test]
fn post_only_rejected() {
    let order = OrderRequest::limit("BTC/CAD", Side::Buy, d("1"), d("40000"))
        .with_time_in_force(TimeInForce::Po);
    let err = adapter()
        .build_request(&Call::CreateOrder(order), &table())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOrder);
}

#[test]
fn not_found_status_is_authentication() {
    let err = adapter().translate_error(404, None, "").unwrap();
    assert_eq!(err.kind(), ErrorKind::AuthenticationError);
}

#[test]
fn error_message_classified() {
    let body = json!({"result": false, "errormsg": "Not_Enough_Funds", "errorcode": 101});
    let err = adapter()
        .translate_error(200, Some(&body), &body.to_string())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

    let body = json!({"result": false, "errormsg": "Invalid InstrumentId: 99", "errorcode": 100});
    let err = adapter()
        .translate_error(200, Some(&body), &body.to_string())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn plain_payload_is_not_an_error() {
    let body = json!([]);
    assert!(adapter()
        .translate_error(200, Some(&body), "[]")
        .is_none());
}

#[test]
fn level1_ticker() {
    let raw = json!({
        "OMSId": 1,
        "InstrumentId": 1,
        "BestBid": 39990,
        "BestOffer": 40010,
        "LastTradedPx": 40000,
        "SessionOpen": 39000,
        "SessionHigh": 41000,
        "SessionLow": 38000,
        "Rolling24HrVolume": 2,
        "Rolling24HrNotional": 80000,
        "Rolling24HrPxChange": 1000,
        "TimeStamp": "1690000000000"
    });
    let ticker = adapter().parse_ticker(&raw, &table());
    assert_eq!(ticker.symbol.as_deref(), Some("BTC/CAD"));
    assert_eq!(ticker.last, Some(d("40000")));
    assert_eq!(ticker.vwap, Some(d("40000")));
    assert_eq!(ticker.timestamp, Some(1_690_000_000_000));
}

#[test]
fn l2_rows_split_by_side() {
    let body = json!([
        [10, 1, 1690000000000i64, 0, 40000, 0, 39990, 1, 0.5, 0],
        [12, 1, 1690000000500i64, 0, 40000, 0, 39980, 1, 1.0, 0],
        [11, 1, 1690000000200i64, 0, 40000, 0, 40010, 1, 0.25, 1]
    ]);
    let call = Call::FetchOrderBook {
        symbol: "BTC/CAD".into(),
        limit: None,
    };
    let normalized = adapter().normalize_response(&call, &body, &table()).unwrap();
    let Normalized::OrderBook(book) = normalized else {
        panic!("expected order book");
    };
    assert_eq!(book.bids.len(), 2);
    assert_eq!(book.asks.len(), 1);
    assert_eq!(book.best_bid().unwrap().price, d("39990"));
    assert_eq!(book.best_ask().unwrap().amount, d("0.25"));
    assert_eq!(book.nonce, Some(12));
    assert_eq!(book.timestamp, Some(1_690_000_000_500));
}

#[test]
fn public_trade_rows() {
    let body = json!([[6913253, 1, 0.2, 40000, 111, 222, 1690000000000i64, 0, 1, 0, 0]]);
    let call = Call::FetchTrades {
        symbol: "BTC/CAD".into(),
        since: None,
        limit: Some(10),
    };
    let normalized = adapter().normalize_response(&call, &body, &table()).unwrap();
    let Normalized::Trades(trades) = normalized else {
        panic!("expected trades");
    };
    let trade = &trades[0];
    assert_eq!(trade.id.as_deref(), Some("6913253"));
    assert_eq!(trade.order.as_deref(), Some("111"));
    assert_eq!(trade.symbol.as_deref(), Some("BTC/CAD"));
    assert_eq!(trade.side, Some(Side::Sell));
    assert_eq!(trade.cost, Some(d("8000")));
}

#[test]
fn account_trade_fee_in_product() {
    let raw = json!({
        "TradeId": 1,
        "OrderId": 99,
        "InstrumentId": 1,
        "Side": "Buy",
        "OrderType": "Limit",
        "MakerTaker": "Maker",
        "Price": 40000,
        "Quantity": 0.1,
        "Value": 4000,
        "Fee": 8,
        "FeeProductId": 3,
        "TradeTimeMS": 1690000000000i64
    });
    let trade = adapter().parse_trade(&raw, &table());
    assert_eq!(trade.order.as_deref(), Some("99"));
    assert_eq!(trade.taker_or_maker, Some(TakerOrMaker::Maker));
    assert_eq!(trade.order_type, Some(OrderType::Limit));
    let fee = trade.fee.unwrap();
    assert_eq!(fee.cost, Some(d("8")));
    assert_eq!(fee.currency.as_deref(), Some("CAD"));
}

#[test]
fn order_status_and_sentinels() {
    let raw = json!({
        "OrderId": 5,
        "ClientOrderId": 0,
        "Instrument": 1,
        "Side": "Sell",
        "OrderType": "Limit",
        "OrderState": "Working",
        "Price": 40000,
        "StopPrice": 0,
        "OrigQuantity": 1,
        "QuantityExecuted": 0.25,
        "AvgPrice": 40000,
        "GrossValueExecuted": 10000,
        "ReceiveTime": 1690000000000i64
    });
    let order = adapter().parse_order(&raw, &table());
    assert_eq!(order.id.as_deref(), Some("5"));
    assert_eq!(order.client_order_id, None);
    assert_eq!(order.trigger_price, None);
    assert_eq!(order.symbol.as_deref(), Some("BTC/CAD"));
    assert_eq!(order.state(), Some(OrderState::Open));
    assert_eq!(order.remaining, Some(d("0.75")));

    let rejected = json!({"OrderId": 6, "OrderState": "Rejected"});
    let order = adapter().parse_order(&rejected, &table());
    assert_eq!(order.state(), Some(OrderState::Rejected));
}

#[test]
fn positions_become_balances() {
    let body = json!([
        {"AccountId": 7, "ProductSymbol": "btc", "ProductId": 1, "Amount": 1.5, "Hold": 0.5},
        {"AccountId": 7, "ProductId": 3, "Amount": 100, "Hold": 0},
        {"AccountId": 7, "ProductId": 77, "Amount": 1, "Hold": 0}
    ]);
    let normalized = adapter()
        .normalize_response(&Call::FetchBalance, &body, &table())
        .unwrap();
    let Normalized::Balance(balances) = normalized else {
        panic!("expected balance");
    };
    assert_eq!(balances.len(), 2);
    assert_eq!(balances.get("BTC").unwrap().free, Some(d("1")));
    assert_eq!(balances.get("CAD").unwrap().total, Some(d("100")));
}

#[test]
fn ticket_template_form_parsed() {
    let body = json!([{
        "WithdrawId": "W-1",
        "ProductId": 1,
        "Amount": 0.5,
        "FeeAmount": 0.0005,
        "TicketStatus": "FullyProcessed",
        "TemplateForm": "{\"ExternalAddress\":\"bc1qxyz\",\"TxId\":\"abc123\",\"TimeSubmitted\":1690000000000}",
        "LastUpdateTimeStamp": 1690000100000i64
    }]);
    let call = Call::FetchWithdrawals {
        code: None,
        since: None,
        limit: None,
    };
    let normalized = adapter().normalize_response(&call, &body, &table()).unwrap();
    let Normalized::Transactions(list) = normalized else {
        panic!("expected transactions");
    };
    let tx = &list[0];
    assert_eq!(tx.id.as_deref(), Some("W-1"));
    assert_eq!(tx.kind, Some(TransactionType::Withdrawal));
    assert_eq!(tx.currency.as_deref(), Some("BTC"));
    assert_eq!(tx.address.as_deref(), Some("bc1qxyz"));
    assert_eq!(tx.txid.as_deref(), Some("abc123"));
    assert_eq!(tx.timestamp, Some(1_690_000_000_000));
    assert_eq!(tx.updated, Some(1_690_000_100_000));
    assert_eq!(
        tx.status.as_ref().and_then(|s| s.known()),
        Some(TransactionState::Ok)
    );
}

#[test]
fn rejected_deposit_is_failed() {
    let body = json!([{
        "DepositId": 9,
        "ProductId": 3,
        "Amount": 100,
        "TicketStatus": "Rejected",
        "TemplateForm": "not json"
    }]);
    let call = Call::FetchDeposits {
        code: None,
        since: None,
        limit: None,
    };
    let normalized = adapter().normalize_response(&call, &body, &table()).unwrap();
    let Normalized::Transactions(list) = normalized else {
        panic!("expected transactions");
    };
    assert_eq!(list[0].kind, Some(TransactionType::Deposit));
    assert_eq!(list[0].address, None);
    assert_eq!(
        list[0].status.as_ref().and_then(|s| s.known()),
        Some(TransactionState::Failed)
    );
}
