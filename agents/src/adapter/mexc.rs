//! MEXC spot v3 and the public half of contract v1.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use canonical::{
    BalanceEntry, Balances, Fee, Limits, Market, MarketTable, MarketType, MinMax, NumericEncoding,
    Order, OrderBook, OrderState, OrderType, Precision, Side, StatusMap, TakerOrMaker, Ticker,
    TimeInForce, Trade, Transaction, TransactionState, TransactionType,
};
use unify_core::config::ExchangeConfig;
use unify_core::fields::{self, FieldChain};
use unify_core::precision::parse_precision;
use unify_core::{Error, ErrorKind, Result};

use super::{
    as_list, market_buy_cost, nonzero, pair_level, price_levels, require_symbol, scope_for,
    scope_of, ExchangeAdapter,
};
use crate::endpoint::{require, Access, Endpoint, HttpMethod, Method, Scope};
use crate::request::{Call, HttpRequest, OrderRequest, Placement};
use crate::translate::ErrorTable;

pub const ID: &str = "mexc";

const SPOT: &str = "https://api.mexc.com/api/v3";
const CONTRACT: &str = "https://contract.mexc.com/api/v1/contract";

const MAX_HISTORY_LIMIT: u32 = 1000;

macro_rules! endpoint {
    ($method:ident, $scope:ident, $verb:ident, $base:expr, $path:expr, $access:ident, $weight:expr) => {
        Endpoint {
            method: Method::$method,
            scope: Scope::$scope,
            verb: HttpMethod::$verb,
            base: $base,
            path: $path,
            access: Access::$access,
            weight: $weight,
        }
    };
}

pub static ENDPOINTS: &[Endpoint] = &[
    endpoint!(FetchMarkets, Spot, Get, SPOT, "/exchangeInfo", Public, 1.0),
    endpoint!(FetchMarkets, Swap, Get, CONTRACT, "/detail", Public, 2.0),
    endpoint!(FetchTicker, Spot, Get, SPOT, "/ticker/24hr", Public, 1.0),
    endpoint!(FetchTicker, Swap, Get, CONTRACT, "/ticker", Public, 2.0),
    endpoint!(FetchTickers, Spot, Get, SPOT, "/ticker/24hr", Public, 1.0),
    endpoint!(FetchTickers, Swap, Get, CONTRACT, "/ticker", Public, 2.0),
    endpoint!(FetchOrderBook, Spot, Get, SPOT, "/depth", Public, 1.0),
    endpoint!(FetchOrderBook, Swap, Get, CONTRACT, "/depth/{symbol}", Public, 2.0),
    endpoint!(FetchTrades, Spot, Get, SPOT, "/trades", Public, 1.0),
    endpoint!(FetchTrades, Swap, Get, CONTRACT, "/deals/{symbol}", Public, 2.0),
    endpoint!(FetchBalance, Spot, Get, SPOT, "/account", Private, 1.0),
    endpoint!(CreateOrder, Spot, Post, SPOT, "/order", Private, 1.0),
    endpoint!(CancelOrder, Spot, Delete, SPOT, "/order", Private, 1.0),
    endpoint!(FetchOrder, Spot, Get, SPOT, "/order", Private, 1.0),
    endpoint!(FetchOpenOrders, Spot, Get, SPOT, "/openOrders", Private, 1.0),
    endpoint!(FetchDeposits, Any, Get, SPOT, "/capital/deposit/hisrec", Private, 1.0),
    endpoint!(FetchWithdrawals, Any, Get, SPOT, "/capital/withdraw/history", Private, 1.0),
];

const ORDER_STATUS: StatusMap<OrderState> = StatusMap::new(&[
    ("NEW", OrderState::Open),
    ("PARTIALLY_FILLED", OrderState::Open),
    ("FILLED", OrderState::Closed),
    ("CANCELED", OrderState::Canceled),
    ("PARTIALLY_CANCELED", OrderState::Canceled),
    ("2", OrderState::Open),
    ("3", OrderState::Closed),
    ("4", OrderState::Canceled),
]);

const DEPOSIT_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("1", TransactionState::Failed),
    ("2", TransactionState::Pending),
    ("3", TransactionState::Pending),
    ("4", TransactionState::Pending),
    ("5", TransactionState::Ok),
    ("6", TransactionState::Pending),
    ("7", TransactionState::Failed),
]);

const WITHDRAWAL_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("1", TransactionState::Pending),
    ("2", TransactionState::Pending),
    ("3", TransactionState::Pending),
    ("4", TransactionState::Pending),
    ("5", TransactionState::Pending),
    ("6", TransactionState::Pending),
    ("7", TransactionState::Ok),
    ("8", TransactionState::Failed),
    ("9", TransactionState::Canceled),
    ("10", TransactionState::Pending),
]);

const TRADE_ID: FieldChain = FieldChain::new(&["id", "a"]);
const TRADE_PRICE: FieldChain = FieldChain::new(&["price", "p"]);
const TRADE_TIMESTAMP: FieldChain = FieldChain::new(&["time", "T"]);
const TRADE_AMOUNT: FieldChain = FieldChain::new(&["qty", "q"]);
const TRADE_BUYER_MAKER: FieldChain = FieldChain::new(&["isBuyerMaker", "m"]);
const ORDER_ID: FieldChain = FieldChain::new(&["orderId", "id"]);
const ORDER_TIMESTAMP: FieldChain = FieldChain::new(&["time", "createTime", "transactTime"]);
const ORDER_STATE: FieldChain = FieldChain::new(&["status", "state"]);
const ORDER_TRIGGER: FieldChain = FieldChain::new(&["stopPrice", "triggerPrice"]);
const ORDER_AMOUNT: FieldChain = FieldChain::new(&["origQty", "vol"]);
const ORDER_FILLED: FieldChain = FieldChain::new(&["executedQty", "dealVol"]);
const TRANSACTION_TIMESTAMP: FieldChain = FieldChain::new(&["insertTime", "applyTime"]);

pub struct Mexc {
    config: ExchangeConfig,
}

impl Mexc {
    pub fn new(config: ExchangeConfig) -> Self {
        Mexc { config }
    }

    fn request(&self, endpoint: &Endpoint) -> HttpRequest {
        HttpRequest::new(ID, endpoint, Placement::Query)
    }

    fn create_order(&self, order: &OrderRequest, markets: &MarketTable) -> Result<HttpRequest> {
        order.validate(ID)?;
        let market = markets.market(&order.symbol)?;
        let endpoint = require(ID, ENDPOINTS, Method::CreateOrder, scope_of(&market))?;
        let mut request = self.request(endpoint);
        let kind = match (&order.order_type, order.time_in_force) {
            (OrderType::Market, Some(TimeInForce::Po)) => {
                return Err(Error::InvalidOrder(format!(
                    "{ID} createOrder() market orders cannot be post-only"
                )))
            }
            (OrderType::Limit, Some(TimeInForce::Po)) => "LIMIT_MAKER",
            (OrderType::Limit, _) => "LIMIT",
            _ => "MARKET",
        };
        request
            .param("symbol", market.id.as_str())
            .param("side", order.side.as_str().to_ascii_uppercase())
            .param("type", kind);
        if order.is_market_buy() {
            request.decimal(
                "quoteOrderQty",
                market_buy_cost(ID, &self.config, order, &market, None)?,
            );
        } else {
            request.decimal("quantity", market.amount_to_precision(order.amount)?);
        }
        if let Some(price) = order.price {
            request.decimal("price", market.price_to_precision(price)?);
        }
        request.param_opt("newClientOrderId", order.client_order_id.as_deref());
        Ok(request)
    }

    fn parse_spot_market(&self, raw: &Value) -> Option<Market> {
        let id = fields::string(raw, "symbol")?;
        let base_id = fields::string(raw, "baseAsset")?;
        let quote_id = fields::string(raw, "quoteAsset")?;
        let base = base_id.to_ascii_uppercase();
        let quote = quote_id.to_ascii_uppercase();
        let trading = raw
            .get("isSpotTradingAllowed")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let active = fields::string(raw, "status").as_deref() == Some("ENABLED") && trading;
        Some(Market {
            symbol: Market::symbol_for(&base, &quote, None),
            id,
            base,
            quote,
            settle: None,
            base_id: Some(base_id),
            quote_id: Some(quote_id),
            settle_id: None,
            market_type: MarketType::Spot,
            active: Some(active),
            precision: Precision {
                amount: fields::string(raw, "baseAssetPrecision")
                    .and_then(|d| parse_precision(&d))?,
                price: fields::string(raw, "quoteAssetPrecision")
                    .and_then(|d| parse_precision(&d))?,
            },
            limits: Limits {
                amount: MinMax {
                    min: fields::decimal(raw, "baseSizePrecision"),
                    max: None,
                },
                price: MinMax::default(),
                cost: MinMax {
                    min: fields::decimal(raw, "quoteAmountPrecision"),
                    max: fields::decimal(raw, "maxQuoteAmount"),
                },
            },
            linear: None,
            inverse: None,
            contract_size: None,
            taker: fields::decimal(raw, "takerCommission"),
            maker: fields::decimal(raw, "makerCommission"),
            encoding: NumericEncoding::Decimal,
        })
    }

    fn parse_swap_market(&self, raw: &Value) -> Option<Market> {
        let id = fields::string(raw, "symbol")?;
        let base_id = fields::string(raw, "baseCoin")?;
        let quote_id = fields::string(raw, "quoteCoin")?;
        let settle_id = fields::string(raw, "settleCoin")?;
        let base = base_id.to_ascii_uppercase();
        let quote = quote_id.to_ascii_uppercase();
        let settle = settle_id.to_ascii_uppercase();
        Some(Market {
            symbol: Market::symbol_for(&base, &quote, Some(&settle)),
            id,
            base,
            quote,
            settle: Some(settle),
            base_id: Some(base_id),
            quote_id: Some(quote_id),
            settle_id: Some(settle_id),
            market_type: MarketType::Swap,
            active: fields::string(raw, "state").map(|s| s == "0"),
            precision: Precision {
                amount: fields::decimal(raw, "volUnit")?,
                price: fields::decimal(raw, "priceUnit")?,
            },
            limits: Limits {
                amount: MinMax {
                    min: fields::decimal(raw, "minVol"),
                    max: fields::decimal(raw, "maxVol"),
                },
                ..Limits::default()
            },
            linear: Some(true),
            inverse: Some(false),
            contract_size: fields::decimal(raw, "contractSize"),
            taker: fields::decimal(raw, "takerFeeRate"),
            maker: fields::decimal(raw, "makerFeeRate"),
            encoding: NumericEncoding::Decimal,
        })
    }

    fn history_request(
        &self,
        method: Method,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        markets: &MarketTable,
    ) -> Result<HttpRequest> {
        if let Some(limit) = limit.filter(|l| *l > MAX_HISTORY_LIMIT) {
            return Err(Error::BadRequest(format!(
                "{ID} {method}() supports a maximum limit of {MAX_HISTORY_LIMIT}, got {limit}"
            )));
        }
        let endpoint = require(ID, ENDPOINTS, method, Scope::Any)?;
        let mut request = self.request(endpoint);
        if let Some(code) = code {
            let coin = markets
                .currency(code)
                .map(|c| c.id.clone())
                .unwrap_or_else(|| code.to_string());
            request.param("coin", coin);
        }
        request
            .param_opt("startTime", since)
            .param_opt("limit", limit);
        Ok(request)
    }
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw {
        "1" => Some(Side::Buy),
        "2" => Some(Side::Sell),
        other => Side::parse(other),
    }
}

fn parse_order_type(raw: &str) -> OrderType {
    match raw {
        "MARKET" => OrderType::Market,
        "LIMIT" | "LIMIT_MAKER" => OrderType::Limit,
        other => OrderType::from(other),
    }
}

fn parse_time_in_force(raw: &str) -> Option<TimeInForce> {
    match raw {
        "GTC" => Some(TimeInForce::Gtc),
        "IOC" => Some(TimeInForce::Ioc),
        "FOK" => Some(TimeInForce::Fok),
        _ => None,
    }
}

/// Normalize chain labels such as `BEP20(BSC)`, `TRX` or `ERC 20`.
fn network_code(raw: &str) -> String {
    if raw.contains("BSC") {
        return "BEP20".to_string();
    }
    let compact = raw.replace(' ', "").replacen("-20", "20", 1);
    match compact.as_str() {
        "TRX" => "TRC20".to_string(),
        _ => compact,
    }
}

/// Public trades carry no id; build a stable one from what they do carry.
fn synthetic_trade_id(trade: &Trade, market_id: Option<&str>) -> Option<String> {
    let timestamp = trade.timestamp?;
    let mut id = format!("{timestamp}-{}", market_id.unwrap_or("_"));
    if let Some(side) = trade.side {
        id.push('-');
        id.push_str(side.as_str());
    }
    for value in [trade.amount, trade.price].into_iter().flatten() {
        id.push('-');
        id.push_str(&value.normalize().to_string());
    }
    if let Some(role) = trade.taker_or_maker {
        id.push_str(match role {
            TakerOrMaker::Taker => "-taker",
            TakerOrMaker::Maker => "-maker",
        });
    }
    Some(id)
}

impl ExchangeAdapter for Mexc {
    fn id(&self) -> &'static str {
        ID
    }

    fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn endpoints(&self) -> &'static [Endpoint] {
        ENDPOINTS
    }

    fn market_scopes(&self) -> &'static [Scope] {
        &[Scope::Spot, Scope::Swap]
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest> {
        match call {
            Call::FetchMarkets { scope } => {
                Ok(self.request(require(ID, ENDPOINTS, call.method(), *scope)?))
            }
            Call::FetchTicker { symbol } => {
                let market = markets.market(symbol)?;
                let endpoint = require(ID, ENDPOINTS, call.method(), scope_of(&market))?;
                let mut request = self.request(endpoint);
                request.param("symbol", market.id.as_str());
                Ok(request)
            }
            Call::FetchTickers { symbols } => {
                let first = symbols.as_ref().and_then(|s| s.first()).map(String::as_str);
                let scope = scope_for(&self.config, first, markets)?;
                Ok(self.request(require(ID, ENDPOINTS, call.method(), scope)?))
            }
            Call::FetchOrderBook { symbol, limit } | Call::FetchTrades { symbol, limit, .. } => {
                let market = markets.market(symbol)?;
                let scope = scope_of(&market);
                let endpoint = require(ID, ENDPOINTS, call.method(), scope)?;
                let mut request = self.request(endpoint);
                if scope == Scope::Swap {
                    request.path_param("symbol", &market.id);
                } else {
                    request.param("symbol", market.id.as_str());
                }
                request.param_opt("limit", *limit);
                Ok(request)
            }
            Call::FetchBalance => {
                let scope = scope_for(&self.config, None, markets)?;
                Ok(self.request(require(ID, ENDPOINTS, call.method(), scope)?))
            }
            Call::CreateOrder(order) => self.create_order(order, markets),
            Call::CancelOrder { id, symbol } | Call::FetchOrder { id, symbol } => {
                let symbol = require_symbol(ID, call.method().as_str(), symbol.as_deref())?;
                let market = markets.market(symbol)?;
                let endpoint = require(ID, ENDPOINTS, call.method(), scope_of(&market))?;
                let mut request = self.request(endpoint);
                request
                    .param("symbol", market.id.as_str())
                    .param("orderId", id.as_str());
                Ok(request)
            }
            Call::FetchOpenOrders { symbol, .. } => {
                let scope = scope_for(&self.config, symbol.as_deref(), markets)?;
                let endpoint = require(ID, ENDPOINTS, call.method(), scope)?;
                let symbol = require_symbol(ID, call.method().as_str(), symbol.as_deref())?;
                let market = markets.market(symbol)?;
                let mut request = self.request(endpoint);
                request.param("symbol", market.id.as_str());
                Ok(request)
            }
            Call::FetchDeposits { code, since, limit }
            | Call::FetchWithdrawals { code, since, limit } => {
                self.history_request(call.method(), code.as_deref(), *since, *limit, markets)
            }
        }
    }

    fn translate_error(&self, _status: u16, body: Option<&Value>, raw: &str) -> Option<Error> {
        let body = body?;
        if body.get("success").and_then(Value::as_bool) == Some(true) {
            return None;
        }
        let code = fields::string(body, "code").filter(|c| c != "0" && c != "200")?;
        Some(ERRORS.classify(&[code.as_str()], Some(raw), format!("{ID} {raw}")))
    }

    fn parse_markets(&self, scope: Scope, payload: &Value) -> Result<Vec<Market>> {
        let (rows, parse): (_, fn(&Self, &Value) -> Option<Market>) = match scope {
            Scope::Swap => (payload.as_array(), Self::parse_swap_market),
            _ => (
                payload.get("symbols").and_then(Value::as_array),
                Self::parse_spot_market,
            ),
        };
        let rows = rows.ok_or_else(|| {
            Error::ExchangeError(format!("{ID} fetchMarkets() returned no market list"))
        })?;
        let mut markets = Vec::with_capacity(rows.len());
        for raw in rows {
            match parse(self, raw) {
                Some(market) => markets.push(market),
                None => warn!(exchange = ID, market = %raw, "skipping market without precision"),
            }
        }
        Ok(markets)
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker {
        let market = markets.safe_market(fields::string(raw, "symbol").as_deref());
        let swap = market.as_ref().map_or(false, |m| m.is_contract())
            || raw.get("timestamp").is_some();
        let ticker = if swap {
            Ticker {
                timestamp: fields::integer(raw, "timestamp"),
                bid: fields::decimal(raw, "bid1"),
                ask: fields::decimal(raw, "ask1"),
                base_volume: fields::decimal(raw, "volume24"),
                quote_volume: fields::decimal(raw, "amount24"),
                high: fields::decimal(raw, "high24Price"),
                low: fields::decimal(raw, "lower24Price"),
                change: fields::decimal(raw, "riseFallValue"),
                percentage: fields::decimal(raw, "riseFallRate")
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
                ..Ticker::default()
            }
        } else {
            Ticker {
                timestamp: fields::integer(raw, "closeTime"),
                bid: fields::decimal(raw, "bidPrice"),
                ask: fields::decimal(raw, "askPrice"),
                bid_volume: nonzero(fields::decimal(raw, "bidQty")),
                ask_volume: nonzero(fields::decimal(raw, "askQty")),
                base_volume: fields::decimal(raw, "volume"),
                quote_volume: fields::decimal(raw, "quoteVolume"),
                open: fields::decimal(raw, "openPrice"),
                high: fields::decimal(raw, "highPrice"),
                low: fields::decimal(raw, "lowPrice"),
                previous_close: fields::decimal(raw, "prevClosePrice"),
                change: fields::decimal(raw, "priceChange"),
                percentage: fields::decimal(raw, "priceChangePercent")
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
                ..Ticker::default()
            }
        };
        Ticker {
            symbol: market.map(|m| m.symbol.clone()),
            close: fields::decimal(raw, "lastPrice"),
            ..ticker
        }
        .derive()
    }

    fn parse_tickers(&self, payload: &Value, markets: &MarketTable) -> Vec<Ticker> {
        match payload {
            Value::Array(rows) => rows.iter().map(|r| self.parse_ticker(r, markets)).collect(),
            single @ Value::Object(_) => vec![self.parse_ticker(single, markets)],
            _ => Vec::new(),
        }
    }

    fn parse_order_book(
        &self,
        payload: &Value,
        symbol: &str,
        _markets: &MarketTable,
    ) -> Result<OrderBook> {
        Ok(OrderBook::new(
            Some(symbol.to_string()),
            price_levels(payload.get("bids"), pair_level),
            price_levels(payload.get("asks"), pair_level),
            fields::integer(payload, "timestamp"),
            fields::integer(payload, "lastUpdateId").or_else(|| fields::integer(payload, "version")),
        ))
    }

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade {
        let market_id = fields::string(raw, "symbol");
        let mut trade = if raw.get("v").is_some() {
            Trade {
                timestamp: fields::integer(raw, "t"),
                price: fields::decimal(raw, "p"),
                amount: fields::decimal(raw, "v"),
                side: fields::string(raw, "T").and_then(|s| parse_side(&s)),
                taker_or_maker: Some(TakerOrMaker::Taker),
                ..Trade::default()
            }
        } else if raw.get("positionMode").is_some() {
            Trade {
                id: TRADE_ID.string(raw),
                order: fields::string(raw, "orderId"),
                price: TRADE_PRICE.decimal(raw),
                timestamp: fields::integer(raw, "timestamp"),
                amount: fields::decimal(raw, "vol"),
                side: fields::string(raw, "side").and_then(|s| parse_side(&s)),
                fee: Fee::from_cost(
                    fields::decimal(raw, "fee"),
                    fields::string(raw, "feeCurrency").map(|c| markets.currency_code(&c)),
                ),
                taker_or_maker: Some(if raw.get("taker").and_then(Value::as_bool) == Some(true) {
                    TakerOrMaker::Taker
                } else {
                    TakerOrMaker::Maker
                }),
                ..Trade::default()
            }
        } else {
            let mut side = raw
                .get("isBuyer")
                .and_then(Value::as_bool)
                .map(|buyer| if buyer { Side::Buy } else { Side::Sell });
            let mut role = raw.get("isMaker").and_then(Value::as_bool).map(|maker| {
                if maker {
                    TakerOrMaker::Maker
                } else {
                    TakerOrMaker::Taker
                }
            });
            if let Some(buyer_maker) = TRADE_BUYER_MAKER.value(raw).and_then(Value::as_bool) {
                side = Some(if buyer_maker { Side::Sell } else { Side::Buy });
                role = Some(TakerOrMaker::Taker);
            }
            Trade {
                id: TRADE_ID.string(raw),
                order: fields::string(raw, "orderId"),
                price: TRADE_PRICE.decimal(raw),
                timestamp: TRADE_TIMESTAMP.integer(raw),
                amount: TRADE_AMOUNT.decimal(raw),
                cost: fields::decimal(raw, "quoteQty"),
                side,
                taker_or_maker: role,
                fee: Fee::from_cost(
                    fields::decimal(raw, "commission"),
                    fields::string(raw, "commissionAsset").map(|c| markets.currency_code(&c)),
                ),
                ..Trade::default()
            }
        };
        trade.symbol = self.safe_symbol(markets, market_id.as_deref());
        if trade.id.is_none() {
            trade.id = synthetic_trade_id(&trade, market_id.as_deref());
        }
        trade.derive()
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order {
        let id = match raw {
            Value::String(id) => Some(id.clone()),
            _ => ORDER_ID.string(raw),
        };
        let fee = fields::string(raw, "feeCurrency").and_then(|currency| {
            let taker = fields::decimal(raw, "takerFee");
            let maker = fields::decimal(raw, "makerFee");
            let cost = canonical::balance::sum_present(&[taker, maker]);
            Fee::from_cost(cost, Some(markets.currency_code(&currency)))
        });
        Order {
            id,
            client_order_id: fields::string(raw, "clientOrderId"),
            timestamp: ORDER_TIMESTAMP.integer(raw),
            symbol: self.safe_symbol(markets, fields::string(raw, "symbol").as_deref()),
            status: ORDER_STATE.string(raw).map(|s| ORDER_STATUS.classify(&s)),
            side: fields::string(raw, "side").and_then(|s| parse_side(&s)),
            order_type: fields::string(raw, "type").map(|t| parse_order_type(&t)),
            time_in_force: fields::string(raw, "timeInForce").and_then(|t| parse_time_in_force(&t)),
            price: fields::decimal(raw, "price"),
            trigger_price: ORDER_TRIGGER.decimal(raw),
            average: fields::decimal(raw, "dealAvgPrice"),
            amount: ORDER_AMOUNT.decimal(raw),
            cost: fields::decimal(raw, "cummulativeQuoteQty"),
            filled: ORDER_FILLED.decimal(raw),
            fee,
            ..Order::default()
        }
        .derive()
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances {
        let mut balances = Balances::default();
        for entry in payload.get("balances").map(as_list).unwrap_or(&[]) {
            let Some(asset) = fields::string(entry, "asset") else {
                warn!(exchange = ID, entry = %entry, "skipping balance without asset");
                continue;
            };
            balances.insert(
                markets.currency_code(&asset),
                BalanceEntry::new(
                    fields::decimal(entry, "free"),
                    fields::decimal(entry, "locked"),
                    None,
                ),
            );
        }
        balances
    }

    fn parse_transaction(
        &self,
        raw: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Transaction {
        let id = fields::string(raw, "id");
        let kind = kind.unwrap_or(if id.is_some() {
            TransactionType::Withdrawal
        } else {
            TransactionType::Deposit
        });
        let currency = fields::string(raw, "coin")
            .and_then(|coin| coin.split('-').next().map(str::to_string))
            .map(|id| markets.currency_code(&id));
        let statuses = match kind {
            TransactionType::Deposit => DEPOSIT_STATUS,
            TransactionType::Withdrawal => WITHDRAWAL_STATUS,
        };
        let fee_cost = fields::decimal(raw, "transactionFee");
        let mut amount = fields::decimal(raw, "amount");
        if kind == TransactionType::Withdrawal {
            amount = match (amount, fee_cost) {
                (Some(amount), Some(fee)) => amount.checked_sub(fee),
                (amount, None) => amount,
                (None, Some(_)) => None,
            };
        }
        Transaction {
            id,
            txid: fields::string(raw, "txId"),
            kind: Some(kind),
            network: fields::string(raw, "network").map(|n| network_code(&n)),
            address: fields::string(raw, "address"),
            tag: fields::string(raw, "memo"),
            amount,
            fee: Fee::from_cost(fee_cost, currency.clone()),
            currency,
            status: fields::string(raw, "status").map(|s| statuses.classify(&s)),
            timestamp: TRANSACTION_TIMESTAMP.integer(raw),
            ..Transaction::default()
        }
    }
}

static ERRORS: ErrorTable = ErrorTable {
    exact: EXACT,
    broad: BROAD,
};

const EXACT: &[(&str, ErrorKind)] = &[
    ("-1128", ErrorKind::BadRequest),
    ("-2011", ErrorKind::BadRequest),
    ("-1121", ErrorKind::BadRequest),
    ("10101", ErrorKind::InsufficientFunds),
    ("2009", ErrorKind::InvalidOrder),
    ("2011", ErrorKind::BadRequest),
    ("30004", ErrorKind::InsufficientFunds),
    ("33333", ErrorKind::BadRequest),
    ("44444", ErrorKind::BadRequest),
    ("1002", ErrorKind::InvalidOrder),
    ("30019", ErrorKind::BadRequest),
    ("30005", ErrorKind::InvalidOrder),
    ("2003", ErrorKind::InvalidOrder),
    ("2005", ErrorKind::InsufficientFunds),
    ("400", ErrorKind::BadRequest),
    ("600", ErrorKind::BadRequest),
    ("70011", ErrorKind::PermissionDenied),
    ("88004", ErrorKind::InsufficientFunds),
    ("88013", ErrorKind::InvalidOrder),
    ("88015", ErrorKind::InsufficientFunds),
    ("700003", ErrorKind::InvalidNonce),
    ("602", ErrorKind::AuthenticationError),
    ("10001", ErrorKind::AuthenticationError),
    ("10007", ErrorKind::BadRequest),
    ("10015", ErrorKind::BadRequest),
    ("10072", ErrorKind::BadRequest),
    ("10073", ErrorKind::BadRequest),
    ("10095", ErrorKind::InvalidOrder),
    ("10096", ErrorKind::InvalidOrder),
    ("10097", ErrorKind::InvalidOrder),
    ("10098", ErrorKind::InvalidOrder),
    ("10099", ErrorKind::BadRequest),
    ("10100", ErrorKind::BadRequest),
    ("10102", ErrorKind::InvalidOrder),
    ("10200", ErrorKind::BadRequest),
    ("10201", ErrorKind::BadRequest),
    ("10202", ErrorKind::BadRequest),
    ("10206", ErrorKind::BadRequest),
    ("10211", ErrorKind::BadRequest),
    ("10212", ErrorKind::BadRequest),
    ("10222", ErrorKind::BadRequest),
    ("10232", ErrorKind::BadRequest),
    ("10268", ErrorKind::BadRequest),
    ("22222", ErrorKind::BadRequest),
    ("30001", ErrorKind::InvalidOrder),
    ("30002", ErrorKind::InvalidOrder),
    ("30003", ErrorKind::InvalidOrder),
    ("30010", ErrorKind::InvalidOrder),
    ("30014", ErrorKind::InvalidOrder),
    ("30016", ErrorKind::InvalidOrder),
    ("30018", ErrorKind::AccountSuspended),
    ("30020", ErrorKind::AuthenticationError),
    ("30021", ErrorKind::BadRequest),
    ("30025", ErrorKind::InvalidOrder),
    ("30026", ErrorKind::BadRequest),
    ("30027", ErrorKind::InvalidOrder),
    ("30028", ErrorKind::InvalidOrder),
    ("30029", ErrorKind::InvalidOrder),
    ("30032", ErrorKind::InvalidOrder),
    ("30041", ErrorKind::InvalidOrder),
    ("700001", ErrorKind::BadRequest),
    ("700002", ErrorKind::AuthenticationError),
    ("700004", ErrorKind::BadRequest),
    ("700005", ErrorKind::InvalidNonce),
    ("700006", ErrorKind::BadRequest),
    ("700007", ErrorKind::AuthenticationError),
    ("700008", ErrorKind::BadRequest),
    ("730001", ErrorKind::BadRequest),
    ("730002", ErrorKind::BadRequest),
    ("730600", ErrorKind::BadRequest),
    ("730601", ErrorKind::BadRequest),
    ("730602", ErrorKind::BadRequest),
    ("730700", ErrorKind::BadRequest),
    ("730701", ErrorKind::BadRequest),
    ("730702", ErrorKind::BadRequest),
    ("730703", ErrorKind::BadRequest),
    ("730704", ErrorKind::BadRequest),
    ("730705", ErrorKind::BadRequest),
    ("730706", ErrorKind::BadRequest),
    ("730707", ErrorKind::BadRequest),
    ("730101", ErrorKind::BadRequest),
    ("140001", ErrorKind::BadRequest),
    ("140002", ErrorKind::AuthenticationError),
];

const BROAD: &[(&str, ErrorKind)] = &[
    ("Order quantity error, please try to modify.", ErrorKind::BadRequest),
    ("Combination of optional parameters invalid", ErrorKind::BadRequest),
    ("api market order is disabled", ErrorKind::BadRequest),
    ("Contract not allow place order!", ErrorKind::InvalidOrder),
    ("Oversold", ErrorKind::InvalidOrder),
    ("Insufficient position", ErrorKind::InsufficientFunds),
    ("Insufficient balance!", ErrorKind::InsufficientFunds),
    ("Bid price is great than max allow price", ErrorKind::InvalidOrder),
    ("Invalid symbol.", ErrorKind::BadRequest),
    ("Param error!", ErrorKind::BadRequest),
];
