//! Bitget REST v1: spot (`*_SPBL`) and mix contract (`*_UMCBL`, `*_DMCBL`,
//! `*_CMCBL`) markets.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use canonical::balance::sum_present;
use canonical::{
    BalanceEntry, Balances, Fee, Limits, Market, MarketTable, MarketType, MinMax, NumericEncoding,
    Order, OrderBook, OrderState, OrderType, Precision, Side, StatusMap, Ticker, TimeInForce,
    Trade, Transaction, TransactionState, TransactionType,
};
use unify_core::config::ExchangeConfig;
use unify_core::fields::{self, FieldChain};
use unify_core::precision::{parse_precision, Rounding};
use unify_core::{Error, ErrorKind, Result};

use super::{
    market_buy_cost, now_ms, pair_level, price_levels, require_code, require_symbol, scope_for,
    scope_of, ExchangeAdapter,
};
use crate::endpoint::{require, Access, Endpoint, HttpMethod, Method, Scope};
use crate::request::{Call, HttpRequest, OrderRequest, Placement};
use crate::translate::ErrorTable;

pub const ID: &str = "bitget";

const SPOT: &str = "https://api.bitget.com/api/spot/v1";
const MIX: &str = "https://api.bitget.com/api/mix/v1";

/// Product type used for contract-wide requests.
const PRODUCT_TYPE: &str = "umcbl";

/// Deposit and withdrawal history defaults to the trailing year.
const HISTORY_WINDOW_MS: i64 = 31_556_952_000;

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
    endpoint!(FetchMarkets, Spot, Get, SPOT, "/public/products", Public, 1.0),
    endpoint!(FetchMarkets, Swap, Get, MIX, "/market/contracts", Public, 1.0),
    endpoint!(FetchTicker, Spot, Get, SPOT, "/market/ticker", Public, 1.0),
    endpoint!(FetchTicker, Swap, Get, MIX, "/market/ticker", Public, 1.0),
    endpoint!(FetchTickers, Spot, Get, SPOT, "/market/tickers", Public, 1.0),
    endpoint!(FetchTickers, Swap, Get, MIX, "/market/tickers", Public, 1.0),
    endpoint!(FetchOrderBook, Spot, Get, SPOT, "/market/depth", Public, 1.0),
    endpoint!(FetchOrderBook, Swap, Get, MIX, "/market/depth", Public, 1.0),
    endpoint!(FetchTrades, Spot, Get, SPOT, "/market/fills", Public, 1.0),
    endpoint!(FetchTrades, Swap, Get, MIX, "/market/fills", Public, 1.0),
    endpoint!(FetchBalance, Spot, Get, SPOT, "/account/assets", Private, 2.0),
    endpoint!(FetchBalance, Swap, Get, MIX, "/account/accounts", Private, 2.0),
    endpoint!(CreateOrder, Spot, Post, SPOT, "/trade/orders", Private, 2.0),
    endpoint!(CreateOrder, Swap, Post, MIX, "/order/placeOrder", Private, 2.0),
    endpoint!(CancelOrder, Spot, Post, SPOT, "/trade/cancel-order", Private, 2.0),
    endpoint!(CancelOrder, Swap, Post, MIX, "/order/cancel-order", Private, 2.0),
    endpoint!(FetchOrder, Spot, Post, SPOT, "/trade/orderInfo", Private, 1.0),
    endpoint!(FetchOrder, Swap, Get, MIX, "/order/detail", Private, 2.0),
    endpoint!(FetchOpenOrders, Spot, Post, SPOT, "/trade/open-orders", Private, 1.0),
    endpoint!(FetchOpenOrders, Swap, Get, MIX, "/order/current", Private, 2.0),
    endpoint!(FetchDeposits, Any, Get, SPOT, "/wallet/deposit-list", Private, 1.0),
    endpoint!(FetchWithdrawals, Any, Get, SPOT, "/wallet/withdrawal-list", Private, 1.0),
];

const ORDER_STATUS: StatusMap<OrderState> = StatusMap::new(&[
    ("new", OrderState::Open),
    ("init", OrderState::Open),
    ("not_trigger", OrderState::Open),
    ("partial_fill", OrderState::Open),
    ("full_fill", OrderState::Closed),
    ("filled", OrderState::Closed),
    ("triggered", OrderState::Closed),
    ("cancel", OrderState::Canceled),
    ("cancelled", OrderState::Canceled),
    ("canceled", OrderState::Canceled),
    ("fail_trigger", OrderState::Canceled),
]);

const TRANSACTION_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("success", TransactionState::Ok),
    ("Pending", TransactionState::Pending),
    ("pending_review", TransactionState::Pending),
    ("pending_review_fail", TransactionState::Failed),
    ("reject", TransactionState::Failed),
]);

const ERROR_CODE: FieldChain = FieldChain::new(&["code", "err_code"]);
const TICKER_CLOSE: FieldChain = FieldChain::new(&["close", "last"]);
const TICKER_QUOTE_VOLUME: FieldChain = FieldChain::new(&["quoteVol", "quoteVolume"]);
const TICKER_BASE_VOLUME: FieldChain = FieldChain::new(&["baseVol", "baseVolume"]);
const TICKER_TIMESTAMP: FieldChain = FieldChain::new(&["ts", "timestamp"]);
const TICKER_BID: FieldChain = FieldChain::new(&["buyOne", "bestBid"]);
const TICKER_ASK: FieldChain = FieldChain::new(&["sellOne", "bestAsk"]);
const TRADE_ID: FieldChain = FieldChain::new(&["tradeId", "fillId"]);
const TRADE_PRICE: FieldChain = FieldChain::new(&["fillPrice", "price"]);
const TRADE_AMOUNT: FieldChain = FieldChain::new(&["sizeQty", "fillQuantity", "size"]);
const TRADE_TIMESTAMP: FieldChain = FieldChain::new(&["cTime", "fillTime", "timestamp"]);
const BALANCE_CODE: FieldChain = FieldChain::new(&["coinName", "coinId", "marginCoin"]);
const BALANCE_LOCKED: FieldChain = FieldChain::new(&["lock", "locked"]);
const ORDER_PRICE: FieldChain = FieldChain::new(&["price", "executePrice"]);
const ORDER_AMOUNT: FieldChain = FieldChain::new(&["quantity", "size"]);
const ORDER_FILLED: FieldChain = FieldChain::new(&["fillQuantity", "filledQty"]);
const ORDER_COST: FieldChain = FieldChain::new(&["fillTotalAmount", "filledAmount"]);
const ORDER_AVERAGE: FieldChain = FieldChain::new(&["fillPrice", "priceAvg"]);
const ORDER_SIDE: FieldChain = FieldChain::new(&["side", "posSide"]);
const ORDER_CLIENT_ID: FieldChain = FieldChain::new(&["clientOrderId", "clientOid"]);
const ORDER_STATE: FieldChain = FieldChain::new(&["status", "state"]);
const MIN_AMOUNT: FieldChain = FieldChain::new(&["minTradeNum", "minTradeAmount"]);

pub struct Bitget {
    config: ExchangeConfig,
}

impl Bitget {
    pub fn new(config: ExchangeConfig) -> Self {
        Bitget { config }
    }

    fn request(&self, endpoint: &Endpoint) -> HttpRequest {
        let mut request = HttpRequest::new(ID, endpoint, Placement::Json);
        if endpoint.access == Access::Private {
            if let Some(broker) = &self.config.broker_id {
                request.header("X-CHANNEL-API-CODE", broker.clone());
            }
        }
        request
    }

    fn create_order(&self, order: &OrderRequest, markets: &MarketTable) -> Result<HttpRequest> {
        order.validate(ID)?;
        let market = markets.market(&order.symbol)?;
        let scope = scope_of(&market);
        let endpoint = require(ID, ENDPOINTS, Method::CreateOrder, scope)?;
        let mut request = self.request(endpoint);
        request
            .param("symbol", market.id.as_str())
            .param("orderType", String::from(order.order_type.clone()));
        if order.order_type == OrderType::Limit {
            if let Some(price) = order.price {
                request.decimal("price", market.price_to_precision(price)?);
            }
        }
        if order.order_type == OrderType::Market && order.time_in_force == Some(TimeInForce::Po) {
            return Err(Error::InvalidOrder(format!(
                "{ID} createOrder() market orders cannot be post-only"
            )));
        }
        if scope == Scope::Spot {
            if order.is_market_buy() {
                let cost =
                    market_buy_cost(ID, &self.config, order, &market, Some(Rounding::Round))?;
                request.decimal("quantity", cost);
            } else {
                request.decimal("quantity", market.amount_to_precision(order.amount)?);
            }
            request
                .param_opt("clientOrderId", order.client_order_id.as_deref())
                .param("side", order.side.as_str())
                .param("force", force(order.time_in_force));
        } else {
            request
                .param_opt("clientOid", order.client_order_id.as_deref())
                .decimal("size", market.amount_to_precision(order.amount)?);
            match order.time_in_force {
                Some(TimeInForce::Gtc) | None => {}
                tif => {
                    request.param("timeInForceValue", force(tif));
                }
            }
            let side = match (order.side, order.reduce_only) {
                (Side::Buy, false) => "open_long",
                (Side::Sell, false) => "open_short",
                (Side::Buy, true) => "close_short",
                (Side::Sell, true) => "close_long",
            };
            request.param("side", side);
            let margin_coin = market.settle_id.as_deref().or(market.settle.as_deref());
            request.param_opt("marginCoin", margin_coin);
        }
        Ok(request)
    }

    fn order_request(
        &self,
        method: Method,
        id: &str,
        symbol: Option<&str>,
        markets: &MarketTable,
    ) -> Result<HttpRequest> {
        let symbol = require_symbol(ID, method.as_str(), symbol)?;
        let market = markets.market(symbol)?;
        let scope = scope_of(&market);
        let endpoint = require(ID, ENDPOINTS, method, scope)?;
        let mut request = self.request(endpoint);
        request
            .param("symbol", market.id.as_str())
            .param("orderId", id);
        if scope == Scope::Swap && method == Method::CancelOrder {
            let margin_coin = market.settle_id.as_deref().or(market.settle.as_deref());
            request.param_opt("marginCoin", margin_coin);
        }
        Ok(request)
    }

    fn history_request(
        &self,
        method: Method,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<HttpRequest> {
        let code = require_code(ID, method.as_str(), code)?;
        let endpoint = require(ID, ENDPOINTS, method, Scope::Any)?;
        let now = now_ms();
        let mut request = self.request(endpoint);
        request
            .param("coin", code)
            .param("startTime", since.unwrap_or(now - HISTORY_WINDOW_MS))
            .param("endTime", now)
            .param_opt("pageSize", limit);
        Ok(request)
    }

    fn parse_market(&self, raw: &Value) -> Option<Market> {
        let id = fields::string(raw, "symbol")?;
        let base_id = fields::string(raw, "baseCoin")?;
        let quote_id = fields::string(raw, "quoteCoin")?;
        let base = base_id.to_ascii_uppercase();
        let quote = quote_id.to_ascii_uppercase();
        let mut parts = id.split('_');
        let _ = parts.next();
        let type_id = parts.next().unwrap_or_default().to_string();
        let expiry = parts.next();

        let active = fields::string(raw, "status").map(|s| s == "online");
        let min_cost = if quote == "USDT" {
            fields::decimal(raw, "minTradeUSDT")
        } else {
            None
        };
        let limits = Limits {
            amount: MinMax {
                min: MIN_AMOUNT.decimal(raw),
                max: fields::decimal(raw, "maxTradeAmount"),
            },
            price: MinMax::default(),
            cost: MinMax {
                min: min_cost,
                max: None,
            },
        };

        if type_id == "SPBL" {
            let precision = Precision {
                price: fields::string(raw, "priceScale").and_then(|d| parse_precision(&d))?,
                amount: fields::string(raw, "quantityScale").and_then(|d| parse_precision(&d))?,
            };
            return Some(Market {
                symbol: Market::symbol_for(&base, &quote, None),
                id,
                base,
                quote,
                settle: None,
                base_id: Some(base_id),
                quote_id: Some(quote_id),
                settle_id: None,
                market_type: MarketType::Spot,
                active,
                precision,
                limits,
                linear: None,
                inverse: None,
                contract_size: None,
                taker: fields::decimal(raw, "takerFeeRate"),
                maker: fields::decimal(raw, "makerFeeRate"),
                encoding: NumericEncoding::Decimal,
            });
        }

        let settle_id = fields::string(raw, "/supportMarginCoins/0")?;
        let settle = settle_id.to_ascii_uppercase();
        let linear = matches!(type_id.as_str(), "UMCBL" | "CMCBL" | "SUMCBL" | "SCMCBL");
        let (market_type, symbol) = match expiry {
            Some(expiry) => (
                MarketType::Future,
                format!("{}-{expiry}", Market::symbol_for(&base, &quote, Some(&settle))),
            ),
            None => (
                MarketType::Swap,
                Market::symbol_for(&base, &quote, Some(&settle)),
            ),
        };
        let precision = Precision {
            price: widen_step(
                fields::string(raw, "priceEndStep")?.as_str(),
                fields::integer(raw, "pricePlace"),
            )?,
            amount: widen_step(
                fields::string(raw, "minTradeNum")?.as_str(),
                fields::integer(raw, "volumePlace"),
            )?,
        };
        Some(Market {
            id,
            symbol,
            base,
            quote,
            settle: Some(settle),
            base_id: Some(base_id),
            quote_id: Some(quote_id),
            settle_id: Some(settle_id),
            market_type,
            active,
            precision,
            limits,
            linear: Some(linear),
            inverse: Some(!linear),
            contract_size: fields::decimal(raw, "sizeMultiplier"),
            taker: fields::decimal(raw, "takerFeeRate"),
            maker: fields::decimal(raw, "makerFeeRate"),
            encoding: NumericEncoding::Decimal,
        })
    }
}

/// Contract steps are reported as a bare digit run (`priceEndStep = "5"`)
/// whose decimal places come from `pricePlace`; the step's own scale wins
/// when it is larger.
fn widen_step(step: &str, places: Option<i64>) -> Option<Decimal> {
    let mut step = fields::parse_decimal(step)?;
    let places = places.and_then(|p| u32::try_from(p).ok()).unwrap_or(0);
    if places > step.scale() {
        step.set_scale(places).ok()?;
    }
    Some(step.normalize()).filter(|s| *s > Decimal::ZERO)
}

fn force(tif: Option<TimeInForce>) -> &'static str {
    match tif {
        Some(TimeInForce::Po) => "post_only",
        Some(TimeInForce::Ioc) => "ioc",
        Some(TimeInForce::Fok) => "fok",
        Some(TimeInForce::Gtc) | None => "gtc",
    }
}

impl ExchangeAdapter for Bitget {
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

    /// The `_` in ids such as `BTCUSDT_UMCBL` introduces a product suffix.
    fn symbol_delimiters(&self) -> &'static [char] {
        &[]
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest> {
        match call {
            Call::FetchMarkets { scope } => {
                let mut request = self.request(require(ID, ENDPOINTS, call.method(), *scope)?);
                if *scope == Scope::Swap {
                    request.param("productType", PRODUCT_TYPE);
                }
                Ok(request)
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
                let mut request = self.request(require(ID, ENDPOINTS, call.method(), scope)?);
                if scope == Scope::Swap {
                    request.param("productType", PRODUCT_TYPE);
                }
                Ok(request)
            }
            Call::FetchOrderBook { symbol, limit } | Call::FetchTrades { symbol, limit, .. } => {
                let market = markets.market(symbol)?;
                let endpoint = require(ID, ENDPOINTS, call.method(), scope_of(&market))?;
                let mut request = self.request(endpoint);
                request
                    .param("symbol", market.id.as_str())
                    .param_opt("limit", *limit);
                Ok(request)
            }
            Call::FetchBalance => {
                let scope = scope_for(&self.config, None, markets)?;
                let mut request = self.request(require(ID, ENDPOINTS, call.method(), scope)?);
                if scope == Scope::Swap {
                    request.param("productType", PRODUCT_TYPE);
                }
                Ok(request)
            }
            Call::CreateOrder(order) => self.create_order(order, markets),
            Call::CancelOrder { id, symbol } | Call::FetchOrder { id, symbol } => {
                self.order_request(call.method(), id, symbol.as_deref(), markets)
            }
            Call::FetchOpenOrders { symbol, .. } => {
                let symbol = require_symbol(ID, call.method().as_str(), symbol.as_deref())?;
                let market = markets.market(symbol)?;
                let endpoint = require(ID, ENDPOINTS, call.method(), scope_of(&market))?;
                let mut request = self.request(endpoint);
                request.param("symbol", market.id.as_str());
                Ok(request)
            }
            Call::FetchDeposits { code, since, limit }
            | Call::FetchWithdrawals { code, since, limit } => {
                self.history_request(call.method(), code.as_deref(), *since, *limit)
            }
        }
    }

    fn translate_error(&self, _status: u16, body: Option<&Value>, raw: &str) -> Option<Error> {
        let body = body?;
        let message = fields::string(body, "err_msg");
        let code = ERROR_CODE.string(body).filter(|c| c != "00000");
        let feedback = format!("{ID} {raw}");
        if let Some(message) = message.as_deref() {
            if let Some(kind) = ERRORS.exact(message).or_else(|| ERRORS.broad(message)) {
                return Some(kind.with_message(feedback));
            }
        }
        if let Some(kind) = code.as_deref().and_then(|c| ERRORS.exact(c)) {
            return Some(kind.with_message(feedback));
        }
        if code.is_some() || message.is_some() {
            return Some(Error::ExchangeError(feedback));
        }
        None
    }

    fn parse_markets(&self, _scope: Scope, payload: &Value) -> Result<Vec<Market>> {
        let rows = payload.as_array().ok_or_else(|| {
            Error::ExchangeError(format!("{ID} fetchMarkets() returned no market list"))
        })?;
        let mut markets = Vec::with_capacity(rows.len());
        for raw in rows {
            match self.parse_market(raw) {
                Some(market) => markets.push(market),
                None => warn!(exchange = ID, market = %raw, "skipping market without precision"),
            }
        }
        Ok(markets)
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker {
        let market_id = fields::string(raw, "symbol").map(|id| {
            if id.contains('_') {
                id
            } else {
                format!("{id}_SPBL")
            }
        });
        let percentage = fields::decimal(raw, "priceChangePercent")
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
        Ticker {
            symbol: self.safe_symbol(markets, market_id.as_deref()),
            timestamp: TICKER_TIMESTAMP.integer(raw),
            high: fields::decimal(raw, "high24h"),
            low: fields::decimal(raw, "low24h"),
            bid: TICKER_BID.decimal(raw),
            ask: TICKER_ASK.decimal(raw),
            close: TICKER_CLOSE.decimal(raw),
            percentage,
            base_volume: TICKER_BASE_VOLUME.decimal(raw),
            quote_volume: TICKER_QUOTE_VOLUME.decimal(raw),
            ..Ticker::default()
        }
        .derive()
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
            None,
        ))
    }

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade {
        let fee = Fee::from_cost(
            fields::decimal(raw, "fees"),
            fields::string(raw, "feeCcy").map(|c| markets.currency_code(&c)),
        );
        Trade {
            id: TRADE_ID.string(raw),
            order: fields::string(raw, "orderId"),
            symbol: self.safe_symbol(markets, fields::string(raw, "symbol").as_deref()),
            timestamp: TRADE_TIMESTAMP.integer(raw),
            side: fields::string(raw, "side").and_then(|s| Side::parse(&s)),
            order_type: fields::string(raw, "orderType").map(OrderType::from),
            price: TRADE_PRICE.decimal(raw),
            amount: TRADE_AMOUNT.decimal(raw),
            fee,
            ..Trade::default()
        }
        .derive()
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order {
        let side = ORDER_SIDE.string(raw).and_then(|s| match s.as_str() {
            "open_long" | "close_short" => Some(Side::Buy),
            "close_long" | "open_short" => Some(Side::Sell),
            other => Side::parse(other),
        });
        Order {
            id: fields::string(raw, "orderId"),
            client_order_id: ORDER_CLIENT_ID.string(raw),
            timestamp: fields::integer(raw, "cTime"),
            last_trade_timestamp: fields::integer(raw, "uTime"),
            symbol: self.safe_symbol(markets, fields::string(raw, "symbol").as_deref()),
            status: ORDER_STATE.string(raw).map(|s| ORDER_STATUS.classify(&s)),
            side,
            order_type: fields::string(raw, "orderType").map(OrderType::from),
            price: ORDER_PRICE.decimal(raw),
            trigger_price: fields::decimal(raw, "triggerPrice"),
            amount: ORDER_AMOUNT.decimal(raw),
            filled: ORDER_FILLED.decimal(raw),
            average: ORDER_AVERAGE.decimal(raw),
            cost: ORDER_COST.decimal(raw),
            ..Order::default()
        }
        .derive()
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances {
        let mut balances = Balances::default();
        for entry in super::as_list(payload) {
            let Some(code) = BALANCE_CODE.string(entry) else {
                warn!(exchange = ID, entry = %entry, "skipping balance without currency");
                continue;
            };
            let used = sum_present(&[
                fields::decimal(entry, "frozen"),
                BALANCE_LOCKED.decimal(entry),
            ]);
            let free = fields::decimal(entry, "available");
            balances.insert(markets.currency_code(&code), BalanceEntry::new(free, used, None));
        }
        balances
    }

    fn parse_transaction(
        &self,
        raw: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Transaction {
        let kind = kind.or_else(|| match fields::string(raw, "type").as_deref() {
            Some("deposit") => Some(TransactionType::Deposit),
            Some("withdraw") => Some(TransactionType::Withdrawal),
            _ => None,
        });
        Transaction {
            id: fields::string(raw, "id"),
            txid: fields::string(raw, "txId"),
            kind,
            currency: fields::string(raw, "coin").map(|c| markets.currency_code(&c)),
            network: fields::string(raw, "chain"),
            address: fields::string(raw, "toAddress"),
            amount: fields::decimal(raw, "amount"),
            status: fields::string(raw, "status").map(|s| TRANSACTION_STATUS.classify(&s)),
            timestamp: fields::integer(raw, "cTime"),
            updated: fields::integer(raw, "uTime"),
            ..Transaction::default()
        }
    }
}

static ERRORS: ErrorTable = ErrorTable {
    exact: EXACT,
    broad: BROAD,
};

const EXACT: &[(&str, ErrorKind)] = &[
    ("failure to get a peer from the ring-balancer", ErrorKind::ExchangeNotAvailable),
    ("4010", ErrorKind::PermissionDenied),
    ("30001", ErrorKind::AuthenticationError),
    ("30002", ErrorKind::AuthenticationError),
    ("30003", ErrorKind::AuthenticationError),
    ("30004", ErrorKind::AuthenticationError),
    ("30005", ErrorKind::InvalidNonce),
    ("30006", ErrorKind::AuthenticationError),
    ("30007", ErrorKind::BadRequest),
    ("30008", ErrorKind::ExchangeNotAvailable),
    ("30010", ErrorKind::AuthenticationError),
    ("30011", ErrorKind::PermissionDenied),
    ("30012", ErrorKind::AuthenticationError),
    ("30013", ErrorKind::AuthenticationError),
    ("30014", ErrorKind::DDoSProtection),
    ("30015", ErrorKind::AuthenticationError),
    ("30019", ErrorKind::ExchangeNotAvailable),
    ("30020", ErrorKind::BadRequest),
    ("30021", ErrorKind::BadRequest),
    ("30022", ErrorKind::PermissionDenied),
    ("30023", ErrorKind::BadRequest),
    ("30024", ErrorKind::BadRequest),
    ("30025", ErrorKind::BadRequest),
    ("30026", ErrorKind::DDoSProtection),
    ("30027", ErrorKind::AuthenticationError),
    ("30028", ErrorKind::PermissionDenied),
    ("30029", ErrorKind::AccountSuspended),
    ("30031", ErrorKind::BadRequest),
    ("30032", ErrorKind::BadRequest),
    ("30033", ErrorKind::BadRequest),
    ("30037", ErrorKind::ExchangeNotAvailable),
    ("30038", ErrorKind::OnMaintenance),
    ("32001", ErrorKind::AccountSuspended),
    ("32002", ErrorKind::PermissionDenied),
    ("32005", ErrorKind::InvalidOrder),
    ("32006", ErrorKind::InvalidOrder),
    ("32007", ErrorKind::InvalidOrder),
    ("32008", ErrorKind::InvalidOrder),
    ("32009", ErrorKind::InvalidOrder),
    ("32028", ErrorKind::AccountSuspended),
    ("32030", ErrorKind::InvalidOrder),
    ("32031", ErrorKind::ArgumentsRequired),
    ("32038", ErrorKind::AuthenticationError),
    ("32048", ErrorKind::InvalidOrder),
    ("32050", ErrorKind::InvalidOrder),
    ("32051", ErrorKind::InvalidOrder),
    ("32055", ErrorKind::InvalidOrder),
    ("32059", ErrorKind::InvalidOrder),
    ("32060", ErrorKind::InvalidOrder),
    ("32061", ErrorKind::InvalidOrder),
    ("32062", ErrorKind::InvalidOrder),
    ("32063", ErrorKind::InvalidOrder),
    ("33001", ErrorKind::PermissionDenied),
    ("33002", ErrorKind::AccountSuspended),
    ("33003", ErrorKind::InsufficientFunds),
    ("33008", ErrorKind::InsufficientFunds),
    ("33013", ErrorKind::InvalidOrder),
    ("33014", ErrorKind::OrderNotFound),
    ("33015", ErrorKind::InvalidOrder),
    ("33017", ErrorKind::InsufficientFunds),
    ("33021", ErrorKind::BadRequest),
    ("33022", ErrorKind::InvalidOrder),
    ("33024", ErrorKind::InvalidOrder),
    ("33025", ErrorKind::InvalidOrder),
    ("33027", ErrorKind::InvalidOrder),
    ("33028", ErrorKind::InvalidOrder),
    ("33029", ErrorKind::InvalidOrder),
    ("33059", ErrorKind::BadRequest),
    ("33060", ErrorKind::BadRequest),
    ("34001", ErrorKind::PermissionDenied),
    ("34002", ErrorKind::BadRequest),
    ("34008", ErrorKind::InsufficientFunds),
    ("34016", ErrorKind::PermissionDenied),
    ("34017", ErrorKind::AccountSuspended),
    ("34018", ErrorKind::AuthenticationError),
    ("34019", ErrorKind::PermissionDenied),
    ("34020", ErrorKind::PermissionDenied),
    ("34021", ErrorKind::BadRequest),
    ("34023", ErrorKind::PermissionDenied),
    ("35005", ErrorKind::AuthenticationError),
    ("35008", ErrorKind::InvalidOrder),
    ("35010", ErrorKind::InvalidOrder),
    ("35012", ErrorKind::InvalidOrder),
    ("35014", ErrorKind::InvalidOrder),
    ("35015", ErrorKind::InvalidOrder),
    ("35019", ErrorKind::InvalidOrder),
    ("35020", ErrorKind::InvalidOrder),
    ("35021", ErrorKind::InvalidOrder),
    ("35025", ErrorKind::InsufficientFunds),
    ("35029", ErrorKind::OrderNotFound),
    ("35030", ErrorKind::InvalidOrder),
    ("35031", ErrorKind::InvalidOrder),
    ("35040", ErrorKind::InvalidOrder),
    ("35046", ErrorKind::InsufficientFunds),
    ("35047", ErrorKind::InsufficientFunds),
    ("35049", ErrorKind::InvalidOrder),
    ("35050", ErrorKind::InvalidOrder),
    ("35052", ErrorKind::InsufficientFunds),
    ("35055", ErrorKind::InsufficientFunds),
    ("35059", ErrorKind::BadRequest),
    ("35060", ErrorKind::BadRequest),
    ("35061", ErrorKind::BadRequest),
    ("35062", ErrorKind::InvalidOrder),
    ("35063", ErrorKind::InvalidOrder),
    ("35064", ErrorKind::InvalidOrder),
    ("35066", ErrorKind::InvalidOrder),
    ("35067", ErrorKind::InvalidOrder),
    ("35068", ErrorKind::InvalidOrder),
    ("35069", ErrorKind::InvalidOrder),
    ("35070", ErrorKind::InvalidOrder),
    ("35071", ErrorKind::InvalidOrder),
    ("35072", ErrorKind::InvalidOrder),
    ("35073", ErrorKind::InvalidOrder),
    ("35074", ErrorKind::InvalidOrder),
    ("35075", ErrorKind::InvalidOrder),
    ("35076", ErrorKind::InvalidOrder),
    ("35077", ErrorKind::InvalidOrder),
    ("35078", ErrorKind::InvalidOrder),
    ("35079", ErrorKind::InvalidOrder),
    ("35080", ErrorKind::InvalidOrder),
    ("35081", ErrorKind::InvalidOrder),
    ("35082", ErrorKind::InvalidOrder),
    ("35083", ErrorKind::InvalidOrder),
    ("35084", ErrorKind::InvalidOrder),
    ("35085", ErrorKind::InvalidOrder),
    ("35086", ErrorKind::InvalidOrder),
    ("35087", ErrorKind::InvalidOrder),
    ("35088", ErrorKind::InvalidOrder),
    ("35089", ErrorKind::InvalidOrder),
    ("35095", ErrorKind::BadRequest),
    ("36001", ErrorKind::BadRequest),
    ("36002", ErrorKind::BadRequest),
    ("36101", ErrorKind::AuthenticationError),
    ("36102", ErrorKind::PermissionDenied),
    ("36103", ErrorKind::AccountSuspended),
    ("36104", ErrorKind::PermissionDenied),
    ("36105", ErrorKind::PermissionDenied),
    ("36106", ErrorKind::AccountSuspended),
    ("36107", ErrorKind::PermissionDenied),
    ("36108", ErrorKind::InsufficientFunds),
    ("36109", ErrorKind::PermissionDenied),
    ("36201", ErrorKind::PermissionDenied),
    ("36202", ErrorKind::PermissionDenied),
    ("36203", ErrorKind::InvalidOrder),
    ("36205", ErrorKind::BadRequest),
    ("36206", ErrorKind::BadRequest),
    ("36207", ErrorKind::InvalidOrder),
    ("36208", ErrorKind::InvalidOrder),
    ("36209", ErrorKind::InvalidOrder),
    ("36210", ErrorKind::InvalidOrder),
    ("36211", ErrorKind::InvalidOrder),
    ("36212", ErrorKind::InvalidOrder),
    ("36213", ErrorKind::InvalidOrder),
    ("36216", ErrorKind::OrderNotFound),
    ("36217", ErrorKind::InvalidOrder),
    ("36218", ErrorKind::InvalidOrder),
    ("36219", ErrorKind::InvalidOrder),
    ("36220", ErrorKind::InvalidOrder),
    ("36221", ErrorKind::InvalidOrder),
    ("36222", ErrorKind::InvalidOrder),
    ("36223", ErrorKind::InvalidOrder),
    ("36224", ErrorKind::InvalidOrder),
    ("36225", ErrorKind::InvalidOrder),
    ("36226", ErrorKind::InvalidOrder),
    ("36227", ErrorKind::InvalidOrder),
    ("36228", ErrorKind::InvalidOrder),
    ("36229", ErrorKind::InvalidOrder),
    ("36230", ErrorKind::InvalidOrder),
    ("400", ErrorKind::BadRequest),
    ("401", ErrorKind::AuthenticationError),
    ("403", ErrorKind::PermissionDenied),
    ("404", ErrorKind::BadRequest),
    ("405", ErrorKind::BadRequest),
    ("415", ErrorKind::BadRequest),
    ("429", ErrorKind::DDoSProtection),
    ("500", ErrorKind::ExchangeNotAvailable),
    ("1001", ErrorKind::RateLimitExceeded),
    ("40001", ErrorKind::AuthenticationError),
    ("40002", ErrorKind::AuthenticationError),
    ("40003", ErrorKind::AuthenticationError),
    ("40004", ErrorKind::InvalidNonce),
    ("40005", ErrorKind::InvalidNonce),
    ("40006", ErrorKind::AuthenticationError),
    ("40007", ErrorKind::BadRequest),
    ("40008", ErrorKind::InvalidNonce),
    ("40009", ErrorKind::AuthenticationError),
    ("40010", ErrorKind::AuthenticationError),
    ("40011", ErrorKind::AuthenticationError),
    ("40012", ErrorKind::AuthenticationError),
    ("40014", ErrorKind::PermissionDenied),
    ("40016", ErrorKind::PermissionDenied),
    ("40018", ErrorKind::PermissionDenied),
    ("40102", ErrorKind::BadRequest),
    ("40103", ErrorKind::BadRequest),
    ("40108", ErrorKind::InvalidOrder),
    ("40109", ErrorKind::OrderNotFound),
    ("40200", ErrorKind::OnMaintenance),
    ("40201", ErrorKind::InvalidOrder),
    ("40203", ErrorKind::BadRequest),
    ("40204", ErrorKind::BadRequest),
    ("40205", ErrorKind::BadRequest),
    ("40206", ErrorKind::BadRequest),
    ("40207", ErrorKind::BadRequest),
    ("40208", ErrorKind::BadRequest),
    ("40209", ErrorKind::BadRequest),
    ("40301", ErrorKind::PermissionDenied),
    ("40302", ErrorKind::BadRequest),
    ("40303", ErrorKind::BadRequest),
    ("40304", ErrorKind::BadRequest),
    ("40305", ErrorKind::BadRequest),
    ("40308", ErrorKind::OnMaintenance),
    ("40309", ErrorKind::BadRequest),
    ("40402", ErrorKind::BadRequest),
    ("40403", ErrorKind::BadRequest),
    ("40404", ErrorKind::BadRequest),
    ("40405", ErrorKind::BadRequest),
    ("40406", ErrorKind::BadRequest),
    ("40500", ErrorKind::InvalidOrder),
    ("40506", ErrorKind::AuthenticationError),
    ("40507", ErrorKind::AuthenticationError),
    ("40604", ErrorKind::ExchangeNotAvailable),
    ("40700", ErrorKind::BadRequest),
    ("40705", ErrorKind::BadRequest),
    ("40706", ErrorKind::InvalidOrder),
    ("40707", ErrorKind::BadRequest),
    ("40708", ErrorKind::BadRequest),
    ("40711", ErrorKind::InsufficientFunds),
    ("40712", ErrorKind::InsufficientFunds),
    ("45110", ErrorKind::InvalidOrder),
    ("invalid sign", ErrorKind::AuthenticationError),
    ("invalid currency", ErrorKind::BadRequest),
    ("invalid symbol", ErrorKind::BadRequest),
    ("invalid period", ErrorKind::BadRequest),
    ("invalid amount", ErrorKind::InvalidOrder),
    ("invalid type", ErrorKind::InvalidOrder),
    ("invalid orderId", ErrorKind::InvalidOrder),
    ("invalid accountId", ErrorKind::BadRequest),
    ("invalid address", ErrorKind::BadRequest),
    ("accesskey not null", ErrorKind::AuthenticationError),
    ("illegal accesskey", ErrorKind::AuthenticationError),
    ("sign not null", ErrorKind::AuthenticationError),
    ("req_time is too much difference from server time", ErrorKind::InvalidNonce),
    ("permissions not right", ErrorKind::PermissionDenied),
    ("illegal sign invalid", ErrorKind::AuthenticationError),
    ("user locked", ErrorKind::AccountSuspended),
    ("Request Frequency Is Too High", ErrorKind::RateLimitExceeded),
    ("more than a daily rate of cash", ErrorKind::BadRequest),
    ("more than the maximum daily withdrawal amount", ErrorKind::BadRequest),
    ("user forbid", ErrorKind::PermissionDenied),
    ("User Prohibited Cash Withdrawal", ErrorKind::PermissionDenied),
    ("Cash Withdrawal Is Less Than The Minimum Value", ErrorKind::BadRequest),
    ("Cash Withdrawal Is More Than The Maximum Value", ErrorKind::BadRequest),
    ("the account with in 24 hours ban coin", ErrorKind::PermissionDenied),
    ("order cancel fail", ErrorKind::BadRequest),
    ("base symbol error", ErrorKind::BadRequest),
    ("api signature not valid", ErrorKind::AuthenticationError),
    ("order queryorder invalid", ErrorKind::BadRequest),
    ("market no need price", ErrorKind::InvalidOrder),
    ("limit need price", ErrorKind::InvalidOrder),
    ("your balance is low", ErrorKind::InsufficientFunds),
    ("50004", ErrorKind::BadRequest),
    ("50006", ErrorKind::PermissionDenied),
    ("50007", ErrorKind::PermissionDenied),
    ("50008", ErrorKind::ExchangeNotAvailable),
    ("50009", ErrorKind::RateLimitExceeded),
    ("50014", ErrorKind::InvalidOrder),
    ("50015", ErrorKind::InvalidOrder),
    ("50016", ErrorKind::InvalidOrder),
    ("50017", ErrorKind::InvalidOrder),
    ("50018", ErrorKind::InvalidOrder),
    ("50019", ErrorKind::InvalidOrder),
    ("50020", ErrorKind::InsufficientFunds),
    ("50021", ErrorKind::InvalidOrder),
    ("50026", ErrorKind::InvalidOrder),
    ("invalid start time", ErrorKind::BadRequest),
    ("invalid end time", ErrorKind::BadRequest),
    ("43111", ErrorKind::PermissionDenied),
];

const BROAD: &[(&str, ErrorKind)] = &[
    ("invalid size, valid range", ErrorKind::ExchangeError),
];
