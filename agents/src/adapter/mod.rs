use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use canonical::market::SYMBOL_DELIMITERS;
use canonical::{
    Balances, Currency, Market, MarketTable, Order, OrderBook, PriceLevel, Ticker, Trade,
    Transaction, TransactionType,
};
use unify_core::config::{DefaultType, ExchangeConfig};
use unify_core::fields;
use unify_core::precision::{self, Rounding};
use unify_core::{Error, Result};

use crate::endpoint::{Endpoint, Scope};
use crate::request::{Call, HttpRequest, OrderRequest};

pub mod bitget;
pub mod lbank;
pub mod mexc;
pub mod ndax;
pub mod phemex;

/// A response converted into unified entities, shaped after the call that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Markets {
        markets: Vec<Market>,
        currencies: Vec<Currency>,
    },
    Ticker(Ticker),
    Tickers(Vec<Ticker>),
    OrderBook(OrderBook),
    Trades(Vec<Trade>),
    Balance(Balances),
    Order(Order),
    Orders(Vec<Order>),
    Transactions(Vec<Transaction>),
}

/// Capability interface shared by every exchange adapter.
///
/// Adapters are pure: they build requests and interpret bodies, but never
/// perform I/O. Parsers are best-effort and degrade by leaving fields unset.
pub trait ExchangeAdapter: Send + Sync {
    fn id(&self) -> &'static str;

    fn config(&self) -> &ExchangeConfig;

    fn endpoints(&self) -> &'static [Endpoint];

    /// Market families fetched by `load_markets`, one request each.
    fn market_scopes(&self) -> &'static [Scope] {
        &[Scope::Any]
    }

    /// Separators between base and quote in this exchange's market ids.
    /// Ids that are not in the table are split on these to form a symbol.
    fn symbol_delimiters(&self) -> &'static [char] {
        SYMBOL_DELIMITERS
    }

    /// Symbol for a raw market id, split with this exchange's delimiters
    /// when the id is not in `markets`.
    fn safe_symbol(&self, markets: &MarketTable, id: Option<&str>) -> Option<String> {
        markets.safe_symbol_with(id, self.symbol_delimiters())
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest>;

    /// Classify a business error carried in the body. Returning `None`
    /// hands the response to the HTTP status fallback.
    fn translate_error(&self, status: u16, body: Option<&Value>, raw: &str) -> Option<Error>;

    /// The part of a successful body holding the entity.
    fn payload<'a>(&self, body: &'a Value) -> &'a Value {
        match body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => body,
        }
    }

    fn parse_markets(&self, scope: Scope, payload: &Value) -> Result<Vec<Market>>;

    fn parse_currencies(&self, _payload: &Value) -> Vec<Currency> {
        Vec::new()
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker;

    fn parse_tickers(&self, payload: &Value, markets: &MarketTable) -> Vec<Ticker> {
        as_list(payload)
            .iter()
            .map(|raw| self.parse_ticker(raw, markets))
            .collect()
    }

    fn parse_order_book(
        &self,
        payload: &Value,
        symbol: &str,
        markets: &MarketTable,
    ) -> Result<OrderBook>;

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade;

    fn parse_trades(&self, payload: &Value, markets: &MarketTable) -> Vec<Trade> {
        as_list(payload)
            .iter()
            .map(|raw| self.parse_trade(raw, markets))
            .collect()
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order;

    fn parse_orders(&self, payload: &Value, markets: &MarketTable) -> Vec<Order> {
        as_list(payload)
            .iter()
            .map(|raw| self.parse_order(raw, markets))
            .collect()
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances;

    fn parse_transaction(
        &self,
        raw: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Transaction;

    fn parse_transactions(
        &self,
        payload: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Vec<Transaction> {
        as_list(payload)
            .iter()
            .map(|raw| self.parse_transaction(raw, kind, markets))
            .collect()
    }

    /// Dispatch a successful body to the parser matching `call`.
    fn normalize_response(
        &self,
        call: &Call,
        body: &Value,
        markets: &MarketTable,
    ) -> Result<Normalized> {
        normalize(self, call, body, markets)
    }
}

static NULL: Value = Value::Null;

/// Array payloads as a slice; anything else is an empty list.
pub fn as_list(payload: &Value) -> &[Value] {
    payload.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Single-entity endpoints sometimes wrap the entity in a one-element array.
pub fn first_object(payload: &Value) -> &Value {
    match payload {
        Value::Array(items) => items.first().unwrap_or(&NULL),
        other => other,
    }
}

pub fn scope_of(market: &Market) -> Scope {
    if market.is_spot() {
        Scope::Spot
    } else {
        Scope::Swap
    }
}

/// Scope for calls that carry no symbol.
pub fn default_scope(config: &ExchangeConfig) -> Scope {
    match config.default_type {
        DefaultType::Spot => Scope::Spot,
        DefaultType::Swap => Scope::Swap,
    }
}

/// Scope of an optional symbol, falling back to the configured default.
pub fn scope_for(
    config: &ExchangeConfig,
    symbol: Option<&str>,
    markets: &MarketTable,
) -> Result<Scope> {
    match symbol {
        Some(symbol) => Ok(scope_of(markets.market(symbol)?.as_ref())),
        None => Ok(default_scope(config)),
    }
}

pub fn require_symbol<'a>(exchange: &str, method: &str, symbol: Option<&'a str>) -> Result<&'a str> {
    symbol.ok_or_else(|| {
        Error::ArgumentsRequired(format!("{exchange} {method}() requires a symbol argument"))
    })
}

pub fn require_code<'a>(exchange: &str, method: &str, code: Option<&'a str>) -> Result<&'a str> {
    code.ok_or_else(|| {
        Error::ArgumentsRequired(format!("{exchange} {method}() requires a code argument"))
    })
}

/// Quote notional for a market buy on exchanges that size such orders in
/// quote currency. With a `rounding` mode the notional is brought onto the
/// market's price grid; `None` sends it as computed.
pub fn market_buy_cost(
    exchange: &str,
    config: &ExchangeConfig,
    order: &OrderRequest,
    market: &Market,
    rounding: Option<Rounding>,
) -> Result<Decimal> {
    let cost = match (order.cost, order.price) {
        (Some(cost), _) => cost,
        (None, Some(price)) => order.amount.checked_mul(price).ok_or_else(|| {
            Error::InvalidOrder(format!("{exchange} createOrder() cost overflows"))
        })?,
        (None, None) if config.create_market_buy_order_requires_price => {
            return Err(Error::InvalidOrder(format!(
                "{exchange} createOrder() requires a price argument for market buy orders to \
                 calculate the total cost to spend (amount * price); alternatively pass the cost \
                 explicitly or disable create_market_buy_order_requires_price and pass the cost \
                 in the amount argument"
            )))
        }
        (None, None) => order.amount,
    };
    match rounding {
        Some(mode) => precision::round_to_step(cost, market.precision.price, mode),
        None => Ok(cost),
    }
}

/// Client order id to send: the caller's, else a broker-prefixed one when a
/// broker id is configured.
pub fn client_order_id(config: &ExchangeConfig, requested: Option<&str>) -> Option<String> {
    match (requested, config.broker_id.as_deref()) {
        (Some(id), _) => Some(id.to_string()),
        (None, Some(broker)) => {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            Some(format!("{broker}{}", &suffix[..16]))
        }
        (None, None) => None,
    }
}

/// Parse order book rows with `level`, skipping rows it cannot read.
pub fn price_levels<F>(rows: Option<&Value>, level: F) -> Vec<PriceLevel>
where
    F: Fn(&Value) -> Option<PriceLevel>,
{
    let rows = rows.map(as_list).unwrap_or(&[]);
    let mut levels = Vec::with_capacity(rows.len());
    for row in rows {
        match level(row) {
            Some(l) => levels.push(l),
            None => warn!(row = %row, "skipping unreadable order book row"),
        }
    }
    levels
}

/// `[price, amount, ...]` rows.
pub fn pair_level(row: &Value) -> Option<PriceLevel> {
    let price = row.get(0).and_then(fields::as_decimal)?;
    let amount = row.get(1).and_then(fields::as_decimal)?;
    Some(PriceLevel { price, amount })
}

pub fn ns_to_ms(ns: i64) -> i64 {
    ns / 1_000_000
}

/// For fields where the exchange documents zero as "not applicable".
pub fn nonzero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// The shared dispatch behind [`ExchangeAdapter::normalize_response`], for
/// adapters that intercept a few calls and hand the rest back.
pub fn normalize<A: ExchangeAdapter + ?Sized>(
    adapter: &A,
    call: &Call,
    body: &Value,
    markets: &MarketTable,
) -> Result<Normalized> {
    let payload = adapter.payload(body);
    let normalized = match call {
        Call::FetchMarkets { scope } => Normalized::Markets {
            markets: adapter.parse_markets(*scope, payload)?,
            currencies: adapter.parse_currencies(payload),
        },
        Call::FetchTicker { symbol } => {
            let mut ticker = adapter.parse_ticker(first_object(payload), markets);
            ticker.symbol.get_or_insert_with(|| symbol.clone());
            Normalized::Ticker(ticker)
        }
        Call::FetchTickers { symbols } => {
            let mut tickers = adapter.parse_tickers(payload, markets);
            if let Some(wanted) = symbols {
                tickers.retain(|t| {
                    t.symbol
                        .as_ref()
                        .map_or(false, |s| wanted.iter().any(|w| w == s))
                });
            }
            Normalized::Tickers(tickers)
        }
        Call::FetchOrderBook { symbol, .. } => {
            Normalized::OrderBook(adapter.parse_order_book(payload, symbol, markets)?)
        }
        Call::FetchTrades { symbol, .. } => {
            let mut trades = adapter.parse_trades(payload, markets);
            for trade in &mut trades {
                trade.symbol.get_or_insert_with(|| symbol.clone());
            }
            Normalized::Trades(trades)
        }
        Call::FetchBalance => Normalized::Balance(adapter.parse_balance(payload, markets)),
        Call::CreateOrder(request) => {
            let order = adapter.parse_order(first_object(payload), markets);
            Normalized::Order(fill_from_request(order, request))
        }
        Call::CancelOrder { id, symbol } | Call::FetchOrder { id, symbol } => {
            let mut order = adapter.parse_order(first_object(payload), markets);
            order.id.get_or_insert_with(|| id.clone());
            if let Some(symbol) = symbol {
                order.symbol.get_or_insert_with(|| symbol.clone());
            }
            Normalized::Order(order)
        }
        Call::FetchOpenOrders { .. } => Normalized::Orders(adapter.parse_orders(payload, markets)),
        Call::FetchDeposits { .. } => Normalized::Transactions(adapter.parse_transactions(
            payload,
            Some(TransactionType::Deposit),
            markets,
        )),
        Call::FetchWithdrawals { .. } => Normalized::Transactions(adapter.parse_transactions(
            payload,
            Some(TransactionType::Withdrawal),
            markets,
        )),
    };
    Ok(normalized)
}

/// Echo the request's known terms into an order the exchange only
/// acknowledged by id.
fn fill_from_request(mut order: Order, request: &OrderRequest) -> Order {
    order
        .symbol
        .get_or_insert_with(|| request.symbol.clone());
    order.side.get_or_insert(request.side);
    order
        .order_type
        .get_or_insert_with(|| request.order_type.clone());
    if order.amount.is_none() {
        order.amount = Some(request.amount);
    }
    if order.price.is_none() {
        order.price = request.price;
    }
    if order.client_order_id.is_none() {
        order.client_order_id = request.client_order_id.clone();
    }
    if order.time_in_force.is_none() {
        order.time_in_force = request.time_in_force;
    }
    if order.reduce_only.is_none() && request.reduce_only {
        order.reduce_only = Some(true);
    }
    order.derive()
}
