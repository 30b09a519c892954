//! NDAX (AlphaPoint) spot REST.
//!
//! Every call carries the OMS id; private calls also need the trading
//! account id from the exchange configuration. Instruments and products are
//! identified by integers.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use canonical::{
    BalanceEntry, Balances, Currency, Fee, Limits, Market, MarketTable, MarketType, MinMax,
    NumericEncoding, Order, OrderBook, OrderState, OrderType, Precision, PriceLevel, Side,
    StatusMap, TakerOrMaker, Ticker, TimeInForce, Trade, Transaction, TransactionState,
    TransactionType,
};
use unify_core::config::ExchangeConfig;
use unify_core::fields::{self, FieldChain};
use unify_core::json::parse_body;
use unify_core::{Error, ErrorKind, Result};

use super::{as_list, nonzero, ExchangeAdapter};
use crate::endpoint::{require, Access, Endpoint, HttpMethod, Method, Scope};
use crate::request::{Call, HttpRequest, OrderRequest, Placement};
use crate::translate::ErrorTable;

pub const ID: &str = "ndax";

const REST: &str = "https://api.ndax.io:8443/AP";

const DEFAULT_DEPTH: u32 = 100;

/// Flat schedule; the API does not publish per-instrument fees.
const MAKER_FEE: Decimal = Decimal::from_parts(2, 0, 0, false, 3);
const TAKER_FEE: Decimal = Decimal::from_parts(25, 0, 0, false, 4);

macro_rules! endpoint {
    ($method:ident, $verb:ident, $path:expr, $access:ident) => {
        Endpoint {
            method: Method::$method,
            scope: Scope::Spot,
            verb: HttpMethod::$verb,
            base: REST,
            path: $path,
            access: Access::$access,
            weight: 1.0,
        }
    };
}

/// No batch ticker endpoint; tickers for several symbols are fetched one
/// by one.
pub static ENDPOINTS: &[Endpoint] = &[
    endpoint!(FetchMarkets, Get, "/GetInstruments", Public),
    endpoint!(FetchTicker, Get, "/GetLevel1", Public),
    endpoint!(FetchOrderBook, Get, "/GetL2Snapshot", Public),
    endpoint!(FetchTrades, Get, "/GetLastTrades", Public),
    endpoint!(FetchBalance, Get, "/GetAccountPositions", Private),
    endpoint!(CreateOrder, Post, "/SendOrder", Private),
    endpoint!(CancelOrder, Post, "/CancelOrder", Private),
    endpoint!(FetchOrder, Get, "/GetOrderStatus", Private),
    endpoint!(FetchOpenOrders, Get, "/GetOpenOrders", Private),
    endpoint!(FetchDeposits, Get, "/GetDeposits", Private),
    endpoint!(FetchWithdrawals, Get, "/GetWithdraws", Private),
];

const ORDER_STATUS: StatusMap<OrderState> = StatusMap::new(&[
    ("Accepted", OrderState::Open),
    ("Rejected", OrderState::Rejected),
    ("Working", OrderState::Open),
    ("Canceled", OrderState::Canceled),
    ("Expired", OrderState::Expired),
    ("FullyExecuted", OrderState::Closed),
]);

const DEPOSIT_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("New", TransactionState::Pending),
    ("AdminProcessing", TransactionState::Pending),
    ("Accepted", TransactionState::Pending),
    ("Rejected", TransactionState::Failed),
    ("SystemProcessing", TransactionState::Pending),
    ("FullyProcessed", TransactionState::Ok),
    ("Failed", TransactionState::Failed),
    ("Pending", TransactionState::Pending),
    ("Confirmed", TransactionState::Pending),
    ("AmlProcessing", TransactionState::Pending),
    ("AmlAccepted", TransactionState::Pending),
    ("AmlRejected", TransactionState::Failed),
    ("AmlFailed", TransactionState::Failed),
    ("LimitsAccepted", TransactionState::Pending),
    ("LimitsRejected", TransactionState::Failed),
]);

const WITHDRAWAL_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("New", TransactionState::Pending),
    ("AdminProcessing", TransactionState::Pending),
    ("Accepted", TransactionState::Pending),
    ("Rejected", TransactionState::Failed),
    ("SystemProcessing", TransactionState::Pending),
    ("FullyProcessed", TransactionState::Ok),
    ("Failed", TransactionState::Failed),
    ("Pending", TransactionState::Pending),
    ("Pending2Fa", TransactionState::Pending),
    ("AutoAccepted", TransactionState::Pending),
    ("Delayed", TransactionState::Pending),
    ("UserCanceled", TransactionState::Canceled),
    ("AdminCanceled", TransactionState::Canceled),
    ("AmlProcessing", TransactionState::Pending),
    ("AmlAccepted", TransactionState::Pending),
    ("AmlRejected", TransactionState::Failed),
    ("AmlFailed", TransactionState::Failed),
    ("LimitsAccepted", TransactionState::Pending),
    ("LimitsRejected", TransactionState::Failed),
    ("Submitted", TransactionState::Pending),
    ("Confirmed", TransactionState::Pending),
    ("ManuallyConfirmed", TransactionState::Pending),
    ("Confirmed2Fa", TransactionState::Pending),
]);

// L2 snapshot row layout.
const L2_UPDATE_ID: usize = 0;
const L2_TIME: usize = 2;
const L2_PRICE: usize = 6;
const L2_QUANTITY: usize = 8;
const L2_SIDE: usize = 9;

// Public trade row layout.
const TRADE_ID: usize = 0;
const TRADE_INSTRUMENT: usize = 1;
const TRADE_QUANTITY: usize = 2;
const TRADE_PRICE: usize = 3;
const TRADE_ORDER: usize = 4;
const TRADE_TIME: usize = 6;
const TRADE_TAKER_SIDE: usize = 8;

const TRADE_TIMESTAMP: FieldChain = FieldChain::new(&["TradeTimeMS", "ReceiveTime"]);
const TRADE_ORDER_ID: FieldChain = FieldChain::new(&["OrderId", "OrigOrderId"]);
const TRADE_MARKET: FieldChain = FieldChain::new(&["InstrumentId", "Instrument"]);
const TRADE_COST: FieldChain = FieldChain::new(&["Value", "GrossValueExecuted"]);
const ORDER_ID: FieldChain = FieldChain::new(&["ReplacementOrderId", "OrderId"]);
const ORDER_CLIENT_ID: FieldChain = FieldChain::new(&["ReplacementClOrdId", "ClientOrderId"]);
const ORDER_STATE: FieldChain = FieldChain::new(&["OrderState", "status"]);
const ORDER_MARKET: FieldChain = FieldChain::new(&["Instrument", "InstrumentId"]);

pub struct Ndax {
    config: ExchangeConfig,
}

impl Ndax {
    pub fn new(config: ExchangeConfig) -> Self {
        Ndax { config }
    }

    fn request(&self, endpoint: &Endpoint) -> HttpRequest {
        let mut request = HttpRequest::new(ID, endpoint, Placement::Json);
        request.param("omsId", self.config.oms_id);
        request
    }

    /// A private request with the configured trading account attached.
    fn account_request(&self, method: Method) -> Result<HttpRequest> {
        let account = self.config.account_id.as_deref().ok_or_else(|| {
            Error::ArgumentsRequired(format!(
                "{ID} {method}() requires account_id in the exchange configuration"
            ))
        })?;
        let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Spot)?);
        request.param("AccountId", numeric(account));
        Ok(request)
    }

    fn create_order(&self, order: &OrderRequest, markets: &MarketTable) -> Result<HttpRequest> {
        order.validate(ID)?;
        let time_in_force = match order.time_in_force {
            None | Some(TimeInForce::Gtc) => 1,
            Some(TimeInForce::Ioc) => 3,
            Some(TimeInForce::Fok) => 4,
            Some(TimeInForce::Po) => {
                return Err(Error::InvalidOrder(format!(
                    "{ID} createOrder() does not support post-only orders"
                )))
            }
        };
        let market = markets.market(&order.symbol)?;
        let mut request = self.account_request(Method::CreateOrder)?;
        request
            .param("InstrumentId", numeric(&market.id))
            .param("TimeInForce", time_in_force)
            .param(
                "Side",
                match order.side {
                    Side::Buy => 0,
                    Side::Sell => 1,
                },
            )
            .decimal("Quantity", market.amount_to_precision(order.amount)?)
            .param(
                "OrderType",
                match order.order_type {
                    OrderType::Market => 1,
                    _ => 2,
                },
            );
        if order.order_type == OrderType::Limit {
            if let Some(price) = order.price {
                request.decimal("LimitPrice", market.price_to_precision(price)?);
            }
        }
        if let Some(id) = order.client_order_id.as_deref() {
            let id = id.parse::<i64>().map_err(|_| {
                Error::InvalidOrder(format!(
                    "{ID} createOrder() client order ids must be integers, got {id}"
                ))
            })?;
            request.param("ClientOrderId", id);
        }
        Ok(request)
    }

    fn parse_market(&self, raw: &Value) -> Option<Market> {
        let id = fields::string(raw, "InstrumentId")?;
        let base = fields::string(raw, "Product1Symbol")?.to_ascii_uppercase();
        let quote = fields::string(raw, "Product2Symbol")?.to_ascii_uppercase();
        let running = fields::string(raw, "SessionStatus").map(|s| s == "Running");
        let disabled = raw.get("IsDisable").and_then(Value::as_bool).unwrap_or(false);
        Some(Market {
            symbol: Market::symbol_for(&base, &quote, None),
            id,
            base,
            quote,
            settle: None,
            base_id: fields::string(raw, "Product1"),
            quote_id: fields::string(raw, "Product2"),
            settle_id: None,
            market_type: MarketType::Spot,
            active: running.map(|r| r && !disabled),
            precision: Precision {
                amount: fields::decimal(raw, "QuantityIncrement")?,
                price: fields::decimal(raw, "PriceIncrement")?,
            },
            limits: Limits {
                amount: MinMax {
                    min: fields::decimal(raw, "MinimumQuantity"),
                    max: None,
                },
                price: MinMax {
                    min: fields::decimal(raw, "MinimumPrice"),
                    max: None,
                },
                cost: MinMax::default(),
            },
            linear: None,
            inverse: None,
            contract_size: None,
            taker: Some(TAKER_FEE),
            maker: Some(MAKER_FEE),
            encoding: NumericEncoding::Decimal,
        })
    }

    fn array_trade(&self, row: &[Value], markets: &MarketTable) -> Trade {
        let at = |i: usize| row.get(i);
        let symbol = self.safe_symbol(markets, at(TRADE_INSTRUMENT).and_then(fields::as_string).as_deref());
        let taker_sell = at(TRADE_TAKER_SIDE)
            .and_then(fields::as_integer)
            .map(|side| side != 0);
        Trade {
            id: at(TRADE_ID).and_then(fields::as_string),
            order: at(TRADE_ORDER).and_then(fields::as_string),
            symbol,
            timestamp: at(TRADE_TIME).and_then(fields::as_integer),
            side: taker_sell.map(|sell| if sell { Side::Sell } else { Side::Buy }),
            price: at(TRADE_PRICE).and_then(fields::as_decimal),
            amount: at(TRADE_QUANTITY).and_then(fields::as_decimal),
            ..Trade::default()
        }
        .derive()
    }
}

/// Ids are integers on the wire; anything else is sent as given.
fn numeric(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

fn lower(raw: &Value, key: &str) -> Option<String> {
    fields::string(raw, key).map(|s| s.to_ascii_lowercase())
}

/// The `TemplateForm` of a ticket is itself a JSON document.
fn template_form(raw: &Value) -> Option<Value> {
    let text = fields::string(raw, "TemplateForm")?;
    let form = parse_body(text.as_bytes());
    if form.is_none() {
        warn!(exchange = ID, template = %text, "unreadable ticket template form");
    }
    form
}

impl ExchangeAdapter for Ndax {
    fn id(&self) -> &'static str {
        ID
    }

    fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn endpoints(&self) -> &'static [Endpoint] {
        ENDPOINTS
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest> {
        let method = call.method();
        match call {
            Call::FetchMarkets { .. } | Call::FetchTickers { .. } => {
                Ok(self.request(require(ID, ENDPOINTS, method, Scope::Spot)?))
            }
            Call::FetchTicker { symbol } => {
                let market = markets.market(symbol)?;
                let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Spot)?);
                request.param("InstrumentId", numeric(&market.id));
                Ok(request)
            }
            Call::FetchOrderBook { symbol, limit } => {
                let market = markets.market(symbol)?;
                let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Spot)?);
                request
                    .param("InstrumentId", numeric(&market.id))
                    .param("Depth", limit.unwrap_or(DEFAULT_DEPTH));
                Ok(request)
            }
            Call::FetchTrades { symbol, limit, .. } => {
                let market = markets.market(symbol)?;
                let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Spot)?);
                request
                    .param("InstrumentId", numeric(&market.id))
                    .param_opt("Count", *limit);
                Ok(request)
            }
            Call::FetchBalance
            | Call::FetchOpenOrders { .. }
            | Call::FetchDeposits { .. }
            | Call::FetchWithdrawals { .. } => self.account_request(method),
            Call::CreateOrder(order) => self.create_order(order, markets),
            Call::CancelOrder { id, .. } => {
                let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Spot)?);
                request.param("OrderId", numeric(id));
                Ok(request)
            }
            Call::FetchOrder { id, .. } => {
                let mut request = self.account_request(method)?;
                request.param("OrderId", numeric(id));
                Ok(request)
            }
        }
    }

    /// A 404 is how the gateway answers calls it could not authenticate.
    fn translate_error(&self, status: u16, body: Option<&Value>, raw: &str) -> Option<Error> {
        if status == 404 {
            return Some(Error::AuthenticationError(format!("{ID} {raw}")));
        }
        let message = fields::string(body?, "errormsg")?;
        Some(ERRORS.classify(&[message.as_str()], Some(&message), format!("{ID} {raw}")))
    }

    fn payload<'a>(&self, body: &'a Value) -> &'a Value {
        body
    }

    fn parse_markets(&self, _scope: Scope, payload: &Value) -> Result<Vec<Market>> {
        let rows = payload.as_array().ok_or_else(|| {
            Error::ExchangeError(format!("{ID} fetchMarkets() returned no instrument list"))
        })?;
        let mut markets = Vec::with_capacity(rows.len());
        for raw in rows {
            match self.parse_market(raw) {
                Some(market) => markets.push(market),
                None => warn!(exchange = ID, instrument = %raw, "skipping unreadable instrument"),
            }
        }
        Ok(markets)
    }

    /// Product ids and symbols, as named by the instruments.
    fn parse_currencies(&self, payload: &Value) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = Vec::new();
        for raw in as_list(payload) {
            for (id_key, code_key) in [("Product1", "Product1Symbol"), ("Product2", "Product2Symbol")] {
                let (Some(id), Some(code)) = (fields::string(raw, id_key), fields::string(raw, code_key))
                else {
                    continue;
                };
                if !currencies.iter().any(|c| c.id == id) {
                    currencies.push(Currency::new(id, code.to_ascii_uppercase()));
                }
            }
        }
        currencies
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker {
        Ticker {
            symbol: self.safe_symbol(markets, fields::string(raw, "InstrumentId").as_deref()),
            timestamp: fields::integer(raw, "TimeStamp"),
            high: fields::decimal(raw, "SessionHigh"),
            low: fields::decimal(raw, "SessionLow"),
            bid: fields::decimal(raw, "BestBid"),
            ask: fields::decimal(raw, "BestOffer"),
            open: fields::decimal(raw, "SessionOpen"),
            last: fields::decimal(raw, "LastTradedPx"),
            change: fields::decimal(raw, "Rolling24HrPxChange"),
            percentage: fields::decimal(raw, "Rolling24HrPxChangePercent"),
            base_volume: fields::decimal(raw, "Rolling24HrVolume"),
            quote_volume: fields::decimal(raw, "Rolling24HrNotional"),
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
        let mut bids = Vec::new();
        let mut asks = Vec::new();
        let mut timestamp: Option<i64> = None;
        let mut nonce: Option<i64> = None;
        for row in as_list(payload) {
            let at = |i: usize| row.get(i);
            if let Some(t) = at(L2_TIME).and_then(fields::as_integer) {
                timestamp = Some(timestamp.map_or(t, |cur| cur.max(t)));
            }
            if let Some(n) = at(L2_UPDATE_ID).and_then(fields::as_integer) {
                nonce = Some(nonce.map_or(n, |cur| cur.max(n)));
            }
            let level = at(L2_PRICE)
                .and_then(fields::as_decimal)
                .zip(at(L2_QUANTITY).and_then(fields::as_decimal))
                .map(|(price, amount)| PriceLevel { price, amount });
            let Some(level) = level else {
                warn!(exchange = ID, row = %row, "skipping unreadable order book row");
                continue;
            };
            match at(L2_SIDE).and_then(fields::as_integer) {
                Some(1) => asks.push(level),
                _ => bids.push(level),
            }
        }
        Ok(OrderBook::new(
            Some(symbol.to_string()),
            bids,
            asks,
            timestamp,
            nonce,
        ))
    }

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade {
        if let Some(row) = raw.as_array() {
            return self.array_trade(row, markets);
        }
        let fee = fields::decimal(raw, "Fee").map(|cost| Fee {
            cost: Some(cost),
            currency: fields::string(raw, "FeeProductId").map(|id| markets.currency_code(&id)),
            rate: None,
        });
        Trade {
            id: fields::string(raw, "TradeId"),
            order: TRADE_ORDER_ID.string(raw),
            symbol: self.safe_symbol(markets, TRADE_MARKET.string(raw).as_deref()),
            timestamp: TRADE_TIMESTAMP.integer(raw),
            side: fields::string(raw, "Side").and_then(|s| Side::parse(&s)),
            order_type: lower(raw, "OrderType").map(OrderType::from),
            taker_or_maker: match lower(raw, "MakerTaker").as_deref() {
                Some("maker") => Some(TakerOrMaker::Maker),
                Some("taker") => Some(TakerOrMaker::Taker),
                _ => None,
            },
            price: fields::decimal(raw, "Price"),
            amount: fields::decimal(raw, "Quantity"),
            cost: TRADE_COST.decimal(raw),
            fee,
        }
        .derive()
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order {
        Order {
            id: ORDER_ID.string(raw),
            client_order_id: ORDER_CLIENT_ID
                .string(raw)
                .filter(|id| id != "0"),
            timestamp: fields::integer(raw, "ReceiveTime"),
            last_trade_timestamp: fields::integer(raw, "LastUpdatedTime"),
            symbol: self.safe_symbol(markets, ORDER_MARKET.string(raw).as_deref()),
            status: ORDER_STATE.string(raw).map(|s| ORDER_STATUS.classify(&s)),
            side: fields::string(raw, "Side").and_then(|s| Side::parse(&s)),
            order_type: lower(raw, "OrderType").map(OrderType::from),
            price: fields::decimal(raw, "Price"),
            trigger_price: nonzero(fields::decimal(raw, "StopPrice")),
            amount: fields::decimal(raw, "OrigQuantity"),
            filled: fields::decimal(raw, "QuantityExecuted"),
            average: fields::decimal(raw, "AvgPrice"),
            cost: fields::decimal(raw, "GrossValueExecuted"),
            ..Order::default()
        }
        .derive()
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances {
        let mut balances = Balances::default();
        for entry in as_list(payload) {
            let Some(id) = fields::string(entry, "ProductId") else {
                warn!(exchange = ID, entry = %entry, "skipping balance without product id");
                continue;
            };
            let code = match fields::string(entry, "ProductSymbol") {
                Some(symbol) => symbol.to_ascii_uppercase(),
                None if markets.currency_by_id(&id).is_some() => markets.currency_code(&id),
                None => {
                    debug!(exchange = ID, product = %id, "skipping balance for unknown product");
                    continue;
                }
            };
            balances.insert(
                code,
                BalanceEntry::new(
                    None,
                    fields::decimal(entry, "Hold"),
                    fields::decimal(entry, "Amount"),
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
        let (id, kind) = match (fields::string(raw, "DepositId"), fields::string(raw, "WithdrawId")) {
            (Some(id), _) => (Some(id), Some(TransactionType::Deposit)),
            (None, Some(id)) => (Some(id), Some(TransactionType::Withdrawal)),
            (None, None) => (None, kind),
        };
        let code = fields::string(raw, "ProductId").map(|id| markets.currency_code(&id));
        let statuses = match kind {
            Some(TransactionType::Withdrawal) => WITHDRAWAL_STATUS,
            _ => DEPOSIT_STATUS,
        };
        let form = template_form(raw);
        let form = form.as_ref();
        Transaction {
            id,
            txid: form.and_then(|f| fields::string(f, "TxId")),
            kind,
            address: form.and_then(|f| fields::string(f, "ExternalAddress")),
            amount: fields::decimal(raw, "Amount"),
            fee: Fee::from_cost(fields::decimal(raw, "FeeAmount"), code.clone()),
            currency: code,
            status: fields::string(raw, "TicketStatus").map(|s| statuses.classify(&s)),
            timestamp: form.and_then(|f| fields::integer(f, "TimeSubmitted")),
            updated: form
                .and_then(|f| fields::integer(f, "LastUpdated"))
                .or_else(|| fields::integer(raw, "LastUpdateTimeStamp")),
            ..Transaction::default()
        }
    }
}

static ERRORS: ErrorTable = ErrorTable {
    exact: EXACT,
    broad: BROAD,
};

const EXACT: &[(&str, ErrorKind)] = &[
    ("Not_Enough_Funds", ErrorKind::InsufficientFunds),
    ("Server Error", ErrorKind::ExchangeError),
    ("Resource Not Found", ErrorKind::OrderNotFound),
];

const BROAD: &[(&str, ErrorKind)] = &[
    ("Invalid InstrumentId", ErrorKind::BadRequest),
    ("This endpoint requires 2FACode along with the payload", ErrorKind::AuthenticationError),
];
