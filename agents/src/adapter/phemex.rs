//! Phemex spot and USDT-settled perpetuals.
//!
//! Spot fields travel as scaled integers (`Ep` prices, `Ev` values, `Er`
//! ratios) whose exponents come from the market, or for wallet figures from
//! the currency. USDT perpetuals use the real-valued `Rp`/`Rq`/`Rv` fields.
//! Coin-margined contracts are not loaded.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use canonical::balance::sum_present;
use canonical::{
    BalanceEntry, Balances, Currency, Fee, FixedPointScales, Limits, Market, MarketTable,
    MarketType, MinMax, NumericEncoding, Order, OrderBook, OrderState, OrderType, Precision,
    PriceLevel, Side, StatusMap, TakerOrMaker, Ticker, TimeInForce, Trade, Transaction,
    TransactionState, TransactionType,
};
use unify_core::config::ExchangeConfig;
use unify_core::fields::{self, FieldChain};
use unify_core::precision::{parse_precision, Rounding};
use unify_core::{Error, ErrorKind, Result, Scale};

use super::{
    as_list, client_order_id, default_scope, market_buy_cost, normalize, nonzero, ns_to_ms,
    pair_level, price_levels, require_symbol, scope_of, ExchangeAdapter, Normalized,
};
use crate::endpoint::{require, Access, Endpoint, HttpMethod, Method, Scope};
use crate::request::{Call, HttpRequest, OrderRequest, Placement};
use crate::translate::ErrorTable;

pub const ID: &str = "phemex";

const HOST: &str = "https://api.phemex.com";
const V1: &str = "https://api.phemex.com/v1";

const SETTLE: &str = "USDT";
/// Value scale of spot base currencies that do not publish one.
const DEFAULT_VALUE_SCALE: u32 = 8;

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
    endpoint!(FetchMarkets, Any, Get, HOST, "/public/products", Public, 5.0),
    endpoint!(FetchTicker, Spot, Get, V1, "/md/spot/ticker/24hr", Public, 5.0),
    endpoint!(FetchTicker, Swap, Get, HOST, "/md/v2/ticker/24hr", Public, 5.0),
    endpoint!(FetchTickers, Spot, Get, V1, "/md/spot/ticker/24hr/all", Public, 5.0),
    endpoint!(FetchTickers, Swap, Get, HOST, "/md/v2/ticker/24hr/all", Public, 5.0),
    endpoint!(FetchOrderBook, Spot, Get, V1, "/md/orderbook", Public, 5.0),
    endpoint!(FetchOrderBook, Swap, Get, HOST, "/md/v2/orderbook", Public, 5.0),
    endpoint!(FetchTrades, Spot, Get, V1, "/md/trade", Public, 5.0),
    endpoint!(FetchTrades, Swap, Get, HOST, "/md/v2/trade", Public, 5.0),
    endpoint!(FetchBalance, Spot, Get, HOST, "/spot/wallets", Private, 5.0),
    endpoint!(FetchBalance, Swap, Get, HOST, "/g-accounts/accountPositions", Private, 1.0),
    endpoint!(CreateOrder, Spot, Post, HOST, "/spot/orders", Private, 1.0),
    endpoint!(CreateOrder, Swap, Post, HOST, "/g-orders", Private, 1.0),
    endpoint!(CancelOrder, Spot, Delete, HOST, "/spot/orders", Private, 2.0),
    endpoint!(CancelOrder, Swap, Delete, HOST, "/g-orders/cancel", Private, 1.0),
    endpoint!(FetchOrder, Spot, Get, HOST, "/spot/orders/active", Private, 1.0),
    endpoint!(FetchOpenOrders, Spot, Get, HOST, "/spot/orders", Private, 1.0),
    endpoint!(FetchOpenOrders, Swap, Get, HOST, "/g-orders/activeList", Private, 1.0),
    endpoint!(FetchDeposits, Any, Get, HOST, "/exchange/wallets/depositList", Private, 5.0),
    endpoint!(FetchWithdrawals, Any, Get, HOST, "/exchange/wallets/withdrawList", Private, 5.0),
];

const ORDER_STATUS: StatusMap<OrderState> = StatusMap::new(&[
    ("Created", OrderState::Open),
    ("Untriggered", OrderState::Open),
    ("Deactivated", OrderState::Closed),
    ("Triggered", OrderState::Open),
    ("Rejected", OrderState::Rejected),
    ("New", OrderState::Open),
    ("PartiallyFilled", OrderState::Open),
    ("Filled", OrderState::Closed),
    ("Canceled", OrderState::Canceled),
    ("1", OrderState::Open),
    ("5", OrderState::Open),
    ("6", OrderState::Open),
    ("7", OrderState::Closed),
    ("8", OrderState::Canceled),
]);

const TRANSACTION_STATUS: StatusMap<TransactionState> = StatusMap::new(&[
    ("Success", TransactionState::Ok),
    ("Succeed", TransactionState::Ok),
]);

const PAYLOAD: FieldChain = FieldChain::new(&["result", "data"]);
const BOOK: FieldChain = FieldChain::new(&["book", "orderbook_p"]);
const TRADES: FieldChain = FieldChain::new(&["trades", "trades_p"]);
const ERROR_MESSAGE: FieldChain = FieldChain::new(&["msg", "message"]);
const AMOUNT_STEP: FieldChain = FieldChain::new(&["qtyStepSize", "lotSize"]);
const TAKER_FEE: FieldChain = FieldChain::new(&["defaultTakerFeeRateRr", "defaultTakerFee"]);
const MAKER_FEE: FieldChain = FieldChain::new(&["defaultMakerFeeRateRr", "defaultMakerFee"]);
const TICKER_LAST: FieldChain = FieldChain::new(&["closeRp", "lastRp"]);
const TRADE_ID: FieldChain = FieldChain::new(&["execId", "execID"]);
const ORDER_ID: FieldChain = FieldChain::new(&["orderID", "orderId"]);
const ORDER_CLIENT_ID: FieldChain = FieldChain::new(&["clOrdID", "clOrdId"]);
const ORDER_TYPE: FieldChain = FieldChain::new(&["ordType", "orderType"]);
const SPOT_FILLED: FieldChain = FieldChain::new(&["cumBaseQtyEv", "cumBaseValueEv"]);
const SPOT_COST: FieldChain = FieldChain::new(&["cumQuoteValueEv", "quoteQtyEv"]);
const SPOT_TIMESTAMP: FieldChain = FieldChain::new(&["actionTimeNs", "createTimeNs"]);
const SWAP_AMOUNT: FieldChain = FieldChain::new(&["orderQtyRq", "orderQty"]);
const SWAP_FILLED: FieldChain = FieldChain::new(&["cumQtyRq", "cumQty"]);
const SWAP_REMAINING: FieldChain = FieldChain::new(&["leavesQtyRq", "leavesQty"]);
const SWAP_COST: FieldChain = FieldChain::new(&["cumValueRv", "cumValue"]);
const SWAP_TRIGGER: FieldChain = FieldChain::new(&["stopPxRp", "stopPx"]);
const SWAP_BALANCE: FieldChain = FieldChain::new(&["accountBalanceRv", "accountBalanceEv"]);
const SWAP_USED: FieldChain = FieldChain::new(&["totalUsedBalanceRv", "totalUsedBalanceEv"]);
const TRANSACTION_TIMESTAMP: FieldChain = FieldChain::new(&["createdAt", "submitedAt"]);

pub struct Phemex {
    config: ExchangeConfig,
}

impl Phemex {
    pub fn new(config: ExchangeConfig) -> Self {
        Phemex { config }
    }

    fn request(&self, endpoint: &Endpoint) -> HttpRequest {
        HttpRequest::new(ID, endpoint, Placement::Json)
    }

    fn create_order(&self, order: &OrderRequest, markets: &MarketTable) -> Result<HttpRequest> {
        order.validate(ID)?;
        if order.order_type == OrderType::Market && order.time_in_force == Some(TimeInForce::Po) {
            return Err(Error::InvalidOrder(format!(
                "{ID} createOrder() market orders cannot be post-only"
            )));
        }
        let market = markets.market(&order.symbol)?;
        let scope = scope_of(&market);
        let mut request = self.request(require(ID, ENDPOINTS, Method::CreateOrder, scope)?);
        let order_type = match order.order_type {
            OrderType::Market => "Market",
            _ => "Limit",
        };
        request
            .param("symbol", market.id.as_str())
            .param("side", capitalized(order.side))
            .param("ordType", order_type)
            .param_opt(
                "clOrdID",
                client_order_id(&self.config, order.client_order_id.as_deref()),
            )
            .param_opt("timeInForce", order.time_in_force.map(time_in_force_name));
        if scope == Scope::Spot {
            if order.is_market_buy() {
                let cost =
                    market_buy_cost(ID, &self.config, order, &market, Some(Rounding::Truncate))?;
                request
                    .param("qtyType", "ByQuote")
                    .param("quoteQtyEv", market.to_ev(cost)?);
            } else {
                let amount = market.amount_to_precision(order.amount)?;
                request
                    .param("qtyType", "ByBase")
                    .param("baseQtyEv", market.to_ev(amount)?);
            }
            if order.order_type == OrderType::Limit {
                if let Some(price) = order.price {
                    request.param("priceEp", market.to_ep(market.price_to_precision(price)?)?);
                }
            }
        } else {
            request
                .param("posSide", "Merged")
                .decimal("orderQtyRq", market.amount_to_precision(order.amount)?);
            if order.reduce_only {
                request.param("reduceOnly", true);
            }
            if order.order_type == OrderType::Limit {
                if let Some(price) = order.price {
                    request.decimal("priceRp", market.price_to_precision(price)?);
                }
            }
        }
        Ok(request)
    }

    fn parse_spot_market(&self, raw: &Value, currencies: &[Currency]) -> Option<Market> {
        let id = fields::string(raw, "symbol")?;
        let base_id = fields::string(raw, "baseCurrency")?;
        let quote_id = fields::string(raw, "quoteCurrency")?;
        let value = match currencies
            .iter()
            .find(|c| c.id == base_id)
            .and_then(|c| c.value_scale)
        {
            Some(value) => value,
            None => Scale::new(DEFAULT_VALUE_SCALE).ok()?,
        };
        let scales = FixedPointScales {
            price: scale(raw, "priceScale")?,
            value,
            ratio: scale(raw, "ratioScale")?,
        };
        let amount_step = fields::string(raw, "baseTickSize").and_then(|s| leading_number(&s))?;
        let price_step = fields::string(raw, "quoteTickSize").and_then(|s| leading_number(&s))?;
        let base = base_id.to_ascii_uppercase();
        let quote = quote_id.to_ascii_uppercase();
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
            active: fields::string(raw, "status").map(|s| s == "Listed"),
            precision: Precision {
                amount: amount_step,
                price: price_step,
            },
            limits: Limits {
                amount: MinMax {
                    min: Some(amount_step),
                    max: fields::string(raw, "maxBaseOrderSize").and_then(|s| leading_number(&s)),
                },
                price: MinMax {
                    min: Some(price_step),
                    max: None,
                },
                cost: MinMax {
                    min: fields::string(raw, "minOrderValue").and_then(|s| leading_number(&s)),
                    max: fields::string(raw, "maxOrderValue").and_then(|s| leading_number(&s)),
                },
            },
            linear: None,
            inverse: None,
            contract_size: None,
            taker: TAKER_FEE.decimal(raw),
            maker: MAKER_FEE.decimal(raw),
            encoding: NumericEncoding::FixedPoint(scales),
        })
    }

    fn parse_swap_market(&self, raw: &Value) -> Option<Market> {
        let id = fields::string(raw, "symbol")?;
        let base_id = fields::string(raw, "baseCurrency")
            .or_else(|| fields::string(raw, "contractUnderlyingAssets"))?;
        let quote_id = fields::string(raw, "quoteCurrency")?;
        let settle_id = fields::string(raw, "settleCurrency")?;
        if settle_id != quote_id {
            debug!(exchange = ID, market = %id, "skipping inverse contract");
            return None;
        }
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
            active: fields::string(raw, "status").map(|s| s == "Listed"),
            precision: Precision {
                amount: AMOUNT_STEP.decimal(raw)?,
                price: fields::decimal(raw, "tickSize")?,
            },
            limits: Limits {
                amount: MinMax {
                    min: None,
                    max: fields::decimal(raw, "maxOrderQtyRq"),
                },
                price: MinMax {
                    min: fields::decimal(raw, "minPriceRp"),
                    max: fields::decimal(raw, "maxPriceRp"),
                },
                cost: MinMax::default(),
            },
            linear: Some(true),
            inverse: Some(false),
            contract_size: fields::string(raw, "contractSize").and_then(|s| leading_number(&s)),
            taker: TAKER_FEE.decimal(raw),
            maker: MAKER_FEE.decimal(raw),
            encoding: NumericEncoding::Decimal,
        })
    }

    fn parse_trade_in(&self, raw: &Value, market: Option<&Market>, markets: &MarketTable) -> Trade {
        if let Some(row) = raw.as_array() {
            return array_trade(row, market);
        }
        let market = market.cloned().or_else(|| {
            markets
                .safe_market(fields::string(raw, "symbol").as_deref())
                .map(|m| (*m).clone())
        });
        let timestamp = fields::integer(raw, "transactTimeNs")
            .map(ns_to_ms)
            .or_else(|| fields::integer(raw, "createdAt"));
        let trade = if raw.get("priceRp").is_some() {
            Trade {
                side: fields::string(raw, "side").and_then(|s| parse_side(&s)),
                order_type: fields::string(raw, "ordType").map(|t| parse_order_type(&t)),
                price: fields::decimal(raw, "priceRp"),
                amount: fields::decimal(raw, "execQtyRq"),
                cost: fields::decimal(raw, "execValueRv"),
                fee: fields::decimal(raw, "execFeeRv").map(|cost| Fee {
                    cost: Some(cost),
                    currency: fields::string(raw, "currency").map(|c| markets.currency_code(&c)),
                    rate: fields::decimal(raw, "feeRateRr"),
                }),
                ..Trade::default()
            }
        } else {
            let side = fields::string(raw, "side").and_then(|s| parse_side(&s));
            let m = market.as_ref();
            Trade {
                side,
                order_type: fields::string(raw, "ordType").map(|t| parse_order_type(&t)),
                taker_or_maker: match fields::string(raw, "execStatus").as_deref() {
                    Some("MakerFill") => Some(TakerOrMaker::Maker),
                    Some(_) => Some(TakerOrMaker::Taker),
                    None => None,
                },
                price: ep(raw, "execPriceEp", m),
                amount: fields::decimal(raw, "execQty").or_else(|| ev(raw, "execBaseQtyEv", m)),
                cost: ev(raw, "execQuoteQtyEv", m).or_else(|| ev(raw, "execValueEv", m)),
                fee: ev(raw, "execFeeEv", m).map(|cost| Fee {
                    cost: Some(cost),
                    currency: m.map(|m| match side {
                        Some(Side::Buy) => m.base.clone(),
                        _ => m.quote.clone(),
                    }),
                    rate: er(raw, "feeRateEr", m),
                }),
                ..Trade::default()
            }
        };
        Trade {
            id: TRADE_ID.string(raw),
            order: fields::string(raw, "orderID"),
            symbol: market.map(|m| m.symbol),
            timestamp,
            ..trade
        }
        .derive()
    }

    fn parse_spot_order(&self, raw: &Value, market: Option<&Market>) -> Order {
        let status = fields::string(raw, "ordStatus").map(|s| ORDER_STATUS.classify(&s));
        let open = status.as_ref().and_then(|s| s.known()) == Some(OrderState::Open);
        let remaining = ev(raw, "leavesBaseQtyEv", market);
        let fee = ev(raw, "cumFeeEv", market);
        Order {
            id: ORDER_ID.string(raw),
            client_order_id: ORDER_CLIENT_ID.string(raw),
            timestamp: SPOT_TIMESTAMP.integer(raw).map(ns_to_ms),
            symbol: market.map(|m| m.symbol.clone()),
            status,
            side: fields::string(raw, "side").and_then(|s| parse_side(&s)),
            order_type: ORDER_TYPE.string(raw).map(|t| parse_order_type(&t)),
            time_in_force: fields::string(raw, "timeInForce").and_then(|t| parse_time_in_force(&t)),
            price: ep(raw, "priceEp", market),
            trigger_price: nonzero(ep(raw, "stopPxEp", market)),
            amount: ev(raw, "baseQtyEv", market),
            filled: SPOT_FILLED
                .string(raw)
                .and_then(|s| market.and_then(|m| m.from_ev(&s))),
            remaining: if open { remaining } else { nonzero(remaining) },
            cost: SPOT_COST
                .string(raw)
                .and_then(|s| market.and_then(|m| m.from_ev(&s))),
            average: ep(raw, "avgPriceEp", market),
            fee: Fee::from_cost(fee, None),
            ..Order::default()
        }
        .derive()
    }

    fn parse_swap_order(&self, raw: &Value, market: Option<&Market>) -> Order {
        let reduce_only = match fields::string(raw, "execInst").as_deref() {
            Some("ReduceOnly") => Some(true),
            _ => raw.get("reduceOnly").and_then(Value::as_bool),
        };
        Order {
            id: ORDER_ID.string(raw),
            client_order_id: ORDER_CLIENT_ID.string(raw),
            timestamp: fields::integer(raw, "actionTimeNs")
                .map(ns_to_ms)
                .or_else(|| fields::integer(raw, "createdAt")),
            last_trade_timestamp: fields::integer(raw, "transactTimeNs")
                .filter(|ns| *ns != 0)
                .map(ns_to_ms),
            symbol: market.map(|m| m.symbol.clone()),
            status: fields::string(raw, "ordStatus").map(|s| ORDER_STATUS.classify(&s)),
            side: fields::string(raw, "side").and_then(|s| parse_side(&s)),
            order_type: ORDER_TYPE.string(raw).map(|t| parse_order_type(&t)),
            time_in_force: fields::string(raw, "timeInForce").and_then(|t| parse_time_in_force(&t)),
            reduce_only,
            price: fields::decimal(raw, "priceRp").or_else(|| ep(raw, "priceEp", market)),
            trigger_price: SWAP_TRIGGER.decimal(raw),
            amount: SWAP_AMOUNT.decimal(raw),
            filled: SWAP_FILLED.decimal(raw),
            remaining: SWAP_REMAINING.decimal(raw),
            cost: SWAP_COST.decimal(raw),
            ..Order::default()
        }
        .derive()
    }
}

fn scale(raw: &Value, key: &str) -> Option<Scale> {
    fields::integer(raw, key)
        .and_then(|v| u32::try_from(v).ok())
        .and_then(|v| Scale::new(v).ok())
}

/// Numbers published with thousands separators and a unit, e.g.
/// `"5,000,000 USDT"`.
fn leading_number(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace(',', "");
    cleaned
        .split_whitespace()
        .next()
        .and_then(fields::parse_decimal)
}

fn ep(raw: &Value, key: &str, market: Option<&Market>) -> Option<Decimal> {
    let market = market?;
    fields::string(raw, key).and_then(|s| market.from_ep(&s))
}

fn ev(raw: &Value, key: &str, market: Option<&Market>) -> Option<Decimal> {
    let market = market?;
    fields::string(raw, key).and_then(|s| market.from_ev(&s))
}

fn er(raw: &Value, key: &str, market: Option<&Market>) -> Option<Decimal> {
    let market = market?;
    fields::string(raw, key).and_then(|s| market.from_er(&s))
}

/// Wallet figures scale with the currency, not the market.
fn currency_ev(raw: &Value, key: &str, currency: Option<&Currency>) -> Option<Decimal> {
    let currency = currency?;
    fields::string(raw, key).and_then(|s| currency.from_ev(&s))
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Buy => "Buy",
        Side::Sell => "Sell",
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
        "1" | "5" | "7" | "8" | "10" | "Market" => OrderType::Market,
        "2" | "6" | "Limit" => OrderType::Limit,
        "3" | "Stop" => OrderType::from("stop"),
        "4" | "9" | "StopLimit" => OrderType::from("stopLimit"),
        other => OrderType::from(other),
    }
}

fn parse_time_in_force(raw: &str) -> Option<TimeInForce> {
    match raw {
        "GoodTillCancel" => Some(TimeInForce::Gtc),
        "PostOnly" => Some(TimeInForce::Po),
        "ImmediateOrCancel" => Some(TimeInForce::Ioc),
        "FillOrKill" => Some(TimeInForce::Fok),
        _ => None,
    }
}

fn time_in_force_name(tif: TimeInForce) -> &'static str {
    match tif {
        TimeInForce::Gtc => "GoodTillCancel",
        TimeInForce::Po => "PostOnly",
        TimeInForce::Ioc => "ImmediateOrCancel",
        TimeInForce::Fok => "FillOrKill",
    }
}

/// Public trade rows: `[timestampNs, (id,) side, price, amount]`. Spot rows
/// carry scaled integers, perpetual rows decimal strings.
fn array_trade(row: &[Value], market: Option<&Market>) -> Trade {
    let len = row.len();
    if len < 4 {
        warn!(exchange = ID, ?row, "skipping short trade row");
        return Trade::default();
    }
    let price_raw = &row[len - 2];
    let amount_raw = &row[len - 1];
    let (price, amount) = if price_raw.is_number() {
        let decode = |v: &Value, f: fn(&Market, &str) -> Option<Decimal>| {
            market.and_then(|m| fields::as_string(v).and_then(|s| f(m, &s)))
        };
        (
            decode(price_raw, Market::from_ep),
            decode(amount_raw, Market::from_ev),
        )
    } else {
        (fields::as_decimal(price_raw), fields::as_decimal(amount_raw))
    };
    Trade {
        id: if len > 4 {
            fields::as_string(&row[len - 4])
        } else {
            None
        },
        symbol: market.map(|m| m.symbol.clone()),
        timestamp: row.first().and_then(fields::as_integer).map(ns_to_ms),
        side: fields::as_string(&row[len - 3]).and_then(|s| parse_side(&s)),
        price,
        amount,
        ..Trade::default()
    }
    .derive()
}

/// Scaled order book rows: `[priceEp, sizeEv]`.
fn scaled_level(row: &Value, market: &Market) -> Option<PriceLevel> {
    let price = row.get(0).and_then(fields::as_string)?;
    let amount = row.get(1).and_then(fields::as_string)?;
    Some(PriceLevel {
        price: market.from_ep(&price)?,
        amount: market.from_ev(&amount)?,
    })
}

impl ExchangeAdapter for Phemex {
    fn id(&self) -> &'static str {
        ID
    }

    fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn endpoints(&self) -> &'static [Endpoint] {
        ENDPOINTS
    }

    fn symbol_delimiters(&self) -> &'static [char] {
        &[]
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest> {
        let method = call.method();
        match call {
            Call::FetchMarkets { scope } => Ok(self.request(require(ID, ENDPOINTS, method, *scope)?)),
            Call::FetchTicker { symbol }
            | Call::FetchOrderBook { symbol, .. }
            | Call::FetchTrades { symbol, .. } => {
                let market = markets.market(symbol)?;
                let mut request = self.request(require(ID, ENDPOINTS, method, scope_of(&market))?);
                request.param("symbol", market.id.as_str());
                Ok(request)
            }
            Call::FetchTickers { symbols } => {
                let scope = match symbols.as_ref().and_then(|s| s.first()) {
                    Some(first) => scope_of(markets.market(first)?.as_ref()),
                    None => default_scope(&self.config),
                };
                Ok(self.request(require(ID, ENDPOINTS, method, scope)?))
            }
            Call::FetchBalance => {
                let scope = default_scope(&self.config);
                let mut request = self.request(require(ID, ENDPOINTS, method, scope)?);
                if scope == Scope::Swap {
                    request.param("currency", SETTLE);
                }
                Ok(request)
            }
            Call::CreateOrder(order) => self.create_order(order, markets),
            Call::CancelOrder { id, symbol } | Call::FetchOrder { id, symbol } => {
                let symbol = require_symbol(ID, method.as_str(), symbol.as_deref())?;
                let market = markets.market(symbol)?;
                let scope = scope_of(&market);
                let mut request = self.request(require(ID, ENDPOINTS, method, scope)?);
                request
                    .param("symbol", market.id.as_str())
                    .param("orderID", id.as_str());
                if scope == Scope::Swap {
                    request.param("posSide", "Merged");
                }
                Ok(request)
            }
            Call::FetchOpenOrders { symbol, .. } => {
                let symbol = require_symbol(ID, method.as_str(), symbol.as_deref())?;
                let market = markets.market(symbol)?;
                let mut request = self.request(require(ID, ENDPOINTS, method, scope_of(&market))?);
                request.param("symbol", market.id.as_str());
                Ok(request)
            }
            Call::FetchDeposits { code, .. } | Call::FetchWithdrawals { code, .. } => {
                let mut request = self.request(require(ID, ENDPOINTS, method, Scope::Any)?);
                if let Some(code) = code {
                    let id = markets
                        .currency(code)
                        .map(|c| c.id.clone())
                        .unwrap_or_else(|| code.clone());
                    request.param("currency", id);
                }
                Ok(request)
            }
        }
    }

    fn translate_error(&self, _status: u16, body: Option<&Value>, raw: &str) -> Option<Error> {
        let body = body?;
        let error = match body.get("error") {
            Some(nested) if nested.is_object() => nested,
            _ => body,
        };
        let code = fields::string(error, "code").filter(|c| c != "0")?;
        let message = ERROR_MESSAGE.string(error);
        Some(ERRORS.classify(&[code.as_str()], message.as_deref(), format!("{ID} {raw}")))
    }

    /// Market data arrives under `result`, account data under `data`.
    fn payload<'a>(&self, body: &'a Value) -> &'a Value {
        PAYLOAD.value(body).unwrap_or(body)
    }

    fn parse_markets(&self, _scope: Scope, payload: &Value) -> Result<Vec<Market>> {
        let currencies = self.parse_currencies(payload);
        let products = payload.get("products").and_then(Value::as_array).ok_or_else(|| {
            Error::ExchangeError(format!("{ID} fetchMarkets() returned no product list"))
        })?;
        let perpetuals = payload.get("perpProductsV2").map(as_list).unwrap_or(&[]);
        let mut markets = Vec::with_capacity(products.len() + perpetuals.len());
        for raw in products.iter().chain(perpetuals) {
            let kind = fields::string(raw, "type").unwrap_or_default();
            let market = match kind.to_ascii_lowercase().as_str() {
                "spot" => self.parse_spot_market(raw, &currencies),
                "perpetualv2" => self.parse_swap_market(raw),
                _ => {
                    debug!(exchange = ID, kind = %kind, "skipping unsupported product");
                    continue;
                }
            };
            match market {
                Some(market) => markets.push(market),
                None => debug!(exchange = ID, product = %raw, "product not loaded"),
            }
        }
        Ok(markets)
    }

    fn parse_currencies(&self, payload: &Value) -> Vec<Currency> {
        payload
            .get("currencies")
            .map(as_list)
            .unwrap_or(&[])
            .iter()
            .filter_map(|raw| {
                let id = fields::string(raw, "currency")?;
                let value_scale = scale(raw, "valueScale");
                Some(Currency {
                    code: id.to_ascii_uppercase(),
                    precision: value_scale
                        .and_then(|s| parse_precision(&s.exponent().to_string())),
                    value_scale,
                    id,
                })
            })
            .collect()
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker {
        let market = markets.safe_market(fields::string(raw, "symbol").as_deref());
        let m = market.as_deref();
        let ticker = if raw.get("closeRp").is_some() || raw.get("lastRp").is_some() {
            Ticker {
                close: TICKER_LAST.decimal(raw),
                open: fields::decimal(raw, "openRp"),
                high: fields::decimal(raw, "highRp"),
                low: fields::decimal(raw, "lowRp"),
                bid: fields::decimal(raw, "bidRp"),
                ask: fields::decimal(raw, "askRp"),
                base_volume: fields::decimal(raw, "volumeRq"),
                quote_volume: fields::decimal(raw, "turnoverRv"),
                ..Ticker::default()
            }
        } else {
            Ticker {
                close: ep(raw, "lastEp", m),
                open: ep(raw, "openEp", m),
                high: ep(raw, "highEp", m),
                low: ep(raw, "lowEp", m),
                bid: ep(raw, "bidEp", m),
                ask: ep(raw, "askEp", m),
                base_volume: ev(raw, "volumeEv", m),
                quote_volume: ev(raw, "turnoverEv", m),
                ..Ticker::default()
            }
        };
        Ticker {
            symbol: market.map(|m| m.symbol.clone()),
            timestamp: fields::integer(raw, "timestamp").map(ns_to_ms),
            ..ticker
        }
        .derive()
    }

    fn parse_order_book(
        &self,
        payload: &Value,
        symbol: &str,
        markets: &MarketTable,
    ) -> Result<OrderBook> {
        let market = markets.market(symbol)?;
        let book = BOOK.value(payload).unwrap_or(payload);
        let (bids, asks) = match market.encoding {
            NumericEncoding::FixedPoint(_) => {
                let level = |row: &Value| scaled_level(row, &market);
                (
                    price_levels(book.get("bids"), level),
                    price_levels(book.get("asks"), level),
                )
            }
            NumericEncoding::Decimal => (
                price_levels(book.get("bids"), pair_level),
                price_levels(book.get("asks"), pair_level),
            ),
        };
        Ok(OrderBook::new(
            Some(symbol.to_string()),
            bids,
            asks,
            fields::integer(payload, "timestamp").map(ns_to_ms),
            fields::integer(payload, "sequence"),
        ))
    }

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade {
        self.parse_trade_in(raw, None, markets)
    }

    fn parse_trades(&self, payload: &Value, markets: &MarketTable) -> Vec<Trade> {
        let rows = TRADES.value(payload).unwrap_or(payload);
        as_list(rows)
            .iter()
            .map(|raw| self.parse_trade(raw, markets))
            .collect()
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order {
        let market = markets.safe_market(fields::string(raw, "symbol").as_deref());
        let swap = market.as_ref().map_or(false, |m| m.is_contract())
            || raw.get("closedPnl").is_some()
            || raw.get("orderQtyRq").is_some();
        if swap {
            self.parse_swap_order(raw, market.as_deref())
        } else {
            self.parse_spot_order(raw, market.as_deref())
        }
    }

    fn parse_orders(&self, payload: &Value, markets: &MarketTable) -> Vec<Order> {
        let rows = payload.get("rows").unwrap_or(payload);
        as_list(rows)
            .iter()
            .map(|raw| self.parse_order(raw, markets))
            .collect()
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances {
        let mut balances = Balances::default();
        if let Some(account) = payload.get("account") {
            let Some(id) = fields::string(account, "currency") else {
                warn!(exchange = ID, "swap account without currency");
                return balances;
            };
            let currency = markets.currency_by_id(&id);
            let figure = |chain: FieldChain| match chain.lookup(account) {
                Some((key, value)) if key.ends_with("Ev") => {
                    fields::as_string(value).and_then(|s| currency.and_then(|c| c.from_ev(&s)))
                }
                Some((_, value)) => fields::as_decimal(value),
                None => None,
            };
            balances.insert(
                markets.currency_code(&id),
                BalanceEntry::new(None, figure(SWAP_USED), figure(SWAP_BALANCE)),
            );
            return balances;
        }
        for entry in as_list(payload) {
            let Some(id) = fields::string(entry, "currency") else {
                warn!(exchange = ID, entry = %entry, "skipping balance without currency");
                continue;
            };
            let currency = markets.currency_by_id(&id);
            if currency.and_then(|c| c.value_scale).is_none() {
                warn!(exchange = ID, currency = %id, "balance currency has no value scale");
            }
            let used = sum_present(&[
                currency_ev(entry, "lockedTradingBalanceEv", currency),
                currency_ev(entry, "lockedWithdrawEv", currency),
            ]);
            balances.insert(
                markets.currency_code(&id),
                BalanceEntry::new(None, used, currency_ev(entry, "balanceEv", currency)),
            );
            if let Some(updated) = fields::integer(entry, "lastUpdateTimeNs").map(ns_to_ms) {
                balances.timestamp = Some(balances.timestamp.map_or(updated, |t| t.max(updated)));
            }
        }
        balances
    }

    fn parse_transaction(
        &self,
        raw: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Transaction {
        let currency_id = fields::string(raw, "currency");
        let currency = currency_id.as_deref().and_then(|id| markets.currency_by_id(id));
        let code = currency_id.as_deref().map(|id| markets.currency_code(id));
        let fee_cost = currency_ev(raw, "feeEv", currency);
        let kind = kind.or_else(|| {
            if fee_cost.is_some() {
                return Some(TransactionType::Withdrawal);
            }
            match fields::string(raw, "type")?.to_ascii_lowercase().as_str() {
                "deposit" => Some(TransactionType::Deposit),
                "withdrawal" | "withdraw" => Some(TransactionType::Withdrawal),
                _ => None,
            }
        });
        Transaction {
            id: fields::string(raw, "id"),
            txid: fields::string(raw, "txHash"),
            kind,
            address: fields::string(raw, "address"),
            amount: currency_ev(raw, "amountEv", currency),
            fee: Fee::from_cost(fee_cost, code.clone()),
            currency: code,
            status: fields::string(raw, "status").map(|s| TRANSACTION_STATUS.classify(&s)),
            timestamp: TRANSACTION_TIMESTAMP.integer(raw),
            ..Transaction::default()
        }
    }

    fn normalize_response(
        &self,
        call: &Call,
        body: &Value,
        markets: &MarketTable,
    ) -> Result<Normalized> {
        let payload = self.payload(body);
        match call {
            Call::FetchOrder { id, symbol } if payload.as_array().is_some_and(Vec::is_empty) => {
                Err(Error::OrderNotFound(format!(
                    "{ID} fetchOrder() {} order with id {id} not found",
                    symbol.as_deref().unwrap_or_default()
                )))
            }
            // Public trade rows carry no symbol, and spot rows need the
            // market's scales to decode.
            Call::FetchTrades { symbol, .. } => {
                let market = markets.market(symbol)?;
                let rows = TRADES.value(payload).unwrap_or(payload);
                let trades = as_list(rows)
                    .iter()
                    .map(|raw| {
                        let mut trade = self.parse_trade_in(raw, Some(&market), markets);
                        trade.symbol.get_or_insert_with(|| symbol.clone());
                        trade
                    })
                    .collect();
                Ok(Normalized::Trades(trades))
            }
            _ => normalize(self, call, body, markets),
        }
    }
}

static ERRORS: ErrorTable = ErrorTable {
    exact: EXACT,
    broad: BROAD,
};

const EXACT: &[(&str, ErrorKind)] = &[
    ("401", ErrorKind::AuthenticationError),
    ("412", ErrorKind::BadRequest),
    ("6001", ErrorKind::BadRequest),
    ("19999", ErrorKind::BadRequest),
    ("10001", ErrorKind::InvalidOrder),
    ("10002", ErrorKind::OrderNotFound),
    ("11001", ErrorKind::InsufficientFunds),
    ("11002", ErrorKind::InvalidOrder),
    ("11003", ErrorKind::InsufficientFunds),
    ("11004", ErrorKind::InvalidOrder),
    ("11005", ErrorKind::InsufficientFunds),
    ("11010", ErrorKind::InsufficientFunds),
    ("11011", ErrorKind::InvalidOrder),
    ("11012", ErrorKind::InvalidOrder),
    ("11013", ErrorKind::InvalidOrder),
    ("11014", ErrorKind::InvalidOrder),
    ("11015", ErrorKind::InvalidOrder),
    ("11016", ErrorKind::BadRequest),
    ("11022", ErrorKind::AccountSuspended),
    ("11025", ErrorKind::BadRequest),
    ("11027", ErrorKind::BadRequest),
    ("11028", ErrorKind::BadRequest),
    ("11031", ErrorKind::DDoSProtection),
    ("11032", ErrorKind::DDoSProtection),
    ("11033", ErrorKind::InvalidOrder),
    ("11034", ErrorKind::InvalidOrder),
    ("11035", ErrorKind::InvalidOrder),
    ("11036", ErrorKind::InvalidOrder),
    ("11037", ErrorKind::InvalidOrder),
    ("11038", ErrorKind::InvalidOrder),
    ("11039", ErrorKind::InvalidOrder),
    ("11040", ErrorKind::InvalidOrder),
    ("11041", ErrorKind::InvalidOrder),
    ("11042", ErrorKind::InvalidOrder),
    ("11043", ErrorKind::InvalidOrder),
    ("11044", ErrorKind::InvalidOrder),
    ("11045", ErrorKind::InvalidOrder),
    ("11046", ErrorKind::InvalidOrder),
    ("11047", ErrorKind::InvalidOrder),
    ("11048", ErrorKind::InvalidOrder),
    ("11049", ErrorKind::InvalidOrder),
    ("11050", ErrorKind::InvalidOrder),
    ("11051", ErrorKind::InvalidOrder),
    ("11052", ErrorKind::InvalidOrder),
    ("11053", ErrorKind::InvalidOrder),
    ("11054", ErrorKind::InvalidOrder),
    ("11055", ErrorKind::InvalidOrder),
    ("11056", ErrorKind::InvalidOrder),
    ("11057", ErrorKind::InvalidOrder),
    ("11058", ErrorKind::InvalidOrder),
    ("11059", ErrorKind::InvalidOrder),
    ("11060", ErrorKind::InvalidOrder),
    ("11062", ErrorKind::InvalidOrder),
    ("11063", ErrorKind::InvalidOrder),
    ("11064", ErrorKind::InvalidOrder),
    ("11065", ErrorKind::InvalidOrder),
    ("11066", ErrorKind::InvalidOrder),
    ("11067", ErrorKind::InvalidOrder),
    ("11068", ErrorKind::InvalidOrder),
    ("11070", ErrorKind::BadRequest),
    ("11071", ErrorKind::InvalidOrder),
    ("11072", ErrorKind::InvalidOrder),
    ("11073", ErrorKind::InvalidOrder),
    ("11074", ErrorKind::InvalidOrder),
    ("11075", ErrorKind::InvalidOrder),
    ("11076", ErrorKind::InvalidOrder),
    ("11077", ErrorKind::InvalidOrder),
    ("11078", ErrorKind::InvalidOrder),
    ("11079", ErrorKind::InvalidOrder),
    ("11080", ErrorKind::InvalidOrder),
    ("11081", ErrorKind::InvalidOrder),
    ("11082", ErrorKind::InsufficientFunds),
    ("11083", ErrorKind::InvalidOrder),
    ("11084", ErrorKind::InvalidOrder),
    ("11085", ErrorKind::InvalidOrder),
    ("11086", ErrorKind::InvalidOrder),
    ("11087", ErrorKind::InvalidOrder),
    ("11088", ErrorKind::InvalidOrder),
    ("11089", ErrorKind::InvalidOrder),
    ("11090", ErrorKind::InvalidOrder),
    ("11091", ErrorKind::InvalidOrder),
    ("11092", ErrorKind::InvalidOrder),
    ("11093", ErrorKind::InvalidOrder),
    ("11094", ErrorKind::InvalidOrder),
    ("11095", ErrorKind::InvalidOrder),
    ("11096", ErrorKind::InvalidOrder),
    ("11097", ErrorKind::BadRequest),
    ("11098", ErrorKind::BadRequest),
    ("11100", ErrorKind::InsufficientFunds),
    ("11101", ErrorKind::InsufficientFunds),
    ("11102", ErrorKind::BadRequest),
    ("11103", ErrorKind::BadRequest),
    ("11104", ErrorKind::BadRequest),
    ("11105", ErrorKind::InsufficientFunds),
    ("11106", ErrorKind::InsufficientFunds),
    ("11108", ErrorKind::InvalidOrder),
    ("11109", ErrorKind::InvalidOrder),
    ("11110", ErrorKind::InvalidOrder),
    ("11111", ErrorKind::InvalidOrder),
    ("11112", ErrorKind::InvalidOrder),
    ("11113", ErrorKind::BadRequest),
    ("11114", ErrorKind::InvalidOrder),
    ("11115", ErrorKind::InvalidOrder),
    ("11116", ErrorKind::InvalidOrder),
    ("11117", ErrorKind::InvalidOrder),
    ("11118", ErrorKind::InvalidOrder),
    ("11119", ErrorKind::InvalidOrder),
    ("11120", ErrorKind::InvalidOrder),
    ("11121", ErrorKind::InvalidOrder),
    ("11122", ErrorKind::InvalidOrder),
    ("11123", ErrorKind::InvalidOrder),
    ("11124", ErrorKind::InvalidOrder),
    ("11125", ErrorKind::InvalidOrder),
    ("11126", ErrorKind::InvalidOrder),
    ("11128", ErrorKind::InvalidOrder),
    ("11129", ErrorKind::InvalidOrder),
    ("11130", ErrorKind::InvalidOrder),
    ("11131", ErrorKind::InvalidOrder),
    ("11132", ErrorKind::InvalidOrder),
    ("11133", ErrorKind::InvalidOrder),
    ("11134", ErrorKind::InvalidOrder),
    ("30000", ErrorKind::BadRequest),
    ("30018", ErrorKind::BadRequest),
    ("34003", ErrorKind::PermissionDenied),
    ("35104", ErrorKind::InsufficientFunds),
    ("39995", ErrorKind::RateLimitExceeded),
    ("39996", ErrorKind::PermissionDenied),
    ("39997", ErrorKind::BadRequest),
];

const BROAD: &[(&str, ErrorKind)] = &[
    ("401 Insufficient privilege", ErrorKind::PermissionDenied),
    ("401 Request IP mismatch", ErrorKind::PermissionDenied),
    ("Failed to find api-key", ErrorKind::AuthenticationError),
    ("Missing required parameter", ErrorKind::BadRequest),
    ("API Signature verification failed", ErrorKind::AuthenticationError),
    ("Api key not found", ErrorKind::AuthenticationError),
];
