//! Unified call arguments and the exchange-specific request built from them.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use canonical::{OrderType, Side, TimeInForce};
use unify_core::{Error, Result};

use crate::endpoint::{Access, Endpoint, HttpMethod, Method, Scope};

/// Arguments of a `createOrder` call.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub amount: Decimal,
    pub price: Option<Decimal>,
    /// Quote notional for market buys; overrides `amount × price`.
    pub cost: Option<Decimal>,
    pub client_order_id: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
}

impl OrderRequest {
    pub fn limit(symbol: &str, side: Side, amount: Decimal, price: Decimal) -> Self {
        OrderRequest {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            amount,
            price: Some(price),
            cost: None,
            client_order_id: None,
            time_in_force: None,
            reduce_only: false,
        }
    }

    pub fn market(symbol: &str, side: Side, amount: Decimal) -> Self {
        OrderRequest {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            amount,
            price: None,
            cost: None,
            client_order_id: None,
            time_in_force: None,
            reduce_only: false,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn is_market_buy(&self) -> bool {
        self.order_type == OrderType::Market && self.side == Side::Buy
    }

    /// Checks that need no market data.
    pub fn validate(&self, exchange: &str) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidOrder(format!(
                "{exchange} createOrder() amount must be positive, got {}",
                self.amount
            )));
        }
        match &self.order_type {
            OrderType::Limit if self.price.is_none() => Err(Error::ArgumentsRequired(format!(
                "{exchange} createOrder() requires a price argument for a limit order"
            ))),
            OrderType::Other(kind) => Err(Error::InvalidOrder(format!(
                "{exchange} createOrder() does not support {kind} orders"
            ))),
            _ => Ok(()),
        }
    }
}

/// One invocation of a unified method with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchMarkets {
        scope: Scope,
    },
    FetchTicker {
        symbol: String,
    },
    FetchTickers {
        symbols: Option<Vec<String>>,
    },
    FetchOrderBook {
        symbol: String,
        limit: Option<u32>,
    },
    FetchTrades {
        symbol: String,
        since: Option<i64>,
        limit: Option<u32>,
    },
    FetchBalance,
    CreateOrder(OrderRequest),
    CancelOrder {
        id: String,
        symbol: Option<String>,
    },
    FetchOrder {
        id: String,
        symbol: Option<String>,
    },
    FetchOpenOrders {
        symbol: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    },
    FetchDeposits {
        code: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    },
    FetchWithdrawals {
        code: Option<String>,
        since: Option<i64>,
        limit: Option<u32>,
    },
}

impl Call {
    pub fn method(&self) -> Method {
        match self {
            Call::FetchMarkets { .. } => Method::FetchMarkets,
            Call::FetchTicker { .. } => Method::FetchTicker,
            Call::FetchTickers { .. } => Method::FetchTickers,
            Call::FetchOrderBook { .. } => Method::FetchOrderBook,
            Call::FetchTrades { .. } => Method::FetchTrades,
            Call::FetchBalance => Method::FetchBalance,
            Call::CreateOrder(_) => Method::CreateOrder,
            Call::CancelOrder { .. } => Method::CancelOrder,
            Call::FetchOrder { .. } => Method::FetchOrder,
            Call::FetchOpenOrders { .. } => Method::FetchOpenOrders,
            Call::FetchDeposits { .. } => Method::FetchDeposits,
            Call::FetchWithdrawals { .. } => Method::FetchWithdrawals,
        }
    }

    /// Unified symbol the call targets, if any.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Call::FetchTicker { symbol }
            | Call::FetchOrderBook { symbol, .. }
            | Call::FetchTrades { symbol, .. } => Some(symbol),
            Call::CreateOrder(order) => Some(&order.symbol),
            Call::CancelOrder { symbol, .. }
            | Call::FetchOrder { symbol, .. }
            | Call::FetchOpenOrders { symbol, .. } => symbol.as_deref(),
            _ => None,
        }
    }
}

/// Where request parameters travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Query,
    Json,
    Form,
}

/// A fully built, not yet signed, exchange request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub exchange: &'static str,
    pub method: Method,
    pub verb: HttpMethod,
    pub base: &'static str,
    pub path: String,
    pub params: Map<String, Value>,
    pub placement: Placement,
    pub headers: Vec<(String, String)>,
    pub access: Access,
    pub weight: f64,
}

impl HttpRequest {
    /// Start a request for `endpoint`. GET and DELETE carry parameters in
    /// the query string; POST bodies use `post_placement`.
    pub fn new(exchange: &'static str, endpoint: &Endpoint, post_placement: Placement) -> Self {
        let placement = match endpoint.verb {
            HttpMethod::Post => post_placement,
            HttpMethod::Get | HttpMethod::Delete => Placement::Query,
        };
        HttpRequest {
            exchange,
            method: endpoint.method,
            verb: endpoint.verb,
            base: endpoint.base,
            path: endpoint.path.to_string(),
            params: Map::new(),
            placement,
            headers: Vec::new(),
            access: endpoint.access,
            weight: endpoint.weight,
        }
    }

    pub fn param(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn param_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.param(key, v);
        }
        self
    }

    /// Decimals travel as plain strings, never floats.
    pub fn decimal(&mut self, key: &str, value: Decimal) -> &mut Self {
        self.param(key, value.normalize().to_string())
    }

    /// Replace a `{name}` placeholder in the path.
    pub fn path_param(&mut self, name: &str, value: &str) -> &mut Self {
        self.path = self.path.replace(&format!("{{{name}}}"), value);
        self
    }

    pub fn header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Parameter rendered as text, the way it goes on the wire.
    pub fn param_str(&self, key: &str) -> Option<String> {
        self.params.get(key).map(value_text)
    }

    pub fn url(&self) -> String {
        let mut url = format!("{}{}", self.base, self.path);
        if self.placement == Placement::Query && !self.params.is_empty() {
            url.push('?');
            url.push_str(&self.encoded_params());
        }
        url
    }

    pub fn body(&self) -> Option<String> {
        match self.placement {
            Placement::Query => None,
            Placement::Json => Some(Value::Object(self.params.clone()).to_string()),
            Placement::Form => Some(self.encoded_params()),
        }
    }

    pub fn encoded_params(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.params {
            ser.append_pair(k, &value_text(v));
        }
        ser.finish()
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
