use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{OrderState, OrderStatus};
use crate::{Fee, Side};

/// Unified order type. Exchange-specific kinds (stop, stopLimit, ...)
/// pass through as `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum OrderType {
    Limit,
    Market,
    Other(String),
}

impl From<String> for OrderType {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "limit" => OrderType::Limit,
            "market" => OrderType::Market,
            _ => OrderType::Other(raw),
        }
    }
}

impl From<&str> for OrderType {
    fn from(raw: &str) -> Self {
        OrderType::from(raw.to_string())
    }
}

impl From<OrderType> for String {
    fn from(t: OrderType) -> String {
        match t {
            OrderType::Limit => "limit".into(),
            OrderType::Market => "market".into(),
            OrderType::Other(raw) => raw,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
    /// Post-only.
    Po,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub id: Option<String>,
    pub client_order_id: Option<String>,
    pub timestamp: Option<i64>,
    pub last_trade_timestamp: Option<i64>,
    pub symbol: Option<String>,
    pub status: Option<OrderStatus>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub time_in_force: Option<TimeInForce>,
    pub post_only: Option<bool>,
    pub reduce_only: Option<bool>,
    pub price: Option<Decimal>,
    pub trigger_price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub filled: Option<Decimal>,
    pub remaining: Option<Decimal>,
    pub average: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub fee: Option<Fee>,
}

impl Order {
    pub fn state(&self) -> Option<OrderState> {
        self.status.as_ref().and_then(|s| s.known())
    }

    /// Fill quantities that follow from the reported ones.
    ///
    /// Only unset fields are written, and only from present operands.
    pub fn derive(mut self) -> Self {
        let closed = self.state() == Some(OrderState::Closed);

        if self.amount.is_none() {
            if let (Some(filled), Some(remaining)) = (self.filled, self.remaining) {
                self.amount = filled.checked_add(remaining);
            } else if closed {
                self.amount = self.filled;
            }
        }
        if self.filled.is_none() {
            if let (Some(amount), Some(remaining)) = (self.amount, self.remaining) {
                self.filled = amount.checked_sub(remaining);
            }
        }
        if self.remaining.is_none() {
            if let (Some(amount), Some(filled)) = (self.amount, self.filled) {
                self.remaining = amount.checked_sub(filled);
            }
        }

        if self.average.is_none() {
            if let (Some(cost), Some(filled)) = (self.cost, self.filled) {
                if filled > Decimal::ZERO {
                    self.average = cost.checked_div(filled);
                }
            }
        }
        if self.cost.is_none() {
            if let Some(filled) = self.filled {
                if let Some(price) = self.average.or(self.price) {
                    self.cost = filled.checked_mul(price);
                }
            }
        }

        if self.post_only.is_none() {
            if let Some(tif) = self.time_in_force {
                self.post_only = Some(tif == TimeInForce::Po);
            }
        }
        self
    }
}
