//! Unified entity shapes every exchange payload is normalized into.
//!
//! Entities are built fresh per response. Optional fields stay `None`
//! unless the exchange reported them or they can be derived from
//! reported operands.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod balance;
pub mod market;
pub mod order;
pub mod status;
pub mod ticker;
pub mod transaction;

pub use balance::{BalanceEntry, Balances};
pub use market::{
    Currency, FixedPointScales, Limits, Market, MarketCache, MarketTable, MarketType, MinMax,
    NumericEncoding, Precision,
};
pub use order::{Order, OrderType, TimeInForce};
pub use status::{
    OrderState, OrderStatus, Status, StatusMap, TransactionState, TransactionStatus,
};
pub use ticker::Ticker;
pub use transaction::{Transaction, TransactionType};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Case-insensitive `buy`/`sell`.
    pub fn parse(raw: &str) -> Option<Side> {
        if raw.eq_ignore_ascii_case("buy") {
            Some(Side::Buy)
        } else if raw.eq_ignore_ascii_case("sell") {
            Some(Side::Sell)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    Taker,
    Maker,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Fee {
    pub cost: Option<Decimal>,
    pub currency: Option<String>,
    pub rate: Option<Decimal>,
}

impl Fee {
    /// A fee is only worth reporting when its cost is known.
    pub fn from_cost(cost: Option<Decimal>, currency: Option<String>) -> Option<Fee> {
        cost.map(|cost| Fee {
            cost: Some(cost),
            currency,
            rate: None,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Trade {
    pub id: Option<String>,
    pub order: Option<String>,
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub taker_or_maker: Option<TakerOrMaker>,
    pub price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub fee: Option<Fee>,
}

impl Trade {
    /// Fill `cost` from `price × amount` when the exchange did not report it.
    pub fn derive(mut self) -> Self {
        if self.cost.is_none() {
            if let (Some(price), Some(amount)) = (self.price, self.amount) {
                self.cost = price.checked_mul(amount);
            }
        }
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub amount: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    pub symbol: Option<String>,
    /// Best (highest) price first.
    pub bids: Vec<PriceLevel>,
    /// Best (lowest) price first.
    pub asks: Vec<PriceLevel>,
    pub timestamp: Option<i64>,
    pub nonce: Option<i64>,
}

impl OrderBook {
    pub fn new(
        symbol: Option<String>,
        mut bids: Vec<PriceLevel>,
        mut asks: Vec<PriceLevel>,
        timestamp: Option<i64>,
        nonce: Option<i64>,
    ) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        OrderBook {
            symbol,
            bids,
            asks,
            timestamp,
            nonce,
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn is_sorted(&self) -> bool {
        self.bids.windows(2).all(|w| w[0].price >= w[1].price)
            && self.asks.windows(2).all(|w| w[0].price <= w[1].price)
    }
}
