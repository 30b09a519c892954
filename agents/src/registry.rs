use serde_json::Value;

use canonical::{
    Balances, Currency, Market, MarketTable, Order, OrderBook, Ticker, Trade, Transaction,
    TransactionType,
};
use unify_core::config::ExchangeConfig;
use unify_core::{Error, Result};

use crate::adapter::bitget::{self, Bitget};
use crate::adapter::lbank::{self, Lbank};
use crate::adapter::mexc::{self, Mexc};
use crate::adapter::ndax::{self, Ndax};
use crate::adapter::phemex::{self, Phemex};
use crate::adapter::{ExchangeAdapter, Normalized};
use crate::endpoint::{Endpoint, Scope};
use crate::request::{Call, HttpRequest};

pub const SUPPORTED_EXCHANGES: &[&str] = &[bitget::ID, lbank::ID, mexc::ID, ndax::ID, phemex::ID];

/// One of the supported exchanges, chosen by configuration id.
pub enum Exchange {
    Bitget(Bitget),
    Lbank(Lbank),
    Mexc(Mexc),
    Ndax(Ndax),
    Phemex(Phemex),
}

impl Exchange {
    pub fn from_config(config: ExchangeConfig) -> Result<Self> {
        let id = config.id.to_ascii_lowercase();
        let exchange = match id.as_str() {
            bitget::ID => Exchange::Bitget(Bitget::new(config)),
            lbank::ID | "lbank2" => Exchange::Lbank(Lbank::new(config)),
            mexc::ID => Exchange::Mexc(Mexc::new(config)),
            ndax::ID => Exchange::Ndax(Ndax::new(config)),
            phemex::ID => Exchange::Phemex(Phemex::new(config)),
            other => {
                return Err(Error::BadRequest(format!(
                    "unsupported exchange {other}, expected one of {}",
                    SUPPORTED_EXCHANGES.join(", ")
                )))
            }
        };
        Ok(exchange)
    }

    fn inner(&self) -> &dyn ExchangeAdapter {
        match self {
            Exchange::Bitget(a) => a,
            Exchange::Lbank(a) => a,
            Exchange::Mexc(a) => a,
            Exchange::Ndax(a) => a,
            Exchange::Phemex(a) => a,
        }
    }
}

impl ExchangeAdapter for Exchange {
    fn id(&self) -> &'static str {
        self.inner().id()
    }

    fn config(&self) -> &ExchangeConfig {
        self.inner().config()
    }

    fn endpoints(&self) -> &'static [Endpoint] {
        self.inner().endpoints()
    }

    fn market_scopes(&self) -> &'static [Scope] {
        self.inner().market_scopes()
    }

    fn symbol_delimiters(&self) -> &'static [char] {
        self.inner().symbol_delimiters()
    }

    fn build_request(&self, call: &Call, markets: &MarketTable) -> Result<HttpRequest> {
        self.inner().build_request(call, markets)
    }

    fn translate_error(&self, status: u16, body: Option<&Value>, raw: &str) -> Option<Error> {
        self.inner().translate_error(status, body, raw)
    }

    fn payload<'a>(&self, body: &'a Value) -> &'a Value {
        self.inner().payload(body)
    }

    fn parse_markets(&self, scope: Scope, payload: &Value) -> Result<Vec<Market>> {
        self.inner().parse_markets(scope, payload)
    }

    fn parse_currencies(&self, payload: &Value) -> Vec<Currency> {
        self.inner().parse_currencies(payload)
    }

    fn parse_ticker(&self, raw: &Value, markets: &MarketTable) -> Ticker {
        self.inner().parse_ticker(raw, markets)
    }

    fn parse_tickers(&self, payload: &Value, markets: &MarketTable) -> Vec<Ticker> {
        self.inner().parse_tickers(payload, markets)
    }

    fn parse_order_book(
        &self,
        payload: &Value,
        symbol: &str,
        markets: &MarketTable,
    ) -> Result<OrderBook> {
        self.inner().parse_order_book(payload, symbol, markets)
    }

    fn parse_trade(&self, raw: &Value, markets: &MarketTable) -> Trade {
        self.inner().parse_trade(raw, markets)
    }

    fn parse_trades(&self, payload: &Value, markets: &MarketTable) -> Vec<Trade> {
        self.inner().parse_trades(payload, markets)
    }

    fn parse_order(&self, raw: &Value, markets: &MarketTable) -> Order {
        self.inner().parse_order(raw, markets)
    }

    fn parse_orders(&self, payload: &Value, markets: &MarketTable) -> Vec<Order> {
        self.inner().parse_orders(payload, markets)
    }

    fn parse_balance(&self, payload: &Value, markets: &MarketTable) -> Balances {
        self.inner().parse_balance(payload, markets)
    }

    fn parse_transaction(
        &self,
        raw: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Transaction {
        self.inner().parse_transaction(raw, kind, markets)
    }

    fn parse_transactions(
        &self,
        payload: &Value,
        kind: Option<TransactionType>,
        markets: &MarketTable,
    ) -> Vec<Transaction> {
        self.inner().parse_transactions(payload, kind, markets)
    }

    fn normalize_response(
        &self,
        call: &Call,
        body: &Value,
        markets: &MarketTable,
    ) -> Result<Normalized> {
        self.inner().normalize_response(call, body, markets)
    }
}
