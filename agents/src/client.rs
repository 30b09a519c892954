//! The async front door: one unified call becomes one request through a
//! caller-supplied transport, normalized against a single market snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use canonical::{
    Balances, Currency, Market, MarketCache, MarketTable, Order, OrderBook, Ticker, Trade,
    Transaction,
};
use unify_core::config::ExchangeConfig;
use unify_core::json::parse_body;
use unify_core::metrics::{record_error, record_market_reload, record_request};
use unify_core::{Error, Result};

use crate::adapter::{ExchangeAdapter, Normalized};
use crate::endpoint::{lookup, Access, Method};
use crate::registry::Exchange;
use crate::request::{Call, HttpRequest, OrderRequest};
use crate::translate::http_status_error;

/// Status and raw body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        RawResponse {
            status: 200,
            body: body.into(),
        }
    }
}

/// Executes built requests. Implementations own connection handling,
/// timeouts and TLS.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> anyhow::Result<RawResponse>;
}

/// Adds authentication to private requests before they are sent.
pub trait Signer: Send + Sync {
    fn sign(&self, request: &mut HttpRequest, config: &ExchangeConfig) -> Result<()>;
}

/// Leaves requests untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsigned;

impl Signer for Unsigned {
    fn sign(&self, _request: &mut HttpRequest, _config: &ExchangeConfig) -> Result<()> {
        Ok(())
    }
}

pub struct UnifiedClient<T> {
    exchange: Exchange,
    transport: T,
    signer: Box<dyn Signer>,
    markets: MarketCache,
    load_lock: Mutex<()>,
}

impl<T: Transport> UnifiedClient<T> {
    pub fn new(exchange: Exchange, transport: T) -> Self {
        UnifiedClient {
            exchange,
            transport,
            signer: Box::new(Unsigned),
            markets: MarketCache::new(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn with_signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    /// Start from a previously saved market table instead of fetching one.
    pub fn with_markets(self, table: MarketTable) -> Self {
        self.markets.replace(table);
        self
    }

    pub fn id(&self) -> &'static str {
        self.exchange.id()
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current market table; empty until the first load.
    pub fn markets(&self) -> Arc<MarketTable> {
        self.markets.snapshot()
    }

    /// Fetch every market family and install the result as one table.
    ///
    /// Without `reload` an already loaded table is returned as is.
    /// Concurrent loads are serialized; callers holding the previous
    /// snapshot keep using it.
    pub async fn load_markets(&self, reload: bool) -> Result<Arc<MarketTable>> {
        let _guard = self.load_lock.lock().await;
        if self.markets.is_loaded() && !reload {
            return Ok(self.markets.snapshot());
        }
        let empty = MarketTable::default();
        let mut markets: Vec<Market> = Vec::new();
        let mut currencies: Vec<Currency> = Vec::new();
        for scope in self.exchange.market_scopes() {
            match self.execute(Call::FetchMarkets { scope: *scope }, &empty).await? {
                Normalized::Markets {
                    markets: m,
                    currencies: c,
                } => {
                    markets.extend(m);
                    for currency in c {
                        if !currencies.iter().any(|known| known.id == currency.id) {
                            currencies.push(currency);
                        }
                    }
                }
                other => return Err(unexpected(self.id(), Method::FetchMarkets, &other)),
            }
        }
        let table = MarketTable::new(markets, currencies)?;
        info!(exchange = self.id(), markets = table.len(), "markets loaded");
        self.markets.replace(table);
        record_market_reload(self.id());
        Ok(self.markets.snapshot())
    }

    async fn snapshot(&self) -> Result<Arc<MarketTable>> {
        if self.markets.is_loaded() {
            Ok(self.markets.snapshot())
        } else {
            self.load_markets(false).await
        }
    }

    /// Run one call end to end against `markets`.
    pub async fn execute(&self, call: Call, markets: &MarketTable) -> Result<Normalized> {
        let id = self.id();
        let method = call.method();
        record_request(id, method.as_str());
        let result = self.round_trip(&call, markets).await;
        if let Err(e) = &result {
            record_error(id, e.kind());
            warn!(exchange = id, method = %method, error = %e, "call failed");
        }
        result
    }

    async fn round_trip(&self, call: &Call, markets: &MarketTable) -> Result<Normalized> {
        let id = self.id();
        let mut request = self.exchange.build_request(call, markets)?;
        if request.access == Access::Private {
            self.signer.sign(&mut request, self.exchange.config())?;
        }
        #[cfg(feature = "debug-logs")]
        debug!(exchange = id, url = %request.url(), body = ?request.body(), "sending request");

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| Error::ExchangeNotAvailable(format!("{id} {e}")))?;
        let body = parse_body(response.body.as_bytes());
        if let Some(error) = self
            .exchange
            .translate_error(response.status, body.as_ref(), &response.body)
        {
            return Err(error);
        }
        if let Some(error) = http_status_error(id, response.status, &response.body) {
            return Err(error);
        }
        let body = body.ok_or_else(|| {
            Error::ExchangeError(format!("{id} returned a body that is not JSON: {}", response.body))
        })?;
        debug!(exchange = id, method = %call.method(), "response received");
        self.exchange.normalize_response(call, &body, markets)
    }

    pub async fn fetch_markets(&self) -> Result<Vec<Arc<Market>>> {
        let table = self.load_markets(false).await?;
        Ok(table.markets().cloned().collect())
    }

    pub async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let markets = self.snapshot().await?;
        let call = Call::FetchTicker {
            symbol: symbol.to_string(),
        };
        match self.execute(call, &markets).await? {
            Normalized::Ticker(ticker) => Ok(ticker),
            other => Err(unexpected(self.id(), Method::FetchTicker, &other)),
        }
    }

    /// Tickers for `symbols`, or every market when `None`. Exchanges
    /// without a batch endpoint are queried one symbol at a time.
    pub async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> Result<Vec<Ticker>> {
        let markets = self.snapshot().await?;
        let scope = match symbols.and_then(|s| s.first()) {
            Some(first) => crate::adapter::scope_of(markets.market(first)?.as_ref()),
            None => crate::adapter::default_scope(self.exchange.config()),
        };
        if lookup(self.exchange.endpoints(), Method::FetchTickers, scope).is_none() {
            let wanted: Vec<String> = match symbols {
                Some(symbols) => symbols.iter().map(|s| s.to_string()).collect(),
                None => markets.symbols(),
            };
            debug!(exchange = self.id(), count = wanted.len(), "fetching tickers one by one");
            let calls = wanted.iter().map(|symbol| self.ticker_with(symbol, &markets));
            return try_join_all(calls).await;
        }
        let call = Call::FetchTickers {
            symbols: symbols.map(|s| s.iter().map(|s| s.to_string()).collect()),
        };
        match self.execute(call, &markets).await? {
            Normalized::Tickers(tickers) => Ok(tickers),
            other => Err(unexpected(self.id(), Method::FetchTickers, &other)),
        }
    }

    async fn ticker_with(&self, symbol: &str, markets: &MarketTable) -> Result<Ticker> {
        let call = Call::FetchTicker {
            symbol: symbol.to_string(),
        };
        match self.execute(call, markets).await? {
            Normalized::Ticker(ticker) => Ok(ticker),
            other => Err(unexpected(self.id(), Method::FetchTicker, &other)),
        }
    }

    pub async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook> {
        let markets = self.snapshot().await?;
        let call = Call::FetchOrderBook {
            symbol: symbol.to_string(),
            limit,
        };
        match self.execute(call, &markets).await? {
            Normalized::OrderBook(book) => Ok(book),
            other => Err(unexpected(self.id(), Method::FetchOrderBook, &other)),
        }
    }

    pub async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>> {
        let markets = self.snapshot().await?;
        let call = Call::FetchTrades {
            symbol: symbol.to_string(),
            since,
            limit,
        };
        match self.execute(call, &markets).await? {
            Normalized::Trades(trades) => Ok(trades),
            other => Err(unexpected(self.id(), Method::FetchTrades, &other)),
        }
    }

    pub async fn fetch_balance(&self) -> Result<Balances> {
        let markets = self.snapshot().await?;
        match self.execute(Call::FetchBalance, &markets).await? {
            Normalized::Balance(balances) => Ok(balances),
            other => Err(unexpected(self.id(), Method::FetchBalance, &other)),
        }
    }

    pub async fn create_order(&self, order: OrderRequest) -> Result<Order> {
        let markets = self.snapshot().await?;
        self.order_call(Call::CreateOrder(order), &markets).await
    }

    pub async fn cancel_order(&self, id: &str, symbol: Option<&str>) -> Result<Order> {
        let markets = self.snapshot().await?;
        let call = Call::CancelOrder {
            id: id.to_string(),
            symbol: symbol.map(str::to_string),
        };
        self.order_call(call, &markets).await
    }

    pub async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> Result<Order> {
        let markets = self.snapshot().await?;
        let call = Call::FetchOrder {
            id: id.to_string(),
            symbol: symbol.map(str::to_string),
        };
        self.order_call(call, &markets).await
    }

    async fn order_call(&self, call: Call, markets: &MarketTable) -> Result<Order> {
        let method = call.method();
        match self.execute(call, markets).await? {
            Normalized::Order(order) => Ok(order),
            other => Err(unexpected(self.id(), method, &other)),
        }
    }

    pub async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>> {
        let markets = self.snapshot().await?;
        let call = Call::FetchOpenOrders {
            symbol: symbol.map(str::to_string),
            since,
            limit,
        };
        match self.execute(call, &markets).await? {
            Normalized::Orders(orders) => Ok(orders),
            other => Err(unexpected(self.id(), Method::FetchOpenOrders, &other)),
        }
    }

    pub async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let markets = self.snapshot().await?;
        let call = Call::FetchDeposits {
            code: code.map(str::to_string),
            since,
            limit,
        };
        self.transaction_call(call, &markets).await
    }

    pub async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let markets = self.snapshot().await?;
        let call = Call::FetchWithdrawals {
            code: code.map(str::to_string),
            since,
            limit,
        };
        self.transaction_call(call, &markets).await
    }

    async fn transaction_call(&self, call: Call, markets: &MarketTable) -> Result<Vec<Transaction>> {
        let method = call.method();
        match self.execute(call, markets).await? {
            Normalized::Transactions(transactions) => Ok(transactions),
            other => Err(unexpected(self.id(), method, &other)),
        }
    }
}

fn unexpected(exchange: &str, method: Method, got: &Normalized) -> Error {
    Error::ExchangeError(format!(
        "{exchange} {method}() normalized into an unexpected shape: {got:?}"
    ))
}
