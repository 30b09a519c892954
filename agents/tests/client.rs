use std::sync::Mutex;

use agents::{
    Exchange, HttpRequest, RawResponse, Signer, Transport, UnifiedClient,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{json, Value};
use unify_core::config::ExchangeConfig;
use unify_core::ErrorKind;

type Route = fn(&HttpRequest, usize) -> anyhow::Result<RawResponse>;

/// Answers from a routing function and remembers every request it saw.
struct FakeTransport {
    route: Route,
    sent: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    fn new(route: Route) -> Self {
        FakeTransport {
            route,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn paths(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    fn last(&self) -> HttpRequest {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &HttpRequest) -> anyhow::Result<RawResponse> {
        let index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(request.clone());
            sent.len() - 1
        };
        (self.route)(request, index)
    }
}

struct StampSigner;

impl Signer for StampSigner {
    fn sign(&self, request: &mut HttpRequest, _config: &ExchangeConfig) -> unify_core::Result<()> {
        request.header("X-Test-Signed", "1");
        Ok(())
    }
}

fn instruments(count: usize) -> String {
    let rows = [
        json!({
            "InstrumentId": 1,
            "Product1": 1,
            "Product1Symbol": "BTC",
            "Product2": 3,
            "Product2Symbol": "CAD",
            "QuantityIncrement": 0.0001,
            "PriceIncrement": 1,
            "SessionStatus": "Running"
        }),
        json!({
            "InstrumentId": 2,
            "Product1": 2,
            "Product1Symbol": "ETH",
            "Product2": 3,
            "Product2Symbol": "CAD",
            "QuantityIncrement": 0.001,
            "PriceIncrement": 0.1,
            "SessionStatus": "Running"
        }),
    ];
    Value::Array(rows[..count].to_vec()).to_string()
}

fn ndax_route(request: &HttpRequest, _index: usize) -> anyhow::Result<RawResponse> {
    let body = match request.path.as_str() {
        "/GetInstruments" => instruments(2),
        "/GetLevel1" => {
            let last = match request.param_str("InstrumentId").as_deref() {
                Some("1") => 40000,
                _ => 2500,
            };
            json!({
                "InstrumentId": request.get_param("InstrumentId").cloned(),
                "LastTradedPx": last,
                "TimeStamp": 1690000000000i64
            })
            .to_string()
        }
        "/GetAccountPositions" => {
            json!([{"ProductSymbol": "BTC", "ProductId": 1, "Amount": 2, "Hold": 0.5}]).to_string()
        }
        other => return Err(anyhow!("unexpected path {other}")),
    };
    Ok(RawResponse::ok(body))
}

fn ndax(route: Route) -> UnifiedClient<FakeTransport> {
    let mut config = ExchangeConfig::new("ndax");
    config.account_id = Some("7".into());
    let exchange = Exchange::from_config(config).unwrap();
    UnifiedClient::new(exchange, FakeTransport::new(route))
}

#[tokio::test]
async fn markets_loaded_lazily_once() {
    let client = ndax(ndax_route);
    assert!(client.markets().is_empty());

    let ticker = client.fetch_ticker("BTC/CAD").await.unwrap();
    assert_eq!(ticker.symbol.as_deref(), Some("BTC/CAD"));
    assert_eq!(client.transport().paths(), vec!["/GetInstruments", "/GetLevel1"]);

    client.fetch_ticker("ETH/CAD").await.unwrap();
    assert_eq!(client.transport().paths().len(), 3);
    assert_eq!(client.markets().len(), 2);
}

#[tokio::test]
async fn concurrent_loads_fetch_once() {
    let client = ndax(ndax_route);
    let (a, b) = tokio::join!(client.load_markets(false), client.load_markets(false));
    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
    assert_eq!(client.transport().paths(), vec!["/GetInstruments"]);
}

#[tokio::test]
async fn tickers_fetched_one_by_one_without_batch_endpoint() {
    let client = ndax(ndax_route);
    let tickers = client.fetch_tickers(None).await.unwrap();
    let mut symbols: Vec<String> = tickers.iter().filter_map(|t| t.symbol.clone()).collect();
    symbols.sort();
    assert_eq!(symbols, vec!["BTC/CAD", "ETH/CAD"]);
    let level1 = client
        .transport()
        .paths()
        .iter()
        .filter(|p| p.as_str() == "/GetLevel1")
        .count();
    assert_eq!(level1, 2);
}

#[tokio::test]
async fn reload_leaves_old_snapshot_intact() {
    fn shrinking(request: &HttpRequest, index: usize) -> anyhow::Result<RawResponse> {
        assert_eq!(request.path, "/GetInstruments");
        Ok(RawResponse::ok(instruments(if index == 0 { 2 } else { 1 })))
    }
    let client = ndax(shrinking);
    let before = client.load_markets(false).await.unwrap();
    let after = client.load_markets(true).await.unwrap();
    assert_eq!(before.len(), 2);
    assert_eq!(after.len(), 1);
    assert!(before.market("ETH/CAD").is_ok());
    assert!(client.markets().market("ETH/CAD").is_err());
}

#[tokio::test]
async fn transport_failure_is_exchange_not_available() {
    fn down(_: &HttpRequest, _: usize) -> anyhow::Result<RawResponse> {
        Err(anyhow!("connection reset"))
    }
    let client = ndax(down);
    let err = client.load_markets(false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExchangeNotAvailable);
    assert!(err.message().starts_with("ndax "));
    assert!(err.message().contains("connection reset"));
}

#[tokio::test]
async fn business_error_wins_over_http_status() {
    fn broke(request: &HttpRequest, _: usize) -> anyhow::Result<RawResponse> {
        if request.path == "/GetInstruments" {
            return Ok(RawResponse::ok(instruments(2)));
        }
        Ok(RawResponse {
            status: 500,
            body: json!({"result": false, "errormsg": "Not_Enough_Funds"}).to_string(),
        })
    }
    let client = ndax(broke);
    let err = client.fetch_balance().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
}

#[tokio::test]
async fn rate_limit_status_without_body() {
    fn limited(_: &HttpRequest, _: usize) -> anyhow::Result<RawResponse> {
        Ok(RawResponse {
            status: 429,
            body: "Too Many Requests".into(),
        })
    }
    let client = ndax(limited);
    let err = client.load_markets(false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
}

#[tokio::test]
async fn non_json_success_is_exchange_error() {
    fn garbled(_: &HttpRequest, _: usize) -> anyhow::Result<RawResponse> {
        Ok(RawResponse::ok("<html>maintenance</html>"))
    }
    let client = ndax(garbled);
    let err = client.load_markets(false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExchangeError);
    assert!(err.message().contains("maintenance"));
}

#[tokio::test]
async fn only_private_calls_are_signed() {
    let client = ndax(ndax_route).with_signer(StampSigner);
    let balances = client.fetch_balance().await.unwrap();
    assert_eq!(balances.get("BTC").unwrap().free.map(|f| f.to_string()), Some("1.5".into()));

    let sent = client.transport().sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].headers.is_empty());
    assert_eq!(
        client.transport().last().headers,
        vec![("X-Test-Signed".to_string(), "1".to_string())]
    );
}

#[tokio::test]
async fn saved_markets_skip_the_load() {
    let exchange = Exchange::from_config(ExchangeConfig::new("ndax")).unwrap();
    let markets = {
        let client = ndax(ndax_route);
        client.load_markets(false).await.unwrap()
    };
    let table = canonical::MarketTable::new(
        markets.markets().map(|m| (**m).clone()).collect(),
        markets.currencies().cloned().collect(),
    )
    .unwrap();
    let client = UnifiedClient::new(exchange, FakeTransport::new(ndax_route)).with_markets(table);
    client.fetch_ticker("BTC/CAD").await.unwrap();
    assert_eq!(client.transport().paths(), vec!["/GetLevel1"]);
}

#[tokio::test]
async fn unknown_symbol_is_bad_request() {
    let client = ndax(ndax_route);
    let err = client.fetch_ticker("DOGE/CAD").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}
