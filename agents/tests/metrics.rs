use agents::{Exchange, HttpRequest, RawResponse, Transport, UnifiedClient};
use async_trait::async_trait;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;
use serial_test::serial;
use unify_core::config::ExchangeConfig;

struct Canned;

#[async_trait]
impl Transport for Canned {
    async fn send(&self, request: &HttpRequest) -> anyhow::Result<RawResponse> {
        let body = match request.path.as_str() {
            "/GetInstruments" => json!([{
                "InstrumentId": 1,
                "Product1": 1,
                "Product1Symbol": "BTC",
                "Product2": 3,
                "Product2Symbol": "CAD",
                "QuantityIncrement": 0.0001,
                "PriceIncrement": 1
            }])
            .to_string(),
            _ => json!({"result": false, "errormsg": "Not_Enough_Funds"}).to_string(),
        };
        Ok(RawResponse::ok(body))
    }
}

fn counter(
    metrics: &[(metrics_util::CompositeKey, Option<metrics::Unit>, Option<metrics::SharedString>, DebugValue)],
    name: &str,
) -> u64 {
    metrics
        .iter()
        .filter(|(k, _, _, _)| k.key().name() == name)
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(n) => *n,
            _ => 0,
        })
        .sum()
}

#[tokio::test]
#[serial]
async fn calls_and_failures_are_counted() {
    // Enable metrics
    std::env::remove_var("UNIFY_CONFIG");
    std::env::set_var("EXCHANGES", "ndax");
    std::env::set_var("ENABLE_METRICS", "1");
    unify_core::config::load().unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let _ = recorder.install();

    let mut config = ExchangeConfig::new("ndax");
    config.account_id = Some("7".into());
    let client = UnifiedClient::new(Exchange::from_config(config).unwrap(), Canned);
    assert!(client.fetch_balance().await.is_err());

    let metrics = snapshotter.snapshot().into_vec();
    assert_eq!(counter(&metrics, "unify_requests_total"), 2);
    assert_eq!(counter(&metrics, "unify_errors_total"), 1);
    assert_eq!(counter(&metrics, "unify_market_reloads_total"), 1);
    assert!(metrics.iter().any(|(k, _, _, _)| {
        k.key().name() == "unify_errors_total"
            && k.key()
                .labels()
                .any(|l| l.key() == "kind" && l.value() == "InsufficientFunds")
    }));
}
