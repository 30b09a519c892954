use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use exchange_unify::agents::{Call, ExchangeAdapter, Scope};
use exchange_unify::core::config::ExchangeConfig;
use exchange_unify::core::json::parse_body;
use exchange_unify::{Exchange, MarketTable};

const MARKETS: &str = r#"{"symbols":[{"symbol":"BTCUSDT","status":"ENABLED","baseAsset":"BTC","baseAssetPrecision":6,"quoteAsset":"USDT","quoteAssetPrecision":2,"isSpotTradingAllowed":true,"baseSizePrecision":"0.000001","quoteAmountPrecision":"5"}]}"#;

const TICKERS: &str = r#"[{"symbol":"BTCUSDT","priceChange":"1000","priceChangePercent":"0.0345","prevClosePrice":"29000","lastPrice":"30000","bidPrice":"29999","bidQty":"1.2","askPrice":"30001","askQty":"0.8","openPrice":"29000","highPrice":"31000","lowPrice":"28500","volume":"1234.5","quoteVolume":"37035000","openTime":1689913600000,"closeTime":1690000000000}]"#;

fn bench_json_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parse");
    group.throughput(Throughput::Bytes(TICKERS.len() as u64));
    group.bench_function("simd_json", |b| {
        b.iter(|| parse_body(TICKERS.as_bytes()).unwrap())
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(TICKERS).unwrap())
    });
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let exchange = Exchange::from_config(ExchangeConfig::new("mexc")).unwrap();
    let markets = exchange
        .parse_markets(Scope::Spot, &parse_body(MARKETS.as_bytes()).unwrap())
        .unwrap();
    let table = MarketTable::new(markets, vec![]).unwrap();
    let body = parse_body(TICKERS.as_bytes()).unwrap();
    let call = Call::FetchTickers { symbols: None };
    c.bench_function("normalize_tickers", |b| {
        b.iter(|| exchange.normalize_response(&call, &body, &table).unwrap())
    });
}

criterion_group!(benches, bench_json_parse, bench_normalize);
criterion_main!(benches);
