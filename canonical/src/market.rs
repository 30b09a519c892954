//! Market definitions and the load-once, swap-on-reload market table.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use unify_core::fixed_point::{self, Scale};
use unify_core::precision;
use unify_core::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    Swap,
    Future,
    Option,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct MinMax {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Limits {
    #[serde(default)]
    pub amount: MinMax,
    #[serde(default)]
    pub price: MinMax,
    #[serde(default)]
    pub cost: MinMax,
}

/// Smallest increments a price or amount may move by.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    pub amount: Decimal,
    pub price: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointScales {
    pub price: Scale,
    pub value: Scale,
    pub ratio: Scale,
}

/// How numeric fields for a market travel on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericEncoding {
    #[default]
    Decimal,
    FixedPoint(FixedPointScales),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Market {
    pub id: String,
    pub symbol: String,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub settle: Option<String>,
    #[serde(default)]
    pub base_id: Option<String>,
    #[serde(default)]
    pub quote_id: Option<String>,
    #[serde(default)]
    pub settle_id: Option<String>,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    #[serde(default)]
    pub active: Option<bool>,
    pub precision: Precision,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub linear: Option<bool>,
    #[serde(default)]
    pub inverse: Option<bool>,
    #[serde(default)]
    pub contract_size: Option<Decimal>,
    #[serde(default)]
    pub taker: Option<Decimal>,
    #[serde(default)]
    pub maker: Option<Decimal>,
    #[serde(default)]
    pub encoding: NumericEncoding,
}

impl Market {
    /// `BASE/QUOTE`, or `BASE/QUOTE:SETTLE` for derivatives.
    pub fn symbol_for(base: &str, quote: &str, settle: Option<&str>) -> String {
        match settle {
            Some(settle) => format!("{base}/{quote}:{settle}"),
            None => format!("{base}/{quote}"),
        }
    }

    pub fn is_spot(&self) -> bool {
        self.market_type == MarketType::Spot
    }

    pub fn is_contract(&self) -> bool {
        !self.is_spot()
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() || self.id.is_empty() {
            return Err(Error::ExchangeError(format!(
                "market {:?} has an empty id or symbol",
                self.id
            )));
        }
        if self.precision.price <= Decimal::ZERO || self.precision.amount <= Decimal::ZERO {
            return Err(Error::ExchangeError(format!(
                "{} precision must be positive increments",
                self.symbol
            )));
        }
        Ok(())
    }

    pub fn price_to_precision(&self, price: Decimal) -> Result<Decimal> {
        precision::price_to_precision(price, self.precision.price)
    }

    pub fn amount_to_precision(&self, amount: Decimal) -> Result<Decimal> {
        precision::amount_to_precision(amount, self.precision.amount)
    }

    /// Quote notionals share the price grid.
    pub fn cost_to_precision(&self, cost: Decimal) -> Result<Decimal> {
        precision::cost_to_precision(cost, self.precision.price)
    }

    pub fn scales(&self) -> Result<FixedPointScales> {
        match self.encoding {
            NumericEncoding::FixedPoint(scales) => Ok(scales),
            NumericEncoding::Decimal => Err(Error::BadRequest(format!(
                "{} does not use fixed-point encoding",
                self.symbol
            ))),
        }
    }

    pub fn to_ep(&self, price: Decimal) -> Result<i64> {
        fixed_point::encode(price, self.scales()?.price)
    }

    pub fn to_ev(&self, value: Decimal) -> Result<i64> {
        fixed_point::encode(value, self.scales()?.value)
    }

    pub fn from_ep(&self, raw: &str) -> Option<Decimal> {
        let scales = self.scales().ok()?;
        fixed_point::decode_str(raw, scales.price)
    }

    pub fn from_ev(&self, raw: &str) -> Option<Decimal> {
        let scales = self.scales().ok()?;
        fixed_point::decode_str(raw, scales.value)
    }

    pub fn from_er(&self, raw: &str) -> Option<Decimal> {
        let scales = self.scales().ok()?;
        fixed_point::decode_str(raw, scales.ratio)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Currency {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub precision: Option<Decimal>,
    /// Fixed-point exponent for value fields denominated in this currency.
    #[serde(default)]
    pub value_scale: Option<Scale>,
}

impl Currency {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Currency {
            id: id.into(),
            code: code.into(),
            precision: None,
            value_scale: None,
        }
    }

    /// Decode a value field; unset when the currency has no known scale.
    pub fn from_ev(&self, raw: &str) -> Option<Decimal> {
        fixed_point::decode_str(raw, self.value_scale?)
    }
}

/// Separators that join base and quote in ids such as `btc_usdt` or `BTC-USDT`.
pub const SYMBOL_DELIMITERS: &[char] = &['_', '-'];

/// Reconstruct `BASE/QUOTE` from a raw id such as `btc_usdt` or `BTC-USDT`.
pub fn split_symbol(raw: &str) -> Option<String> {
    split_symbol_on(raw, SYMBOL_DELIMITERS)
}

/// Like [`split_symbol`], trying only `delimiters`. An empty list never splits.
pub fn split_symbol_on(raw: &str, delimiters: &[char]) -> Option<String> {
    delimiters.iter().find_map(|delim| {
        let mut parts = raw.split(*delim);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => Some(
                format!("{}/{}", base.to_ascii_uppercase(), quote.to_ascii_uppercase()),
            ),
            _ => None,
        }
    })
}

/// Markets and currencies of one exchange, indexed by symbol and id.
#[derive(Debug, Default)]
pub struct MarketTable {
    markets: Vec<Arc<Market>>,
    by_symbol: HashMap<String, Arc<Market>>,
    by_id: HashMap<String, Arc<Market>>,
    currencies: BTreeMap<String, Currency>,
    currency_codes: HashMap<String, String>,
}

#[derive(Deserialize)]
struct MarketFile {
    #[serde(default)]
    markets: Vec<Market>,
    #[serde(default)]
    currencies: Vec<Currency>,
}

impl MarketTable {
    pub fn new(markets: Vec<Market>, currencies: Vec<Currency>) -> Result<Self> {
        let mut table = MarketTable::default();
        for currency in currencies {
            table.add_currency(currency);
        }
        for market in markets {
            market.validate()?;
            if table.by_symbol.contains_key(&market.symbol) {
                return Err(Error::ExchangeError(format!(
                    "duplicate market symbol {}",
                    market.symbol
                )));
            }
            let implied = [
                (market.base_id.as_deref(), Some(market.base.as_str())),
                (market.quote_id.as_deref(), Some(market.quote.as_str())),
                (market.settle_id.as_deref(), market.settle.as_deref()),
            ];
            for (id, code) in implied {
                if let Some(code) = code {
                    if !table.currencies.contains_key(code) {
                        table.add_currency(Currency::new(id.unwrap_or(code), code));
                    }
                }
            }
            let market = Arc::new(market);
            if table.by_id.contains_key(&market.id) {
                warn!(id = %market.id, symbol = %market.symbol, "market id already indexed");
            } else {
                table.by_id.insert(market.id.clone(), market.clone());
            }
            table.by_symbol.insert(market.symbol.clone(), market.clone());
            table.markets.push(market);
        }
        Ok(table)
    }

    fn add_currency(&mut self, currency: Currency) {
        self.currency_codes
            .insert(currency.id.clone(), currency.code.clone());
        self.currencies.insert(currency.code.clone(), currency);
    }

    /// Load a table previously written as JSON or TOML
    /// (`markets = [...]`, `currencies = [...]`).
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let buf = fs::read_to_string(path)?;
        if buf.trim().is_empty() {
            return Ok(MarketTable::default());
        }

        // Try JSON first, then TOML
        let file: MarketFile = if let Ok(v) = serde_json::from_str(&buf) {
            v
        } else {
            toml::from_str(&buf)?
        };
        Ok(MarketTable::new(file.markets, file.currencies)?)
    }

    pub fn market(&self, symbol: &str) -> Result<Arc<Market>> {
        self.by_symbol
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::BadRequest(format!("unknown market symbol {symbol}")))
    }

    pub fn market_by_id(&self, id: &str) -> Option<Arc<Market>> {
        self.by_id.get(id).cloned()
    }

    pub fn safe_market(&self, id: Option<&str>) -> Option<Arc<Market>> {
        id.and_then(|id| self.market_by_id(id))
    }

    /// Unified symbol for a raw id. Never fails: unknown ids fall back to
    /// delimiter splitting, and unsplittable ids yield `None`.
    pub fn safe_symbol(&self, id: Option<&str>) -> Option<String> {
        self.safe_symbol_with(id, SYMBOL_DELIMITERS)
    }

    /// [`safe_symbol`](Self::safe_symbol) for exchanges whose ids use their
    /// own separators. With no delimiters an unknown id stays unset.
    pub fn safe_symbol_with(&self, id: Option<&str>, delimiters: &[char]) -> Option<String> {
        let id = id?;
        match self.by_id.get(id) {
            Some(market) => Some(market.symbol.clone()),
            None => split_symbol_on(id, delimiters),
        }
    }

    pub fn currency_code(&self, id: &str) -> String {
        self.currency_codes
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_ascii_uppercase())
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(code)
    }

    pub fn currency_by_id(&self, id: &str) -> Option<&Currency> {
        self.currency_codes
            .get(id)
            .and_then(|code| self.currencies.get(code))
    }

    pub fn markets(&self) -> impl Iterator<Item = &Arc<Market>> {
        self.markets.iter()
    }

    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.markets.iter().map(|m| m.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Shared handle to the current market table.
///
/// Readers take a [`snapshot`](MarketCache::snapshot) and keep using it
/// for the whole call; a reload swaps in a new table without touching
/// snapshots already handed out.
#[derive(Debug, Default)]
pub struct MarketCache {
    current: ArcSwap<MarketTable>,
    generation: AtomicU64,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<MarketTable> {
        self.current.load_full()
    }

    /// Install `table` and return the one it replaced.
    pub fn replace(&self, table: MarketTable) -> Arc<MarketTable> {
        let previous = self.current.swap(Arc::new(table));
        self.generation.fetch_add(1, Ordering::SeqCst);
        previous
    }

    pub fn is_loaded(&self) -> bool {
        self.generation() > 0
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
