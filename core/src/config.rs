use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use simd_json::serde::from_slice;
use std::{collections::HashSet, env, fs};

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***redacted***")
            .field("api_secret", &"***redacted***")
            .field("password", &self.password.as_ref().map(|_| "***redacted***"))
            .finish()
    }
}

/// Market family used when a call does not name a symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultType {
    #[default]
    Spot,
    Swap,
}

impl std::str::FromStr for DefaultType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spot" => Ok(DefaultType::Spot),
            "swap" => Ok(DefaultType::Swap),
            other => Err(anyhow!("unknown default type {other}")),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_oms_id() -> u32 {
    1
}

/// Immutable per-exchange settings handed to an adapter at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    pub id: String,
    #[serde(default)]
    pub default_type: DefaultType,
    /// Reject market buys that carry neither a price nor an explicit cost.
    #[serde(default = "default_true")]
    pub create_market_buy_order_requires_price: bool,
    #[serde(default)]
    pub broker_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_oms_id")]
    pub oms_id: u32,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl ExchangeConfig {
    pub fn new(id: impl Into<String>) -> Self {
        ExchangeConfig {
            id: id.into(),
            default_type: DefaultType::Spot,
            create_market_buy_order_requires_price: true,
            broker_id: None,
            account_id: None,
            oms_id: default_oms_id(),
            credentials: None,
        }
    }

    /// Read `<ID>_*` variables for the exchange `id`.
    pub fn from_env(id: &str) -> Result<Self> {
        let prefix = id.to_ascii_uppercase();
        let var = |name: &str| env::var(format!("{prefix}_{name}")).ok().filter(|v| !v.is_empty());

        let mut cfg = ExchangeConfig::new(id.to_ascii_lowercase());
        if let Some(v) = var("DEFAULT_TYPE") {
            cfg.default_type = v.parse()?;
        }
        if let Some(v) = var("MARKET_BUY_REQUIRES_PRICE") {
            cfg.create_market_buy_order_requires_price = v == "1" || v.eq_ignore_ascii_case("true");
        }
        cfg.broker_id = var("BROKER_ID");
        cfg.account_id = var("ACCOUNT_ID");
        if let Some(v) = var("OMS_ID") {
            cfg.oms_id = v
                .parse::<u32>()
                .with_context(|| format!("parsing {prefix}_OMS_ID"))?;
        }
        cfg.credentials = load_credentials(&prefix)?;
        Ok(cfg)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub exchanges: Vec<ExchangeConfig>,
    #[serde(default)]
    pub markets_dir: Option<String>,
    #[serde(default)]
    pub enable_metrics: bool,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

fn load_credentials(prefix: &str) -> Result<Option<Credentials>> {
    if let (Ok(api_key), Ok(api_secret)) = (
        env::var(format!("{prefix}_API_KEY")),
        env::var(format!("{prefix}_API_SECRET")),
    ) {
        if !api_key.is_empty() && !api_secret.is_empty() {
            let password = env::var(format!("{prefix}_PASSWORD"))
                .ok()
                .filter(|p| !p.is_empty());
            return Ok(Some(Credentials {
                api_key,
                api_secret,
                password,
            }));
        }
    }

    if let Ok(path) = env::var(format!("{prefix}_CREDENTIALS_FILE")) {
        let mut content = fs::read(&path).context("reading credentials file")?;
        let creds: Credentials = from_slice(&mut content).context("parsing credentials file")?;
        if !creds.api_key.is_empty() && !creds.api_secret.is_empty() {
            return Ok(Some(creds));
        }
    }

    Ok(None)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var("UNIFY_CONFIG") {
            Ok(path) if !path.is_empty() => Config::from_file(&path)?,
            _ => {
                let exchanges = env::var("EXCHANGES")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ExchangeConfig::from_env)
                    .collect::<Result<Vec<_>>>()?;
                Config {
                    exchanges,
                    markets_dir: None,
                    enable_metrics: false,
                }
            }
        };

        if let Ok(dir) = env::var("MARKETS_DIR") {
            if !dir.is_empty() {
                cfg.markets_dir = Some(dir);
            }
        }
        if let Ok(v) = env::var("ENABLE_METRICS") {
            cfg.enable_metrics = v == "1" || v.eq_ignore_ascii_case("true");
        }
        for exchange in &mut cfg.exchanges {
            if exchange.credentials.is_none() {
                exchange.credentials = load_credentials(&exchange.id.to_ascii_uppercase())?;
            }
        }
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        toml::from_str(&content).with_context(|| format!("parsing {path}"))
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for exchange in &self.exchanges {
            if exchange.id.trim().is_empty() {
                return Err(anyhow!("exchange id cannot be empty"));
            }
            if !seen.insert(exchange.id.to_ascii_lowercase()) {
                return Err(anyhow!("exchange {} configured twice", exchange.id));
            }
            if let Some(creds) = &exchange.credentials {
                if creds.api_key.is_empty() || creds.api_secret.is_empty() {
                    return Err(anyhow!("{} credentials are incomplete", exchange.id));
                }
            }
        }
        Ok(())
    }

    pub fn exchange(&self, id: &str) -> Option<&ExchangeConfig> {
        self.exchanges.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }
}

pub fn load() -> Result<&'static Config> {
    let cfg = Config::from_env()?;
    cfg.validate()?;
    if cfg.enable_metrics {
        if let Err(e) = crate::metrics::init_exporter() {
            tracing::warn!(error = %e, "metrics exporter not installed");
        }
    }
    Ok(CONFIG.get_or_init(|| cfg))
}

pub fn get() -> Option<&'static Config> {
    CONFIG.get()
}

pub fn metrics_enabled() -> bool {
    CONFIG.get().map(|c| c.enable_metrics).unwrap_or(false)
}
