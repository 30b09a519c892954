//! One interface over several cryptocurrency exchanges.
//!
//! Callers configure exchanges through [`unify_core::config`], build a
//! [`UnifiedClient`] per exchange with their own [`Transport`], and get
//! markets, tickers, order books, trades, balances, orders and transfers
//! back in one canonical shape.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use agents::ExchangeAdapter;

pub mod logging;

pub use agents::{self, Exchange, Transport, UnifiedClient};
pub use canonical::{self, MarketTable};
pub use unify_core::{self as core, config::Config};

/// Saved market table for `id` under `dir`, JSON preferred over TOML.
pub fn saved_markets(dir: &str, id: &str) -> Result<Option<MarketTable>> {
    for ext in ["json", "toml"] {
        let path = Path::new(dir).join(format!("{id}.{ext}"));
        if path.exists() {
            let path = path.to_string_lossy();
            let table = MarketTable::from_path(&path)
                .with_context(|| format!("loading markets from {path}"))?;
            return Ok(Some(table));
        }
    }
    Ok(None)
}

/// A client for every configured exchange, sharing one transport.
///
/// Exchanges with a saved market table under `markets_dir` start from it;
/// the rest load markets on their first call.
pub fn clients_from_config<T>(cfg: &Config, transport: T) -> Result<Vec<UnifiedClient<T>>>
where
    T: Transport + Clone,
{
    let mut clients = Vec::with_capacity(cfg.exchanges.len());
    for exchange_cfg in &cfg.exchanges {
        let exchange = Exchange::from_config(exchange_cfg.clone())
            .with_context(|| format!("configuring {}", exchange_cfg.id))?;
        let id = exchange.id();
        let mut client = UnifiedClient::new(exchange, transport.clone());
        if let Some(dir) = cfg.markets_dir.as_deref() {
            match saved_markets(dir, id)? {
                Some(table) => {
                    info!(exchange = id, markets = table.len(), "using saved markets");
                    client = client.with_markets(table);
                }
                None => warn!(exchange = id, dir, "no saved markets"),
            }
        }
        clients.push(client);
    }
    Ok(clients)
}
