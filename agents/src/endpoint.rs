//! Static endpoint tables: unified method → verb, path and rate weight.

use std::fmt;

use unify_core::{Error, Result};

/// Unified method names, as exposed identically by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    FetchMarkets,
    FetchTicker,
    FetchTickers,
    FetchOrderBook,
    FetchTrades,
    FetchBalance,
    CreateOrder,
    CancelOrder,
    FetchOrder,
    FetchOpenOrders,
    FetchDeposits,
    FetchWithdrawals,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::FetchMarkets => "fetchMarkets",
            Method::FetchTicker => "fetchTicker",
            Method::FetchTickers => "fetchTickers",
            Method::FetchOrderBook => "fetchOrderBook",
            Method::FetchTrades => "fetchTrades",
            Method::FetchBalance => "fetchBalance",
            Method::CreateOrder => "createOrder",
            Method::CancelOrder => "cancelOrder",
            Method::FetchOrder => "fetchOrder",
            Method::FetchOpenOrders => "fetchOpenOrders",
            Method::FetchDeposits => "fetchDeposits",
            Method::FetchWithdrawals => "fetchWithdrawals",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market family an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Any,
    Spot,
    Swap,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Any => "any",
            Scope::Spot => "spot",
            Scope::Swap => "swap",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    pub scope: Scope,
    pub verb: HttpMethod,
    pub base: &'static str,
    pub path: &'static str,
    pub access: Access,
    pub weight: f64,
}

/// Endpoint serving `method` for `scope`, falling back to a scope-agnostic
/// entry.
pub fn lookup(table: &'static [Endpoint], method: Method, scope: Scope) -> Option<&'static Endpoint> {
    table
        .iter()
        .find(|e| e.method == method && e.scope == scope)
        .or_else(|| table.iter().find(|e| e.method == method && e.scope == Scope::Any))
}

pub fn require(
    exchange: &str,
    table: &'static [Endpoint],
    method: Method,
    scope: Scope,
) -> Result<&'static Endpoint> {
    lookup(table, method, scope).ok_or_else(|| {
        Error::BadRequest(format!(
            "{exchange} {method}() is not supported for {scope} markets"
        ))
    })
}
