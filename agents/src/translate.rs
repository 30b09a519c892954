//! Classification of exchange failures into the unified error taxonomy.

use unify_core::{Error, ErrorKind};

/// Static code and message tables of one exchange.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTable {
    /// Exact error codes or full messages.
    pub exact: &'static [(&'static str, ErrorKind)],
    /// Message fragments, tried in order.
    pub broad: &'static [(&'static str, ErrorKind)],
}

impl ErrorTable {
    pub fn exact(&self, key: &str) -> Option<ErrorKind> {
        self.exact
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
    }

    pub fn broad(&self, message: &str) -> Option<ErrorKind> {
        self.broad
            .iter()
            .find(|(fragment, _)| message.contains(fragment))
            .map(|(_, kind)| *kind)
    }

    /// Exact keys are tried first, in the order given, then the message is
    /// matched against the broad table. Anything else is a generic
    /// `ExchangeError` carrying `feedback`.
    pub fn classify(&self, exact_keys: &[&str], message: Option<&str>, feedback: String) -> Error {
        let kind = exact_keys
            .iter()
            .filter(|k| !k.is_empty())
            .find_map(|k| self.exact(k))
            .or_else(|| message.and_then(|m| self.broad(m)))
            .unwrap_or(ErrorKind::ExchangeError);
        kind.with_message(feedback)
    }
}

/// Fallback for non-2xx responses whose body carried no recognizable
/// business error.
pub fn http_status_kind(status: u16) -> Option<ErrorKind> {
    let kind = match status {
        200..=399 => return None,
        401 | 407 | 511 => ErrorKind::AuthenticationError,
        418 => ErrorKind::DDoSProtection,
        429 => ErrorKind::RateLimitExceeded,
        422 => ErrorKind::ExchangeError,
        400 | 403 | 404 | 405 | 408 | 409 | 410 | 451 => ErrorKind::ExchangeNotAvailable,
        500..=599 => ErrorKind::ExchangeNotAvailable,
        _ => ErrorKind::ExchangeError,
    };
    Some(kind)
}

pub fn http_status_error(exchange: &str, status: u16, raw: &str) -> Option<Error> {
    http_status_kind(status).map(|kind| kind.with_message(format!("{exchange} {status} {raw}")))
}
