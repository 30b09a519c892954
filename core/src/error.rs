use std::fmt;

use thiserror::Error;

/// Closed set of failure kinds shared by every exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("arguments required: {0}")]
    ArgumentsRequired(String),
    #[error("authentication error: {0}")]
    AuthenticationError(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("account suspended: {0}")]
    AccountSuspended(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    #[error("order not found: {0}")]
    OrderNotFound(String),
    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    #[error("ddos protection: {0}")]
    DDoSProtection(String),
    #[error("exchange not available: {0}")]
    ExchangeNotAvailable(String),
    #[error("on maintenance: {0}")]
    OnMaintenance(String),
    #[error("invalid nonce: {0}")]
    InvalidNonce(String),
    #[error("exchange error: {0}")]
    ExchangeError(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Payload-free discriminant of [`Error`], usable in const lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    ArgumentsRequired,
    AuthenticationError,
    PermissionDenied,
    AccountSuspended,
    InsufficientFunds,
    InvalidOrder,
    OrderNotFound,
    RateLimitExceeded,
    DDoSProtection,
    ExchangeNotAvailable,
    OnMaintenance,
    InvalidNonce,
    ExchangeError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 14] = [
        ErrorKind::BadRequest,
        ErrorKind::ArgumentsRequired,
        ErrorKind::AuthenticationError,
        ErrorKind::PermissionDenied,
        ErrorKind::AccountSuspended,
        ErrorKind::InsufficientFunds,
        ErrorKind::InvalidOrder,
        ErrorKind::OrderNotFound,
        ErrorKind::RateLimitExceeded,
        ErrorKind::DDoSProtection,
        ErrorKind::ExchangeNotAvailable,
        ErrorKind::OnMaintenance,
        ErrorKind::InvalidNonce,
        ErrorKind::ExchangeError,
    ];

    pub fn with_message(self, message: impl Into<String>) -> Error {
        let message = message.into();
        match self {
            ErrorKind::BadRequest => Error::BadRequest(message),
            ErrorKind::ArgumentsRequired => Error::ArgumentsRequired(message),
            ErrorKind::AuthenticationError => Error::AuthenticationError(message),
            ErrorKind::PermissionDenied => Error::PermissionDenied(message),
            ErrorKind::AccountSuspended => Error::AccountSuspended(message),
            ErrorKind::InsufficientFunds => Error::InsufficientFunds(message),
            ErrorKind::InvalidOrder => Error::InvalidOrder(message),
            ErrorKind::OrderNotFound => Error::OrderNotFound(message),
            ErrorKind::RateLimitExceeded => Error::RateLimitExceeded(message),
            ErrorKind::DDoSProtection => Error::DDoSProtection(message),
            ErrorKind::ExchangeNotAvailable => Error::ExchangeNotAvailable(message),
            ErrorKind::OnMaintenance => Error::OnMaintenance(message),
            ErrorKind::InvalidNonce => Error::InvalidNonce(message),
            ErrorKind::ExchangeError => Error::ExchangeError(message),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::ArgumentsRequired => "ArgumentsRequired",
            ErrorKind::AuthenticationError => "AuthenticationError",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::AccountSuspended => "AccountSuspended",
            ErrorKind::InsufficientFunds => "InsufficientFunds",
            ErrorKind::InvalidOrder => "InvalidOrder",
            ErrorKind::OrderNotFound => "OrderNotFound",
            ErrorKind::RateLimitExceeded => "RateLimitExceeded",
            ErrorKind::DDoSProtection => "DDoSProtection",
            ErrorKind::ExchangeNotAvailable => "ExchangeNotAvailable",
            ErrorKind::OnMaintenance => "OnMaintenance",
            ErrorKind::InvalidNonce => "InvalidNonce",
            ErrorKind::ExchangeError => "ExchangeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadRequest(_) => ErrorKind::BadRequest,
            Error::ArgumentsRequired(_) => ErrorKind::ArgumentsRequired,
            Error::AuthenticationError(_) => ErrorKind::AuthenticationError,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::AccountSuspended(_) => ErrorKind::AccountSuspended,
            Error::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            Error::InvalidOrder(_) => ErrorKind::InvalidOrder,
            Error::OrderNotFound(_) => ErrorKind::OrderNotFound,
            Error::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            Error::DDoSProtection(_) => ErrorKind::DDoSProtection,
            Error::ExchangeNotAvailable(_) => ErrorKind::ExchangeNotAvailable,
            Error::OnMaintenance(_) => ErrorKind::OnMaintenance,
            Error::InvalidNonce(_) => ErrorKind::InvalidNonce,
            Error::ExchangeError(_) => ErrorKind::ExchangeError,
        }
    }

    /// The message carried by the error, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::BadRequest(m)
            | Error::ArgumentsRequired(m)
            | Error::AuthenticationError(m)
            | Error::PermissionDenied(m)
            | Error::AccountSuspended(m)
            | Error::InsufficientFunds(m)
            | Error::InvalidOrder(m)
            | Error::OrderNotFound(m)
            | Error::RateLimitExceeded(m)
            | Error::DDoSProtection(m)
            | Error::ExchangeNotAvailable(m)
            | Error::OnMaintenance(m)
            | Error::InvalidNonce(m)
            | Error::ExchangeError(m) => m,
        }
    }
}
