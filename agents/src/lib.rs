//! Exchange adapters behind one unified interface: endpoint tables, request
//! builders, response normalizers and error translation, plus the async
//! client that drives them through a caller-supplied transport.

pub mod adapter;
pub mod client;
pub mod endpoint;
pub mod registry;
pub mod request;
pub mod translate;

pub use adapter::{ExchangeAdapter, Normalized};
pub use client::{RawResponse, Signer, Transport, UnifiedClient, Unsigned};
pub use endpoint::{Endpoint, Method, Scope};
pub use registry::{Exchange, SUPPORTED_EXCHANGES};
pub use request::{Call, HttpRequest, OrderRequest, Placement};
