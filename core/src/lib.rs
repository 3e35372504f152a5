//! Blocking HTTP request executor over a pluggable transfer library.
//!
//! # Overview
//! [`RequestExecutor`] owns a transport handle, accumulates headers,
//! parameters, and an optional raw body, and performs one blocking
//! request/response cycle at a time against a configured [`Connection`].
//! Authentication and cookie handling are pluggable capabilities
//! ([`Authenticator`], [`CookieManager`]) the executor delegates to but
//! never implements itself.
//!
//! # Design
//! - Fully synchronous: `execute` blocks until the transfer completes or
//!   times out. One executor, one transport handle, one response at a time.
//! - The [`Transport`] trait is the I/O seam: `ureq` in production,
//!   scripted transports in tests. It returns raw wire bytes so
//!   [`HttpResponse`] owns all parsing.
//! - HTTP status is data, not an error: `execute` reports `status < 400`
//!   as its boolean outcome, while DNS/connect/TLS/timeout failures surface
//!   as [`Error::Transport`].
//! - TLS peer verification is on unless the connection opts out.

pub mod auth;
pub mod connection;
pub mod cookie;
pub mod error;
pub mod executor;
pub mod method;
pub mod response;
pub mod transport;

pub use auth::{Authenticator, BasicAuthenticator, BearerAuthenticator};
pub use connection::Connection;
pub use cookie::{CookieManager, InMemoryCookieManager};
pub use error::Error;
pub use executor::RequestExecutor;
pub use method::Method;
pub use response::HttpResponse;
pub use transport::{PreparedRequest, Transport, UreqTransport};
