//! Connection target configuration.
//!
//! # Design
//! `Connection` is read-only from the executor's perspective: it describes
//! where to send requests (host, base URI, timeouts) and which cookie
//! manager, if any, tracks cookies for that host. TLS peer verification is
//! on by default and must be opted out of explicitly with [`Connection::insecure`].

use std::sync::Arc;
use std::time::Duration;

use crate::cookie::CookieManager;

/// Target of a request: host, base URI, timeouts, and cookie policy.
#[derive(Clone)]
pub struct Connection {
    host_name: String,
    uri: String,
    timeout: Option<Duration>,
    connection_timeout: Option<Duration>,
    verify_peer: bool,
    cookie_manager: Option<Arc<dyn CookieManager>>,
}

impl Connection {
    /// Create a connection to `uri`, e.g. `"https://api.example.org"`.
    /// The host name is derived from the URI authority.
    pub fn new(uri: &str) -> Self {
        let uri = uri.trim_end_matches('/').to_string();
        let host_name = host_from_uri(&uri);
        Self {
            host_name,
            uri,
            timeout: None,
            connection_timeout: None,
            verify_peer: true,
            cookie_manager: None,
        }
    }

    /// Overall timeout for one request/response cycle.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Timeout for establishing the connection.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Disable TLS peer verification for this connection.
    pub fn insecure(mut self) -> Self {
        self.verify_peer = false;
        self
    }

    /// Attach a cookie manager. It receives every `Set-Cookie` the server
    /// sends and supplies the `Cookie` header for subsequent requests.
    pub fn with_cookie_manager(mut self, manager: Arc<dyn CookieManager>) -> Self {
        self.cookie_manager = Some(manager);
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn connection_timeout(&self) -> Option<Duration> {
        self.connection_timeout
    }

    pub fn verify_peer(&self) -> bool {
        self.verify_peer
    }

    pub fn cookie_manager(&self) -> Option<&Arc<dyn CookieManager>> {
        self.cookie_manager.as_ref()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("host_name", &self.host_name)
            .field("uri", &self.uri)
            .field("timeout", &self.timeout)
            .field("connection_timeout", &self.connection_timeout)
            .field("verify_peer", &self.verify_peer)
            .field("cookie_manager", &self.cookie_manager.is_some())
            .finish()
    }
}

/// Extract the host (without port) from a URI string.
fn host_from_uri(uri: &str) -> String {
    let after_scheme = match uri.find("://") {
        Some(idx) => &uri[idx + 3..],
        None => uri,
    };
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.split(':').next().unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_host_from_uri() {
        assert_eq!(Connection::new("https://api.example.org/v1").host_name(), "api.example.org");
        assert_eq!(Connection::new("http://127.0.0.1:8080").host_name(), "127.0.0.1");
        assert_eq!(Connection::new("http://user@host.example/x").host_name(), "host.example");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(Connection::new("http://example.org/").uri(), "http://example.org");
    }

    #[test]
    fn verification_is_on_by_default() {
        assert!(Connection::new("https://example.org").verify_peer());
        assert!(!Connection::new("https://example.org").insecure().verify_peer());
    }

    #[test]
    fn timeouts_default_to_absent() {
        let conn = Connection::new("http://example.org");
        assert!(conn.timeout().is_none());
        assert!(conn.connection_timeout().is_none());

        let conn = conn
            .with_timeout(Duration::from_secs(30))
            .with_connection_timeout(Duration::from_secs(5));
        assert_eq!(conn.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(conn.connection_timeout(), Some(Duration::from_secs(5)));
    }
}
