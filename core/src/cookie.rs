//! Cookie manager capability.
//!
//! # Design
//! The executor never owns cookie state — it delegates each received
//! `Set-Cookie` line to the connection's cookie manager and asks the
//! manager for a `Cookie` header value before sending. The trait takes
//! `&self` so one manager can be shared across executors; implementations
//! own their interior mutability.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Tracks cookies across requests to a host.
pub trait CookieManager: Send + Sync {
    /// Record one raw `Set-Cookie` header value received from `host`.
    fn set_cookie(&self, set_cookie: &str, host: &str);

    /// Render the `Cookie` header value to send to `host`, if any cookies
    /// are stored for it.
    fn cookie_header(&self, host: &str) -> Option<String>;
}

/// In-memory cookie store, keyed by host.
///
/// Keeps only the `name=value` pair of each `Set-Cookie` line; attributes
/// (`Path`, `Expires`, ...) are ignored. Last write wins per cookie name.
/// Nothing is persisted beyond the life of the manager.
#[derive(Debug, Default)]
pub struct InMemoryCookieManager {
    // host -> ordered (name, value) pairs
    jar: Mutex<HashMap<String, Vec<(String, String)>>>,
}

impl InMemoryCookieManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieManager for InMemoryCookieManager {
    fn set_cookie(&self, set_cookie: &str, host: &str) {
        let pair = set_cookie.split(';').next().unwrap_or("").trim();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() {
            return;
        }

        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let cookies = jar.entry(host.to_string()).or_default();
        match cookies.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => cookies.push((name.to_string(), value.to_string())),
        }
    }

    fn cookie_header(&self, host: &str) -> Option<String> {
        let jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let cookies = jar.get(host)?;
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_name_value_and_drops_attributes() {
        let manager = InMemoryCookieManager::new();
        manager.set_cookie("session=abc123; Path=/; HttpOnly", "example.org");
        assert_eq!(
            manager.cookie_header("example.org").as_deref(),
            Some("session=abc123")
        );
    }

    #[test]
    fn last_write_wins_per_name() {
        let manager = InMemoryCookieManager::new();
        manager.set_cookie("session=old", "example.org");
        manager.set_cookie("lang=en", "example.org");
        manager.set_cookie("session=new", "example.org");
        assert_eq!(
            manager.cookie_header("example.org").as_deref(),
            Some("session=new; lang=en")
        );
    }

    #[test]
    fn hosts_are_isolated() {
        let manager = InMemoryCookieManager::new();
        manager.set_cookie("a=1", "one.example");
        assert!(manager.cookie_header("two.example").is_none());
    }

    #[test]
    fn malformed_set_cookie_is_ignored() {
        let manager = InMemoryCookieManager::new();
        manager.set_cookie("no-equals-sign", "example.org");
        manager.set_cookie("=value-without-name", "example.org");
        assert!(manager.cookie_header("example.org").is_none());
    }
}
