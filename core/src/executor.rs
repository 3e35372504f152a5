//! The request executor: one blocking HTTP call at a time.
//!
//! # Design
//! `RequestExecutor` accumulates headers, parameters, and an optional raw
//! body, then performs exactly one blocking transfer per `execute` against
//! the connection it was opened with. Headers are keyed case-insensitively
//! with the original casing preserved, and are serialized into the
//! transport when `open` runs — headers added afterwards apply on the next
//! `open`. One response exists at a time; each `execute` replaces it.
//!
//! Body and parameters are independent channels: for POST/PUT a non-empty
//! raw body is sent as-is and any parameters move to the query string;
//! without a body the parameters are form-encoded as the payload. All
//! other verbs carry parameters in the query string only.

use std::sync::Arc;

use log::debug;
use url::form_urlencoded;

use crate::auth::Authenticator;
use crate::connection::Connection;
use crate::error::Error;
use crate::method::Method;
use crate::response::HttpResponse;
use crate::transport::{PreparedRequest, Transport, UreqTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Stored header: case-insensitive key plus the original-case name.
#[derive(Debug, Clone)]
struct HeaderEntry {
    key: String,
    name: String,
    value: String,
}

/// Performs one HTTP request/response cycle against an open connection.
///
/// Lifecycle: `Unopened → Open` via [`open`](Self::open), back via
/// [`close`](Self::close); `execute` is only valid while open and fails
/// with [`Error::NotOpen`] otherwise. Dropping the executor closes it.
pub struct RequestExecutor {
    transport: Box<dyn Transport>,
    connection: Option<Connection>,
    headers: Vec<HeaderEntry>,
    parameters: Vec<(String, String)>,
    body: Option<String>,
    response: Option<HttpResponse>,
}

impl RequestExecutor {
    /// Executor over the default `ureq` transport.
    pub fn new() -> Self {
        Self::with_transport(Box::new(UreqTransport::new()))
    }

    /// Executor over a caller-supplied transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            connection: None,
            headers: Vec::new(),
            parameters: Vec::new(),
            body: None,
            response: None,
        }
    }

    /// Bind the executor to a connection, closing any previously open
    /// transport first. Headers accumulated so far are serialized as
    /// `Name: Value` lines into the transport.
    pub fn open(&mut self, connection: Connection) -> Result<(), Error> {
        self.close();
        let header_lines: Vec<String> = self
            .headers
            .iter()
            .map(|h| format!("{}: {}", h.name, h.value))
            .collect();
        self.transport.open(&connection, &header_lines)?;
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Store a request header, replacing any existing value under the same
    /// case-insensitive key.
    pub fn add_request_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.store_header(name, value, true).map(|_| ())
    }

    /// Store a request header only if no value exists under the same
    /// case-insensitive key. Returns `Ok(false)` when the header was
    /// already present and the call was a no-op.
    pub fn add_request_header_if_unset(&mut self, name: &str, value: &str) -> Result<bool, Error> {
        self.store_header(name, value, false)
    }

    fn store_header(&mut self, name: &str, value: &str, overwrite: bool) -> Result<bool, Error> {
        validate_header(name, value)?;
        let key = name.to_ascii_lowercase();
        match self.headers.iter_mut().find(|h| h.key == key) {
            Some(entry) => {
                if !overwrite {
                    return Ok(false);
                }
                entry.name = name.to_string();
                entry.value = value.to_string();
            }
            None => self.headers.push(HeaderEntry {
                key,
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        Ok(true)
    }

    /// Current value stored for a header, by case-insensitive name.
    pub fn request_header(&self, name: &str) -> Option<&str> {
        let key = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.value.as_str())
    }

    /// Record a query/form parameter. Last write for a name wins;
    /// insertion order is preserved.
    pub fn set_parameter(&mut self, name: &str, value: &str) {
        match self.parameters.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.parameters.push((name.to_string(), value.to_string())),
        }
    }

    /// Record a raw request body. A non-empty body takes precedence over
    /// form-encoded parameters for verbs that send one.
    pub fn set_request_body(&mut self, body: &str) {
        self.body = Some(body.to_string());
    }

    /// Delegate to an authenticator, which mutates this request's headers
    /// or parameters before execution.
    pub fn authenticate(&mut self, authenticator: &dyn Authenticator) -> Result<(), Error> {
        authenticator.authenticate(self)
    }

    /// Perform one blocking request against `connection.uri() + path`.
    ///
    /// Returns `Ok(true)` iff the response status is below 400 — redirects
    /// count as success. Transport-level failures (DNS, connect, TLS,
    /// timeout) surface as [`Error::Transport`] and are never retried.
    pub fn execute(&mut self, path: &str, method: Method) -> Result<bool, Error> {
        let Some(connection) = self.connection.as_ref() else {
            return Err(Error::NotOpen);
        };

        let query = if self.parameters.is_empty() {
            None
        } else {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (name, value) in &self.parameters {
                serializer.append_pair(name, value);
            }
            Some(serializer.finish())
        };

        let mut url = format!("{}{}", connection.uri(), path);
        let mut extra_headers: Vec<(String, String)> = Vec::new();

        let body = self.body.as_ref().filter(|b| !b.is_empty());
        let payload = if method.policy().sends_body {
            match body {
                // Raw body wins; parameters move to the query string.
                Some(raw) => {
                    if let Some(q) = &query {
                        url.push('?');
                        url.push_str(q);
                    }
                    Some(raw.clone().into_bytes())
                }
                None => match &query {
                    Some(q) => {
                        if self.request_header("content-type").is_none() {
                            extra_headers
                                .push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                        }
                        Some(q.clone().into_bytes())
                    }
                    None => Some(Vec::new()),
                },
            }
        } else {
            if let Some(q) = &query {
                url.push('?');
                url.push_str(q);
            }
            None
        };

        let host = connection.host_name().to_string();
        let cookie_manager = connection.cookie_manager().map(Arc::clone);
        if let Some(manager) = &cookie_manager {
            if self.request_header("cookie").is_none() {
                if let Some(cookies) = manager.cookie_header(&host) {
                    extra_headers.push(("Cookie".to_string(), cookies));
                }
            }
        }

        let prepared = PreparedRequest {
            method: method.as_str(),
            url,
            headers: extra_headers,
            body: payload,
        };

        let raw = self.transport.send(&prepared)?;
        let response = HttpResponse::from_raw(&raw)?;

        if let Some(manager) = &cookie_manager {
            for value in response.header_values("set-cookie") {
                manager.set_cookie(value, &host);
            }
        }

        let ok = response.status_code() < 400;
        debug!("{} {} -> {}", prepared.method, prepared.url, response.status_code());
        self.response = Some(response);
        Ok(ok)
    }

    /// Parse `verb` and execute. Verbs outside the supported set fail with
    /// [`Error::UnsupportedMethod`] before any network I/O.
    pub fn execute_verb(&mut self, path: &str, verb: &str) -> Result<bool, Error> {
        let method: Method = verb.parse()?;
        self.execute(path, method)
    }

    /// The most recent response, if any execution has happened.
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Release the transport. Safe to call repeatedly; also runs on drop.
    pub fn close(&mut self) {
        if self.connection.take().is_some() {
            self.transport.close();
        }
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestExecutor {
    fn drop(&mut self) {
        self.close();
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("header name is empty".to_string()));
    }
    if name.chars().any(|c| c == ':' || c == ' ' || c.is_control()) {
        return Err(Error::InvalidArgument(format!("invalid header name: {name:?}")));
    }
    if value.chars().any(|c| c == '\r' || c == '\n') {
        return Err(Error::InvalidArgument(format!(
            "header value for {name:?} contains line breaks"
        )));
    }
    Ok(())
}
