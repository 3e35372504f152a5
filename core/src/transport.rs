//! Transfer-library seam.
//!
//! # Design
//! `Transport` separates "describe the request" from "perform the I/O":
//! the executor prepares a [`PreparedRequest`] and the transport performs
//! exactly one blocking transfer, returning the raw wire response (status
//! line + headers + body) so that [`HttpResponse`](crate::HttpResponse)
//! owns all parsing. Tests substitute a scripted transport; production
//! code uses [`UreqTransport`].

use log::{debug, trace};
use ureq::http::Request;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::connection::Connection;
use crate::error::Error;

/// One fully-resolved request, ready for the wire. Headers accumulated
/// before `open` live in the transport; `headers` here carries only the
/// per-request extras the executor computes (`Content-Type`, `Cookie`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// A native transfer handle: opened against a connection, performs one
/// blocking request per `send`, released by `close`.
pub trait Transport {
    /// Acquire the handle. `header_lines` are the `Name: Value` lines
    /// accumulated on the executor before `open` and apply to every
    /// request sent through this handle.
    fn open(&mut self, connection: &Connection, header_lines: &[String]) -> Result<(), Error>;

    /// Perform one blocking transfer and return the raw response bytes.
    fn send(&mut self, request: &PreparedRequest) -> Result<Vec<u8>, Error>;

    /// Release the handle. Idempotent.
    fn close(&mut self);
}

/// Blocking transport over a `ureq` agent.
///
/// The agent is built at `open` time: timeouts copied from the connection
/// when present, redirects not followed (3xx responses come back as data),
/// non-2xx statuses reported as responses rather than errors, and TLS peer
/// verification disabled only when the connection opts out.
#[derive(Default)]
pub struct UreqTransport {
    agent: Option<Agent>,
    header_lines: Vec<String>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for UreqTransport {
    fn open(&mut self, connection: &Connection, header_lines: &[String]) -> Result<(), Error> {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false);

        if let Some(timeout) = connection.timeout() {
            config = config.timeout_global(Some(timeout));
        }
        if let Some(timeout) = connection.connection_timeout() {
            config = config.timeout_connect(Some(timeout));
        }
        if !connection.verify_peer() {
            config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
        }

        self.agent = Some(config.build().new_agent());
        self.header_lines = header_lines.to_vec();
        trace!("transport opened for {}", connection.host_name());
        Ok(())
    }

    fn send(&mut self, request: &PreparedRequest) -> Result<Vec<u8>, Error> {
        let agent = self.agent.as_ref().ok_or(Error::NotOpen)?;

        let mut builder = Request::builder()
            .method(request.method)
            .uri(request.url.as_str());
        for line in &self.header_lines {
            if let Some((name, value)) = line.split_once(": ") {
                builder = builder.header(name, value);
            }
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("{} {}", request.method, request.url);
        let result = match &request.body {
            Some(bytes) => {
                let req = builder
                    .body(bytes.as_slice())
                    .map_err(|e| request_error(&e))?;
                agent.run(req)
            }
            None => {
                let req = builder.body(()).map_err(|e| request_error(&e))?;
                agent.run(req)
            }
        };
        let mut response = result.map_err(transport_error)?;

        // Reassemble the wire form: the executor's response parser owns
        // status/header/body splitting for every transport alike.
        let mut raw = Vec::new();
        let status = response.status();
        let version = version_str(response.version());
        raw.extend_from_slice(version.as_bytes());
        raw.extend_from_slice(format!(" {}", status.as_u16()).as_bytes());
        if let Some(reason) = status.canonical_reason() {
            raw.extend_from_slice(b" ");
            raw.extend_from_slice(reason.as_bytes());
        }
        raw.extend_from_slice(b"\r\n");
        for (name, value) in response.headers() {
            raw.extend_from_slice(name.as_str().as_bytes());
            raw.extend_from_slice(b": ");
            raw.extend_from_slice(value.as_bytes());
            raw.extend_from_slice(b"\r\n");
        }
        raw.extend_from_slice(b"\r\n");

        let body = response.body_mut().read_to_vec().map_err(|e| Error::Transport {
            kind: "body".to_string(),
            message: e.to_string(),
        })?;
        raw.extend_from_slice(&body);

        Ok(raw)
    }

    fn close(&mut self) {
        if self.agent.take().is_some() {
            trace!("transport closed");
        }
        self.header_lines.clear();
    }
}

fn request_error(err: &ureq::http::Error) -> Error {
    Error::Transport {
        kind: "request".to_string(),
        message: err.to_string(),
    }
}

fn transport_error(err: ureq::Error) -> Error {
    let kind = match &err {
        ureq::Error::Timeout(_) => "timeout",
        ureq::Error::HostNotFound => "dns",
        ureq::Error::ConnectionFailed => "connect",
        ureq::Error::Io(_) => "io",
        _ => "transport",
    };
    Error::Transport {
        kind: kind.to_string(),
        message: err.to_string(),
    }
}

fn version_str(version: ureq::http::Version) -> &'static str {
    use ureq::http::Version;
    if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_2 {
        "HTTP/2"
    } else if version == Version::HTTP_3 {
        "HTTP/3"
    } else if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else {
        "HTTP/1.1"
    }
}
