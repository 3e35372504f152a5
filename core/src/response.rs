//! HTTP response parsed from raw bytes.
//!
//! # Design
//! The transport hands back the full wire response — status line, header
//! block, and body — and all parsing happens here, keeping the executor
//! independent of which transfer library produced the bytes. Repeated
//! header names (`Set-Cookie`) are preserved in order; lookups are
//! case-insensitive per RFC 7230. A parsed response is immutable.

use std::borrow::Cow;

use crate::error::Error;

/// One HTTP response: status line, headers, and body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    version: String,
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Parse raw response bytes (status line + header block + body).
    ///
    /// Accepts CRLF and bare LF line endings. Interim 1xx header blocks
    /// (e.g. `100 Continue`) followed by a final block are skipped, the
    /// way a transfer library that captures headers emits them.
    pub fn from_raw(raw: &[u8]) -> Result<Self, Error> {
        let mut rest = raw;
        loop {
            let (head, body) = split_head(rest)
                .ok_or_else(|| Error::MalformedResponse("no header/body separator".to_string()))?;
            let head = std::str::from_utf8(head)
                .map_err(|_| Error::MalformedResponse("header block is not UTF-8".to_string()))?;

            let mut lines = head.lines();
            let status_line = lines
                .next()
                .ok_or_else(|| Error::MalformedResponse("empty header block".to_string()))?;
            let (version, status, reason) = parse_status_line(status_line)?;

            // An interim 1xx block is followed by the real one.
            if (100..200).contains(&status) && starts_with_status_line(body) {
                rest = body;
                continue;
            }

            let mut headers = Vec::new();
            for line in lines {
                if line.is_empty() {
                    continue;
                }
                let (name, value) = line.split_once(':').ok_or_else(|| {
                    Error::MalformedResponse(format!("header line without colon: {line:?}"))
                })?;
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }

            return Ok(Self {
                version,
                status,
                reason,
                headers,
                body: body.to_vec(),
            });
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether at least one header with this name is present
    /// (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// First value of the named header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of the named header, in the order received.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Split the raw bytes into the header block and the body, consuming the
/// blank line between them.
fn split_head(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(idx) = find(raw, b"\r\n\r\n") {
        return Some((&raw[..idx], &raw[idx + 4..]));
    }
    find(raw, b"\n\n").map(|idx| (&raw[..idx], &raw[idx + 2..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn starts_with_status_line(bytes: &[u8]) -> bool {
    bytes.starts_with(b"HTTP/")
}

fn parse_status_line(line: &str) -> Result<(String, u16, String), Error> {
    let mut parts = line.splitn(3, ' ');
    let version = parts
        .next()
        .filter(|v| v.starts_with("HTTP/"))
        .ok_or_else(|| Error::MalformedResponse(format!("bad status line: {line:?}")))?;
    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| Error::MalformedResponse(format!("bad status code in: {line:?}")))?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Ok((version.to_string(), status, reason))
}
