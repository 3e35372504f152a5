//! HTTP verbs supported by the executor.
//!
//! # Design
//! The verb set is closed: anything outside it fails at parse time with
//! `Error::UnsupportedMethod`, before any network I/O. Each verb maps
//! explicitly to a body policy instead of relying on dispatch fallthrough,
//! so adding a verb later forces a decision about how it carries data.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Trace,
}

/// How a verb carries request data.
///
/// Verbs that send a body use the raw request body when one is set (with
/// accumulated parameters appended to the URL as a query string), or the
/// form-encoded parameters as the payload otherwise. Verbs that never send
/// a body always carry parameters in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodPolicy {
    pub sends_body: bool,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }

    pub fn policy(&self) -> MethodPolicy {
        match self {
            Method::Post | Method::Put => MethodPolicy { sends_body: true },
            Method::Get | Method::Delete | Method::Head | Method::Options | Method::Trace => {
                MethodPolicy { sends_body: false }
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}
