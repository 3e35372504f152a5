//! Error types for the request executor.
//!
//! # Design
//! Transport failures are kept distinct from HTTP status handling: a 4xx or
//! 5xx response is *data* (the executor reports it through its boolean
//! success flag), while a DNS, connect, TLS, or timeout failure is an
//! `Error::Transport`. `NotOpen` makes "execute before open" an explicit,
//! diagnosable condition instead of whatever the transport happens to do.

use std::fmt;

/// Errors returned by [`RequestExecutor`](crate::RequestExecutor) and its
/// collaborators.
#[derive(Debug)]
pub enum Error {
    /// A header name or value was rejected before being stored.
    InvalidArgument(String),

    /// The transport could not be initialized at `open` time.
    TransportUnavailable(String),

    /// The verb passed to `execute` is outside the supported set.
    UnsupportedMethod(String),

    /// A network-level failure during `execute` (DNS, connect, TLS,
    /// timeout), carrying the native error kind and message. Never retried.
    Transport { kind: String, message: String },

    /// `execute` was called on an executor with no open connection.
    NotOpen,

    /// The raw response bytes did not parse as a status line plus header
    /// block.
    MalformedResponse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::TransportUnavailable(msg) => {
                write!(f, "transport unavailable: {msg}")
            }
            Error::UnsupportedMethod(verb) => write!(f, "unsupported method: {verb}"),
            Error::Transport { kind, message } => {
                write!(f, "transport error ({kind}): {message}")
            }
            Error::NotOpen => write!(f, "request executor is not open"),
            Error::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_carries_kind_and_message() {
        let err = Error::Transport {
            kind: "timeout".to_string(),
            message: "deadline exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "transport error (timeout): deadline exceeded");
    }

    #[test]
    fn unsupported_method_names_the_verb() {
        let err = Error::UnsupportedMethod("PATCH".to_string());
        assert_eq!(err.to_string(), "unsupported method: PATCH");
    }
}
