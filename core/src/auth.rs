//! Authenticator capability.
//!
//! # Design
//! No authentication logic lives in the executor: it hands itself to the
//! authenticator, which mutates headers or parameters before `execute`.
//! The two schemes here cover the common cases; anything else implements
//! the trait.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::Error;
use crate::executor::RequestExecutor;

/// Mutates a request (headers, parameters) to carry credentials.
pub trait Authenticator {
    fn authenticate(&self, request: &mut RequestExecutor) -> Result<(), Error>;
}

/// HTTP Basic authentication (RFC 7617).
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Authenticator for BasicAuthenticator {
    fn authenticate(&self, request: &mut RequestExecutor) -> Result<(), Error> {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.password));
        request.add_request_header("Authorization", &format!("Basic {credentials}"))
    }
}

/// Static bearer-token authentication.
pub struct BearerAuthenticator {
    token: String,
}

impl BearerAuthenticator {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl Authenticator for BearerAuthenticator {
    fn authenticate(&self, request: &mut RequestExecutor) -> Result<(), Error> {
        request.add_request_header("Authorization", &format!("Bearer {}", self.token))
    }
}
