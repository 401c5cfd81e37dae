//! Per-call request context and raw response metadata.
//!
//! Credentials are never stored on a service instance. Each call receives a
//! [`CallContext`] carrying the token to attach, which keeps a single client
//! safe to share between concurrent callers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An OAuth access token attached to outgoing backend calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The bearer token value.
    pub token: String,
    /// Refresh token, if the backend issued one.
    #[serde(default)]
    pub refresh: Option<String>,
    /// Expiry of `token`, if known.
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a token with no refresh token or expiry.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh: None,
            expires: None,
        }
    }
}

// Tokens must never reach log output.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .field("expires", &self.expires)
            .finish()
    }
}

/// State threaded through a single service call.
///
/// Cancellation is the caller's: dropping the returned future aborts the
/// in-flight request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: Option<Token>,
}

impl CallContext {
    /// A context without credentials (public endpoints, webhook parsing).
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context that authenticates with `token`.
    pub fn with_token(token: Token) -> Self {
        Self { token: Some(token) }
    }

    /// The token to attach, if any.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Response metadata
// ---------------------------------------------------------------------------

/// Raw metadata of a backend HTTP response.
///
/// Header names are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as `(lower-case name, value)` pairs.
    pub headers: Vec<(String, String)>,
    /// The full response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Returns the first value of the header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body decoded lossily as UTF-8, for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `Retry-After` delay, when sent as a number of seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}
