//! Caller identity and the credential renewal port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scm::{BoxError, Token};
use serde::{Deserialize, Serialize};

/// A signed-in user and the OAuth credentials stored for them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
    pub token: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(login: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            token: token.into(),
            refresh: None,
            expires: None,
        }
    }

    /// The stored credentials as a [`Token`], without renewal.
    pub fn token(&self) -> Token {
        Token {
            token: self.token.clone(),
            refresh: self.refresh.clone(),
            expires: self.expires,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

/// Produces a current access token for an account.
///
/// Implementations typically refresh the token when it is close to expiry
/// and persist the result. `force` requests a refresh even if the stored
/// token still looks valid.
#[async_trait]
pub trait Renewer: Send + Sync {
    async fn renew(&self, account: &Account, force: bool) -> Result<Token, BoxError>;
}

/// A [`Renewer`] that never refreshes and returns the account's stored token.
///
/// Suitable for personal access tokens, which do not expire.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenewer;

#[async_trait]
impl Renewer for PassthroughRenewer {
    async fn renew(&self, account: &Account, _force: bool) -> Result<Token, BoxError> {
        if account.token.is_empty() {
            return Err(format!("account {} has no stored token", account.login).into());
        }
        Ok(account.token())
    }
}
