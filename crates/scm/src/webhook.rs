//! Normalised webhook events and the inputs needed to produce them.
//!
//! Backends deliver many event kinds; the adapter recognises exactly two
//! families, represented by the closed [`Webhook`] enum. Anything else is
//! rejected with [`crate::ScmError::UnknownEvent`] before its payload is read.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BoxError;
use crate::types::{Commit, PullRequest, Repository, User};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A normalised inbound webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Webhook {
    /// A branch or tag push.
    Push(PushHook),
    /// A pull (merge) request lifecycle event.
    PullRequest(PullRequestHook),
}

impl Webhook {
    /// The repository the event originated from.
    pub fn repository(&self) -> &Repository {
        match self {
            Self::Push(hook) => &hook.repo,
            Self::PullRequest(hook) => &hook.repo,
        }
    }

    /// The user who triggered the event.
    pub fn sender(&self) -> &User {
        match self {
            Self::Push(hook) => &hook.sender,
            Self::PullRequest(hook) => &hook.sender,
        }
    }
}

/// A push of one or more commits to a branch or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushHook {
    /// The full ref that was pushed, e.g. `refs/heads/main`.
    pub reference: String,
    /// Representative commit for the push.
    ///
    /// Carries the push's resulting SHA and compare link, with the message
    /// and signatures of the *first* commit in [`PushHook::commits`].
    pub commit: Commit,
    /// Pushed commits in delivery order.
    pub commits: Vec<Commit>,
    pub repo: Repository,
    pub sender: User,
}

/// A pull request event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHook {
    pub action: Action,
    pub pull_request: PullRequest,
    pub repo: Repository,
    pub sender: User,
}

/// Normalised pull request action.
///
/// [`Action::None`] is produced for any action string the backend sends that
/// has no canonical equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    None,
    Create,
    Delete,
    Update,
    Open,
    Reopen,
    Close,
    Label,
    Unlabel,
    Merge,
    Sync,
}

impl Action {
    /// Maps a backend action string to its canonical action.
    ///
    /// Both the imperative and past-tense spellings are accepted
    /// (`"reopen"` and `"reopened"`); anything else yields [`Action::None`].
    pub fn parse(value: &str) -> Self {
        match value {
            "create" | "created" => Self::Create,
            "delete" | "deleted" => Self::Delete,
            "update" | "updated" | "edit" | "edited" => Self::Update,
            "open" | "opened" => Self::Open,
            "reopen" | "reopened" => Self::Reopen,
            "close" | "closed" => Self::Close,
            "label" | "labeled" => Self::Label,
            "unlabel" | "unlabeled" => Self::Unlabel,
            "merge" | "merged" => Self::Merge,
            "synchronize" | "synchronized" => Self::Sync,
            _ => Self::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound request
// ---------------------------------------------------------------------------

/// An inbound webhook HTTP request, already detached from the server that
/// received it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookRequest {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl WebhookRequest {
    /// Creates a request with the given body and no headers.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first value of header `name` (case-insensitive), or `""`.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// The raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

// ---------------------------------------------------------------------------
// Secret resolution
// ---------------------------------------------------------------------------

/// Looks up the shared secret expected for a parsed webhook.
///
/// Typically keyed on [`Webhook::repository`]. Returning an empty string
/// means "no verification configured" and the event is accepted unchecked.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Returns the expected secret for `webhook`.
    async fn resolve(&self, webhook: &Webhook) -> Result<String, BoxError>;
}

#[async_trait]
impl<F> SecretResolver for F
where
    F: Fn(&Webhook) -> Result<String, BoxError> + Send + Sync,
{
    async fn resolve(&self, webhook: &Webhook) -> Result<String, BoxError> {
        self(webhook)
    }
}

/// A resolver that returns the same secret for every event.
#[derive(Clone, Default)]
pub struct StaticSecret(String);

impl StaticSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl std::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticSecret(<redacted>)")
    }
}

#[async_trait]
impl SecretResolver for StaticSecret {
    async fn resolve(&self, _webhook: &Webhook) -> Result<String, BoxError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
