//! Abstract entities exchanged across the adapter boundary.
//!
//! Every value here is an immutable snapshot built fresh from one backend
//! response. None of them has an identity inside the adapter; persisting them
//! is the caller's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Repositories and hooks
// ---------------------------------------------------------------------------

/// A repository as seen by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Backend-opaque identifier.
    pub id: String,
    pub namespace: String,
    pub name: String,
    /// Permissions of the calling user, when the backend reported them.
    pub perm: Option<Perm>,
    /// Default branch name.
    pub branch: String,
    pub private: bool,
    /// HTTPS clone URL.
    pub clone: String,
    /// SSH clone URL.
    pub clone_ssh: String,
    /// Canonical web link.
    pub link: String,
}

/// Repository permissions of the calling user.
///
/// The three flags are independent; any subset may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perm {
    pub pull: bool,
    pub push: bool,
    pub admin: bool,
}

/// A repository webhook registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    pub name: String,
    pub target: String,
    /// Subscribed event names, derived from the backend's event toggles.
    pub events: Vec<String>,
    pub active: bool,
    pub skip_verify: bool,
}

/// Input for creating or updating a webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookInput {
    pub name: String,
    /// Delivery URL.
    pub target: String,
    /// Shared secret the backend echoes back in every delivery.
    pub secret: String,
    /// Requested event names. Backends with a fixed event set may ignore this.
    pub events: Vec<String>,
    pub skip_verify: bool,
}

// ---------------------------------------------------------------------------
// Commit statuses
// ---------------------------------------------------------------------------

/// State of a commit status check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Unknown,
    Pending,
    Running,
    Success,
    Failure,
    Canceled,
    Error,
}

/// A commit status as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: State,
    pub label: String,
    pub desc: String,
    pub target: String,
}

/// Input for publishing a commit status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInput {
    pub state: State,
    pub label: String,
    pub desc: String,
    pub target: String,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// A file fetched at a given ref, with its bytes decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub path: String,
    pub data: Vec<u8>,
    /// Blob SHA, when reported.
    pub sha: String,
}

/// Classification of a directory entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// The backend reported a type this adapter does not recognise.
    #[default]
    Unsupported,
    File,
    Directory,
    Symlink,
    /// A submodule (gitlink) entry.
    Gitlink,
}

/// One entry of a directory listing. Never carries file bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub path: String,
    pub sha: String,
    pub kind: ContentKind,
}

/// Parameters for creating, updating, or deleting a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentParams {
    /// Ref to base the change on.
    pub reference: String,
    /// Branch to commit to.
    pub branch: String,
    /// Commit message.
    pub message: String,
    pub data: Vec<u8>,
    /// Blob SHA of the file being replaced, for updates.
    pub sha: String,
    pub signature: Signature,
}

// ---------------------------------------------------------------------------
// Git objects
// ---------------------------------------------------------------------------

/// A named pointer to a commit: a branch or a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Logical name with any `refs/heads/` or `refs/tags/` prefix removed.
    pub name: String,
    /// Full ref path.
    pub path: String,
    pub sha: String,
}

/// A commit and its signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
    /// Web permalink.
    pub link: String,
}

/// The identity attached to a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A single changed file in a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub path: String,
    pub added: bool,
    pub renamed: bool,
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A backend user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// Snapshot of a pull (merge) request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    /// Head commit SHA.
    pub sha: String,
    /// Synthetic ref of the head, e.g. `refs/pull/7/head`.
    pub reference: String,
    /// Source branch.
    pub source: String,
    /// Target branch.
    pub target: String,
    /// Full name of the repository the head lives in.
    pub fork: String,
    pub link: String,
    pub closed: bool,
    pub merged: bool,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Input for opening a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestInput {
    pub title: String,
    pub body: String,
    pub source: String,
    pub target: String,
}

/// A pull request comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Input for posting a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInput {
    pub body: String,
}

// ---------------------------------------------------------------------------
// Listing options
// ---------------------------------------------------------------------------

/// Pagination options for list calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub page: u32,
    pub size: u32,
}

/// Options for listing commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitListOptions {
    pub reference: String,
    pub path: String,
    pub page: u32,
    pub size: u32,
}

/// Options for listing pull requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestListOptions {
    pub page: u32,
    pub size: u32,
    pub open: bool,
    pub closed: bool,
}
