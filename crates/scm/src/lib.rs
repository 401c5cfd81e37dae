//! Backend-neutral source-control domain.
//!
//! This crate defines the abstract entities a CI server exchanges with any
//! source-control host, the single error taxonomy every backend reports with,
//! and the service port traits a backend adapter implements. Adapter crates
//! translate these into their vendor's REST dialect; they never add domain
//! rules here.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a backend must offer; adapter crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepoSlug`, `HookId`, `Login`) |
//! | [`types`] | Entity snapshots (`Repository`, `Reference`, `Content`, etc.) |
//! | [`webhook`] | Normalised webhook events, inbound request, secret resolution |
//! | [`context`] | Per-call credentials and raw response metadata |
//! | [`services`] | Port traits and the `Client` bundle |
//! | [`refs`] | Ref-name normalisation helpers |
//! | [`errors`] | `ScmError` and retry-policy types |

pub mod context;
pub mod errors;
pub mod identifiers;
pub mod refs;
pub mod services;
pub mod types;
pub mod webhook;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{CallContext, Response, Token};
pub use errors::{BoxError, RetryPolicy, ScmError, ScmResult};
pub use identifiers::{HookId, Login, RepoSlug};
pub use refs::{expand_ref, is_branch, is_tag, trim_ref};
pub use services::{
    Client, ContentService, GitService, PullRequestService, RepositoryService, UserService,
    WebhookService,
};
pub use types::{
    Change, Comment, CommentInput, Commit, CommitListOptions, Content, ContentInfo, ContentKind,
    ContentParams, Hook, HookInput, ListOptions, Perm, PullRequest, PullRequestInput,
    PullRequestListOptions, Reference, Repository, Signature, State, Status, StatusInput, User,
};
pub use webhook::{
    Action, PullRequestHook, PushHook, SecretResolver, StaticSecret, Webhook, WebhookRequest,
};
