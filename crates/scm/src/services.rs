//! Port traits implemented by every source-control backend.
//!
//! Each trait mirrors one Resource Service. Backends implement every method;
//! an operation with no backend equivalent returns
//! [`ScmError::NotSupported`](crate::ScmError::NotSupported) rather than a
//! transport error or a silent no-op.
//!
//! All methods take a [`CallContext`] carrying the caller's credentials, so
//! implementations hold no per-caller state and may be shared freely.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::CallContext;
use crate::errors::ScmResult;
use crate::identifiers::{HookId, Login, RepoSlug};
use crate::types::{
    Change, Comment, CommentInput, Commit, CommitListOptions, Content, ContentInfo, ContentParams,
    Hook, HookInput, ListOptions, Perm, PullRequest, PullRequestInput, PullRequestListOptions,
    Reference, Repository, Status, StatusInput, User,
};
use crate::webhook::{SecretResolver, Webhook, WebhookRequest};

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Repository metadata, permissions, hooks, and commit statuses.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Returns the repository.
    async fn find(&self, ctx: &CallContext, repo: &RepoSlug) -> ScmResult<Repository>;

    /// Returns the caller's permissions on the repository.
    async fn find_perms(&self, ctx: &CallContext, repo: &RepoSlug) -> ScmResult<Perm>;

    /// Lists repositories visible to the caller.
    async fn list(&self, ctx: &CallContext, opts: ListOptions) -> ScmResult<Vec<Repository>>;

    /// Returns one webhook registration.
    async fn find_hook(&self, ctx: &CallContext, repo: &RepoSlug, id: &HookId) -> ScmResult<Hook>;

    /// Lists webhook registrations.
    async fn list_hooks(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        opts: ListOptions,
    ) -> ScmResult<Vec<Hook>>;

    /// Registers a webhook.
    async fn create_hook(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        input: &HookInput,
    ) -> ScmResult<Hook>;

    /// Replaces a webhook registration.
    async fn update_hook(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        id: &HookId,
        input: &HookInput,
    ) -> ScmResult<Hook>;

    /// Removes a webhook registration.
    async fn delete_hook(&self, ctx: &CallContext, repo: &RepoSlug, id: &HookId) -> ScmResult<()>;

    /// Lists commit statuses for `reference`.
    async fn list_status(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        reference: &str,
        opts: ListOptions,
    ) -> ScmResult<Vec<Status>>;

    /// Publishes a commit status for `reference`.
    async fn create_status(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        reference: &str,
        input: &StatusInput,
    ) -> ScmResult<Status>;
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// File content at a ref.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Fetches one file with its bytes decoded.
    async fn find(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
    ) -> ScmResult<Content>;

    /// Lists a directory.
    async fn list(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
        opts: ListOptions,
    ) -> ScmResult<Vec<ContentInfo>>;

    /// Creates a file.
    async fn create(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        params: &ContentParams,
    ) -> ScmResult<()>;

    /// Updates a file.
    async fn update(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        params: &ContentParams,
    ) -> ScmResult<()>;

    /// Deletes a file.
    async fn delete(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
    ) -> ScmResult<()>;
}

// ---------------------------------------------------------------------------
// Git references and commits
// ---------------------------------------------------------------------------

/// Branches, tags, and commits.
#[async_trait]
pub trait GitService: Send + Sync {
    async fn find_branch(&self, ctx: &CallContext, repo: &RepoSlug, name: &str)
        -> ScmResult<Reference>;

    async fn list_branches(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        opts: ListOptions,
    ) -> ScmResult<Vec<Reference>>;

    /// Finds a tag by name. `name` may carry a `refs/tags/` prefix.
    ///
    /// Returns [`ScmError::NotFound`](crate::ScmError::NotFound) when no tag
    /// matches.
    async fn find_tag(&self, ctx: &CallContext, repo: &RepoSlug, name: &str) -> ScmResult<Reference>;

    async fn list_tags(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        opts: ListOptions,
    ) -> ScmResult<Vec<Reference>>;

    /// Finds a commit by SHA or ref.
    async fn find_commit(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        reference: &str,
    ) -> ScmResult<Commit>;

    async fn list_commits(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        opts: &CommitListOptions,
    ) -> ScmResult<Vec<Commit>>;

    /// Lists the files changed by one commit.
    async fn list_changes(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        reference: &str,
        opts: ListOptions,
    ) -> ScmResult<Vec<Change>>;

    /// Lists the files changed between two refs.
    async fn compare_changes(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        source: &str,
        target: &str,
        opts: ListOptions,
    ) -> ScmResult<Vec<Change>>;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// User identity lookups.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the authenticated caller.
    async fn find(&self, ctx: &CallContext) -> ScmResult<User>;

    /// Returns a user by login handle.
    async fn find_login(&self, ctx: &CallContext, login: &Login) -> ScmResult<User>;

    /// Returns the authenticated caller's email address.
    async fn find_email(&self, ctx: &CallContext) -> ScmResult<String>;
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// Pull (merge) requests and their comments.
#[async_trait]
pub trait PullRequestService: Send + Sync {
    async fn find(&self, ctx: &CallContext, repo: &RepoSlug, number: u64)
        -> ScmResult<PullRequest>;

    async fn find_comment(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        number: u64,
        id: u64,
    ) -> ScmResult<Comment>;

    async fn list(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        opts: PullRequestListOptions,
    ) -> ScmResult<Vec<PullRequest>>;

    async fn list_comments(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        number: u64,
        opts: ListOptions,
    ) -> ScmResult<Vec<Comment>>;

    async fn list_changes(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        number: u64,
        opts: ListOptions,
    ) -> ScmResult<Vec<Change>>;

    async fn create(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        input: &PullRequestInput,
    ) -> ScmResult<PullRequest>;

    async fn create_comment(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        number: u64,
        input: &CommentInput,
    ) -> ScmResult<Comment>;

    async fn delete_comment(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        number: u64,
        id: u64,
    ) -> ScmResult<()>;

    async fn merge(&self, ctx: &CallContext, repo: &RepoSlug, number: u64) -> ScmResult<()>;

    async fn close(&self, ctx: &CallContext, repo: &RepoSlug, number: u64) -> ScmResult<()>;
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

/// Inbound webhook parsing and verification.
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// Parses `request` into a normalised event and verifies its secret.
    ///
    /// # Errors
    ///
    /// - [`ScmError::UnknownEvent`](crate::ScmError::UnknownEvent) if the event
    ///   header names no supported family; the body is not parsed.
    /// - [`ScmError::Decode`](crate::ScmError::Decode) if the body is malformed.
    /// - [`ScmError::SecretResolution`](crate::ScmError::SecretResolution) if
    ///   `resolver` fails, with the parsed event attached.
    /// - [`ScmError::SignatureInvalid`](crate::ScmError::SignatureInvalid) if
    ///   the secret does not match, with the parsed event attached.
    async fn parse(
        &self,
        request: &WebhookRequest,
        resolver: &dyn SecretResolver,
    ) -> ScmResult<Webhook>;
}

// ---------------------------------------------------------------------------
// Client bundle
// ---------------------------------------------------------------------------

/// One backend's full set of services.
///
/// Cheap to clone; every service is shared behind an [`Arc`].
#[derive(Clone)]
pub struct Client {
    pub repositories: Arc<dyn RepositoryService>,
    pub contents: Arc<dyn ContentService>,
    pub git: Arc<dyn GitService>,
    pub users: Arc<dyn UserService>,
    pub pull_requests: Arc<dyn PullRequestService>,
    pub webhooks: Arc<dyn WebhookService>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
