//! Pull request operations.
//!
//! The adapter only consumes pull requests through webhooks; none of the
//! REST operations are bound for this backend.

use async_trait::async_trait;
use scm::{
    CallContext, Change, Comment, CommentInput, ListOptions, PullRequest, PullRequestInput,
    PullRequestListOptions, PullRequestService, RepoSlug, ScmError, ScmResult,
};

/// [`PullRequestService`] that reports every operation as unsupported.
#[derive(Debug, Clone, Default)]
pub struct GiteePullRequests;

#[async_trait]
impl PullRequestService for GiteePullRequests {
    async fn find(&self, _: &CallContext, _: &RepoSlug, _: u64) -> ScmResult<PullRequest> {
        Err(ScmError::NotSupported)
    }

    async fn find_comment(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: u64,
        _: u64,
    ) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    async fn list(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: PullRequestListOptions,
    ) -> ScmResult<Vec<PullRequest>> {
        Err(ScmError::NotSupported)
    }

    async fn list_comments(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: u64,
        _: ListOptions,
    ) -> ScmResult<Vec<Comment>> {
        Err(ScmError::NotSupported)
    }

    async fn list_changes(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: u64,
        _: ListOptions,
    ) -> ScmResult<Vec<Change>> {
        Err(ScmError::NotSupported)
    }

    async fn create(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: &PullRequestInput,
    ) -> ScmResult<PullRequest> {
        Err(ScmError::NotSupported)
    }

    async fn create_comment(
        &self,
        _: &CallContext,
        _: &RepoSlug,
        _: u64,
        _: &CommentInput,
    ) -> ScmResult<Comment> {
        Err(ScmError::NotSupported)
    }

    async fn delete_comment(&self, _: &CallContext, _: &RepoSlug, _: u64, _: u64) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }

    async fn merge(&self, _: &CallContext, _: &RepoSlug, _: u64) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }

    async fn close(&self, _: &CallContext, _: &RepoSlug, _: u64) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }
}

#[cfg(test)]
#[path = "pr_tests.rs"]
mod tests;
