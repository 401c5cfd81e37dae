//! Branches, tags, and commits.
//!
//! The backend has no single-tag endpoint, so [`GitService::find_tag`] lists
//! every tag and scans for an exact name match. Tag counts are small enough
//! that the extra payload is acceptable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scm::{
    expand_ref, trim_ref, CallContext, Change, Commit, CommitListOptions, GitService,
    ListOptions, Reference, RepoSlug, ScmError, ScmResult, Signature,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::de::{nullable, timestamp};
use crate::transport::{escape_path, Transport};
use crate::user::UserDto;

/// [`GitService`] over the `branches`, `tags`, and `commits` endpoints.
#[derive(Debug, Clone)]
pub struct GiteeGit {
    transport: Transport,
}

impl GiteeGit {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl GitService for GiteeGit {
    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find_branch(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        name: &str,
    ) -> ScmResult<Reference> {
        let path = format!("api/v5/repos/{repo}/branches/{}", escape_path(name));
        let out: BranchDto = self.transport.get(ctx, &path).await?;
        Ok(convert_branch(out))
    }

    #[instrument(skip(self, ctx, _opts), fields(repo = %repo))]
    async fn list_branches(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Reference>> {
        let path = format!("api/v5/repos/{repo}/branches");
        let out: Vec<BranchDto> = self.transport.get(ctx, &path).await?;
        Ok(out.into_iter().map(convert_branch).collect())
    }

    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find_tag(&self, ctx: &CallContext, repo: &RepoSlug, name: &str) -> ScmResult<Reference> {
        let path = format!("api/v5/repos/{repo}/tags");
        let out: Vec<TagDto> = self.transport.get(ctx, &path).await?;
        debug!(tags = out.len(), "scanning tag list");
        select_tag(out, name)
    }

    #[instrument(skip(self, ctx, _opts), fields(repo = %repo))]
    async fn list_tags(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Reference>> {
        let path = format!("api/v5/repos/{repo}/tags");
        let out: Vec<TagDto> = self.transport.get(ctx, &path).await?;
        Ok(out.into_iter().map(convert_tag).collect())
    }

    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find_commit(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        reference: &str,
    ) -> ScmResult<Commit> {
        let path = format!(
            "api/v5/repos/{repo}/commits/{}",
            escape_path(trim_ref(reference))
        );
        let out: CommitDto = self.transport.get(ctx, &path).await?;
        Ok(convert_commit(out))
    }

    async fn list_commits(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _opts: &CommitListOptions,
    ) -> ScmResult<Vec<Commit>> {
        Err(ScmError::NotSupported)
    }

    async fn list_changes(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _reference: &str,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Change>> {
        Err(ScmError::NotSupported)
    }

    async fn compare_changes(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _source: &str,
        _target: &str,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Change>> {
        Err(ScmError::NotSupported)
    }
}

/// Returns the first tag whose name equals `name` with its ref prefix removed.
pub(crate) fn select_tag(tags: Vec<TagDto>, name: &str) -> ScmResult<Reference> {
    let wanted = trim_ref(name);
    tags.into_iter()
        .find(|tag| tag.name == wanted)
        .map(convert_tag)
        .ok_or(ScmError::NotFound)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BranchDto {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub commit: CommitDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TagDto {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub commit: CommitDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CommitDto {
    #[serde(deserialize_with = "nullable")]
    pub sha: String,
    #[serde(deserialize_with = "nullable")]
    pub html_url: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub commit: CommitInfoDto,
    pub author: Option<UserDto>,
    pub committer: Option<UserDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CommitInfoDto {
    #[serde(deserialize_with = "nullable")]
    pub message: String,
    #[serde(deserialize_with = "nullable")]
    pub author: SignatureDto,
    #[serde(deserialize_with = "nullable")]
    pub committer: SignatureDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SignatureDto {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "timestamp")]
    pub date: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub(crate) fn convert_branch(src: BranchDto) -> Reference {
    Reference {
        name: trim_ref(&src.name).to_string(),
        path: expand_ref(&src.name, "refs/heads/"),
        sha: src.commit.sha,
    }
}

/// Tags carry no prefix on this backend, so the literal name is also the path.
pub(crate) fn convert_tag(src: TagDto) -> Reference {
    Reference {
        name: trim_ref(&src.name).to_string(),
        sha: src.commit.sha,
        path: src.name,
    }
}

pub(crate) fn convert_commit(src: CommitDto) -> Commit {
    // `url` is the API link; prefer the web permalink when present.
    let link = if src.html_url.is_empty() {
        src.url
    } else {
        src.html_url
    };
    Commit {
        sha: src.sha,
        message: src.commit.message,
        author: convert_user_signature(src.author, src.commit.author),
        committer: convert_user_signature(src.committer, src.commit.committer),
        link,
    }
}

/// Builds a signature from the account object, falling back to the raw git
/// signature when the commit is not linked to an account.
fn convert_user_signature(user: Option<UserDto>, git: SignatureDto) -> Signature {
    match user {
        Some(user) => Signature {
            login: user.handle().to_string(),
            name: if user.name.is_empty() { git.name } else { user.name },
            email: if user.email.is_empty() {
                git.email
            } else {
                user.email
            },
            avatar: Some(user.avatar).filter(|a| !a.is_empty()),
            date: git.date,
        },
        None => convert_signature(git),
    }
}

fn convert_signature(src: SignatureDto) -> Signature {
    Signature {
        login: src.name.clone(),
        name: src.name,
        email: src.email,
        avatar: None,
        date: src.date,
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
