//! Repository metadata, permissions, and webhook registrations.

use async_trait::async_trait;
use reqwest::Method;
use scm::{
    CallContext, Hook, HookId, HookInput, ListOptions, Perm, RepoSlug, Repository,
    RepositoryService, ScmError, ScmResult, Status, StatusInput,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::de::nullable;
use crate::transport::Transport;

/// Repositories owned by, shared with, or visible through an organisation of
/// the caller. Only the first page is fetched.
const LIST_REPOS_PATH: &str = "api/v5/user/repos?visibility=all&affiliation=owner%2C%20collaborator%2C%20organization_member&sort=full_name&direction=asc&page=1&per_page=100";

/// [`RepositoryService`] over `api/v5/repos/{repo}` and its `hooks` children.
#[derive(Debug, Clone)]
pub struct GiteeRepositories {
    transport: Transport,
}

impl GiteeRepositories {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl RepositoryService for GiteeRepositories {
    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find(&self, ctx: &CallContext, repo: &RepoSlug) -> ScmResult<Repository> {
        let path = format!("/api/v5/repos/{repo}");
        let out: RepositoryDto = self.transport.get(ctx, &path).await?;
        Ok(convert_repository(out))
    }

    /// Reads the permissions embedded in the repository payload.
    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find_perms(&self, ctx: &CallContext, repo: &RepoSlug) -> ScmResult<Perm> {
        let path = format!("/api/v5/repos/{repo}");
        let out: RepositoryDto = self.transport.get(ctx, &path).await?;
        Ok(convert_perm(&out.permissions))
    }

    #[instrument(skip(self, ctx, _opts))]
    async fn list(&self, ctx: &CallContext, _opts: ListOptions) -> ScmResult<Vec<Repository>> {
        let out: Vec<RepositoryDto> = self.transport.get(ctx, LIST_REPOS_PATH).await?;
        Ok(out.into_iter().map(convert_repository).collect())
    }

    #[instrument(skip(self, ctx), fields(repo = %repo, hook = %id))]
    async fn find_hook(&self, ctx: &CallContext, repo: &RepoSlug, id: &HookId) -> ScmResult<Hook> {
        let path = format!("api/v5/repos/{repo}/hooks/{id}");
        let out: HookDto = self.transport.get(ctx, &path).await?;
        Ok(convert_hook(out))
    }

    #[instrument(skip(self, ctx, _opts), fields(repo = %repo))]
    async fn list_hooks(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Hook>> {
        let path = format!("api/v5/repos/{repo}/hooks");
        let out: Vec<HookDto> = self.transport.get(ctx, &path).await?;
        Ok(out.into_iter().map(convert_hook).collect())
    }

    #[instrument(skip(self, ctx, input), fields(repo = %repo, target = %input.target))]
    async fn create_hook(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        input: &HookInput,
    ) -> ScmResult<Hook> {
        let path = format!("api/v5/repos/{repo}/hooks");
        let out: HookDto = self
            .transport
            .send(ctx, Method::POST, &path, &HookRequest::from_input(input))
            .await?;
        Ok(convert_hook(out))
    }

    #[instrument(skip(self, ctx, input), fields(repo = %repo, hook = %id, target = %input.target))]
    async fn update_hook(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        id: &HookId,
        input: &HookInput,
    ) -> ScmResult<Hook> {
        let path = format!("api/v5/repos/{repo}/hooks/{id}");
        let out: HookDto = self
            .transport
            .send(ctx, Method::PATCH, &path, &HookRequest::from_input(input))
            .await?;
        Ok(convert_hook(out))
    }

    #[instrument(skip(self, ctx), fields(repo = %repo, hook = %id))]
    async fn delete_hook(&self, ctx: &CallContext, repo: &RepoSlug, id: &HookId) -> ScmResult<()> {
        let path = format!("api/v5/repos/{repo}/hooks/{id}");
        self.transport
            .call::<(), IgnoredAny>(ctx, Method::DELETE, &path, None)
            .await
            .map(|_| ())
    }

    async fn list_status(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _reference: &str,
        _opts: ListOptions,
    ) -> ScmResult<Vec<Status>> {
        Err(ScmError::NotSupported)
    }

    async fn create_status(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _reference: &str,
        _input: &StatusInput,
    ) -> ScmResult<Status> {
        Err(ScmError::NotSupported)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RepositoryDto {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub private: bool,
    #[serde(deserialize_with = "nullable")]
    pub html_url: String,
    #[serde(deserialize_with = "nullable")]
    pub ssh_url: String,
    #[serde(deserialize_with = "nullable")]
    pub default_branch: String,
    #[serde(deserialize_with = "nullable")]
    pub permissions: PermDto,
    #[serde(deserialize_with = "nullable")]
    pub namespace: NamespaceDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PermDto {
    pub admin: bool,
    pub push: bool,
    pub pull: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct NamespaceDto {
    #[serde(deserialize_with = "nullable")]
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct HookDto {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    pub push_events: bool,
    pub issues_events: bool,
    pub merge_requests_events: bool,
}

/// Body of a hook create/update.
///
/// Push, tag-push, and merge-request events are always requested, whatever
/// the caller asked for.
#[derive(Debug, Serialize)]
pub(crate) struct HookRequest<'a> {
    url: &'a str,
    encryption_type: u8,
    password: &'a str,
    push_events: bool,
    tag_push_events: bool,
    merge_requests_events: bool,
}

impl<'a> HookRequest<'a> {
    pub(crate) fn from_input(input: &'a HookInput) -> Self {
        Self {
            url: &input.target,
            encryption_type: 0,
            password: &input.secret,
            push_events: true,
            tag_push_events: true,
            merge_requests_events: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub(crate) fn convert_repository(src: RepositoryDto) -> Repository {
    Repository {
        id: src.id.to_string(),
        namespace: src.namespace.path,
        name: src.name,
        perm: Some(convert_perm(&src.permissions)),
        branch: src.default_branch,
        private: src.private,
        link: src
            .html_url
            .strip_suffix(".git")
            .unwrap_or(&src.html_url)
            .to_string(),
        clone: src.html_url,
        clone_ssh: src.ssh_url,
    }
}

fn convert_perm(src: &PermDto) -> Perm {
    Perm {
        pull: src.pull,
        push: src.push,
        admin: src.admin,
    }
}

pub(crate) fn convert_hook(src: HookDto) -> Hook {
    Hook {
        id: src.id.to_string(),
        active: true,
        events: convert_hook_events(&src),
        target: src.url,
        ..Hook::default()
    }
}

/// Derives subscribed event names from the backend's toggles.
///
/// Note and tag-push toggles have no abstract event name and are ignored.
fn convert_hook_events(src: &HookDto) -> Vec<String> {
    let mut events = Vec::new();
    if src.merge_requests_events {
        events.push("pull_request".to_string());
    }
    if src.issues_events {
        events.push("issues".to_string());
        events.push("issue_comment".to_string());
    }
    if src.push_events {
        events.push("push".to_string());
    }
    events
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
