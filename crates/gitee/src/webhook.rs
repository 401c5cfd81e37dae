//! Inbound webhook parsing and verification.
//!
//! A delivery moves through `Received → Parsed → Verified → Accepted`, and may
//! be rejected at any step:
//!
//! 1. **Dispatch** on the `X-Gitee-Event` header. `Push Hook` and
//!    `Tag Push Hook` share the push decoder, `Merge Request Hook` uses the
//!    pull request decoder, and anything else is rejected as
//!    [`ScmError::UnknownEvent`] without reading the body.
//! 2. **Parse** the body (at most [`MAX_BODY_BYTES`]) into a [`Webhook`].
//! 3. **Verify** the `X-Gitee-Token` header against the secret returned by the
//!    caller's [`SecretResolver`]. An empty secret disables verification.
//!    Rejections carry the parsed event for audit logging.
//! 4. **Accept** by returning the event.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scm::{
    Action, Commit, Perm, PullRequest, PullRequestHook, PushHook, Repository, ScmError,
    ScmResult, SecretResolver, Signature, User, Webhook, WebhookRequest, WebhookService,
};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument, warn};

use crate::de::{nullable, timestamp};
use crate::user::{convert_user, UserDto};

/// Header naming the event type.
pub const EVENT_HEADER: &str = "X-Gitee-Event";

/// Header carrying the shared secret.
pub const TOKEN_HEADER: &str = "X-Gitee-Token";

/// Largest body read from a delivery. Anything beyond is discarded.
pub const MAX_BODY_BYTES: usize = 10_000_000;

/// Reads a delivery body in full, stopping at [`MAX_BODY_BYTES`].
pub async fn read_body<R>(reader: R) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::new();
    reader.take(MAX_BODY_BYTES as u64).read_to_end(&mut data).await?;
    Ok(data)
}

/// The event families this backend delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventFamily {
    Push,
    PullRequest,
}

fn dispatch(event: &str) -> Option<EventFamily> {
    match event {
        "Push Hook" | "Tag Push Hook" => Some(EventFamily::Push),
        "Merge Request Hook" => Some(EventFamily::PullRequest),
        _ => None,
    }
}

/// [`WebhookService`] for Gitee deliveries. Stateless.
#[derive(Debug, Clone, Default)]
pub struct GiteeWebhooks;

#[async_trait]
impl WebhookService for GiteeWebhooks {
    #[instrument(skip_all, fields(event = %request.header(EVENT_HEADER)))]
    async fn parse(
        &self,
        request: &WebhookRequest,
        resolver: &dyn SecretResolver,
    ) -> ScmResult<Webhook> {
        let event = request.header(EVENT_HEADER);
        let Some(family) = dispatch(event) else {
            debug!("rejecting unknown webhook event");
            return Err(ScmError::UnknownEvent {
                event: event.to_string(),
            });
        };

        let body = request.body();
        let data = &body[..body.len().min(MAX_BODY_BYTES)];
        let hook = match family {
            EventFamily::Push => parse_push_hook(data)?,
            EventFamily::PullRequest => parse_pull_request_hook(data)?,
        };
        debug!(?family, repo = %hook.repository().name, "parsed webhook");

        let secret = match resolver.resolve(&hook).await {
            Ok(secret) => secret,
            Err(source) => {
                return Err(ScmError::SecretResolution {
                    webhook: Box::new(hook),
                    source,
                })
            }
        };
        if secret.is_empty() {
            return Ok(hook);
        }

        if !constant_time_eq(secret.as_bytes(), request.header(TOKEN_HEADER).as_bytes()) {
            warn!(repo = %hook.repository().name, "webhook secret mismatch");
            return Err(ScmError::SignatureInvalid {
                webhook: Box::new(hook),
            });
        }
        Ok(hook)
    }
}

/// Compares two secrets without exiting early on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

pub(crate) fn parse_push_hook(data: &[u8]) -> ScmResult<Webhook> {
    let src: PushEventDto =
        serde_json::from_slice(data).map_err(|e| ScmError::decode(e.to_string()))?;

    let commits = src.commits.iter().map(convert_hook_commit).collect();

    // The representative commit takes the message and signatures of the
    // first listed commit, but the SHA and link of the push itself.
    let first = src.commits.first();
    let commit = Commit {
        sha: src.after.unwrap_or_default(),
        message: first.map(|c| c.message.clone()).unwrap_or_default(),
        author: first
            .map(|c| hook_signature(c.author.as_ref(), c.timestamp))
            .unwrap_or_default(),
        committer: first
            .map(|c| hook_signature(c.committer.as_ref(), c.timestamp))
            .unwrap_or_default(),
        link: src.compare.unwrap_or_default(),
    };

    Ok(Webhook::Push(PushHook {
        reference: src.reference.unwrap_or_default(),
        commit,
        commits,
        repo: convert_hook_repository(src.repository.unwrap_or_default()),
        sender: convert_user(src.sender.unwrap_or_default()),
    }))
}

fn convert_hook_commit(src: &CommitHookDto) -> Commit {
    Commit {
        sha: src.id.clone(),
        message: src.message.clone(),
        author: hook_signature(src.author.as_ref(), src.timestamp),
        committer: hook_signature(src.committer.as_ref(), src.timestamp),
        link: src.url.clone(),
    }
}

fn hook_signature(user: Option<&UserDto>, date: Option<DateTime<Utc>>) -> Signature {
    let user = user.cloned().unwrap_or_default();
    Signature {
        login: user.handle().to_string(),
        name: user.name,
        email: user.email,
        avatar: None,
        date,
    }
}

// ---------------------------------------------------------------------------
// Pull request
// ---------------------------------------------------------------------------

pub(crate) fn parse_pull_request_hook(data: &[u8]) -> ScmResult<Webhook> {
    let src: PullRequestEventDto =
        serde_json::from_slice(data).map_err(|e| ScmError::decode(e.to_string()))?;
    let pr = src.pull_request.unwrap_or_default();
    let head = pr.head.unwrap_or_default();
    let base = pr.base.unwrap_or_default();
    let author = pr.user.unwrap_or_default();

    Ok(Webhook::PullRequest(PullRequestHook {
        action: Action::parse(src.action.as_deref().unwrap_or_default()),
        pull_request: PullRequest {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            sha: head.sha,
            reference: format!("refs/pull/{}/head", pr.number),
            source: head.reference,
            target: base.reference,
            fork: head.repo.map(|r| r.full_name).unwrap_or_default(),
            link: pr.html_url,
            closed: pr.state == "closed",
            merged: pr.merged,
            author: User {
                login: author.handle().to_string(),
                name: author.name,
                email: author.email,
                avatar: author.avatar,
            },
            created: pr.created_at,
            updated: pr.updated_at,
        },
        repo: convert_hook_repository(src.repository.unwrap_or_default()),
        sender: convert_user(src.sender.unwrap_or_default()),
    }))
}

/// Webhook repositories imply pull and push access for the delivery target.
fn convert_hook_repository(src: ProjectHookDto) -> Repository {
    Repository {
        id: src.id.to_string(),
        namespace: src.owner.map(|o| o.handle().to_string()).unwrap_or_default(),
        name: src.name,
        perm: Some(Perm {
            pull: true,
            push: true,
            admin: false,
        }),
        branch: src.default_branch,
        private: src.private,
        clone: src.git_http_url,
        clone_ssh: src.git_ssh_url,
        link: src.html_url,
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PushEventDto {
    #[serde(rename = "ref")]
    reference: Option<String>,
    after: Option<String>,
    compare: Option<String>,
    #[serde(deserialize_with = "nullable")]
    commits: Vec<CommitHookDto>,
    repository: Option<ProjectHookDto>,
    sender: Option<UserDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommitHookDto {
    #[serde(deserialize_with = "nullable")]
    id: String,
    #[serde(deserialize_with = "nullable")]
    message: String,
    #[serde(deserialize_with = "timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    url: String,
    author: Option<UserDto>,
    committer: Option<UserDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectHookDto {
    id: u64,
    #[serde(deserialize_with = "nullable")]
    name: String,
    #[serde(deserialize_with = "nullable")]
    full_name: String,
    owner: Option<UserDto>,
    private: bool,
    #[serde(deserialize_with = "nullable")]
    html_url: String,
    #[serde(deserialize_with = "nullable")]
    git_http_url: String,
    #[serde(deserialize_with = "nullable")]
    git_ssh_url: String,
    #[serde(deserialize_with = "nullable")]
    default_branch: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestEventDto {
    action: Option<String>,
    pull_request: Option<PullRequestHookDto>,
    repository: Option<ProjectHookDto>,
    sender: Option<UserDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestHookDto {
    number: u64,
    #[serde(deserialize_with = "nullable")]
    state: String,
    #[serde(deserialize_with = "nullable")]
    html_url: String,
    #[serde(deserialize_with = "nullable")]
    title: String,
    #[serde(deserialize_with = "nullable")]
    body: String,
    user: Option<UserDto>,
    head: Option<BranchHookDto>,
    base: Option<BranchHookDto>,
    merged: bool,
    #[serde(deserialize_with = "timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BranchHookDto {
    #[serde(rename = "ref", deserialize_with = "nullable")]
    reference: String,
    #[serde(deserialize_with = "nullable")]
    sha: String,
    repo: Option<ProjectHookDto>,
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
