//! Gitee backend adapter.
//!
//! Implements the service traits defined in the [`scm`] crate over the Gitee
//! v5 REST API, and parses Gitee webhook deliveries into [`scm::Webhook`]
//! events.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All Gitee wire details (URL shapes, payload field
//! names, base64 quirks, webhook headers) live here; the [`scm`] crate never
//! sees them.
//!
//! ## Capability gaps
//!
//! Pull request REST operations, commit history, change lists, commit
//! statuses, and file mutation have no binding for this backend. They return
//! [`scm::ScmError::NotSupported`] without performing any I/O.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> scm::ScmResult<()> {
//! use scm::{CallContext, RepoSlug, Token};
//!
//! let client = gitee::new_client(&gitee::GiteeConfig::default())?;
//! let ctx = CallContext::with_token(Token::new("oauth-token"));
//! let repo: RepoSlug = "kit101/drone-yml-test"
//!     .parse()
//!     .map_err(|message| scm::ScmError::InvalidInput { message })?;
//! let found = client.repositories.find(&ctx, &repo).await?;
//! println!("{}", found.link);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

mod config;
mod content;
mod de;
mod git;
mod pr;
mod repo;
mod transport;
mod user;
mod webhook;

pub use config::{GiteeConfig, DEFAULT_BASE_URL};
pub use content::GiteeContents;
pub use git::GiteeGit;
pub use pr::GiteePullRequests;
pub use repo::GiteeRepositories;
pub use transport::Transport;
pub use user::GiteeUsers;
pub use webhook::{read_body, GiteeWebhooks, EVENT_HEADER, MAX_BODY_BYTES, TOKEN_HEADER};

/// Builds a [`scm::Client`] whose services all share one [`Transport`].
///
/// # Errors
///
/// Returns [`scm::ScmError::InvalidInput`] if `config.base_url` is not a valid
/// `http`/`https` URL.
pub fn new_client(config: &GiteeConfig) -> scm::ScmResult<scm::Client> {
    let transport = Transport::new(config)?;
    tracing::debug!(base_url = %transport.base_url(), "gitee client configured");
    Ok(scm::Client {
        repositories: Arc::new(GiteeRepositories::new(transport.clone())),
        contents: Arc::new(GiteeContents::new(transport.clone())),
        git: Arc::new(GiteeGit::new(transport.clone())),
        users: Arc::new(GiteeUsers::new(transport)),
        pull_requests: Arc::new(GiteePullRequests),
        webhooks: Arc::new(GiteeWebhooks),
    })
}
