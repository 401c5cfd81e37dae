//! User lookups.

use async_trait::async_trait;
use scm::{CallContext, Login, ScmResult, User, UserService};
use serde::Deserialize;
use tracing::instrument;

use crate::de::nullable;
use crate::transport::Transport;

/// [`UserService`] over `api/v5/user` and `api/v1/users/{login}`.
#[derive(Debug, Clone)]
pub struct GiteeUsers {
    transport: Transport,
}

impl GiteeUsers {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UserService for GiteeUsers {
    #[instrument(skip(self, ctx))]
    async fn find(&self, ctx: &CallContext) -> ScmResult<User> {
        let out: UserDto = self.transport.get(ctx, "api/v5/user").await?;
        Ok(convert_user(out))
    }

    #[instrument(skip(self, ctx), fields(login = %login))]
    async fn find_login(&self, ctx: &CallContext, login: &Login) -> ScmResult<User> {
        let path = format!("api/v1/users/{login}");
        let out: UserDto = self.transport.get(ctx, &path).await?;
        Ok(convert_user(out))
    }

    /// Projects the email of [`UserService::find`]; there is no dedicated
    /// endpoint.
    async fn find_email(&self, ctx: &CallContext) -> ScmResult<String> {
        self.find(ctx).await.map(|user| user.email)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A user object as embedded in most backend payloads.
///
/// Webhook payloads sometimes send `username` instead of `login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserDto {
    #[serde(deserialize_with = "nullable")]
    pub login: String,
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(rename = "avatar_url", deserialize_with = "nullable")]
    pub avatar: String,
}

impl UserDto {
    /// The login handle, falling back to `username`.
    pub(crate) fn handle(&self) -> &str {
        if self.login.is_empty() {
            &self.username
        } else {
            &self.login
        }
    }
}

pub(crate) fn convert_user(src: UserDto) -> User {
    User {
        login: src.handle().to_string(),
        name: src.name,
        email: src.email,
        avatar: src.avatar,
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
