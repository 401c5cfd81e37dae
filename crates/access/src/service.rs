//! The credentialed facade over [`scm::Client`].

use std::sync::Arc;

use scm::{
    CallContext, Client, Commit, Content, ContentInfo, ContentParams, ListOptions, Login, Perm,
    Reference, RepoSlug, Repository, User,
};
use tracing::{debug, instrument, warn};

use crate::account::{Account, Renewer};
use crate::errors::AccessError;

/// Renews the caller's token before every call and delegates to the wrapped
/// [`Client`].
///
/// Holds no per-caller state, so one instance serves every caller
/// concurrently. Listings fetch the backend's default first page.
#[derive(Clone)]
pub struct GitService {
    client: Client,
    renewer: Arc<dyn Renewer>,
}

impl std::fmt::Debug for GitService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitService")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl GitService {
    pub fn new(client: Client, renewer: Arc<dyn Renewer>) -> Self {
        Self { client, renewer }
    }

    /// The wrapped client, for operations the facade does not cover.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Builds the call context for `account`, renewing its token first.
    async fn context(&self, account: Option<&Account>) -> Result<CallContext, AccessError> {
        let account = account.ok_or(AccessError::Unauthenticated)?;
        match self.renewer.renew(account, false).await {
            Ok(token) => {
                debug!(login = %account.login, "credentials renewed");
                Ok(CallContext::with_token(token))
            }
            Err(source) => {
                warn!(login = %account.login, error = %source, "credential renewal failed");
                Err(AccessError::Renewal {
                    login: account.login.clone(),
                    source,
                })
            }
        }
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_branches(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
    ) -> Result<Vec<Reference>, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self
            .client
            .git
            .list_branches(&ctx, repo, ListOptions::default())
            .await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_tags(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
    ) -> Result<Vec<Reference>, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self
            .client
            .git
            .list_tags(&ctx, repo, ListOptions::default())
            .await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_tag(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        name: &str,
    ) -> Result<Reference, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.git.find_tag(&ctx, repo, name).await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_commit(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        reference: &str,
    ) -> Result<Commit, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.git.find_commit(&ctx, repo, reference).await?)
    }

    /// Reads a file at `branch` (any ref form is accepted).
    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_file(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        path: &str,
        branch: &str,
    ) -> Result<Content, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.contents.find(&ctx, repo, path, branch).await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn list_files(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
    ) -> Result<Vec<ContentInfo>, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self
            .client
            .contents
            .list(&ctx, repo, path, reference, ListOptions::default())
            .await?)
    }

    #[instrument(skip(self, account, params), fields(repo = %repo))]
    pub async fn create_file(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        path: &str,
        params: &ContentParams,
    ) -> Result<(), AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.contents.create(&ctx, repo, path, params).await?)
    }

    #[instrument(skip(self, account, params), fields(repo = %repo))]
    pub async fn update_file(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
        path: &str,
        params: &ContentParams,
    ) -> Result<(), AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.contents.update(&ctx, repo, path, params).await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_repository(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
    ) -> Result<Repository, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.repositories.find(&ctx, repo).await?)
    }

    #[instrument(skip(self, account), fields(repo = %repo))]
    pub async fn find_perms(
        &self,
        account: Option<&Account>,
        repo: &RepoSlug,
    ) -> Result<Perm, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self.client.repositories.find_perms(&ctx, repo).await?)
    }

    #[instrument(skip(self, account))]
    pub async fn list_repositories(
        &self,
        account: Option<&Account>,
    ) -> Result<Vec<Repository>, AccessError> {
        let ctx = self.context(account).await?;
        Ok(self
            .client
            .repositories
            .list(&ctx, ListOptions::default())
            .await?)
    }

    /// Looks up `login`, or the account's own user when `login` is `None`.
    #[instrument(skip(self, account))]
    pub async fn find_user(
        &self,
        account: Option<&Account>,
        login: Option<&Login>,
    ) -> Result<User, AccessError> {
        let ctx = self.context(account).await?;
        let user = match login {
            Some(login) => self.client.users.find_login(&ctx, login).await?,
            None => self.client.users.find(&ctx).await?,
        };
        Ok(user)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
