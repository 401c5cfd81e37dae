//! File content at a ref.
//!
//! The backend returns file bytes base64-encoded. Some responses omit the
//! padding, so decoding tries standard base64 first and unpadded base64 second.
//! Server-side file mutation is not offered by this backend.

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use scm::{
    trim_ref, CallContext, Content, ContentInfo, ContentKind, ContentParams, ContentService,
    ListOptions, RepoSlug, ScmError, ScmResult,
};
use serde::Deserialize;
use tracing::instrument;

use crate::de::nullable;
use crate::transport::Transport;

/// [`ContentService`] over `api/v5/repos/{repo}/contents/{path}`.
#[derive(Debug, Clone)]
pub struct GiteeContents {
    transport: Transport,
}

impl GiteeContents {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ContentService for GiteeContents {
    #[instrument(skip(self, ctx), fields(repo = %repo))]
    async fn find(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
    ) -> ScmResult<Content> {
        let endpoint = contents_path(repo, path, reference);
        let out: ContentDto = self.transport.get(ctx, &endpoint).await?;
        let data = decode_content(&out.content)?;
        Ok(Content {
            path: out.path,
            data,
            sha: out.sha,
        })
    }

    #[instrument(skip(self, ctx, _opts), fields(repo = %repo))]
    async fn list(
        &self,
        ctx: &CallContext,
        repo: &RepoSlug,
        path: &str,
        reference: &str,
        _opts: ListOptions,
    ) -> ScmResult<Vec<ContentInfo>> {
        let endpoint = contents_path(repo, path, reference);
        let out: Vec<ContentDto> = self.transport.get(ctx, &endpoint).await?;
        Ok(out.into_iter().map(convert_content_info).collect())
    }

    async fn create(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _path: &str,
        _params: &ContentParams,
    ) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }

    async fn update(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _path: &str,
        _params: &ContentParams,
    ) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }

    async fn delete(
        &self,
        _ctx: &CallContext,
        _repo: &RepoSlug,
        _path: &str,
        _reference: &str,
    ) -> ScmResult<()> {
        Err(ScmError::NotSupported)
    }
}

fn contents_path(repo: &RepoSlug, path: &str, reference: &str) -> String {
    format!(
        "api/v5/repos/{repo}/contents/{}?ref={}",
        query_escape(path),
        query_escape(trim_ref(reference))
    )
}

/// Form-urlencodes `value` (`/` becomes `%2F`, space becomes `+`).
fn query_escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decodes a base64 file payload, accepting both padded and unpadded input.
///
/// Line breaks inside the payload are ignored.
pub(crate) fn decode_content(encoded: &str) -> ScmResult<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .collect();
    STANDARD
        .decode(&compact)
        .or_else(|_| STANDARD_NO_PAD.decode(&compact))
        .map_err(|e| ScmError::decode(format!("invalid base64 file content: {e}")))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ContentDto {
    #[serde(deserialize_with = "nullable")]
    pub path: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    #[serde(deserialize_with = "nullable")]
    pub sha: String,
}

pub(crate) fn convert_content_info(src: ContentDto) -> ContentInfo {
    ContentInfo {
        kind: convert_kind(&src.kind),
        path: src.path,
        sha: src.sha,
    }
}

fn convert_kind(kind: &str) -> ContentKind {
    match kind {
        "file" => ContentKind::File,
        "dir" => ContentKind::Directory,
        "symlink" => ContentKind::Symlink,
        "submodule" => ContentKind::Gitlink,
        _ => ContentKind::Unsupported,
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
