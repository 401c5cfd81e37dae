//! Authenticated JSON transport over the Gitee REST API.
//!
//! [`Transport`] is the only place that performs network I/O. It resolves a
//! relative API path against the configured base URL, attaches the caller's
//! bearer token, serialises the request body, and classifies the reply:
//!
//! - 2xx: the body is decoded into the caller's destination type. An empty
//!   body yields the destination's `Default` value.
//! - anything else: [`ScmError::Transport`] carrying the raw [`Response`].
//!
//! It never retries and never caches. Timeouts and cancellation belong to the
//! underlying `reqwest` client and to the caller dropping the future.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use scm::{CallContext, Response, ScmError, ScmResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::GiteeConfig;

/// Bytes escaped inside a single path segment: the `url` path set plus `%`
/// and `\`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Shared HTTP transport. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    /// Builds a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::InvalidInput`] if the base URL does not parse or is
    /// not `http`/`https`, and [`ScmError::Transport`] if the HTTP client
    /// cannot be initialised.
    pub fn new(config: &GiteeConfig) -> ScmResult<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| ScmError::InvalidInput {
            message: format!("invalid base url {:?}: {e}", config.base_url),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ScmError::InvalidInput {
                message: format!("unsupported base url scheme {:?}", base_url.scheme()),
            });
        }
        // Without a trailing slash `join` would drop the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ScmError::transport(format!("failed to build http client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// The normalised base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL.
    pub(crate) fn url(&self, path: &str) -> ScmResult<Url> {
        self.base_url.join(path).map_err(|e| ScmError::InvalidInput {
            message: format!("invalid request path {path:?}: {e}"),
        })
    }

    /// Issues a `GET` and decodes the reply.
    pub(crate) async fn get<T>(&self, ctx: &CallContext, path: &str) -> ScmResult<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        self.call(ctx, Method::GET, path, None::<&()>)
            .await
            .map(|(value, _)| value)
    }

    /// Issues a request with a JSON body and decodes the reply.
    pub(crate) async fn send<B, T>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: &B,
    ) -> ScmResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Default + Send,
    {
        self.call(ctx, method, path, Some(body))
            .await
            .map(|(value, _)| value)
    }

    /// Performs one request and returns the decoded value together with the
    /// raw response metadata.
    pub(crate) async fn call<B, T>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ScmResult<(T, Response)>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Default + Send,
    {
        let url = self.url(path)?;
        debug!(%method, %url, "sending backend request");

        let mut request = self.http.request(method, url);
        if let Some(token) = ctx.token() {
            request = request.bearer_auth(&token.token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let reply = request
            .send()
            .await
            .map_err(|e| ScmError::transport(e.to_string()))?;
        let response = read_response(reply).await?;
        debug!(status = response.status, "backend responded");

        if !response.is_success() {
            warn!(status = response.status, "backend returned an error status");
            return Err(ScmError::status(response));
        }

        let value = decode_body(&response.body)?;
        Ok((value, response))
    }
}

async fn read_response(reply: reqwest::Response) -> ScmResult<Response> {
    let status = reply.status().as_u16();
    let headers = reply
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = reply
        .bytes()
        .await
        .map_err(|e| ScmError::transport(format!("failed to read response body: {e}")))?
        .to_vec();
    Ok(Response {
        status,
        headers,
        body,
    })
}

/// Percent-encodes each `/`-separated segment of `value`, keeping the `/`
/// separators so that names like `feature/x` still address nested paths.
pub(crate) fn escape_path(value: &str) -> String {
    value
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decodes a 2xx body. Whitespace-only bodies decode to `T::default()`.
pub(crate) fn decode_body<T>(body: &[u8]) -> ScmResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ScmError::decode(e.to_string()))
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
