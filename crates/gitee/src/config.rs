//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Public Gitee endpoint.
pub const DEFAULT_BASE_URL: &str = "https://gitee.com/";

/// Connection settings for a Gitee (or Gitee Enterprise) instance.
///
/// Every field has a default, so an empty `[gitee]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GiteeConfig {
    /// REST base URL. Relative API paths are resolved against it.
    pub base_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for GiteeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("scm-gitee/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GiteeConfig {
    /// Settings pointing at `base_url`, other fields defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
