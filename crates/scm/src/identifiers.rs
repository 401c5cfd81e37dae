//! Newtype identifiers for backend-addressed resources.
//!
//! Service methods take these rather than bare strings so that a hook id can
//! never be passed where a repository slug is expected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a repository webhook registration.
    ///
    /// Backend-assigned; opaque to the adapter.
    HookId
}

string_id! {
    /// A user login handle (e.g. `"octocat"`).
    Login
}

// ---------------------------------------------------------------------------
// Repository slug
// ---------------------------------------------------------------------------

/// Identifies a repository to the backend in `"namespace/name"` format.
///
/// The namespace may itself contain `/` (nested groups); the name is the last
/// path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug(String);

impl RepoSlug {
    /// Parses a slug, returning `None` unless it has a namespace and a name.
    ///
    /// Every `/`-separated segment must be non-empty, must not be `.` or
    /// `..`, and must not contain whitespace, control characters, or any of
    /// `?`, `#`, `%`, `\`. The slug is interpolated into request paths
    /// verbatim.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        (v.contains('/') && v.split('/').all(is_valid_segment)).then_some(Self(v))
    }

    /// Builds a slug from its two halves.
    pub fn from_parts(namespace: &str, name: &str) -> Option<Self> {
        Self::new(format!("{namespace}/{name}"))
    }

    /// Returns the full slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns everything before the final `/`.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('/').map(|(ns, _)| ns).unwrap_or_default()
    }

    /// Returns the final path segment.
    pub fn name(&self) -> &str {
        self.0.rsplit_once('/').map(|(_, n)| n).unwrap_or_default()
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '%' | '\\'))
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| format!("invalid repository slug {s:?}: expected namespace/name"))
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(value: RepoSlug) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
