//! Helpers for normalising git ref names.

const HEADS: &str = "refs/heads/";
const TAGS: &str = "refs/tags/";

/// Strips a leading `refs/heads/` and then a leading `refs/tags/`.
pub fn trim_ref(reference: &str) -> &str {
    let reference = reference.strip_prefix(HEADS).unwrap_or(reference);
    reference.strip_prefix(TAGS).unwrap_or(reference)
}

/// Restores a full ref path.
///
/// Names already under `refs/` are returned unchanged; otherwise `prefix`
/// (with any trailing `/` removed) and `name` are joined with a single `/`.
pub fn expand_ref(name: &str, prefix: &str) -> String {
    if name.starts_with("refs/") {
        return name.to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), name)
}

/// Returns `true` if `reference` is a full tag path.
pub fn is_tag(reference: &str) -> bool {
    reference.starts_with(TAGS)
}

/// Returns `true` if `reference` is a full branch path.
pub fn is_branch(reference: &str) -> bool {
    reference.starts_with(HEADS)
}

#[cfg(test)]
#[path = "refs_tests.rs"]
mod tests;
