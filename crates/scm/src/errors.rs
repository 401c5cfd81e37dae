//! Error and retry-policy types shared by every source-control service.
//!
//! [`ScmError`] is the only error a Resource Service or the Webhook Service
//! returns. Each variant is a distinct condition callers may branch on; in
//! particular [`ScmError::NotSupported`] is the single capability-gap marker
//! for every backend, so one `is_not_supported()` check covers all services.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the adapter never retries on its
//! own, but every [`ScmError`] can tell the caller whether a retry is sensible.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::Response;
use crate::webhook::Webhook;

/// Boxed error returned by caller-supplied collaborators (secret resolvers,
/// credential renewers) whose concrete error type the adapter does not know.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias used throughout the service traits.
pub type ScmResult<T> = Result<T, ScmError>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Produced by [`ScmError::retry_policy`] so that callers can decide whether
/// to re-issue an operation. The adapter itself never acts on it.
///
/// - `Retryable` errors: connection failures, `429 Too Many Requests`, `5xx`.
/// - `NonRetryable` errors: every other status, decode failures, capability
///   gaps, webhook rejections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (derived
    /// from the `Retry-After` response header when the backend sends one).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Errors produced by the source-control services.
///
/// Nothing here is fatal to the process: every failure is per-call and is
/// handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The request could not be completed, either because the network call
    /// itself failed (`response` is `None`) or because the backend answered
    /// with a non-2xx status (`response` carries the raw reply).
    #[error("transport error: {message}")]
    Transport {
        /// Human-readable description of the failure.
        message: String,
        /// The raw backend response, present for non-2xx replies.
        response: Option<Box<Response>>,
    },

    /// A backend payload (JSON body or content encoding) could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// A lookup completed successfully but found no matching entity.
    #[error("not found")]
    NotFound,

    /// The backend has no equivalent for the requested operation.
    #[error("operation not supported by this backend")]
    NotSupported,

    /// The webhook event-type header did not name a known event family.
    ///
    /// Raised before the payload is parsed.
    #[error("unknown webhook event: {event:?}")]
    UnknownEvent {
        /// The header value that was received (empty if the header was missing).
        event: String,
    },

    /// The webhook secret header did not match the expected secret.
    ///
    /// The parsed event is attached so the caller can audit what was received.
    #[error("invalid webhook signature")]
    SignatureInvalid {
        /// The event parsed from the rejected request.
        webhook: Box<Webhook>,
    },

    /// The caller-supplied secret resolver failed.
    ///
    /// The parsed event is attached so the caller can log what was received.
    #[error("webhook secret resolution failed: {source}")]
    SecretResolution {
        /// The event parsed from the request.
        webhook: Box<Webhook>,
        /// The resolver's error.
        #[source]
        source: BoxError,
    },

    /// An argument or configuration value was rejected before any I/O.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected value.
        message: String,
    },
}

impl ScmError {
    /// Builds a [`ScmError::Transport`] for a failed network call.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            response: None,
        }
    }

    /// Builds a [`ScmError::Transport`] carrying a non-2xx backend response.
    pub fn status(response: Response) -> Self {
        Self::Transport {
            message: format!("backend responded with status {}", response.status),
            response: Some(Box::new(response)),
        }
    }

    /// Builds a [`ScmError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns `true` for the capability-gap marker.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported)
    }

    /// Returns `true` if a lookup found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns the raw backend response for non-2xx transport failures.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Transport { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// Returns the parsed webhook attached to a rejected or unresolved request.
    pub fn webhook(&self) -> Option<&Webhook> {
        match self {
            Self::SignatureInvalid { webhook } | Self::SecretResolution { webhook, .. } => {
                Some(webhook.as_ref())
            }
            _ => None,
        }
    }

    /// Classifies this error for the caller's retry decision.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { response: None, .. } => RetryPolicy::Retryable { after: None },
            Self::Transport {
                response: Some(response),
                ..
            } if response.status == 429 || response.status >= 500 => RetryPolicy::Retryable {
                after: response.retry_after(),
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
