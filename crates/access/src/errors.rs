use scm::{BoxError, ScmError};
use thiserror::Error;

/// Errors returned by [`crate::GitService`].
#[derive(Debug, Error)]
pub enum AccessError {
    /// The call was made without a signed-in account.
    #[error("no authenticated account")]
    Unauthenticated,

    /// The [`crate::Renewer`] could not produce a usable token.
    #[error("credential renewal failed for {login}: {source}")]
    Renewal {
        login: String,
        #[source]
        source: BoxError,
    },

    /// The backend call itself failed.
    #[error(transparent)]
    Scm(#[from] ScmError),
}

impl AccessError {
    /// Returns the underlying service error, if the failure came from the
    /// backend call rather than from credential handling.
    pub fn scm(&self) -> Option<&ScmError> {
        match self {
            Self::Scm(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` when the backend has no equivalent for the operation.
    pub fn is_not_supported(&self) -> bool {
        self.scm().is_some_and(ScmError::is_not_supported)
    }
}
