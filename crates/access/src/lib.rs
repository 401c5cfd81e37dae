//! Credentialed access to a source-control backend.
//!
//! Callers hold an [`Account`] (the signed-in user and their stored OAuth
//! credentials). Before each backend call, [`GitService`] asks a [`Renewer`]
//! for a current token, places it on a fresh [`scm::CallContext`], and only
//! then delegates to the [`scm::Client`] services.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** This crate sequences credential renewal and service
//! calls. It has no knowledge of any particular backend; the [`scm::Client`]
//! it wraps is built elsewhere (see the `gitee` crate).
//!
//! ## Failure ordering
//!
//! A missing account fails with [`AccessError::Unauthenticated`] and a failed
//! renewal with [`AccessError::Renewal`]. In both cases no backend request is
//! issued.

mod account;
mod errors;
mod service;

pub use account::{Account, PassthroughRenewer, Renewer};
pub use errors::AccessError;
pub use service::GitService;
