//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::InternalError;

/// Errors that can occur while issuing or validating tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No customer with that phone, or no such token.
    #[error("no such user")]
    NoSuchUser,

    /// The customer exists but the password does not match.
    #[error("invalid password")]
    InvalidPassword,

    /// The token is older than the validity window.
    #[error("token expired")]
    Expired,

    /// Storage, hashing or entropy fault. The cause is the error source.
    #[error("internal error")]
    Internal(#[from] InternalError),
}

impl AuthError {
    /// Short machine-readable kind, used as the `reason` in failure payloads.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NoSuchUser => "no_such_user",
            Self::InvalidPassword => "invalid_password",
            Self::Expired => "expired",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NoSuchUser,
            other => Self::Internal(other.into()),
        }
    }
}
