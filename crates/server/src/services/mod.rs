//! Business logic services.
//!
//! # Services
//!
//! - `credentials` - Argon2id password hashing and verification
//! - `tokens` - Entropy sources and bearer token generation
//! - `customers` - Customer lifecycle (save, block/unblock, removal)
//! - `auth` - Token issuance and validation

pub mod auth;
pub mod credentials;
pub mod customers;
pub mod tokens;

use thiserror::Error;

use crate::db::RepositoryError;

pub use auth::{AuthError, TokenAuthenticator};
pub use credentials::{CredentialHasher, HashingError};
pub use customers::{CustomerError, CustomerService};
pub use tokens::{EntropyError, EntropySource, OsEntropy, TokenGenerator};

/// Cause of an `Internal` failure.
///
/// Carried as the `source()` of the service errors so it can be logged, while
/// the service error itself only ever displays "internal error".
#[derive(Debug, Error)]
pub enum InternalError {
    /// Storage or transport fault.
    #[error("storage failure: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing fault.
    #[error("hashing failure: {0}")]
    Hashing(#[from] HashingError),

    /// Randomness fault.
    #[error("entropy failure: {0}")]
    Entropy(#[from] EntropyError),
}
