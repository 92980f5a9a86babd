//! Password hashing.
//!
//! Argon2id with a tunable work factor. Salts are drawn from an
//! [`EntropySource`], the OS RNG unless another one is supplied.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::tokens::{EntropyError, EntropySource, OsEntropy};

/// Salt length in bytes.
const SALT_LENGTH: usize = 16;

/// Errors raised by [`CredentialHasher`].
#[derive(Debug, Error)]
pub enum HashingError {
    /// The configured work factor is out of range.
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(argon2::Error),

    /// No salt could be drawn.
    #[error("salt generation failed: {0}")]
    Salt(#[from] EntropyError),

    /// The stored digest is not a parseable PHC string.
    #[error("malformed password digest")]
    MalformedDigest,

    /// The hash primitive itself failed.
    #[error("password hashing failed: {0}")]
    Primitive(argon2::password_hash::Error),

    /// The blocking task running the hash panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One-way password hasher.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
    entropy: Arc<dyn EntropySource>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
            entropy: Arc::new(OsEntropy),
        }
    }
}

impl CredentialHasher {
    /// Build a hasher with an explicit work factor.
    ///
    /// # Arguments
    ///
    /// * `memory_kib` - Memory cost in KiB (at least `8 * parallelism`)
    /// * `iterations` - Number of passes (at least 1)
    /// * `parallelism` - Degree of parallelism (at least 1)
    ///
    /// # Errors
    ///
    /// Returns `HashingError::InvalidParams` if any cost is out of range.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HashingError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(HashingError::InvalidParams)?;
        Ok(Self {
            params,
            entropy: Arc::new(OsEntropy),
        })
    }

    /// Draw salts from `entropy` instead of the OS RNG.
    #[must_use]
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `HashingError` if no salt can be drawn or the primitive fails.
    pub fn hash(&self, password: &SecretString) -> Result<String, HashingError> {
        let mut salt = [0u8; SALT_LENGTH];
        self.entropy.fill(&mut salt)?;
        let salt = SaltString::encode_b64(&salt).map_err(HashingError::Primitive)?;

        self.argon2()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(HashingError::Primitive)
    }

    /// Check a password against a stored digest.
    ///
    /// The digest carries its own parameters, so hashes made under an older
    /// work factor still verify.
    ///
    /// # Errors
    ///
    /// Returns `HashingError::MalformedDigest` if `digest` cannot be parsed.
    /// A wrong password is `Ok(false)`, not an error.
    pub fn verify(&self, digest: &str, password: &SecretString) -> Result<bool, HashingError> {
        let parsed = PasswordHash::new(digest).map_err(|_| HashingError::MalformedDigest)?;

        match self
            .argon2()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashingError::Primitive(e)),
        }
    }

    /// [`Self::hash`] on the blocking thread pool, off the async workers.
    ///
    /// # Errors
    ///
    /// Same as [`Self::hash`], plus `HashingError::Task` if the task dies.
    pub async fn hash_blocking(&self, password: &SecretString) -> Result<String, HashingError> {
        let hasher = self.clone();
        let password = SecretString::from(password.expose_secret().to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    /// [`Self::verify`] on the blocking thread pool, off the async workers.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify`], plus `HashingError::Task` if the task dies.
    pub async fn verify_blocking(
        &self,
        digest: String,
        password: &SecretString,
    ) -> Result<bool, HashingError> {
        let hasher = self.clone();
        let password = SecretString::from(password.expose_secret().to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password)).await?
    }
}
