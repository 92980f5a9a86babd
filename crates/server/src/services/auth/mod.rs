//! Authentication service.
//!
//! Exchanges a phone and password for a bearer token, and resolves bearer
//! tokens back to the customer they were issued to.

mod error;

pub use error::AuthError;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use sqlx::PgPool;

use accounts_core::{AuthToken, CustomerId, Phone};

use super::{CredentialHasher, InternalError, TokenGenerator};
use crate::db::{CustomerRepository, TokenRepository};

/// Default token lifetime.
pub const DEFAULT_VALIDITY_WINDOW: TimeDelta = TimeDelta::hours(1);

/// Token authentication service.
///
/// Tokens go `issued -> valid -> expired` and are never revoked early.
pub struct TokenAuthenticator<'a> {
    customers: CustomerRepository<'a>,
    tokens: TokenRepository<'a>,
    hasher: &'a CredentialHasher,
    generator: TokenGenerator,
    validity_window: TimeDelta,
}

impl<'a> TokenAuthenticator<'a> {
    /// Create a new token authenticator with the default one hour window.
    #[must_use]
    pub fn new(pool: &'a PgPool, hasher: &'a CredentialHasher) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            tokens: TokenRepository::new(pool),
            hasher,
            generator: TokenGenerator::new(),
            validity_window: DEFAULT_VALIDITY_WINDOW,
        }
    }

    /// Replace the token generator.
    #[must_use]
    pub fn with_generator(mut self, generator: TokenGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the validity window.
    #[must_use]
    pub const fn with_validity_window(mut self, window: TimeDelta) -> Self {
        self.validity_window = window;
        self
    }

    /// The window after issuance during which a token is accepted.
    #[must_use]
    pub const fn validity_window(&self) -> TimeDelta {
        self.validity_window
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Issue a token for the customer owning `phone`.
    ///
    /// Blocked customers are not refused here; callers that care check
    /// `Customer::active`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoSuchUser` if no customer has this phone.
    /// Returns `AuthError::InvalidPassword` if the password does not match.
    /// Returns `AuthError::Internal` on storage, digest or entropy failure.
    pub async fn issue_token(
        &self,
        phone: &str,
        password: &SecretString,
    ) -> Result<AuthToken, AuthError> {
        let Ok(phone) = Phone::parse(phone) else {
            tracing::warn!("Token request with malformed phone");
            return Err(AuthError::NoSuchUser);
        };

        let Some(credentials) = self.customers.get_credentials_by_phone(&phone).await? else {
            tracing::warn!("Token request for unknown phone");
            return Err(AuthError::NoSuchUser);
        };

        let matches = self
            .hasher
            .verify_blocking(credentials.password_hash, password)
            .await
            .map_err(InternalError::from)?;
        if !matches {
            tracing::warn!(customer_id = %credentials.id, "Token request with wrong password");
            return Err(AuthError::InvalidPassword);
        }

        let token = self.generator.generate().map_err(InternalError::from)?;
        let created = Utc::now();
        self.tokens
            .create(&token, credentials.id, created, created + self.validity_window)
            .await?;

        tracing::info!(customer_id = %credentials.id, "Token issued");
        Ok(token)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Resolve a token to its customer as of now.
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate_token_at`].
    pub async fn authenticate_token(&self, token: &str) -> Result<CustomerId, AuthError> {
        self.authenticate_token_at(token, Utc::now()).await
    }

    /// Resolve a token to its customer as of `now`.
    ///
    /// Expired rows are left in place.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoSuchUser` if the token is unknown or malformed.
    /// Returns `AuthError::Expired` if more than the window has passed since issuance.
    /// Returns `AuthError::Internal` on storage failure.
    pub async fn authenticate_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<CustomerId, AuthError> {
        let Ok(token) = AuthToken::parse(token) else {
            tracing::debug!("Malformed bearer token");
            return Err(AuthError::NoSuchUser);
        };

        let record = self.tokens.get(&token).await?.ok_or(AuthError::NoSuchUser)?;

        if record.is_expired_at(now, self.validity_window) {
            tracing::warn!(customer_id = %record.customer_id, "Expired token presented");
            return Err(AuthError::Expired);
        }

        Ok(record.customer_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::error::Error as _;

    use sqlx::postgres::PgPoolOptions;

    use std::sync::Arc;

    use super::*;
    use crate::db::RepositoryError;
    use crate::services::tokens::tests::ExhaustedEntropy;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/accounts_unreachable")
            .unwrap_or_else(|e| panic!("lazy pool: {e}"))
    }

    #[tokio::test]
    async fn test_default_window_is_one_hour() {
        let pool = lazy_pool();
        let hasher = CredentialHasher::default();
        let auth = TokenAuthenticator::new(&pool, &hasher);
        assert_eq!(auth.validity_window(), TimeDelta::seconds(3600));
    }

    #[tokio::test]
    async fn test_window_override() {
        let pool = lazy_pool();
        let hasher = CredentialHasher::default();
        let auth = TokenAuthenticator::new(&pool, &hasher)
            .with_validity_window(TimeDelta::minutes(5));
        assert_eq!(auth.validity_window(), TimeDelta::minutes(5));
    }

    #[tokio::test]
    async fn test_malformed_token_is_no_such_user_without_query() {
        let pool = lazy_pool();
        let hasher = CredentialHasher::default();
        let auth = TokenAuthenticator::new(&pool, &hasher);

        let result = auth.authenticate_token("not-a-token").await;
        assert!(matches!(result, Err(AuthError::NoSuchUser)));
    }

    #[tokio::test]
    async fn test_malformed_phone_is_no_such_user_without_query() {
        let pool = lazy_pool();
        let hasher = CredentialHasher::default();
        let auth = TokenAuthenticator::new(&pool, &hasher);

        let password = SecretString::from("p".to_owned());
        let result = auth.issue_token("   ", &password).await;
        assert!(matches!(result, Err(AuthError::NoSuchUser)));
    }

    #[tokio::test]
    async fn test_with_generator_replaces_entropy() {
        let pool = lazy_pool();
        let hasher = CredentialHasher::default();
        let generator = TokenGenerator::with_entropy(Arc::new(ExhaustedEntropy));
        let auth = TokenAuthenticator::new(&pool, &hasher).with_generator(generator);

        let err = AuthError::from(InternalError::from(auth.generator.generate().unwrap_err()));
        assert!(matches!(err, AuthError::Internal(InternalError::Entropy(_))));
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn test_repository_errors_map() {
        assert!(matches!(
            AuthError::from(RepositoryError::NotFound),
            AuthError::NoSuchUser
        ));

        let err = AuthError::from(RepositoryError::Conflict("token already exists".to_owned()));
        assert!(matches!(err, AuthError::Internal(_)));
        assert_eq!(err.to_string(), "internal error");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_reason_kinds() {
        assert_eq!(AuthError::NoSuchUser.reason(), "no_such_user");
        assert_eq!(AuthError::InvalidPassword.reason(), "invalid_password");
        assert_eq!(AuthError::Expired.reason(), "expired");
    }
}
