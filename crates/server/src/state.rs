//! Application state shared across handlers.

use std::sync::Arc;

use chrono::TimeDelta;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::{CredentialHasher, CustomerService, HashingError, TokenAuthenticator};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    hasher: CredentialHasher,
    validity_window: TimeDelta,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing work factor is invalid.
    pub fn new(config: &ServerConfig, pool: PgPool) -> Result<Self, HashingError> {
        let hasher = config.hashing.hasher()?;
        Ok(Self::from_parts(pool, hasher, config.validity_window()))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(pool: PgPool, hasher: CredentialHasher, validity_window: TimeDelta) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                hasher,
                validity_window,
            }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Customer service bound to this state's pool and hasher.
    #[must_use]
    pub fn customers(&self) -> CustomerService<'_> {
        CustomerService::new(&self.inner.pool, &self.inner.hasher)
    }

    /// Token authenticator bound to this state's pool, hasher and window.
    #[must_use]
    pub fn authenticator(&self) -> TokenAuthenticator<'_> {
        TokenAuthenticator::new(&self.inner.pool, &self.inner.hasher)
            .with_validity_window(self.inner.validity_window)
    }
}
