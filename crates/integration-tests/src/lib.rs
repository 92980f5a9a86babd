//! Integration tests for the accounts service.
//!
//! # Running Tests
//!
//! The tests talk to a real `PostgreSQL` database and are `#[ignore]`d by
//! default. Point `TEST_DATABASE_URL` at a disposable database and run:
//!
//! ```bash
//! TEST_DATABASE_URL=postgres://localhost/accounts_test \
//!     cargo test -p accounts-integration-tests -- --ignored
//! ```
//!
//! Migrations are applied on connect. Tests share the database, so each one
//! works with freshly generated phones and logins and never asserts on the
//! full contents of a table.
//!
//! # Test Categories
//!
//! - `customers` - Customer repository semantics
//! - `tokens` - Token issuance and validation
//! - `managers` - Staff credentials and the HTTP surface

use std::sync::Arc;

use chrono::TimeDelta;
use secrecy::SecretString;
use sqlx::PgPool;

use accounts_core::Phone;
use accounts_server::db;
use accounts_server::models::{NewCustomer, SaveCustomer};
use accounts_server::services::{
    CredentialHasher, CustomerService, EntropyError, EntropySource, TokenAuthenticator,
    TokenGenerator,
};
use accounts_server::state::AppState;

/// Shared fixtures for one test.
pub struct TestContext {
    pub pool: PgPool,
    pub hasher: CredentialHasher,
}

impl TestContext {
    /// Connect to `TEST_DATABASE_URL` and apply migrations.
    ///
    /// # Panics
    ///
    /// Panics if the variable is unset or the database is unreachable.
    pub async fn new() -> Self {
        let url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must point at a disposable PostgreSQL database");
        let pool = db::create_pool(&SecretString::from(url), 5)
            .await
            .expect("Failed to connect to test database");
        db::migrate(&pool).await.expect("Failed to run migrations");

        Self {
            pool,
            // Cheapest valid work factor keeps the suite fast
            hasher: CredentialHasher::new(8, 1, 1).expect("valid hashing parameters"),
        }
    }

    /// Customer service over the test pool.
    #[must_use]
    pub const fn customers(&self) -> CustomerService<'_> {
        CustomerService::new(&self.pool, &self.hasher)
    }

    /// Token authenticator over the test pool with the default window.
    #[must_use]
    pub fn authenticator(&self) -> TokenAuthenticator<'_> {
        TokenAuthenticator::new(&self.pool, &self.hasher)
    }

    /// The test hasher, but unable to draw salts.
    #[must_use]
    pub fn hasher_without_entropy(&self) -> CredentialHasher {
        self.hasher.clone().with_entropy(Arc::new(FailingEntropy))
    }

    /// Token authenticator whose generator cannot draw random bytes.
    #[must_use]
    pub fn authenticator_without_entropy(&self) -> TokenAuthenticator<'_> {
        self.authenticator()
            .with_generator(TokenGenerator::with_entropy(Arc::new(FailingEntropy)))
    }

    /// Application state for driving the router.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::from_parts(self.pool.clone(), self.hasher.clone(), TimeDelta::hours(1))
    }
}

/// An entropy source that always fails.
#[derive(Debug)]
pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _buf: &mut [u8]) -> Result<(), EntropyError> {
        Err(EntropyError::new("entropy source unavailable"))
    }
}

/// A phone number no other test run is using.
///
/// # Panics
///
/// Never in practice; the generated value is always a valid phone.
#[must_use]
pub fn unique_phone() -> Phone {
    let digits: u64 = rand::random::<u64>() % 10_000_000_000_000;
    Phone::parse(&format!("+9{digits:013}")).expect("generated phone is valid")
}

/// A manager login no other test run is using.
#[must_use]
pub fn unique_login() -> String {
    format!("manager-{:016x}", rand::random::<u64>())
}

/// Shorthand for a plaintext secret.
#[must_use]
pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

/// Build a new-customer save request.
#[must_use]
pub fn new_customer(name: &str, phone: &Phone, password: &str) -> SaveCustomer {
    SaveCustomer::New(NewCustomer {
        name: name.to_owned(),
        phone: phone.clone(),
        password: secret(password),
    })
}
