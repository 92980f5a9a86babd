//! Customer domain types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use accounts_core::{CustomerId, Phone};

/// A customer account (domain type).
///
/// Carries no password material: the stored hash is only ever read through
/// [`CustomerCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Storage-assigned customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Login phone number.
    pub phone: Phone,
    /// `false` once the account has been blocked.
    pub active: bool,
    /// When the account was created.
    pub created: DateTime<Utc>,
}

/// Input for creating a customer that has never been persisted.
#[derive(Debug)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Phone,
    pub password: SecretString,
}

/// Input for replacing name, phone and password of a persisted customer.
#[derive(Debug)]
pub struct ExistingCustomer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Phone,
    pub password: SecretString,
}

/// What a save should do: insert a new row or update an existing one.
#[derive(Debug)]
pub enum SaveCustomer {
    New(NewCustomer),
    Existing(ExistingCustomer),
}

/// The stored password hash of a customer, looked up by phone at login.
pub struct CustomerCredentials {
    pub id: CustomerId,
    pub password_hash: String,
}

impl std::fmt::Debug for CustomerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerCredentials")
            .field("id", &self.id)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
