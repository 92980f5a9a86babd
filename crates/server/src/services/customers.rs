//! Customer service.
//!
//! Owns the create-vs-update decision and the password hashing that has to
//! happen before anything reaches storage.

use sqlx::PgPool;
use thiserror::Error;

use accounts_core::CustomerId;

use super::{CredentialHasher, InternalError};
use crate::db::{CustomerRepository, RepositoryError};
use crate::models::{Customer, SaveCustomer};

/// Errors returned by customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// No customer with the requested ID.
    #[error("customer not found")]
    NotFound,

    /// Another customer already uses this phone.
    #[error("phone already registered")]
    PhoneTaken,

    /// Storage, hashing or entropy fault. The cause is the error source.
    #[error("internal error")]
    Internal(#[from] InternalError),
}

impl From<RepositoryError> for CustomerError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(_) => Self::PhoneTaken,
            other => Self::Internal(other.into()),
        }
    }
}

/// Customer lifecycle operations.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
    hasher: &'a CredentialHasher,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, hasher: &'a CredentialHasher) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            hasher,
        }
    }

    /// All customers, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn all(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.customers.list_all().await?)
    }

    /// Customers that are not blocked, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn all_active(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.customers.list_active().await?)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this ID.
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        tracing::debug!(customer_id = %id, "Looking up customer");
        self.customers
            .get_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound)
    }

    /// Insert a new customer or update an existing one.
    ///
    /// The password is hashed first; if hashing fails nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if an update targets a missing ID.
    /// Returns `CustomerError::PhoneTaken` if the phone belongs to someone else.
    /// Returns `CustomerError::Internal` on storage or hashing failure.
    pub async fn save(&self, customer: SaveCustomer) -> Result<Customer, CustomerError> {
        match customer {
            SaveCustomer::New(new) => {
                let password_hash = self
                    .hasher
                    .hash_blocking(&new.password)
                    .await
                    .map_err(InternalError::from)?;
                let saved = self
                    .customers
                    .create(&new.name, &new.phone, &password_hash)
                    .await?;

                tracing::info!(customer_id = %saved.id, "Customer created");
                Ok(saved)
            }
            SaveCustomer::Existing(existing) => {
                let password_hash = self
                    .hasher
                    .hash_blocking(&existing.password)
                    .await
                    .map_err(InternalError::from)?;
                let saved = self
                    .customers
                    .update(existing.id, &existing.name, &existing.phone, &password_hash)
                    .await?;

                tracing::info!(customer_id = %saved.id, "Customer updated");
                Ok(saved)
            }
        }
    }

    /// Delete a customer, returning the row as it was.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this ID.
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn remove_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        let removed = self.customers.delete(id).await?;
        tracing::info!(customer_id = %id, "Customer removed");
        Ok(removed)
    }

    /// Mark a customer as blocked.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this ID.
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn block_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        let customer = self.customers.set_active(id, false).await?;
        tracing::info!(customer_id = %id, "Customer blocked");
        Ok(customer)
    }

    /// Mark a customer as active again.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this ID.
    /// Returns `CustomerError::Internal` on storage failure.
    pub async fn unblock_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        let customer = self.customers.set_active(id, true).await?;
        tracing::info!(customer_id = %id, "Customer unblocked");
        Ok(customer)
    }
}
