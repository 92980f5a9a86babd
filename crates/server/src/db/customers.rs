//! Customer repository for database operations.
//!
//! Plain SQL over `customers`. Hashing happens one layer up in
//! [`crate::services::customers`]; this module only ever sees hashes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use accounts_core::{CustomerId, Phone};

use super::{RepositoryError, conflict_on_unique};
use crate::models::{Customer, CustomerCredentials};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` customer queries.
///
/// `phone` is re-validated on decode; a stored value that no longer parses
/// surfaces as `RepositoryError::DataCorruption`.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    phone: Phone,
    active: bool,
    created: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            active: row.active,
            created: row.created,
        }
    }
}

/// Internal row type for the login lookup.
#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: CustomerId,
    password: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored phone is invalid.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, phone, active, created
            FROM customers
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List customers that are not blocked, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored phone is invalid.
    pub async fn list_active(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, phone, active, created
            FROM customers
            WHERE active
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored phone is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, phone, active, created
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a customer. Storage assigns the ID and `active` defaults to true.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        phone: &Phone,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (name, phone, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, active, created
            ",
        )
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "phone"))?;

        Ok(row.into())
    }

    /// Replace name, phone and password hash of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Conflict` if the phone belongs to another customer.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        name: &str,
        phone: &Phone,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET name = $2, phone = $3, password = $4
            WHERE id = $1
            RETURNING id, name, phone, active, created
            ",
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "phone"))?;

        Ok(row.ok_or(RepositoryError::NotFound)?.into())
    }

    /// Delete a customer, returning the row as it was before deletion.
    ///
    /// Tokens issued to the customer are removed by the foreign key cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            DELETE FROM customers
            WHERE id = $1
            RETURNING id, name, phone, active, created
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.ok_or(RepositoryError::NotFound)?.into())
    }

    /// Set the `active` flag and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this ID.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_active(
        &self,
        id: CustomerId,
        active: bool,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET active = $2
            WHERE id = $1
            RETURNING id, name, phone, active, created
            ",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.ok_or(RepositoryError::NotFound)?.into())
    }

    /// Get a customer's ID and password hash by phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials_by_phone(
        &self,
        phone: &Phone,
    ) -> Result<Option<CustomerCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r"
            SELECT id, password
            FROM customers
            WHERE phone = $1
            ",
        )
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| CustomerCredentials {
            id: r.id,
            password_hash: r.password,
        }))
    }
}
