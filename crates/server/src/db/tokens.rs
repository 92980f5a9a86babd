//! Token repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use accounts_core::{AuthToken, CustomerId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::TokenRecord;

/// Internal row type for `PostgreSQL` token queries.
#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    customer_id: CustomerId,
    created: DateTime<Utc>,
}

impl From<TokenRow> for TokenRecord {
    fn from(row: TokenRow) -> Self {
        Self {
            customer_id: row.customer_id,
            created: row.created,
        }
    }
}

/// Repository for `customers_tokens`. Rows are inserted and read, never updated.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the token value already exists.
    /// Returns `RepositoryError::Database` for other database errors
    /// (including a customer that was deleted in the meantime).
    pub async fn create(
        &self,
        token: &AuthToken,
        customer_id: CustomerId,
        created: DateTime<Utc>,
        expire: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO customers_tokens (token, customer_id, expire, created)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(token)
        .bind(customer_id)
        .bind(expire)
        .bind(created)
        .execute(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "token"))?;

        Ok(())
    }

    /// Look up a token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, token: &AuthToken) -> Result<Option<TokenRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            SELECT customer_id, created
            FROM customers_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
