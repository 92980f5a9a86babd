//! Manager (staff) repository for database operations.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use accounts_core::ManagerId;

use super::{RepositoryError, conflict_on_unique};

/// Repository for `managers`, used by the basic-auth guard and the CLI.
pub struct ManagerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ManagerRepository<'a> {
    /// Create a new manager repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a manager with this login and password exists.
    ///
    /// The stored password is compared as-is with the presented one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn check_credentials(
        &self,
        login: &str,
        password: &SecretString,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM managers WHERE login = $1 AND password = $2
            )
            ",
        )
        .bind(login)
        .bind(password.expose_secret())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a manager.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the login is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        login: &str,
        password: &SecretString,
        department: Option<&str>,
    ) -> Result<ManagerId, RepositoryError> {
        let id: ManagerId = sqlx::query_scalar(
            r"
            INSERT INTO managers (name, login, password, department)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(login)
        .bind(password.expose_secret())
        .bind(department)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "login"))?;

        Ok(id)
    }
}
