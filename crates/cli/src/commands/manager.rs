//! Manager account commands.
//!
//! # Usage
//!
//! ```bash
//! accounts-cli manager create -l alice -p 's3cret' -n "Alice" -d sales
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;

use accounts_core::ManagerId;
use accounts_server::db::{ManagerRepository, RepositoryError};

use super::{CliError, connect};

/// Create a new manager.
///
/// # Arguments
///
/// * `login` - Login for HTTP Basic auth
/// * `password` - Password for HTTP Basic auth
/// * `name` - Display name
/// * `department` - Optional department
///
/// # Returns
///
/// The ID of the created manager.
///
/// # Errors
///
/// Returns `CliError::LoginTaken` if the login is already in use.
pub async fn create(
    login: &str,
    password: &SecretString,
    name: &str,
    department: Option<&str>,
) -> Result<ManagerId, CliError> {
    let pool = connect().await?;

    tracing::info!("Creating manager: {}", login);
    let id = ManagerRepository::new(&pool)
        .create(name, login, password, department)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CliError::LoginTaken(login.to_owned()),
            other => CliError::Repository(other),
        })?;

    tracing::info!("Manager created with ID: {}", id);
    Ok(id)
}
