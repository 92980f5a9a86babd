//! Customer token route handlers.

use axum::{
    Json,
    extract::{Form, State, rejection::FormRejection},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireCustomerAuth;
use crate::models::Customer;
use crate::state::AppState;

/// Form body of `/customers.token`.
#[derive(Deserialize)]
pub struct TokenForm {
    pub phone: String,
    pub password: String,
}

/// Response body of `/customers.token`.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /customers.token`
#[instrument(skip_all)]
pub async fn issue(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let password = SecretString::from(form.password);

    let token = state
        .authenticator()
        .issue_token(&form.phone, &password)
        .await?;

    Ok(Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// `GET /customers.me`
#[instrument(skip_all)]
pub async fn me(
    RequireCustomerAuth(customer_id): RequireCustomerAuth,
    State(state): State<AppState>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers().by_id(customer_id).await?))
}
