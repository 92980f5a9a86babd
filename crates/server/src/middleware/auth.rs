//! Bearer token extractor for customer routes.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use accounts_core::CustomerId;

use crate::error::AppError;
use crate::services::AuthError;
use crate::state::AppState;

/// Extractor that requires a valid customer bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCustomerAuth(customer_id): RequireCustomerAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, customer {customer_id}!")
/// }
/// ```
pub struct RequireCustomerAuth(pub CustomerId);

/// Extract the token from an `Authorization: Bearer <token>` value.
#[must_use]
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for RequireCustomerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::NoSuchUser)?;

        let customer_id = state.authenticator().authenticate_token(token).await?;
        Ok(Self(customer_id))
    }
}
