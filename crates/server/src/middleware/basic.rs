//! HTTP Basic authentication for staff routes.
//!
//! Every customer-management route is guarded by [`require_manager`], which
//! checks `Authorization: Basic <base64(login:password)>` against the
//! `managers` table.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::SecretString;

use crate::db::ManagerRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Login and password decoded from a Basic authorization header.
pub struct BasicCredentials {
    pub login: String,
    pub password: SecretString,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decode a Basic authorization header value.
///
/// The scheme is matched case-insensitively and the decoded payload is split
/// at the first colon, so passwords may themselves contain colons.
#[must_use]
pub fn parse_basic(value: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        login: login.to_owned(),
        password: SecretString::from(password.to_owned()),
    })
}

/// Middleware that requires a known manager.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the header is missing or garbled,
/// the credentials match no manager, or the lookup itself fails.
pub async fn require_manager(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic)
        .ok_or_else(|| AppError::Unauthorized("manager credentials required".to_string()))?;

    let known = ManagerRepository::new(state.pool())
        .check_credentials(&credentials.login, &credentials.password)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Manager lookup failed");
            false
        });

    if !known {
        tracing::warn!(login = %credentials.login, "Rejected manager credentials");
        return Err(AppError::Unauthorized(
            "invalid manager credentials".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
