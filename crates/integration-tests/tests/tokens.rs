//! Integration tests for token issuance and validation.
//!
//! These tests require a disposable `PostgreSQL` database in
//! `TEST_DATABASE_URL`. Run with: `cargo test -p accounts-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use chrono::{TimeDelta, Utc};

use accounts_core::{AuthToken, CustomerId};
use accounts_integration_tests::{TestContext, new_customer, secret, unique_phone};
use accounts_server::services::{AuthError, InternalError};

async fn tokens_for(ctx: &TestContext, customer_id: CustomerId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers_tokens WHERE customer_id = $1")
        .bind(customer_id.as_i64())
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_issue_and_authenticate() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let auth = ctx.authenticator();
    let token = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();

    assert_eq!(token.expose().len(), 64);
    assert!(token.expose().bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(auth.authenticate_token(token.expose()).await.unwrap(), saved.id);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_token_expires_after_window() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let auth = ctx.authenticator();
    let token = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();

    let within = Utc::now() + TimeDelta::minutes(59);
    assert_eq!(
        auth.authenticate_token_at(token.expose(), within).await.unwrap(),
        saved.id
    );

    let after = Utc::now() + TimeDelta::hours(1) + TimeDelta::seconds(5);
    assert!(matches!(
        auth.authenticate_token_at(token.expose(), after).await,
        Err(AuthError::Expired)
    ));

    // Expiry does not delete the row; it is still valid "now"
    assert_eq!(auth.authenticate_token(token.expose()).await.unwrap(), saved.id);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_window_override_applies_to_validation() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    ctx.customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let token = ctx
        .authenticator()
        .issue_token(phone.as_str(), &secret("p"))
        .await
        .unwrap();

    let short = ctx
        .authenticator()
        .with_validity_window(TimeDelta::seconds(1));
    let later = Utc::now() + TimeDelta::seconds(10);
    assert!(matches!(
        short.authenticate_token_at(token.expose(), later).await,
        Err(AuthError::Expired)
    ));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_expire_column_is_stamped() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    ctx.customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let token = ctx
        .authenticator()
        .issue_token(phone.as_str(), &secret("p"))
        .await
        .unwrap();

    let (created, expire): (chrono::DateTime<Utc>, chrono::DateTime<Utc>) =
        sqlx::query_as("SELECT created, expire FROM customers_tokens WHERE token = $1")
            .bind(token.expose())
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(expire - created, TimeDelta::hours(1));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_expire_column_has_no_default() {
    let ctx = TestContext::new().await;
    let saved = ctx
        .customers()
        .save(new_customer("A", &unique_phone(), "p"))
        .await
        .unwrap();

    let result = sqlx::query("INSERT INTO customers_tokens (token, customer_id) VALUES ($1, $2)")
        .bind("0".repeat(AuthToken::ENCODED_LENGTH))
        .bind(saved.id.as_i64())
        .execute(&ctx.pool)
        .await;
    assert!(result.is_err());
    assert_eq!(tokens_for(&ctx, saved.id).await, 0);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_issue_without_entropy_persists_nothing() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let result = ctx
        .authenticator_without_entropy()
        .issue_token(phone.as_str(), &secret("p"))
        .await;
    let Err(err) = result else {
        panic!("token issued without entropy");
    };
    assert!(matches!(err, AuthError::Internal(InternalError::Entropy(_))));
    assert_eq!(err.reason(), "internal");
    assert_eq!(tokens_for(&ctx, saved.id).await, 0);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_wrong_password() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    ctx.customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let result = ctx
        .authenticator()
        .issue_token(phone.as_str(), &secret("not-p"))
        .await;
    assert!(matches!(result, Err(AuthError::InvalidPassword)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_unknown_phone() {
    let ctx = TestContext::new().await;
    let result = ctx
        .authenticator()
        .issue_token(unique_phone().as_str(), &secret("p"))
        .await;
    assert!(matches!(result, Err(AuthError::NoSuchUser)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_never_issued_token() {
    let ctx = TestContext::new().await;
    let never_issued = AuthToken::from_bytes(&[7u8; AuthToken::BYTE_LENGTH]);

    let result = ctx
        .authenticator()
        .authenticate_token(never_issued.expose())
        .await;
    assert!(matches!(result, Err(AuthError::NoSuchUser)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_tokens_removed_with_customer() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let auth = ctx.authenticator();
    let token = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();
    ctx.customers().remove_by_id(saved.id).await.unwrap();

    assert!(matches!(
        auth.authenticate_token(token.expose()).await,
        Err(AuthError::NoSuchUser)
    ));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_blocked_customer_can_still_get_token() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();
    ctx.customers().block_by_id(saved.id).await.unwrap();

    let auth = ctx.authenticator();
    let token = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();
    assert_eq!(auth.authenticate_token(token.expose()).await.unwrap(), saved.id);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn test_each_issue_yields_distinct_valid_token() {
    let ctx = TestContext::new().await;
    let phone = unique_phone();
    let saved = ctx
        .customers()
        .save(new_customer("A", &phone, "p"))
        .await
        .unwrap();

    let auth = ctx.authenticator();
    let first = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();
    let second = auth.issue_token(phone.as_str(), &secret("p")).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(auth.authenticate_token(first.expose()).await.unwrap(), saved.id);
    assert_eq!(auth.authenticate_token(second.expose()).await.unwrap(), saved.id);
}
