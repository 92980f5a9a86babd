//! Customer management route handlers (manager only).

use axum::{
    Json,
    extract::{
        Form, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use accounts_core::{CustomerId, Phone};

use crate::error::AppError;
use crate::models::{Customer, ExistingCustomer, NewCustomer, SaveCustomer};
use crate::state::AppState;

/// `?id=` query for single-customer operations.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// Form body of `/customers.save`.
///
/// An `id` of `0`, or none at all, creates a new customer.
#[derive(Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub password: String,
}

impl TryFrom<SaveForm> for SaveCustomer {
    type Error = AppError;

    fn try_from(form: SaveForm) -> Result<Self, Self::Error> {
        let phone = Phone::parse(&form.phone)
            .map_err(|e| AppError::BadRequest(format!("invalid phone: {e}")))?;
        let password = SecretString::from(form.password);

        Ok(if form.id == 0 {
            Self::New(NewCustomer {
                name: form.name,
                phone,
                password,
            })
        } else {
            Self::Existing(ExistingCustomer {
                id: CustomerId::new(form.id),
                name: form.name,
                phone,
                password,
            })
        })
    }
}

fn customer_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<CustomerId, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(CustomerId::new(query.id))
}

/// `GET /customers.getAll`
#[instrument(skip_all)]
pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers().all().await?))
}

/// `GET /customers.getAllActive`
#[instrument(skip_all)]
pub async fn get_all_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers().all_active().await?))
}

/// `GET /customers.getById?id=`
#[instrument(skip_all)]
pub async fn get_by_id(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Customer>, AppError> {
    let id = customer_id(query)?;
    Ok(Json(state.customers().by_id(id).await?))
}

/// `POST /customers.save`
#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    form: Result<Form<SaveForm>, FormRejection>,
) -> Result<Json<Customer>, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let customer = SaveCustomer::try_from(form)?;
    Ok(Json(state.customers().save(customer).await?))
}

/// `POST /customers.removeById?id=`
#[instrument(skip_all)]
pub async fn remove_by_id(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Customer>, AppError> {
    let id = customer_id(query)?;
    Ok(Json(state.customers().remove_by_id(id).await?))
}

/// `POST /customers.blockById?id=`
#[instrument(skip_all)]
pub async fn block_by_id(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Customer>, AppError> {
    let id = customer_id(query)?;
    Ok(Json(state.customers().block_by_id(id).await?))
}

/// `POST /customers.unblockById?id=`
#[instrument(skip_all)]
pub async fn unblock_by_id(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Customer>, AppError> {
    let id = customer_id(query)?;
    Ok(Json(state.customers().unblock_by_id(id).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn form(id: i64, phone: &str) -> SaveForm {
        SaveForm {
            id,
            name: "A".to_string(),
            phone: phone.to_string(),
            password: "p".to_string(),
        }
    }

    #[test]
    fn test_zero_id_saves_new() {
        match SaveCustomer::try_from(form(0, "123")).unwrap() {
            SaveCustomer::New(new) => {
                assert_eq!(new.name, "A");
                assert_eq!(new.phone.as_str(), "123");
                assert_eq!(new.password.expose_secret(), "p");
            }
            SaveCustomer::Existing(_) => panic!("expected a new customer"),
        }
    }

    #[test]
    fn test_nonzero_id_saves_existing() {
        match SaveCustomer::try_from(form(42, "+123")).unwrap() {
            SaveCustomer::Existing(existing) => assert_eq!(existing.id, CustomerId::new(42)),
            SaveCustomer::New(_) => panic!("expected an existing customer"),
        }
    }

    #[test]
    fn test_invalid_phone_is_bad_request() {
        let err = SaveCustomer::try_from(form(0, "12\n34")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = SaveCustomer::try_from(form(0, "")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_formatted_phone_is_accepted_verbatim() {
        for raw in ["+992 90 000 0001", "992-90-000-0001", "(992)900000001"] {
            match SaveCustomer::try_from(form(0, raw)).unwrap() {
                SaveCustomer::New(new) => assert_eq!(new.phone.as_str(), raw),
                SaveCustomer::Existing(_) => panic!("expected a new customer"),
            }
        }
    }
}
