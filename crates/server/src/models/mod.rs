//! Domain models for the accounts service.
//!
//! These types represent validated domain objects separate from database row types.

pub mod customer;
pub mod token;

pub use customer::{Customer, CustomerCredentials, ExistingCustomer, NewCustomer, SaveCustomer};
pub use token::TokenRecord;
