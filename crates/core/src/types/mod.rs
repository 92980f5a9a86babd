//! Core types for the accounts service.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod token;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use token::{AuthToken, AuthTokenError};
