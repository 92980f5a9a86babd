//! Accounts server library.
//!
//! Customer accounts stored in `PostgreSQL`, Argon2id password hashing, and
//! opaque bearer tokens with a fixed validity window. The `accounts-server`
//! binary serves this over HTTP on port 9999; the CLI and the integration
//! tests use the library directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
