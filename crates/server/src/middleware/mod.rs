//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. `TimeoutLayer` (per-request deadline)
//! 4. Manager guard (Basic auth, customer-management routes only)

pub mod auth;
pub mod basic;

pub use auth::RequireCustomerAuth;
pub use basic::require_manager;
