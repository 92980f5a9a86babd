//! Issued token records.

use chrono::{DateTime, TimeDelta, Utc};

use accounts_core::CustomerId;

/// A persisted token as seen by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Customer the token was issued to.
    pub customer_id: CustomerId,
    /// When the token was issued.
    pub created: DateTime<Utc>,
}

impl TokenRecord {
    /// Whether more than `window` has elapsed between issuance and `now`.
    ///
    /// A token is still valid at exactly `created + window`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        now.signed_duration_since(self.created) > window
    }
}
