//! Opaque bearer token type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`AuthToken`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthTokenError {
    /// The input has the wrong length.
    #[error("token must be exactly {expected} characters")]
    InvalidLength {
        /// Required length.
        expected: usize,
    },
    /// The input contains a non-hex character.
    #[error("token must be hex encoded")]
    InvalidCharacter,
}

/// A customer bearer token.
///
/// 32 random bytes (256 bits), hex encoded to 64 characters. The value is a
/// credential: `Debug` is redacted and there is no `Display` impl, so it
/// cannot end up in logs by accident. Use [`AuthToken::expose`] when the raw
/// value is actually needed (persisting it, returning it to its owner).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthToken(String);

impl AuthToken {
    /// Number of random bytes behind a token.
    pub const BYTE_LENGTH: usize = 32;

    /// Length of the hex encoded token.
    pub const ENCODED_LENGTH: usize = Self::BYTE_LENGTH * 2;

    /// Build a token from freshly generated random bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; Self::BYTE_LENGTH]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a token presented by a caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 64 hex characters.
    pub fn parse(s: &str) -> Result<Self, AuthTokenError> {
        if s.len() != Self::ENCODED_LENGTH {
            return Err(AuthTokenError::InvalidLength {
                expected: Self::ENCODED_LENGTH,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AuthTokenError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

impl std::str::FromStr for AuthToken {
    type Err = AuthTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AuthToken {
    type Error = AuthTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AuthToken> for String {
    fn from(token: AuthToken) -> Self {
        token.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AuthToken {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AuthToken {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AuthToken {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_is_lowercase_hex() {
        let token = AuthToken::from_bytes(&[0xAB; AuthToken::BYTE_LENGTH]);
        assert_eq!(token.expose().len(), AuthToken::ENCODED_LENGTH);
        assert_eq!(token.expose(), "ab".repeat(32));
    }

    #[test]
    fn test_parse_accepts_generated_value() {
        let token = AuthToken::from_bytes(&[7; AuthToken::BYTE_LENGTH]);
        let parsed = AuthToken::parse(token.expose()).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            AuthToken::parse("abc"),
            Err(AuthTokenError::InvalidLength { expected: 64 })
        );
        assert!(AuthToken::parse("").is_err());
        assert!(AuthToken::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_parse_non_hex() {
        assert_eq!(
            AuthToken::parse(&"g".repeat(64)),
            Err(AuthTokenError::InvalidCharacter)
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::from_bytes(&[0x11; AuthToken::BYTE_LENGTH]);
        let debug_output = format!("{token:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("1111"));
    }

    #[test]
    fn test_serializes_raw_value() {
        let token = AuthToken::from_bytes(&[0; AuthToken::BYTE_LENGTH]);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{}\"", "0".repeat(64)));
    }
}
