//! Bearer token generation and the randomness behind it.
//!
//! Tokens are 32 bytes from an [`EntropySource`], the operating system RNG
//! unless another one is supplied. The fallible `try_fill_bytes` is used so an
//! unavailable RNG surfaces as an error instead of a panic or a weaker fallback.

use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::{TryCryptoRng, TryRngCore};
use thiserror::Error;

use accounts_core::AuthToken;

/// The randomness source could not produce the requested bytes.
#[derive(Debug, Error)]
#[error("randomness source failed: {0}")]
pub struct EntropyError(String);

impl EntropyError {
    /// Build an error from the source's failure description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Fill `buf` from a cryptographic RNG, failing closed.
pub(crate) fn fill_random<R>(rng: &mut R, buf: &mut [u8]) -> Result<(), EntropyError>
where
    R: TryRngCore + TryCryptoRng,
{
    rng.try_fill_bytes(buf)
        .map_err(|e| EntropyError::new(e.to_string()))
}

/// Cryptographic randomness shared by salt and token generation.
pub trait EntropySource: fmt::Debug + Send + Sync {
    /// Fill `buf` completely or fail.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` if the source cannot supply `buf.len()` bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        fill_random(&mut OsRng, buf)
    }
}

/// Produces opaque bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    entropy: Arc<dyn EntropySource>,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    /// Create a token generator backed by the OS RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_entropy(Arc::new(OsEntropy))
    }

    /// Create a token generator drawing from `entropy`.
    #[must_use]
    pub fn with_entropy(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Generate a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `EntropyError` if the source cannot supply 32 bytes. No token
    /// is produced in that case.
    pub fn generate(&self) -> Result<AuthToken, EntropyError> {
        let mut bytes = [0u8; AuthToken::BYTE_LENGTH];
        self.entropy.fill(&mut bytes)?;
        Ok(AuthToken::from_bytes(&bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use super::*;

    /// An RNG whose every call fails.
    pub(crate) struct ExhaustedRng;

    impl TryRngCore for ExhaustedRng {
        type Error = &'static str;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err("entropy pool exhausted")
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err("entropy pool exhausted")
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err("entropy pool exhausted")
        }
    }

    impl TryCryptoRng for ExhaustedRng {}

    /// An entropy source backed by [`ExhaustedRng`].
    #[derive(Debug)]
    pub(crate) struct ExhaustedEntropy;

    impl EntropySource for ExhaustedEntropy {
        fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
            fill_random(&mut ExhaustedRng, buf)
        }
    }

    #[test]
    fn test_generate_fixed_length_hex() {
        let token = TokenGenerator::new().generate().unwrap();
        assert_eq!(token.expose().len(), AuthToken::ENCODED_LENGTH);
        assert!(token.expose().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_is_unique() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<String> = (0..64)
            .map(|_| generator.generate().unwrap().expose().to_owned())
            .collect();
        assert_eq!(tokens.len(), 64);
    }

    #[test]
    fn test_generated_token_parses() {
        let token = TokenGenerator::new().generate().unwrap();
        assert_eq!(AuthToken::parse(token.expose()).unwrap(), token);
    }

    #[test]
    fn test_exhausted_rng_fails_closed() {
        let mut buf = [0u8; 4];
        let err = fill_random(&mut ExhaustedRng, &mut buf).unwrap_err();
        assert!(err.to_string().contains("entropy pool exhausted"));
    }

    #[test]
    fn test_failing_source_produces_no_token() {
        let generator = TokenGenerator::with_entropy(Arc::new(ExhaustedEntropy));
        let err = generator.generate().unwrap_err();
        assert!(err.to_string().contains("entropy pool exhausted"));
    }
}
