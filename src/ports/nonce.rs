//! Port for challenge-nonce generation.
//!
//! Operations ask for exactly one nonce per request, immediately before
//! encoding. Implementations must draw from a cryptographically secure
//! source; nothing is cached or retried.

use crate::domain::tokens::Nonce;

/// The entropy source could not produce a nonce.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("entropy source failed: {reason}")]
pub struct EntropyError {
    pub reason: String,
}

impl EntropyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Source of fresh, unpredictable challenge nonces.
pub trait NonceSource {
    /// Produce a new nonce.
    ///
    /// # Errors
    /// `EntropyError` if the underlying source fails. Callers abort the
    /// operation; there is no fallback.
    fn generate(&mut self) -> Result<Nonce, EntropyError>;
}

impl<N: NonceSource + ?Sized> NonceSource for &mut N {
    fn generate(&mut self) -> Result<Nonce, EntropyError> {
        (**self).generate()
    }
}
