// src/adapters/os_nonce.rs
use rand_core::OsRng;

use crate::domain::tokens::Nonce;
use crate::ports::nonce::{EntropyError, NonceSource};

/// Challenge nonces straight from the operating system CSPRNG.
///
/// Each call reads 16 fresh bytes via `try_fill_bytes`, so an unavailable
/// entropy device surfaces as `EntropyError` instead of a panic. Nothing is
/// buffered between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn generate(&mut self) -> Result<Nonce, EntropyError> {
        Nonce::try_random(&mut OsRng).map_err(|e| EntropyError::new(e.to_string()))
    }
}
