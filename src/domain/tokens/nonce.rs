use crate::domain::tokens::errors::TokenDomainError;
use crate::domain::tokens::params::{BOOT_NONCE_LEN, NONCE_LEN};
use core::{convert::TryFrom, fmt};
use rand_core::{CryptoRng, RngCore};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 16-byte challenge nonce bound into every token query request.
///
/// The requester samples this uniformly at random immediately before encoding
/// a request; the device echoes it inside the signed challenge-response header
/// so an external verifier can reject replayed responses.
///
/// Construction options:
/// - `Nonce::try_random(rng)` for cryptographically strong randomness.
/// - `Nonce::try_from(&[u8])` for fallible decoding from a slice.
/// - `Nonce::from([u8;16])` for test vectors and fixed sources.
///
/// Invariants:
/// - Always exactly 16 bytes (`NONCE_LEN`).
/// - Opaque: `Debug` redacts the value; memory is wiped on drop.
///
/// Security:
/// - Never reuse a `Nonce` across two requests. Callers obtain a fresh one
///   from a `NonceSource` per operation.
///
/// # Examples
/// ```
/// use hoth_security::domain::tokens::Nonce;
/// use std::convert::TryFrom;
/// let a = Nonce::try_from(&[1u8; 16][..]).unwrap();
/// assert_eq!(a.as_bytes()[0], 1);
/// let mut rng = rand_core::OsRng;
/// let r = Nonce::try_random(&mut rng).unwrap();
/// assert_ne!(r.as_bytes(), a.as_bytes());
/// assert!(Nonce::try_from(&[0u8; 15][..]).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Nonce([u8; NONCE_LEN]);

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce(..)")
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 4 bytes only, enough to correlate a request in a trace.
        for b in self.0.iter().take(4) {
            write!(f, "{b:02x}")?;
        }
        write!(f, "…")
    }
}

impl Nonce {
    /// Draw a fresh nonce from the supplied CSPRNG.
    ///
    /// # Errors
    /// Propagates the RNG's failure when it cannot supply `NONCE_LEN` bytes.
    pub fn try_random<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self, rand_core::Error> {
        let mut arr = [0u8; NONCE_LEN];
        rng.try_fill_bytes(&mut arr)?;
        Ok(Nonce(arr))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = TokenDomainError;

    /// # Errors
    /// Returns `TokenDomainError::LengthMismatch` if the slice length != `NONCE_LEN`.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; NONCE_LEN] = value.try_into().map_err(|_| TokenDomainError::LengthMismatch {
            field: "Nonce",
            expected: NONCE_LEN,
            actual: value.len(),
        })?;
        Ok(Nonce(arr))
    }
}

impl From<[u8; NONCE_LEN]> for Nonce {
    fn from(value: [u8; NONCE_LEN]) -> Self {
        Nonce(value)
    }
}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Device boot/session identity returned alongside every signed response.
///
/// Uninterpreted by this crate; an external verifier binds the detached
/// signature to it.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct BootNonce([u8; BOOT_NONCE_LEN]);

impl BootNonce {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; BOOT_NONCE_LEN] {
        &self.0
    }
}

impl From<[u8; BOOT_NONCE_LEN]> for BootNonce {
    fn from(value: [u8; BOOT_NONCE_LEN]) -> Self {
        BootNonce(value)
    }
}

impl TryFrom<&[u8]> for BootNonce {
    type Error = TokenDomainError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        BootNonce::read_from_bytes(value).map_err(|_| TokenDomainError::LengthMismatch {
            field: "BootNonce",
            expected: BOOT_NONCE_LEN,
            actual: value.len(),
        })
    }
}
