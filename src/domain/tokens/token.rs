use crate::domain::tokens::errors::TokenDomainError;
use crate::domain::tokens::params::TOKEN_LEN;
use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// One fixed-size credential unit.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Token([u8; TOKEN_LEN]);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(..)")
    }
}

impl Token {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }
}

/// Tokens returned for one set, kept as the contiguous blob the device sent.
///
/// Invariant: `as_bytes().len()` is an exact multiple of `TOKEN_LEN`. The blob
/// is wiped when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    blob: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("tokens", &self.len())
            .finish_non_exhaustive()
    }
}

impl TokenSet {
    /// Validate and copy a token blob.
    ///
    /// # Errors
    /// * `TokenDomainError::TooLarge` if `blob.len() > max_len`.
    /// * `TokenDomainError::NotMultiple` if the length is not a multiple of `TOKEN_LEN`.
    pub fn from_blob(blob: &[u8], max_len: usize) -> Result<Self, TokenDomainError> {
        if blob.len() > max_len {
            return Err(TokenDomainError::TooLarge {
                field: "tokens",
                len: blob.len(),
                max: max_len,
            });
        }
        if blob.len() % TOKEN_LEN != 0 {
            return Err(TokenDomainError::NotMultiple {
                field: "tokens",
                len: blob.len(),
                unit: TOKEN_LEN,
            });
        }
        Ok(Self {
            blob: Zeroizing::new(blob.to_vec()),
        })
    }

    /// The blob exactly as returned by the device.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.blob
    }

    /// Number of tokens in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blob.len() / TOKEN_LEN
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.blob.chunks_exact(TOKEN_LEN).map(|chunk| {
            let mut t = [0u8; TOKEN_LEN];
            t.copy_from_slice(chunk);
            Token(t)
        })
    }
}

/// Result of `GetTokensInSet`.
///
/// Boot nonce and signature are kept as the raw blobs the device returned
/// (serialized responses carry their own lengths); their meaning belongs to
/// the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokensInSet {
    pub set_index: u32,
    pub tokens: TokenSet,
    pub boot_nonce: Vec<u8>,
    pub signature: Vec<u8>,
}
