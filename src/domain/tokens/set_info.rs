use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::domain::tokens::nonce::BootNonce;
use crate::domain::tokens::params::{TOKEN_SET_COUNT_LEN, TOKEN_SET_INFO_LEN};
use crate::domain::tokens::signature::DetachedSignature;

/// Per-set metadata record (`GetTokenSetInfo`).
///
/// Reserved bytes are kept as returned so the record writes back out
/// byte-identical.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    FromBytes,
    IntoBytes,
    Immutable,
    KnownLayout,
    Unaligned,
)]
pub struct TokenSetInfo {
    category: U16,
    num_tokens: U16,
    is_frozen: u8,
    reserved_0: [u8; 3],
}

const _: () = assert!(core::mem::size_of::<TokenSetInfo>() == TOKEN_SET_INFO_LEN);

impl TokenSetInfo {
    #[must_use]
    pub fn new(category: u16, num_tokens: u16, is_frozen: bool) -> Self {
        Self {
            category: U16::new(category),
            num_tokens: U16::new(num_tokens),
            is_frozen: u8::from(is_frozen),
            reserved_0: [0; 3],
        }
    }

    #[must_use]
    pub fn category(&self) -> u16 {
        self.category.get()
    }

    #[must_use]
    pub fn num_tokens(&self) -> u16 {
        self.num_tokens.get()
    }

    /// Any non-zero flag byte counts as frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.is_frozen != 0
    }

    #[must_use]
    pub fn reserved(&self) -> [u8; 3] {
        self.reserved_0
    }
}

/// Result of `GetTokenSetCount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSetCount {
    pub count: u32,
    pub boot_nonce: BootNonce,
    pub signature: DetachedSignature,
}

impl TokenSetCount {
    /// Count as written to the `num_ids_output` sink.
    #[must_use]
    pub fn count_bytes(&self) -> [u8; TOKEN_SET_COUNT_LEN] {
        self.count.to_le_bytes()
    }
}

/// Result of `GetTokenSetInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSetInfoReport {
    pub set_index: u32,
    pub info: TokenSetInfo,
    pub boot_nonce: BootNonce,
    pub signature: DetachedSignature,
}
