use crate::domain::tokens::params::{CHALLENGE_HEADER_LEN, DETACHED_SIGNATURE_LEN, NONCE_LEN};
use zerocopy::byteorder::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Header the device signs over when answering a challenge.
///
/// Carried verbatim inside [`DetachedSignature`]. The crate exposes it as a
/// typed view for diagnostics; checking the signature is the verifier's job.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct ChallengeResponseHeader {
    pub signature_version: U32,
    pub signature_purpose: U32,
    pub major_command: u8,
    pub minor_command: u8,
    pub signed_response_length: U16,
    pub hw_cat: U16,
    pub reserved_0: [u8; 2],
    pub hw_id: U64,
    /// Echo of the requester's challenge nonce.
    pub verifier_nonce: [u8; NONCE_LEN],
    pub reserved_1: [u8; 24],
}

/// Raw P-256 ECDSA signature (`r || s`, big-endian scalars as produced by the device).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct EcP256Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// Authenticator returned by the device with every token query.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct DetachedSignature {
    pub header: ChallengeResponseHeader,
    pub signature: EcP256Signature,
}

const _: () = assert!(core::mem::size_of::<ChallengeResponseHeader>() == CHALLENGE_HEADER_LEN);
const _: () = assert!(core::mem::size_of::<DetachedSignature>() == DETACHED_SIGNATURE_LEN);
