//! Security v2 header layouts and size accounting.
//!
//! All multi-byte words are little-endian. No alignment padding is inserted
//! between fields.
//!
//! ```text
//! request     = major:u8 minor:u8 param_count:u16
//!               { size:u16 reserved:u16 } * param_count
//!               param bytes, declaration order
//! fixed resp  = field_count:u16 reserved:u16
//!               field bytes, declared order
//! serial resp = field_count:u16 reserved:u16
//!               { size:u16 reserved:u16 } * field_count
//!               field bytes, declared order
//! ```

use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const REQUEST_HEADER_LEN: usize = 4;
pub const RESPONSE_HEADER_LEN: usize = 4;
pub const FIELD_ENTRY_LEN: usize = 4;
pub const FIXED_RESPONSE_HEADER_LEN: usize = RESPONSE_HEADER_LEN;
/// Largest value a length-table entry can describe.
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Bytes of request framing for `param_count` parameters (payload excluded).
#[must_use]
pub const fn request_size(param_count: usize) -> usize {
    REQUEST_HEADER_LEN + param_count * FIELD_ENTRY_LEN
}

/// Bytes of serialized-response framing for `field_count` fields (payload excluded).
#[must_use]
pub const fn response_size(field_count: usize) -> usize {
    RESPONSE_HEADER_LEN + field_count * FIELD_ENTRY_LEN
}

/// Total bytes of a fixed-style response carrying `payload_len` bytes of fields.
#[must_use]
pub const fn fixed_response_size(payload_len: usize) -> usize {
    FIXED_RESPONSE_HEADER_LEN + payload_len
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RequestHeader {
    pub major_command: u8,
    pub minor_command: u8,
    pub param_count: U16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct ResponseHeader {
    pub field_count: U16,
    pub reserved: U16,
}

/// One length-table entry, shared by requests and serialized responses.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct FieldEntry {
    pub size: U16,
    pub reserved: U16,
}

const _: () = assert!(core::mem::size_of::<RequestHeader>() == REQUEST_HEADER_LEN);
const _: () = assert!(core::mem::size_of::<ResponseHeader>() == RESPONSE_HEADER_LEN);
const _: () = assert!(core::mem::size_of::<FieldEntry>() == FIELD_ENTRY_LEN);
