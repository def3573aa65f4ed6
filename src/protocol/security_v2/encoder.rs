//! Request packing.

use zerocopy::byteorder::little_endian::U16;
use zerocopy::IntoBytes;

use super::buffer::RequestBuffer;
use super::commands::CommandCode;
use super::errors::WireError;
use super::layout::{request_size, FieldEntry, RequestHeader, FIELD_ENTRY_LEN, MAX_FIELD_LEN, REQUEST_HEADER_LEN};

/// One logical request field, borrowed for a single encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'a>(&'a [u8]);

impl<'a> Param<'a> {
    #[inline]
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl<'a> From<&'a [u8]> for Param<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Param<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self(bytes)
    }
}

/// Pack `params` behind a security v2 header addressed to `command`.
///
/// Returns the encoded length, which is always
/// `request_size(params.len()) + Σ param.len()`. The output is a pure
/// function of the inputs.
///
/// # Errors
/// * `TooManyParams` / `ParamTooLarge` when a count or length cannot be
///   expressed in its `u16` header word.
/// * `BufferTooSmall` when the request does not fit `buf`. Checked before
///   any byte is written.
pub fn encode_request(
    command: &CommandCode,
    params: &[Param<'_>],
    buf: &mut RequestBuffer,
) -> Result<usize, WireError> {
    let count = u16::try_from(params.len()).map_err(|_| WireError::TooManyParams { count: params.len() })?;
    let mut payload_len = 0usize;
    for (index, p) in params.iter().enumerate() {
        if p.len() > MAX_FIELD_LEN {
            return Err(WireError::ParamTooLarge {
                index,
                len: p.len(),
                max: MAX_FIELD_LEN,
            });
        }
        payload_len += p.len();
    }

    let required = request_size(params.len()) + payload_len;
    if required > buf.capacity() {
        return Err(WireError::BufferTooSmall {
            required,
            capacity: buf.capacity(),
        });
    }

    let out = buf.storage_mut();
    out.fill(0);

    let header = RequestHeader {
        major_command: command.major,
        minor_command: command.minor,
        param_count: U16::new(count),
    };
    out[..REQUEST_HEADER_LEN].copy_from_slice(header.as_bytes());

    let mut table_at = REQUEST_HEADER_LEN;
    let mut payload_at = request_size(params.len());
    for p in params {
        let entry = FieldEntry {
            // Length checked against MAX_FIELD_LEN above.
            size: U16::new(p.len() as u16),
            reserved: U16::ZERO,
        };
        out[table_at..table_at + FIELD_ENTRY_LEN].copy_from_slice(entry.as_bytes());
        table_at += FIELD_ENTRY_LEN;

        out[payload_at..payload_at + p.len()].copy_from_slice(p.as_bytes());
        payload_at += p.len();
    }

    buf.set_len(required);
    Ok(required)
}
