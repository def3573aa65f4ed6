//! Fixed-style response decoding: the caller knows every field's size.

use zerocopy::FromBytes;

use super::buffer::ResponseBuffer;
use super::errors::WireError;
use super::layout::{fixed_response_size, ResponseHeader, FIXED_RESPONSE_HEADER_LEN};

/// Fill `slots` in order from a fixed-style response.
///
/// Each slot's length is the expected length of its field. Every check runs
/// before the first copy, so on error no slot has been touched. Bytes after
/// the last slot are ignored.
///
/// # Errors
/// `TruncatedResponse` if the header or any slot does not fit the used
/// length, `SlotCountMismatch` if the response declares a different field
/// count.
pub fn decode_fixed(response: &ResponseBuffer, slots: &mut [&mut [u8]]) -> Result<(), WireError> {
    let bytes = response.filled();
    let (header, payload) =
        ResponseHeader::read_from_prefix(bytes).map_err(|_| WireError::TruncatedResponse {
            needed: FIXED_RESPONSE_HEADER_LEN,
            available: bytes.len(),
        })?;

    let declared = usize::from(header.field_count.get());
    if declared != slots.len() {
        return Err(WireError::SlotCountMismatch {
            expected: slots.len(),
            actual: declared,
        });
    }

    let payload_len: usize = slots.iter().map(|s| s.len()).sum();
    if payload_len > payload.len() {
        return Err(WireError::TruncatedResponse {
            needed: fixed_response_size(payload_len),
            available: bytes.len(),
        });
    }

    let mut offset = 0;
    for slot in slots.iter_mut() {
        let end = offset + slot.len();
        slot.copy_from_slice(&payload[offset..end]);
        offset = end;
    }
    log::trace!("decoded {} fixed fields ({} bytes)", slots.len(), payload_len);
    Ok(())
}
