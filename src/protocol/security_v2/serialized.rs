//! Serialized-style response decoding: the response describes its own fields.

use zerocopy::FromBytes;

use super::buffer::ResponseBuffer;
use super::errors::WireError;
use super::layout::{response_size, FieldEntry, ResponseHeader, FIELD_ENTRY_LEN, RESPONSE_HEADER_LEN};

/// Borrowed view of one response field, or [`SerializedField::ABSENT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializedField<'a>(Option<&'a [u8]>);

impl<'a> SerializedField<'a> {
    pub const ABSENT: Self = Self(None);

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a [u8]> {
        self.0
    }

    /// Copy the field into `out`, which must be exactly the field's size.
    ///
    /// # Errors
    /// `FieldAbsent` if the response did not carry the field,
    /// `FieldSizeMismatch` if the sizes differ.
    pub fn copy_exact(&self, out: &mut [u8]) -> Result<(), WireError> {
        let value = self.0.ok_or(WireError::FieldAbsent)?;
        if value.len() != out.len() {
            return Err(WireError::FieldSizeMismatch {
                expected: out.len(),
                actual: value.len(),
            });
        }
        out.copy_from_slice(value);
        Ok(())
    }
}

fn read_entry(chunk: &[u8], offset: usize) -> Result<FieldEntry, WireError> {
    let entry = FieldEntry::read_from_bytes(chunk).map_err(|_| WireError::SizePayloadMismatch {
        declared: offset + FIELD_ENTRY_LEN,
        used: offset + chunk.len(),
    })?;
    if entry.reserved.get() != 0 {
        return Err(WireError::ReservedNonZero { offset: offset + 2 });
    }
    Ok(entry)
}

/// Split a serialized-style response into borrowed fields.
///
/// Every handle is reset to `ABSENT` first. Handles `0..count` are assigned
/// only after the whole response validates; the rest stay absent. Returns
/// the number of fields the response carried.
///
/// # Errors
/// * `SizePayloadMismatch` when the header or length table runs past the
///   used length, or when header plus declared sizes differ from it.
/// * `ReservedNonZero` for any non-zero reserved word.
/// * `ExcessFields` when the response carries more fields than `fields`.
pub fn decode_serialized<'a>(
    response: &'a ResponseBuffer,
    fields: &mut [SerializedField<'a>],
) -> Result<usize, WireError> {
    fields.fill(SerializedField::ABSENT);

    let bytes = response.filled();
    let used = bytes.len();
    let (header, rest) =
        ResponseHeader::read_from_prefix(bytes).map_err(|_| WireError::SizePayloadMismatch {
            declared: RESPONSE_HEADER_LEN,
            used,
        })?;
    if header.reserved.get() != 0 {
        return Err(WireError::ReservedNonZero { offset: 2 });
    }

    let count = usize::from(header.field_count.get());
    if count > fields.len() {
        return Err(WireError::ExcessFields {
            capacity: fields.len(),
            actual: count,
        });
    }

    let framing = response_size(count);
    if framing > used {
        return Err(WireError::SizePayloadMismatch { declared: framing, used });
    }
    let (table, payload) = rest.split_at(count * FIELD_ENTRY_LEN);

    let mut declared = framing;
    for (i, chunk) in table.chunks_exact(FIELD_ENTRY_LEN).enumerate() {
        let entry = read_entry(chunk, RESPONSE_HEADER_LEN + i * FIELD_ENTRY_LEN)?;
        declared += usize::from(entry.size.get());
    }
    if declared != used {
        return Err(WireError::SizePayloadMismatch { declared, used });
    }

    let mut offset = 0;
    for (field, chunk) in fields.iter_mut().zip(table.chunks_exact(FIELD_ENTRY_LEN)) {
        let len = usize::from(u16::from_le_bytes([chunk[0], chunk[1]]));
        *field = SerializedField(Some(&payload[offset..offset + len]));
        offset += len;
    }
    log::trace!("decoded {count} serialized fields ({} payload bytes)", payload.len());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build(fields: &[&[u8]]) -> Vec<u8> {
        let mut raw = (fields.len() as u16).to_le_bytes().to_vec();
        raw.extend_from_slice(&[0, 0]);
        for f in fields {
            raw.extend_from_slice(&(f.len() as u16).to_le_bytes());
            raw.extend_from_slice(&[0, 0]);
        }
        for f in fields {
            raw.extend_from_slice(f);
        }
        raw
    }

    #[test]
    fn splits_fields_in_order() {
        let resp = ResponseBuffer::from_response(&build(&[b"abc", b"", b"zz"]));
        let mut out = [SerializedField::ABSENT; 4];
        assert_eq!(decode_serialized(&resp, &mut out), Ok(3));
        assert_eq!(out[0].value(), Some(&b"abc"[..]));
        assert_eq!(out[1].value(), Some(&b""[..]));
        assert_eq!(out[2].value(), Some(&b"zz"[..]));
        assert!(!out[3].is_present());
    }

    #[test]
    fn header_only_with_empty_fields() {
        let raw = build(&[b"", b"", b""]);
        assert_eq!(raw.len(), response_size(3));
        let resp = ResponseBuffer::from_response(&raw);
        let mut out = [SerializedField::ABSENT; 3];
        assert_eq!(decode_serialized(&resp, &mut out), Ok(3));
        assert!(out.iter().all(|f| f.value() == Some(&[][..])));
    }

    #[test]
    fn excess_fields() {
        let resp = ResponseBuffer::from_response(&build(&[b"a", b"b", b"c"]));
        let mut out = [SerializedField::ABSENT; 2];
        assert_eq!(
            decode_serialized(&resp, &mut out),
            Err(WireError::ExcessFields { capacity: 2, actual: 3 })
        );
    }

    #[test]
    fn reserved_words_must_be_zero() {
        let mut raw = build(&[b"ab"]);
        raw[6] = 1;
        let resp = ResponseBuffer::from_response(&raw);
        let mut out = [SerializedField::ABSENT; 1];
        assert_eq!(
            decode_serialized(&resp, &mut out),
            Err(WireError::ReservedNonZero { offset: 6 })
        );

        let mut raw = build(&[b"ab"]);
        raw[3] = 0x80;
        let resp = ResponseBuffer::from_response(&raw);
        assert_eq!(
            decode_serialized(&resp, &mut out),
            Err(WireError::ReservedNonZero { offset: 2 })
        );
    }

    #[test]
    fn truncated_table() {
        let mut raw = build(&[b"", b""]);
        raw.truncate(9);
        let resp = ResponseBuffer::from_response(&raw);
        let mut out = [SerializedField::ABSENT; 2];
        assert_eq!(
            decode_serialized(&resp, &mut out),
            Err(WireError::SizePayloadMismatch { declared: 12, used: 9 })
        );
    }

    #[test]
    fn stale_handles_are_reset_on_failure() {
        let good = ResponseBuffer::from_response(&build(&[b"xy"]));
        let bad = ResponseBuffer::from_response(&[0xFF]);
        let mut out = [SerializedField::ABSENT; 1];
        decode_serialized(&good, &mut out).unwrap();
        assert!(out[0].is_present());
        // Reusing handles: `bad` outlives the call below, so it can borrow.
        let mut out2 = out;
        assert!(decode_serialized(&bad, &mut out2).is_err());
        assert!(!out2[0].is_present());
    }

    #[test]
    fn copy_exact_checks_size() {
        let resp = ResponseBuffer::from_response(&build(&[b"abcd"]));
        let mut out = [SerializedField::ABSENT; 1];
        decode_serialized(&resp, &mut out).unwrap();

        let mut exact = [0u8; 4];
        out[0].copy_exact(&mut exact).unwrap();
        assert_eq!(&exact, b"abcd");

        let mut wrong = [0u8; 3];
        assert_eq!(
            out[0].copy_exact(&mut wrong),
            Err(WireError::FieldSizeMismatch { expected: 3, actual: 4 })
        );
        assert_eq!(SerializedField::ABSENT.copy_exact(&mut wrong), Err(WireError::FieldAbsent));
    }

    proptest! {
        #[test]
        fn size_mismatch_leaves_every_handle_absent(
            fields in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 1..4),
            delta in prop_oneof![-3i32..0, 1i32..4],
        ) {
            let borrowed: Vec<&[u8]> = fields.iter().map(Vec::as_slice).collect();
            let mut raw = build(&borrowed);
            let framing = response_size(fields.len());
            let target = raw.len() as i32 + delta;
            prop_assume!(target >= framing as i32);
            raw.resize(target as usize, 0);

            let resp = ResponseBuffer::from_response(&raw);
            let mut out = [SerializedField::ABSENT; 4];
            let err = decode_serialized(&resp, &mut out).unwrap_err();
            let is_size_mismatch = matches!(err, WireError::SizePayloadMismatch { .. });
            prop_assert!(is_size_mismatch);
            prop_assert!(out.iter().all(|f| !f.is_present()));
        }
    }
}
