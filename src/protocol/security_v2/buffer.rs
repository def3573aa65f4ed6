use zeroize::Zeroizing;

use super::errors::WireError;
use super::layout::request_size;

/// Fixed-capacity request region filled by [`encode_request`](super::encode_request).
///
/// Requests carry challenge nonces, so the storage is wiped on drop.
pub struct RequestBuffer {
    storage: Zeroizing<Vec<u8>>,
    len: usize,
}

impl RequestBuffer {
    /// Zero-initialized buffer of exactly `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: Zeroizing::new(vec![0u8; capacity]),
            len: 0,
        }
    }

    /// Buffer sized for parameters of the given lengths: `request_size(n) + Σ len`.
    #[must_use]
    pub fn sized_for(param_lens: &[usize]) -> Self {
        Self::new(request_size(param_lens.len()) + param_lens.iter().sum::<usize>())
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Length written by the last successful encode (0 before any).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The encoded request bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
    }
}

impl std::fmt::Debug for RequestBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .finish()
    }
}

/// Fixed-capacity response region.
///
/// The used length is set once by the dispatcher after the transport
/// returns; decoders only ever see `filled()`.
pub struct ResponseBuffer {
    storage: Zeroizing<Vec<u8>>,
    used: usize,
}

impl ResponseBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Zeroizing::new(vec![0u8; capacity]),
            used: 0,
        }
    }

    /// A buffer whose capacity and used length both equal `bytes.len()`.
    ///
    /// Handy for decoding bytes obtained elsewhere (captures, tests).
    #[must_use]
    pub fn from_response(bytes: &[u8]) -> Self {
        Self {
            storage: Zeroizing::new(bytes.to_vec()),
            used: bytes.len(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Whole capacity, for the transport to write into.
    pub fn as_mut_capacity(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Record how many bytes the device produced.
    ///
    /// # Errors
    /// `UsedExceedsCapacity` if `used` is larger than the buffer.
    pub fn set_used(&mut self, used: usize) -> Result<(), WireError> {
        if used > self.capacity() {
            return Err(WireError::UsedExceedsCapacity {
                used,
                capacity: self.capacity(),
            });
        }
        self.used = used;
        Ok(())
    }

    /// The device-produced prefix.
    #[must_use]
    pub fn filled(&self) -> &[u8] {
        &self.storage[..self.used]
    }
}

impl std::fmt::Debug for ResponseBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseBuffer")
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_for_matches_layout() {
        let buf = RequestBuffer::sized_for(&[4, 16]);
        assert_eq!(buf.capacity(), 4 + 2 * 4 + 20);
        assert!(buf.is_empty());
    }

    #[test]
    fn set_used_rejects_overflow() {
        let mut resp = ResponseBuffer::with_capacity(8);
        assert_eq!(
            resp.set_used(9),
            Err(WireError::UsedExceedsCapacity {
                used: 9,
                capacity: 8
            })
        );
        assert_eq!(resp.used(), 0);
        resp.as_mut_capacity()[..3].copy_from_slice(&[1, 2, 3]);
        resp.set_used(3).unwrap();
        assert_eq!(resp.filled(), &[1, 2, 3]);
    }

    #[test]
    fn debug_hides_contents() {
        let resp = ResponseBuffer::from_response(&[0xAA; 4]);
        let dbg = format!("{resp:?}");
        assert!(dbg.contains("used: 4"));
        assert!(!dbg.contains("170"));
    }
}
