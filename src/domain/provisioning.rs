//! Provisioning-log records.
//!
//! The provisioning log is read with raw host commands (no security v2
//! parameter framing): a fixed 12-byte request, answered by an 8-byte header
//! optionally followed by a chunk of log data.

use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// CRC-32 used by device firmware (reflected 0xEDB88320, init/xorout all-ones).
const CRC32: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

pub const PROVISIONING_LOG_VERSION: u8 = 1;
pub const PROVISIONING_LOG_HEADER_LEN: usize = 8;
pub const PROVISIONING_LOG_REQUEST_LEN: usize = 12;

/// Checksum over `data` as computed by the device.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningLogOp {
    Read = 0,
    ValidateAndSign = 3,
}

#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct ProvisioningLogHeader {
    pub version: u8,
    pub reserved: u8,
    /// Length of the full log content.
    pub size: U16,
    /// CRC-32 of `size` bytes of log content.
    pub checksum: U32,
}

#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct ProvisioningLogRequest {
    pub version: u8,
    pub operation: u8,
    pub reserved: U16,
    /// Chunked read offset.
    pub offset: U16,
    /// Chunked read size (or blob size for validate-and-sign).
    pub size: U16,
    pub checksum: U32,
}

const _: () = assert!(core::mem::size_of::<ProvisioningLogHeader>() == PROVISIONING_LOG_HEADER_LEN);
const _: () = assert!(core::mem::size_of::<ProvisioningLogRequest>() == PROVISIONING_LOG_REQUEST_LEN);

impl ProvisioningLogRequest {
    /// Request `size` bytes of log content starting at `offset`.
    ///
    /// `offset = 0, size = 0` asks for the header alone.
    #[must_use]
    pub fn read(offset: u16, size: u16) -> Self {
        Self {
            version: PROVISIONING_LOG_VERSION,
            operation: ProvisioningLogOp::Read as u8,
            reserved: U16::ZERO,
            offset: U16::new(offset),
            size: U16::new(size),
            checksum: U32::ZERO,
        }
    }

    /// Ask the device to validate a personalization blob of `size` bytes with `checksum`.
    #[must_use]
    pub fn validate_and_sign(size: u16, checksum: u32) -> Self {
        Self {
            version: PROVISIONING_LOG_VERSION,
            operation: ProvisioningLogOp::ValidateAndSign as u8,
            reserved: U16::ZERO,
            offset: U16::ZERO,
            size: U16::new(size),
            checksum: U32::new(checksum),
        }
    }
}

/// Reassembled provisioning log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningLog {
    pub header: ProvisioningLogHeader,
    pub data: Vec<u8>,
}

impl ProvisioningLog {
    /// Recompute the CRC-32 of the reassembled data and compare it with the header.
    #[must_use]
    pub fn checksum_matches(&self) -> bool {
        crc32(&self.data) == self.header.checksum.get()
    }
}
