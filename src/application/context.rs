use std::fmt;

use super::dispatcher::CommandDispatcher;
use super::errors::{ErrorKind, Operation, OperationError, Stage};
use crate::ports::transport::HostTransport;

/// Security protocol generation reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityVersion {
    V2,
    V3,
    Unknown(u8),
}

impl fmt::Display for SecurityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
            Self::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

/// An open device plus the security version it speaks.
///
/// Operations borrow the context mutably for their whole duration, so at
/// most one command is in flight per device.
#[derive(Debug)]
pub struct DeviceContext<T> {
    transport: T,
    version: SecurityVersion,
}

impl<T: HostTransport> DeviceContext<T> {
    pub fn new(transport: T, version: SecurityVersion) -> Self {
        Self { transport, version }
    }

    #[must_use]
    pub fn version(&self) -> SecurityVersion {
        self.version
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn dispatcher(&mut self) -> CommandDispatcher<'_, T> {
        CommandDispatcher::new(&mut self.transport)
    }

    /// Gate an operation on the security version.
    ///
    /// # Errors
    /// `UnsupportedVersion` for anything but v2.
    pub(crate) fn ensure_supported(&self, operation: Operation) -> Result<(), OperationError> {
        match self.version {
            SecurityVersion::V2 => Ok(()),
            SecurityVersion::V3 | SecurityVersion::Unknown(_) => {
                log::warn!("{operation}: security {} not supported yet", self.version);
                Err(OperationError::new(
                    operation,
                    Stage::CheckVersion,
                    ErrorKind::UnsupportedVersion(self.version.to_string()),
                ))
            }
        }
    }
}
