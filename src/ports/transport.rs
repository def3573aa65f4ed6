use thiserror::Error;

/// Failures reported by a host-command transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The device answered but refused the command.
    #[error("device returned status {0:#x}")]
    Status(u32),
    /// The exchange itself failed (IO, timeout, framing below this crate).
    #[error("channel failure: {0}")]
    Channel(String),
}

/// One request/response exchange with the security module.
///
/// Connection setup, retries and the physical link are the implementor's
/// business. A call sends `request` under `base_command` and writes at most
/// `response.len()` bytes of reply into `response`.
pub trait HostTransport {
    /// Returns the number of response bytes the device produced.
    ///
    /// # Errors
    /// `TransportError::Status` for a device rejection,
    /// `TransportError::Channel` for anything else.
    fn host_command(
        &mut self,
        base_command: u16,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, TransportError>;
}
