use crate::application::errors::DispatchError;
use crate::ports::transport::HostTransport;
use crate::protocol::security_v2::{CommandCode, RequestBuffer, ResponseBuffer};

/// Sends one request over a [`HostTransport`] and records the reply length.
///
/// No retries: a failed exchange is reported once and the caller aborts.
pub struct CommandDispatcher<'t, T: ?Sized> {
    transport: &'t mut T,
}

impl<'t, T: HostTransport + ?Sized> CommandDispatcher<'t, T> {
    pub fn new(transport: &'t mut T) -> Self {
        Self { transport }
    }

    /// Send an encoded security v2 request.
    ///
    /// # Errors
    /// `CommandRejected` on a device status, `Transport` otherwise.
    pub fn execute(
        &mut self,
        command: &CommandCode,
        request: &RequestBuffer,
        response: &mut ResponseBuffer,
    ) -> Result<usize, DispatchError> {
        log::debug!("security v2 {command}: sending {} request bytes", request.len());
        self.raw(command.base, request.as_bytes(), response)
    }

    /// Send a request that carries no security v2 framing.
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute). A transport that claims more
    /// bytes than `response` holds is a `Transport` error.
    pub fn raw(
        &mut self,
        base_command: u16,
        request: &[u8],
        response: &mut ResponseBuffer,
    ) -> Result<usize, DispatchError> {
        let used = self
            .transport
            .host_command(base_command, request, response.as_mut_capacity())
            .map_err(|e| {
                log::warn!("host command {base_command:#06x} failed: {e}");
                DispatchError::from(e)
            })?;
        response
            .set_used(used)
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        log::debug!("host command {base_command:#06x}: received {used} bytes");
        Ok(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::transport::TransportError;

    struct Echo {
        claim: Option<usize>,
        fail: Option<TransportError>,
        seen: Vec<(u16, Vec<u8>)>,
    }

    impl HostTransport for Echo {
        fn host_command(&mut self, base: u16, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError> {
            self.seen.push((base, request.to_vec()));
            if let Some(e) = self.fail.clone() {
                return Err(e);
            }
            let n = request.len().min(response.len());
            response[..n].copy_from_slice(&request[..n]);
            Ok(self.claim.unwrap_or(n))
        }
    }

    fn echo() -> Echo {
        Echo { claim: None, fail: None, seen: Vec::new() }
    }

    #[test]
    fn raw_records_used_length() {
        let mut t = echo();
        let mut resp = ResponseBuffer::with_capacity(8);
        let n = CommandDispatcher::new(&mut t).raw(0x3E49, &[1, 2, 3], &mut resp).unwrap();
        assert_eq!(n, 3);
        assert_eq!(resp.filled(), &[1, 2, 3]);
        assert_eq!(t.seen, vec![(0x3E49, vec![1, 2, 3])]);
    }

    #[test]
    fn status_becomes_rejection() {
        let mut t = echo();
        t.fail = Some(TransportError::Status(0x0B));
        let mut resp = ResponseBuffer::with_capacity(8);
        assert_eq!(
            CommandDispatcher::new(&mut t).raw(1, &[], &mut resp),
            Err(DispatchError::CommandRejected { status: 0x0B })
        );
    }

    #[test]
    fn overlong_claim_is_transport_error() {
        let mut t = echo();
        t.claim = Some(9);
        let mut resp = ResponseBuffer::with_capacity(8);
        let err = CommandDispatcher::new(&mut t).raw(1, &[0], &mut resp).unwrap_err();
        assert!(matches!(err, DispatchError::Transport(_)));
        assert_eq!(resp.used(), 0);
    }

    #[test]
    fn execute_sends_encoded_bytes_under_base() {
        use crate::protocol::security_v2::{encode_request, TokenCommand};
        let code = TokenCommand::GetTokenSetCount.code();
        let mut req = RequestBuffer::new(4);
        encode_request(&code, &[], &mut req).unwrap();
        let mut t = echo();
        let mut resp = ResponseBuffer::with_capacity(4);
        CommandDispatcher::new(&mut t).execute(&code, &req, &mut resp).unwrap();
        assert_eq!(t.seen[0].0, code.base);
        assert_eq!(t.seen[0].1, req.as_bytes());
    }
}
