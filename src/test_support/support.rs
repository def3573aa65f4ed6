#![allow(dead_code)]
//! Test doubles for the ports plus builders for device responses.

use std::collections::{HashMap, VecDeque};
use std::io;

use crate::domain::tokens::params::NONCE_LEN;
use crate::domain::tokens::Nonce;
use crate::ports::artifacts::ArtifactStore;
use crate::ports::nonce::{EntropyError, NonceSource};
use crate::ports::transport::{HostTransport, TransportError};

/// Fill byte of every nonce handed out by [`FixedNonceSource::default`].
pub const TEST_NONCE_BYTE: u8 = 0xAB;

/// Bytes `0, 1, 2, ...` wrapping at 256.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

pub fn bytes_of(b: u8, len: usize) -> Vec<u8> {
    vec![b; len]
}

/// Fixed-style response: `count, 0` then the fields back to back.
pub fn fixed_response(fields: &[&[u8]]) -> Vec<u8> {
    let mut raw = (fields.len() as u16).to_le_bytes().to_vec();
    raw.extend_from_slice(&[0, 0]);
    for f in fields {
        raw.extend_from_slice(f);
    }
    raw
}

/// Serialized-style response: `count, 0`, one `size, 0` entry per field, then the fields.
pub fn serialized_response(fields: &[&[u8]]) -> Vec<u8> {
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

/// One command as the transport saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    pub base: u16,
    pub request: Vec<u8>,
}

/// Transport that answers from a script, one entry per command.
///
/// A reply longer than the response buffer is truncated on copy but its full
/// length is still reported, the way a misbehaving device would.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<Result<Vec<u8>, TransportError>>,
    sent: Vec<SentCommand>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reply(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.replies.push_back(Ok(bytes.into()));
        self
    }

    #[must_use]
    pub fn fail(mut self, err: TransportError) -> Self {
        self.replies.push_back(Err(err));
        self
    }

    pub fn sent(&self) -> &[SentCommand] {
        &self.sent
    }
}

impl HostTransport for ScriptedTransport {
    fn host_command(
        &mut self,
        base_command: u16,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, TransportError> {
        self.sent.push(SentCommand {
            base: base_command,
            request: request.to_vec(),
        });
        let reply = self
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Channel("no scripted reply".into())))?;
        let n = reply.len().min(response.len());
        response[..n].copy_from_slice(&reply[..n]);
        Ok(reply.len())
    }
}

/// Nonce source that always returns the same bytes and counts calls.
#[derive(Debug)]
pub struct FixedNonceSource {
    pub bytes: [u8; NONCE_LEN],
    pub calls: usize,
}

impl Default for FixedNonceSource {
    fn default() -> Self {
        Self {
            bytes: [TEST_NONCE_BYTE; NONCE_LEN],
            calls: 0,
        }
    }
}

impl NonceSource for FixedNonceSource {
    fn generate(&mut self) -> Result<Nonce, EntropyError> {
        self.calls += 1;
        Ok(Nonce::from(self.bytes))
    }
}

#[derive(Debug, Default)]
pub struct FailingNonceSource;

impl NonceSource for FailingNonceSource {
    fn generate(&mut self) -> Result<Nonce, EntropyError> {
        Err(EntropyError::new("entropy unavailable"))
    }
}

/// In-memory artifact store. `fail_create` names a path whose creation fails.
#[derive(Debug, Default)]
pub struct MemoryArtifacts {
    files: HashMap<String, Vec<u8>>,
    pub fail_create: Option<String>,
    pub created: Vec<String>,
}

impl MemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_owned(), bytes.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl ArtifactStore for MemoryArtifacts {
    fn create(&mut self, path: &str) -> io::Result<Box<dyn io::Write + '_>> {
        if self.fail_create.as_deref() == Some(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.created.push(path.to_owned());
        let file = self.files.entry(path.to_owned()).or_default();
        file.clear();
        Ok(Box::new(file))
    }

    fn read(&mut self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))
    }
}
