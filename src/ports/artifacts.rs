//! Port for the files a command reads and writes.
//!
//! Runners never touch the filesystem directly: sinks are created through
//! `ArtifactStore::create` once an operation has produced validated output,
//! and input blobs are read through `ArtifactStore::read`.

use std::io::{self, Write};

pub trait ArtifactStore {
    /// Create (or truncate) the artifact at `path` for writing.
    ///
    /// # Errors
    /// Any IO error opening the artifact.
    fn create(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>>;

    /// Read the whole artifact at `path`.
    ///
    /// # Errors
    /// Any IO error opening or reading the artifact.
    fn read(&mut self, path: &str) -> io::Result<Vec<u8>>;
}
