// src/adapters/fs_artifacts.rs
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::ports::artifacts::ArtifactStore;

/// Artifacts are plain files. Relative paths resolve against `root` when set.
#[derive(Debug, Default, Clone)]
pub struct FsArtifactStore {
    root: Option<PathBuf>,
}

impl FsArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn create(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>> {
        let file = File::create(self.resolve(path))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn read(&mut self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_truncates_and_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsArtifactStore::rooted_at(dir.path());
        {
            let mut w = store.create("out.bin").unwrap();
            w.write_all(b"longer contents").unwrap();
            w.flush().unwrap();
        }
        {
            let mut w = store.create("out.bin").unwrap();
            w.write_all(b"short").unwrap();
            w.flush().unwrap();
        }
        assert_eq!(store.read("out.bin").unwrap(), b"short");
    }

    #[test]
    fn missing_directory_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsArtifactStore::rooted_at(dir.path().join("absent"));
        assert!(store.create("x").is_err());
        assert!(store.read("x").is_err());
    }
}
