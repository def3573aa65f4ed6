pub mod fs_artifacts;
pub mod os_nonce;

pub use fs_artifacts::FsArtifactStore;
pub use os_nonce::OsNonceSource;
