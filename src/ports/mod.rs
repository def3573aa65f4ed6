pub mod artifacts;
pub mod nonce;
pub mod transport;

pub use artifacts::*;
pub use nonce::*;
pub use transport::*;
