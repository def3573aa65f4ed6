//! Crate root for `hoth_security`.
//!
//! Challenge-bound token-set queries against a Hoth security module, spoken
//! over the security v2 host-command protocol.
//!
//! High-level tree:
//! * `protocol::security_v2` – request packing, fixed and serialized
//!   response decoding, command identifiers.
//! * `domain` – token and provisioning records (nonces, signatures, token
//!   sets, log headers).
//! * `ports` – the seams a host tool plugs into: transport, nonce source,
//!   artifact store.
//! * `application` – the operations themselves and the runners that turn
//!   named parameters into output files.
//! * `adapters` – OS entropy and filesystem implementations of the ports.
//!
//! ```no_run
//! use hoth_security::adapters::OsNonceSource;
//! use hoth_security::application::{get_token_set_count, DeviceContext, SecurityVersion};
//! # use hoth_security::ports::{HostTransport, TransportError};
//! # struct Usb;
//! # impl HostTransport for Usb {
//! #     fn host_command(&mut self, _: u16, _: &[u8], _: &mut [u8]) -> Result<usize, TransportError> {
//! #         Err(TransportError::Channel("unplugged".into()))
//! #     }
//! # }
//! let mut ctx = DeviceContext::new(Usb, SecurityVersion::V2);
//! match get_token_set_count(&mut ctx, &mut OsNonceSource) {
//!     Ok(sets) => println!("{} token sets", sets.count),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod protocol;

#[doc(hidden)]
pub mod test_support;
