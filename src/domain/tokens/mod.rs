/*
Token-set record types for the security v2 token commands.

Everything here is plain data plus semantic constructors: no IO, no framing.
The protocol layer fills these records from response slots; the application
layer hands them to sinks.

Notes:
* Fixed records (`TokenSetInfo`, `BootNonce`, `DetachedSignature`) are
  `zerocopy` layouts, so fixed response slots decode straight into them.
* Secret-bearing values (`Nonce`, `Token`, `TokenSet`) are wiped on drop and
  redact themselves in `Debug`.
* Signatures are carried, never verified.
*/

pub mod errors;
pub mod nonce;
pub mod params;
pub mod set_info;
pub mod signature;
pub mod token;

pub use errors::TokenDomainError;
pub use nonce::*;
pub use set_info::*;
pub use signature::*;
pub use token::*;
