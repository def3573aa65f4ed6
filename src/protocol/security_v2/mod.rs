/*
Security v2 host-command framing.

A request is a small header naming the (major, minor) handler, a table of
parameter lengths, and the parameter bytes. Responses come in two shapes:

* fixed: the caller already knows how many fields there are and how long
  each one is, so the response is just a count and the concatenated bytes;
* serialized: the response carries its own length table and the caller
  borrows each field out of the response buffer.

Nothing here knows what a token or a nonce is; that lives in `domain`.
*/

pub mod buffer;
pub mod commands;
pub mod encoder;
pub mod errors;
pub mod fixed;
pub mod layout;
pub mod serialized;

pub use buffer::{RequestBuffer, ResponseBuffer};
pub use commands::{hoth_base_cmd, CommandCode, TokenCommand};
pub use encoder::{encode_request, Param};
pub use errors::WireError;
pub use fixed::decode_fixed;
pub use layout::{request_size, response_size};
pub use serialized::{decode_serialized, SerializedField};
