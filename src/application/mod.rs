pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod invocation;
pub mod provisioning;
pub mod tokens;

pub use commands::*;
pub use context::{DeviceContext, SecurityVersion};
pub use dispatcher::CommandDispatcher;
pub use errors::{DispatchError, ErrorKind, Operation, OperationError, Stage};
pub use invocation::Invocation;
pub use provisioning::*;
pub use tokens::*;
