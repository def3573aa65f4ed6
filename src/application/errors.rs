use std::fmt;

use thiserror::Error;

use crate::domain::tokens::TokenDomainError;
use crate::ports::nonce::EntropyError;
use crate::ports::transport::TransportError;
use crate::protocol::security_v2::WireError;

/// Dispatcher-level failure for one host command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("device rejected command with status {status:#x}")]
    CommandRejected { status: u32 },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<TransportError> for DispatchError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Status(status) => Self::CommandRejected { status },
            TransportError::Channel(msg) => Self::Transport(msg),
        }
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("missing parameter `{0}`")]
    MissingParameter(String),
    #[error("invalid value for parameter `{name}`: {value:?}")]
    InvalidParameter { name: String, value: String },
    #[error("cannot read `{path}`: {reason}")]
    SourceRead { path: String, reason: String },
    #[error("cannot open `{path}`: {reason}")]
    SinkOpen { path: String, reason: String },
    #[error("cannot write `{path}`: {reason}")]
    SinkWrite { path: String, reason: String },
    #[error(transparent)]
    Entropy(#[from] EntropyError),
    #[error("security version {0} is not supported")]
    UnsupportedVersion(String),
    #[error("device rejected command with status {status:#x}")]
    CommandRejected { status: u32 },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("size constraint violated: {0}")]
    SizeConstraintViolated(String),
    #[error("unexpected response size: expected {expected}, got {actual}")]
    UnexpectedResponseSize { expected: usize, actual: usize },
}

impl From<DispatchError> for ErrorKind {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::CommandRejected { status } => Self::CommandRejected { status },
            DispatchError::Transport(msg) => Self::Transport(msg),
        }
    }
}

impl From<TokenDomainError> for ErrorKind {
    fn from(e: TokenDomainError) -> Self {
        Self::SizeConstraintViolated(e.to_string())
    }
}

/// Where in an operation a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveParameters,
    CheckVersion,
    GenerateNonce,
    Encode,
    Dispatch,
    Decode,
    Validate,
    WriteSinks,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolveParameters => "parameter resolution",
            Self::CheckVersion => "version check",
            Self::GenerateNonce => "nonce generation",
            Self::Encode => "request encoding",
            Self::Dispatch => "dispatch",
            Self::Decode => "response decoding",
            Self::Validate => "validation",
            Self::WriteSinks => "writing outputs",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetTokenSetCount,
    GetTokenSetInfo,
    GetTokensInSet,
    GetProvisioningLog,
    ValidateAndSign,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GetTokenSetCount => "get_token_set_count",
            Self::GetTokenSetInfo => "get_token_set_info",
            Self::GetTokensInSet => "get_tokens_in_set",
            Self::GetProvisioningLog => "get_provisioning_log",
            Self::ValidateAndSign => "validate_and_sign",
        })
    }
}

/// Failure of one whole operation: no partial result accompanies it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{operation} failed during {stage}: {kind}")]
pub struct OperationError {
    pub operation: Operation,
    pub stage: Stage,
    #[source]
    pub kind: ErrorKind,
}

impl OperationError {
    pub fn new(operation: Operation, stage: Stage, kind: impl Into<ErrorKind>) -> Self {
        Self {
            operation,
            stage,
            kind: kind.into(),
        }
    }
}

/// Attach operation and stage to a lower-layer error.
pub(crate) trait AtStage<T> {
    fn at(self, operation: Operation, stage: Stage) -> Result<T, OperationError>;
}

impl<T, E: Into<ErrorKind>> AtStage<T> for Result<T, E> {
    fn at(self, operation: Operation, stage: Stage) -> Result<T, OperationError> {
        self.map_err(|e| OperationError::new(operation, stage, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation_and_stage() {
        let err = OperationError::new(
            Operation::GetTokenSetCount,
            Stage::Dispatch,
            DispatchError::CommandRejected { status: 7 },
        );
        assert_eq!(
            err.to_string(),
            "get_token_set_count failed during dispatch: device rejected command with status 0x7"
        );
    }

    #[test]
    fn transport_errors_map_by_kind() {
        assert_eq!(
            DispatchError::from(TransportError::Status(3)),
            DispatchError::CommandRejected { status: 3 }
        );
        assert_eq!(
            ErrorKind::from(DispatchError::from(TransportError::Channel("usb".into()))),
            ErrorKind::Transport("usb".into())
        );
    }

    #[test]
    fn domain_errors_are_size_violations() {
        let kind = ErrorKind::from(TokenDomainError::NotMultiple {
            field: "tokens",
            len: 17,
            unit: 16,
        });
        assert!(matches!(kind, ErrorKind::SizeConstraintViolated(_)));
    }
}
