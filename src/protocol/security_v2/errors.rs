use thiserror::Error;

/// Framing failures raised while packing a request or demultiplexing a response.
///
/// These describe the *shape* of the bytes only; rules about what a field
/// means (token multiples, record sizes) live in the domain errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// Encoded request would not fit the request buffer. Nothing was written.
    #[error("request needs {required} bytes but the buffer holds {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },
    /// A parameter is too long for a `u16` length-table entry.
    #[error("parameter {index} is {len} bytes; the length table holds at most {max}")]
    ParamTooLarge { index: usize, len: usize, max: usize },
    /// More parameters than the `u16` count field can describe.
    #[error("{count} parameters exceed the header's count field")]
    TooManyParams { count: usize },
    /// Fixed-style response ended before every slot could be filled.
    #[error("response truncated: need {needed} bytes, device returned {available}")]
    TruncatedResponse { needed: usize, available: usize },
    /// Fixed-style response field count differs from the declared slots.
    #[error("response carries {actual} fields, caller declared {expected} slots")]
    SlotCountMismatch { expected: usize, actual: usize },
    /// Serialized response: header plus declared field sizes != used length.
    #[error("declared response size {declared} does not match used length {used}")]
    SizePayloadMismatch { declared: usize, used: usize },
    /// Serialized response carries more fields than output handles supplied.
    #[error("response carries {actual} fields but only {capacity} handles were supplied")]
    ExcessFields { capacity: usize, actual: usize },
    /// A reserved header word must be zero.
    #[error("reserved word at offset {offset} is non-zero")]
    ReservedNonZero { offset: usize },
    /// A serialized field was copied into an output of a different size.
    #[error("field is {actual} bytes, output expects exactly {expected}")]
    FieldSizeMismatch { expected: usize, actual: usize },
    /// A serialized field handle was read but the response never produced it.
    #[error("field absent from response")]
    FieldAbsent,
    /// The transport reported more bytes than the response buffer can hold.
    #[error("used length {used} exceeds response capacity {capacity}")]
    UsedExceedsCapacity { used: usize, capacity: usize },
}
