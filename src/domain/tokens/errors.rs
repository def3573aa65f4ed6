use thiserror::Error;

/// Semantic size violations discovered after a response has been demultiplexed.
///
/// These are distinct from transport-level framing errors: the response was
/// well-formed, but a field's returned length breaks a rule of the record it
/// carries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenDomainError {
    /// A fixed-size record was built from a slice of the wrong length.
    #[error("{field} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A blob of repeated units was not an exact multiple of the unit size.
    #[error("{field} length {len} is not a multiple of {unit}")]
    NotMultiple {
        field: &'static str,
        len: usize,
        unit: usize,
    },
    /// A blob exceeded the capacity it was allowed to occupy.
    #[error("{field} length {len} exceeds maximum {max}")]
    TooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
