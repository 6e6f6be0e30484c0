//! ABI error types

use std::fmt;

use avm_primitives::AddressError;
use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AbiError>;

/// Location of a nested element inside a value tree.
///
/// Each entry is the child index taken at one level of nesting, so the path
/// `value[1][0]` names the first child of the second field of the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<usize>);

impl ValuePath {
    /// Path of the root value
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of child `index` below this one
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Child indices from the root down
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value")?;
        for index in &self.0 {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// Fieldless classification of an [`AbiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed type grammar
    InvalidTypeString,
    /// Integer width outside the accepted set
    InvalidBitSize,
    /// Fixed-point precision outside the accepted range
    InvalidPrecision,
    /// Static array value with the wrong element count
    ArrayLengthMismatch,
    /// Number or address that does not fit its type
    ValueOutOfRange,
    /// Tuple value with the wrong field count
    TupleArityMismatch,
    /// Value variant that does not correspond to the type variant
    TypeMismatch,
    /// Input ended before a complete value was read
    BufferTooShort,
    /// Offset pointing past the end of its region
    OffsetOutOfBounds,
    /// First tail offset not pointing at the end of the head section
    UnalignedOffset,
    /// Tail offsets going backwards
    NonMonotonicOffset,
    /// Bytes left over after a complete value
    TrailingBytes,
    /// Length, count or offset too large for its 2-byte field
    EncodingOverflow,
    /// Static type whose encoded size does not fit in `usize`
    TypeTooLarge,
    /// Decoded value with more elements than the configured limit
    ValueLimitExceeded,
}

/// ABI error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Malformed type string
    #[error("invalid type string {input:?}: {reason}")]
    InvalidTypeString {
        /// Offending substring
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Integer width not a multiple of 8 in [8, 512]
    #[error("invalid bit size {found}: expected a multiple of 8 in [8, 512]")]
    InvalidBitSize {
        /// Size as written by the caller
        found: String,
    },

    /// Fixed-point precision outside [1, 160]
    #[error("invalid precision {found}: expected an integer in [1, 160]")]
    InvalidPrecision {
        /// Precision as written by the caller
        found: String,
    },

    /// Static array value has the wrong number of elements
    #[error("{path}: static array expects {expected} elements, got {found}")]
    ArrayLengthMismatch {
        /// Location of the array value
        path: ValuePath,
        /// Length declared by the type
        expected: usize,
        /// Length of the value
        found: usize,
    },

    /// Value does not fit its type
    #[error("{path}: value does not fit in {bits} bits")]
    ValueOutOfRange {
        /// Location of the scalar value
        path: ValuePath,
        /// Width allowed by the type
        bits: usize,
    },

    /// Tuple value has the wrong number of fields
    #[error("{path}: tuple expects {expected} fields, got {found}")]
    TupleArityMismatch {
        /// Location of the tuple value
        path: ValuePath,
        /// Field count declared by the type
        expected: usize,
        /// Field count of the value
        found: usize,
    },

    /// Value variant does not match the type
    #[error("{path}: expected a value of type {expected}, got {found}")]
    TypeMismatch {
        /// Location of the mismatched value
        path: ValuePath,
        /// Canonical string of the expected type
        expected: String,
        /// Variant name of the supplied value
        found: &'static str,
    },

    /// Input ended early
    #[error("buffer too short: need {need} bytes, have {have}")]
    BufferTooShort {
        /// Bytes required
        need: usize,
        /// Bytes available
        have: usize,
    },

    /// Offset points past the end of its region
    #[error("offset {offset} out of bounds for region of {len} bytes")]
    OffsetOutOfBounds {
        /// Offset read from the head
        offset: usize,
        /// Region length
        len: usize,
    },

    /// First tail offset does not start right after the head section
    #[error("first dynamic offset {offset} does not match head length {expected}")]
    UnalignedOffset {
        /// Offset read from the head
        offset: usize,
        /// End of the head section
        expected: usize,
    },

    /// Tail offsets go backwards
    #[error("dynamic offset {offset} precedes previous offset {previous}")]
    NonMonotonicOffset {
        /// Offending offset
        offset: usize,
        /// Offset of the preceding dynamic field
        previous: usize,
    },

    /// Bytes remain after a complete value
    #[error("trailing bytes: value ends at {consumed}, region has {len} bytes")]
    TrailingBytes {
        /// Bytes the value occupies
        consumed: usize,
        /// Region length
        len: usize,
    },

    /// Address bytes of the wrong length or encoding
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// A 2-byte length, count or offset field would overflow
    #[error("{what} of {size} does not fit in a 2-byte field")]
    EncodingOverflow {
        /// Which field overflowed
        what: &'static str,
        /// Size that was attempted
        size: usize,
    },

    /// A static type is too large to lay out in memory
    #[error("static type {ty} is too large to encode")]
    TypeTooLarge {
        /// Canonical string of the oversized type
        ty: String,
    },

    /// Decoding would produce more elements than allowed
    #[error("decoded value exceeds the limit of {limit} elements")]
    ValueLimitExceeded {
        /// Configured element limit
        limit: usize,
    },
}

impl AbiError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbiError::InvalidTypeString { .. } => ErrorKind::InvalidTypeString,
            AbiError::InvalidBitSize { .. } => ErrorKind::InvalidBitSize,
            AbiError::InvalidPrecision { .. } => ErrorKind::InvalidPrecision,
            AbiError::ArrayLengthMismatch { .. } => ErrorKind::ArrayLengthMismatch,
            AbiError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            AbiError::TupleArityMismatch { .. } => ErrorKind::TupleArityMismatch,
            AbiError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            AbiError::BufferTooShort { .. } => ErrorKind::BufferTooShort,
            AbiError::OffsetOutOfBounds { .. } => ErrorKind::OffsetOutOfBounds,
            AbiError::UnalignedOffset { .. } => ErrorKind::UnalignedOffset,
            AbiError::NonMonotonicOffset { .. } => ErrorKind::NonMonotonicOffset,
            AbiError::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            AbiError::InvalidAddress(_) => ErrorKind::ValueOutOfRange,
            AbiError::EncodingOverflow { .. } => ErrorKind::EncodingOverflow,
            AbiError::TypeTooLarge { .. } => ErrorKind::TypeTooLarge,
            AbiError::ValueLimitExceeded { .. } => ErrorKind::ValueLimitExceeded,
        }
    }

    pub(crate) fn type_string(input: &str, reason: &'static str) -> Self {
        AbiError::InvalidTypeString {
            input: input.to_string(),
            reason,
        }
    }
}
