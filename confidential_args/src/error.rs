//! Error types for schema, encoding, decoding and serialization operations.

use crate::schema::{OutputKind, ParameterKind};
use crate::types::{AccountKey, BitWidth, TagKind};

/// Error type for peeking version from serialized data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeekError {
    /// Data is too short to contain a valid header.
    #[error("data too short to contain valid header")]
    TooShort,
    /// Magic bytes do not match expected value.
    #[error("invalid magic bytes")]
    InvalidMagic,
    /// Version field is corrupt or unreadable.
    #[error("version field is corrupt or unreadable")]
    InvalidVersion,
}

/// Error type for deserialization operations.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// Error peeking the version header.
    #[error("header validation failed: {0}")]
    Peek(#[from] PeekError),
    /// Version is not supported.
    #[error("unsupported version {got}, expected {expected}")]
    UnsupportedVersion { got: u32, expected: u32 },
    /// Error deserializing the payload.
    #[error("payload deserialization failed")]
    Payload(#[source] rmp_serde::decode::Error),
}

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
#[error("payload serialization failed")]
pub struct SerializeError(#[source] pub(crate) rmp_serde::encode::Error);

/// A schema that cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("computation name must not be empty")]
    EmptyComputationName,
    #[error("parameter {index} has an empty name")]
    EmptyParameterName { index: usize },
    #[error("parameter '{name}' is declared more than once")]
    DuplicateParameter { name: String },
    #[error("output {index} has an empty name")]
    EmptyOutputName { index: usize },
    #[error("output '{name}' is declared more than once")]
    DuplicateOutput { name: String },
    #[error("output '{output}' refers to unknown parameter '{context}'")]
    UnknownOutputContext { output: String, context: String },
    #[error("output '{output}' refers to parameter '{context}' which is not a shared output context")]
    NotAnOutputContext { output: String, context: String },
    #[error("shared output context '{context}' is bound by more than one output")]
    ContextBoundTwice { context: String },
}

/// Error type for schema publication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
    #[error("computation '{computation}' is already published")]
    AlreadyPublished { computation: String },
    #[error("computation '{computation}' has offset {offset:#010x} already used by '{existing}'")]
    OffsetCollision {
        computation: String,
        existing: String,
        offset: u32,
    },
}

/// Error type for the account storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("account {owner} not found")]
    AccountNotFound { owner: AccountKey },
    #[error("range {offset}+{length} of account {owner} is unavailable")]
    RangeUnavailable {
        owner: AccountKey,
        offset: u32,
        length: u32,
    },
}

/// Error type for encoding caller values into an argument list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("no schema published for computation '{computation}'")]
    SchemaNotFound { computation: String },
    #[error("no value supplied for parameter '{parameter}'")]
    MissingValue { parameter: String },
    #[error("value '{name}' does not match any declared parameter")]
    UnexpectedValue { name: String },
    #[error("parameter '{parameter}' expects {expected}, got {actual}")]
    ValueKindMismatch {
        parameter: String,
        expected: ParameterKind,
        actual: &'static str,
    },
    #[error("value {value} of parameter '{parameter}' does not fit {bit_width}")]
    ValueOutOfRange {
        parameter: String,
        bit_width: BitWidth,
        value: u128,
    },
    /// The encoder emitted a different number of tags than the schema declares.
    /// This is a bug in the encoder, never a caller error.
    #[error("encoder emitted {actual} tags but the schema declares {expected}")]
    ArityInvariant { expected: usize, actual: usize },
}

/// Error type for decoding an argument list against a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("no schema published for computation '{computation}'")]
    SchemaNotFound { computation: String },
    #[error("schema declares {expected} argument tags, received {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error(
        "parameter '{parameter}' position {position} (tag {index}) expects {expected}, got {actual}"
    )]
    TagTypeMismatch {
        parameter: String,
        position: usize,
        index: usize,
        expected: TagKind,
        actual: TagKind,
    },
    #[error("parameter '{parameter}' position {position} carries {value} which does not fit {bit_width}")]
    ValueOutOfRange {
        parameter: String,
        position: usize,
        bit_width: BitWidth,
        value: u128,
    },
    #[error(
        "parameter '{parameter}' references bytes {offset}+{length} of account {owner} holding only {data_length} bytes"
    )]
    AccountRangeOverflow {
        parameter: String,
        owner: AccountKey,
        offset: u32,
        length: u32,
        data_length: u64,
    },
    #[error("parameter '{parameter}' references account {owner} which does not exist")]
    AccountNotFound { parameter: String, owner: AccountKey },
    #[error("parameter '{parameter}' could not be read from storage")]
    Storage {
        parameter: String,
        #[source]
        source: StorageError,
    },
    #[error("decoder stopped at tag {cursor} of {len}")]
    CursorInvariant { cursor: usize, len: usize },
}

/// Error type for checking computation results against their declared outputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    #[error("schema declares {expected} outputs, computation produced {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("output '{output}' expects {expected}, got {actual}")]
    KindMismatch {
        output: String,
        expected: OutputKind,
        actual: &'static str,
    },
    #[error("output '{output}' value {value} does not fit {bit_width}")]
    ValueOutOfRange {
        output: String,
        bit_width: BitWidth,
        value: u128,
    },
    #[error("output '{output}' was not decoded with its context parameter '{context}'")]
    MissingContext { output: String, context: String },
    #[error("output '{output}' does not use the key and nonce supplied in '{context}'")]
    ContextMismatch { output: String, context: String },
    #[error("output '{output}' reuses input nonce {nonce:#x}")]
    NonceReuse { output: String, nonce: u128 },
}

/// A nonce seen twice for the same encryption context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("nonce {nonce:#x} was already used for {context}")]
pub struct NonceReuseError {
    pub context: String,
    pub nonce: u128,
}
