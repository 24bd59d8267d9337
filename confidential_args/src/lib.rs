//! Typed argument marshalling for confidential remote computation.
//!
//! A client encodes named values into an ordered list of tagged arguments
//! against a published [`ParameterSchema`]. The computation side decodes the
//! same list against the same schema, resolving ciphertext bytes from account
//! storage. Every parameter kind consumes a fixed number of tags, so a list of
//! the wrong length is rejected before any value is reconstructed.
//!
//! # Wire Format
//!
//! Every transported payload uses a versioned binary format:
//!
//! ```text
//! [MAGIC: 4 bytes][VERSION: 4 bytes big-endian u32][PAYLOAD: msgpack bytes]
//! ```
//!
//! - **MAGIC**: Payload type identifier ("CAIV" invocations, "CAOU" outputs,
//!   "CADA" decoded arguments, "CASR" registry files, "CAAC" account snapshots)
//! - **VERSION**: Protocol version as big-endian u32 (fixed 4 bytes)
//! - **PAYLOAD**: MessagePack-serialized data
//!
//! # Versioning Policy
//!
//! The deserializer only accepts data with an exact version match, so a
//! client and server on different protocol versions fail early instead of
//! misreading each other's payloads. Schema changes are handled separately:
//! a changed signature is published under a new computation name.

pub mod banking;
mod decode;
mod encode;
mod error;
mod nonce;
mod outputs;
mod registry;
mod schema;
mod storage;
mod types;
mod value;
mod wire;

pub use decode::{decode, decode_invocation};
pub use encode::{encode, encode_invocation};
pub use error::{
    DecodeError, DeserializeError, EncodeError, NonceReuseError, OutputError, PeekError,
    RegistryError, SchemaError, SerializeError, StorageError,
};
pub use nonce::{NonceTracker, fresh_nonce};
pub use outputs::{EncryptedOutput, OutputValue, verify_outputs};
pub use registry::{ComputationId, SchemaRegistry, computation_offset};
pub use schema::{OutputDecl, OutputKind, Parameter, ParameterKind, ParameterSchema, SchemaBuilder};
pub use storage::{AccountStorage, InMemoryAccounts};
pub use types::{
    AccountKey, AccountRef, ArgumentTag, BitWidth, EncodedArgumentList, Invocation, PublicKey,
    TagKind,
};
pub use value::{ArgumentValue, ArgumentValues, DecodedArguments, DecodedParameter, DecodedValue};
pub use wire::{
    deserialize_accounts, deserialize_accounts_payload, deserialize_decoded,
    deserialize_invocation, deserialize_invocation_payload, deserialize_outputs,
    deserialize_registry, deserialize_registry_payload, peek_accounts_version,
    peek_invocation_version, peek_output_version, peek_registry_version, serialize_accounts,
    serialize_decoded, serialize_invocation, serialize_outputs, serialize_registry,
};

/// Current protocol version for invocations.
pub const INVOCATION_VERSION: u32 = 1;

/// Current protocol version for outputs.
pub const OUTPUT_VERSION: u32 = 1;

/// Current protocol version for decoded argument reports.
pub const DECODED_VERSION: u32 = 1;

/// Current protocol version for registry files.
pub const REGISTRY_VERSION: u32 = 1;

/// Current protocol version for account snapshots.
pub const ACCOUNTS_VERSION: u32 = 1;

/// Magic bytes identifying invocation files: "CAIV" in ASCII.
pub const INVOCATION_MAGIC: [u8; 4] = *b"CAIV";

/// Magic bytes identifying output files: "CAOU" in ASCII.
pub const OUTPUT_MAGIC: [u8; 4] = *b"CAOU";

/// Magic bytes identifying decoded argument reports: "CADA" in ASCII.
pub const DECODED_MAGIC: [u8; 4] = *b"CADA";

/// Magic bytes identifying registry files: "CASR" in ASCII.
pub const REGISTRY_MAGIC: [u8; 4] = *b"CASR";

/// Magic bytes identifying account snapshots: "CAAC" in ASCII.
pub const ACCOUNTS_MAGIC: [u8; 4] = *b"CAAC";

/// Header size: 4 bytes magic + 4 bytes version.
pub const HEADER_SIZE: usize = 8;
