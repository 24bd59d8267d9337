//! Serialization and deserialization of transported payloads.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DeserializeError, PeekError, SerializeError};
use crate::outputs::OutputValue;
use crate::schema::ParameterSchema;
use crate::storage::InMemoryAccounts;
use crate::types::Invocation;
use crate::value::DecodedArguments;
use crate::{
    ACCOUNTS_MAGIC, ACCOUNTS_VERSION, DECODED_MAGIC, DECODED_VERSION, HEADER_SIZE,
    INVOCATION_MAGIC, INVOCATION_VERSION, OUTPUT_MAGIC, OUTPUT_VERSION, REGISTRY_MAGIC,
    REGISTRY_VERSION,
};

/// Peek the version number from invocation bytes without full deserialization.
///
/// This reads only the header (magic bytes + version) to allow fast-fail
/// for unsupported versions without deserializing the entire payload.
pub fn peek_invocation_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &INVOCATION_MAGIC)
}

/// Peek the version number from output bytes without full deserialization.
pub fn peek_output_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &OUTPUT_MAGIC)
}

/// Peek the version number from registry file bytes.
pub fn peek_registry_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &REGISTRY_MAGIC)
}

/// Peek the version number from account snapshot bytes.
pub fn peek_accounts_version(bytes: &[u8]) -> Result<u32, PeekError> {
    peek_version(bytes, &ACCOUNTS_MAGIC)
}

fn peek_version(bytes: &[u8], expected_magic: &[u8; 4]) -> Result<u32, PeekError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PeekError::TooShort);
    }
    if &bytes[0..4] != expected_magic {
        return Err(PeekError::InvalidMagic);
    }
    let version_bytes: [u8; 4] = bytes[4..8]
        .try_into()
        .map_err(|_| PeekError::InvalidVersion)?;
    Ok(u32::from_be_bytes(version_bytes))
}

fn serialize_with_header<T: Serialize + ?Sized>(
    magic: &[u8; 4],
    version: u32,
    payload: &T,
) -> Result<Vec<u8>, SerializeError> {
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    buf.extend_from_slice(magic);
    buf.extend_from_slice(&version.to_be_bytes());
    let payload_bytes = rmp_serde::to_vec(payload).map_err(SerializeError)?;
    buf.extend_from_slice(&payload_bytes);
    Ok(buf)
}

fn deserialize_payload<T: DeserializeOwned>(
    bytes: &[u8],
    version: u32,
    expected: u32,
) -> Result<T, DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PeekError::TooShort.into());
    }
    if version != expected {
        return Err(DeserializeError::UnsupportedVersion {
            got: version,
            expected,
        });
    }
    rmp_serde::from_slice(&bytes[HEADER_SIZE..]).map_err(DeserializeError::Payload)
}

fn deserialize_with_header<T: DeserializeOwned>(
    bytes: &[u8],
    magic: &[u8; 4],
    expected: u32,
) -> Result<T, DeserializeError> {
    let version = peek_version(bytes, magic)?;
    deserialize_payload(bytes, version, expected)
}

/// Serialize an invocation with magic bytes and version header.
pub fn serialize_invocation(invocation: &Invocation) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&INVOCATION_MAGIC, INVOCATION_VERSION, invocation)
}

/// Deserialize invocation payload, assuming header was already validated.
///
/// The caller must have validated the header via `peek_invocation_version` and
/// pass the returned version. This function validates the version matches the
/// expected `INVOCATION_VERSION` and deserializes the msgpack payload.
pub fn deserialize_invocation_payload(
    bytes: &[u8],
    version: u32,
) -> Result<Invocation, DeserializeError> {
    deserialize_payload(bytes, version, INVOCATION_VERSION)
}

/// Deserialize an invocation, validating magic bytes and version.
pub fn deserialize_invocation(bytes: &[u8]) -> Result<Invocation, DeserializeError> {
    let version = peek_invocation_version(bytes)?;
    deserialize_invocation_payload(bytes, version)
}

/// Serialize computation outputs with magic bytes and version header.
pub fn serialize_outputs(outputs: &[OutputValue]) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&OUTPUT_MAGIC, OUTPUT_VERSION, outputs)
}

/// Deserialize outputs, validating magic bytes and version.
pub fn deserialize_outputs(bytes: &[u8]) -> Result<Vec<OutputValue>, DeserializeError> {
    deserialize_with_header(bytes, &OUTPUT_MAGIC, OUTPUT_VERSION)
}

pub fn serialize_decoded(decoded: &DecodedArguments) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&DECODED_MAGIC, DECODED_VERSION, decoded)
}

pub fn deserialize_decoded(bytes: &[u8]) -> Result<DecodedArguments, DeserializeError> {
    deserialize_with_header(bytes, &DECODED_MAGIC, DECODED_VERSION)
}

/// Serialize a list of schemas as a registry file.
pub fn serialize_registry(schemas: &[ParameterSchema]) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&REGISTRY_MAGIC, REGISTRY_VERSION, schemas)
}

/// Deserialize a registry file. The schemas are not validated here.
pub fn deserialize_registry(bytes: &[u8]) -> Result<Vec<ParameterSchema>, DeserializeError> {
    deserialize_with_header(bytes, &REGISTRY_MAGIC, REGISTRY_VERSION)
}

/// Deserialize a registry payload whose header was checked by `peek_registry_version`.
pub fn deserialize_registry_payload(
    bytes: &[u8],
    version: u32,
) -> Result<Vec<ParameterSchema>, DeserializeError> {
    deserialize_payload(bytes, version, REGISTRY_VERSION)
}

pub fn serialize_accounts(accounts: &InMemoryAccounts) -> Result<Vec<u8>, SerializeError> {
    serialize_with_header(&ACCOUNTS_MAGIC, ACCOUNTS_VERSION, accounts)
}

pub fn deserialize_accounts(bytes: &[u8]) -> Result<InMemoryAccounts, DeserializeError> {
    deserialize_with_header(bytes, &ACCOUNTS_MAGIC, ACCOUNTS_VERSION)
}

pub fn deserialize_accounts_payload(
    bytes: &[u8],
    version: u32,
) -> Result<InMemoryAccounts, DeserializeError> {
    deserialize_payload(bytes, version, ACCOUNTS_VERSION)
}
