//! Encoding caller values into an argument list.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::EncodeError;
use crate::registry::SchemaRegistry;
use crate::schema::{Parameter, ParameterKind, ParameterSchema};
use crate::types::{AccountRef, ArgumentTag, BitWidth, EncodedArgumentList, Invocation, PublicKey};
use crate::value::{ArgumentValue, ArgumentValues};

/// Accumulator for emitted tags.
struct Emitter<'a> {
    tags: Vec<ArgumentTag>,
    /// Nonce to the parameter that first used it, for reuse warnings.
    nonces: HashMap<u128, &'a str>,
}

impl<'a> Emitter<'a> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            tags: Vec::with_capacity(capacity),
            nonces: HashMap::new(),
        }
    }

    /// Emit a nonce tag. Returns the parameter that already used `nonce`, if any.
    fn nonce(&mut self, parameter: &'a str, nonce: u128) -> Option<&'a str> {
        let first = self.nonces.insert(nonce, parameter);
        if let Some(first) = first {
            warn!("Parameters '{first}' and '{parameter}' share nonce {nonce:#x}");
        }
        self.tags.push(ArgumentTag::nonce(nonce));
        first
    }

    fn public_key(&mut self, key: PublicKey) {
        self.tags.push(ArgumentTag::PublicKey(key));
    }

    fn account(&mut self, account: AccountRef) {
        self.tags.push(ArgumentTag::Account(account));
    }
}

/// Emit a plaintext scalar parameter.
fn emit_scalar(
    out: &mut Emitter<'_>,
    parameter: &str,
    bit_width: BitWidth,
    value: u128,
) -> Result<(), EncodeError> {
    if !bit_width.fits(value) {
        return Err(EncodeError::ValueOutOfRange {
            parameter: parameter.to_string(),
            bit_width,
            value,
        });
    }
    out.tags.push(ArgumentTag::plaintext(bit_width, value));
    Ok(())
}

/// Emit the tags of one parameter, in positional order.
fn emit_param<'a>(
    out: &mut Emitter<'a>,
    param: &'a Parameter,
    value: &ArgumentValue,
) -> Result<(), EncodeError> {
    let name = param.name.as_str();
    match (param.kind, *value) {
        (ParameterKind::Scalar(bit_width), ArgumentValue::Scalar(v)) => {
            emit_scalar(out, name, bit_width, v)?;
        }
        (ParameterKind::OwnedCiphertext, ArgumentValue::Owned { nonce, account }) => {
            out.nonce(name, nonce);
            out.account(account);
        }
        (
            ParameterKind::SharedCiphertextInput,
            ArgumentValue::SharedInput {
                owner,
                nonce,
                account,
            },
        ) => {
            out.public_key(owner);
            out.nonce(name, nonce);
            out.account(account);
        }
        (ParameterKind::SharedContextOutput, ArgumentValue::SharedOutput { recipient, nonce }) => {
            out.public_key(recipient);
            out.nonce(name, nonce);
        }
        (expected, actual) => {
            return Err(EncodeError::ValueKindMismatch {
                parameter: param.name.clone(),
                expected,
                actual: actual.describe(),
            });
        }
    }
    debug!("Encoded parameter '{name}' as {}", param.kind);
    Ok(())
}

/// Encode `values` against `schema`.
///
/// Every declared parameter must have a value and every value must name a
/// declared parameter. Nonces are taken as given; generating fresh ones is the
/// caller's job.
pub fn encode(
    schema: &ParameterSchema,
    values: &ArgumentValues,
) -> Result<EncodedArgumentList, EncodeError> {
    if let Some(name) = values.names().find(|n| schema.parameter(n).is_none()) {
        return Err(EncodeError::UnexpectedValue {
            name: name.to_string(),
        });
    }

    let expected = schema.total_arity();
    let mut out = Emitter::with_capacity(expected);
    for param in schema.parameters() {
        let value = values.get(&param.name).ok_or_else(|| EncodeError::MissingValue {
            parameter: param.name.clone(),
        })?;
        emit_param(&mut out, param, value)?;
    }

    if out.tags.len() != expected {
        return Err(EncodeError::ArityInvariant {
            expected,
            actual: out.tags.len(),
        });
    }
    Ok(EncodedArgumentList::new(out.tags))
}

/// Look up `computation` in the registry and encode a call to it.
pub fn encode_invocation(
    registry: &SchemaRegistry,
    computation: &str,
    values: &ArgumentValues,
) -> Result<Invocation, EncodeError> {
    let schema = registry
        .get(computation)
        .ok_or_else(|| EncodeError::SchemaNotFound {
            computation: computation.to_string(),
        })?;
    let arguments = encode(&schema, values)?;
    Ok(Invocation {
        computation: computation.to_string(),
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountKey;

    #[test]
    fn test_nonce_reuse_is_reported() {
        let schema = ParameterSchema::builder("pair")
            .owned_ciphertext("a")
            .shared_output_context("b")
            .build()
            .unwrap();
        let [a, b] = schema.parameters() else {
            panic!("two parameters");
        };
        let account = AccountRef::new(AccountKey([1; 32]), 0, 32);

        let mut out = Emitter::with_capacity(schema.total_arity());
        assert_eq!(out.nonce(&a.name, 7), None);
        out.account(account);
        out.public_key(PublicKey([2; 32]));
        assert_eq!(out.nonce(&b.name, 7), Some("a"));
        assert_eq!(out.nonce(&b.name, 8), None);
        assert_eq!(out.tags.len(), 5);
    }

    #[test]
    fn test_shared_nonces_still_encode() {
        let schema = ParameterSchema::builder("pair")
            .shared_output_context("client")
            .shared_output_context("client_again")
            .build()
            .unwrap();
        let values = ArgumentValues::new()
            .shared_output("client", PublicKey([3; 32]), 9)
            .shared_output("client_again", PublicKey([3; 32]), 9);
        let encoded = encode(&schema, &values).unwrap();
        assert_eq!(encoded.tags()[1], encoded.tags()[3]);
    }
}
