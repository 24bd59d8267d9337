//! Decoding an argument list against a schema.
//!
//! Decoding is a single forward pass. The list length is checked against the
//! schema's total arity before any tag is inspected, and the first failing
//! parameter aborts the whole decode.

use log::{debug, info};

use crate::error::{DecodeError, StorageError};
use crate::registry::SchemaRegistry;
use crate::schema::{Parameter, ParameterKind, ParameterSchema};
use crate::storage::AccountStorage;
use crate::types::{
    AccountRef, ArgumentTag, BitWidth, EncodedArgumentList, Invocation, PublicKey, TagKind,
};
use crate::value::{DecodedArguments, DecodedParameter, DecodedValue};

/// Positional reader over the tags belonging to one parameter.
struct ParamReader<'a, S: ?Sized> {
    tags: &'a [ArgumentTag],
    /// Absolute index of the parameter's first tag.
    base: usize,
    position: usize,
    parameter: &'a str,
    storage: &'a S,
}

impl<'a, S: AccountStorage + ?Sized> ParamReader<'a, S> {
    /// Take the tag at the current position and advance.
    fn take(&mut self) -> ArgumentTag {
        let tag = self.tags[self.position];
        self.position += 1;
        tag
    }

    /// Mismatch report for the tag just taken.
    fn mismatch(&self, expected: TagKind, actual: ArgumentTag) -> DecodeError {
        let position = self.position - 1;
        DecodeError::TagTypeMismatch {
            parameter: self.parameter.to_string(),
            position,
            index: self.base + position,
            expected,
            actual: actual.kind(),
        }
    }

    fn plaintext(&mut self, bit_width: BitWidth) -> Result<u128, DecodeError> {
        match self.take() {
            ArgumentTag::Plaintext { bit_width: bw, value } if bw == bit_width => {
                if bit_width.fits(value) {
                    Ok(value)
                } else {
                    Err(DecodeError::ValueOutOfRange {
                        parameter: self.parameter.to_string(),
                        position: self.position - 1,
                        bit_width,
                        value,
                    })
                }
            }
            other => Err(self.mismatch(TagKind::Plaintext(bit_width), other)),
        }
    }

    fn nonce(&mut self) -> Result<u128, DecodeError> {
        self.plaintext(BitWidth::U128)
    }

    fn public_key(&mut self) -> Result<PublicKey, DecodeError> {
        match self.take() {
            ArgumentTag::PublicKey(key) => Ok(key),
            other => Err(self.mismatch(TagKind::PublicKey, other)),
        }
    }

    /// Read an account reference, validate its range and resolve the bytes.
    fn account(&mut self) -> Result<(AccountRef, Vec<u8>), DecodeError> {
        let account = match self.take() {
            ArgumentTag::Account(account) => account,
            other => return Err(self.mismatch(TagKind::Account, other)),
        };

        let data_length = self
            .storage
            .data_length(&account.owner)
            .map_err(|e| self.storage_error(e))?;
        if account.end() > data_length {
            return Err(DecodeError::AccountRangeOverflow {
                parameter: self.parameter.to_string(),
                owner: account.owner,
                offset: account.offset,
                length: account.length,
                data_length,
            });
        }

        let ciphertext = self
            .storage
            .read_range(&account)
            .map_err(|e| self.storage_error(e))?;
        Ok((account, ciphertext))
    }

    fn storage_error(&self, err: StorageError) -> DecodeError {
        match err {
            StorageError::AccountNotFound { owner } => DecodeError::AccountNotFound {
                parameter: self.parameter.to_string(),
                owner,
            },
            source => DecodeError::Storage {
                parameter: self.parameter.to_string(),
                source,
            },
        }
    }
}

/// Reconstruct one parameter from exactly `param.kind.arity()` tags.
fn decode_param<S: AccountStorage + ?Sized>(
    param: &Parameter,
    tags: &[ArgumentTag],
    base: usize,
    storage: &S,
) -> Result<DecodedValue, DecodeError> {
    let mut reader = ParamReader {
        tags,
        base,
        position: 0,
        parameter: &param.name,
        storage,
    };

    let value = match param.kind {
        ParameterKind::Scalar(bit_width) => DecodedValue::Scalar {
            bit_width,
            value: reader.plaintext(bit_width)?,
        },
        ParameterKind::OwnedCiphertext => {
            let nonce = reader.nonce()?;
            let (account, ciphertext) = reader.account()?;
            DecodedValue::OwnedCiphertext {
                nonce,
                account,
                ciphertext,
            }
        }
        ParameterKind::SharedCiphertextInput => {
            let owner = reader.public_key()?;
            let nonce = reader.nonce()?;
            let (account, ciphertext) = reader.account()?;
            DecodedValue::SharedCiphertext {
                owner,
                nonce,
                account,
                ciphertext,
            }
        }
        ParameterKind::SharedContextOutput => {
            let recipient = reader.public_key()?;
            let nonce = reader.nonce()?;
            DecodedValue::SharedContext { recipient, nonce }
        }
    };
    debug_assert_eq!(reader.position, param.kind.arity());
    Ok(value)
}

/// Decode `arguments` against `schema`, resolving ciphertext through `storage`.
pub fn decode<S: AccountStorage + ?Sized>(
    schema: &ParameterSchema,
    arguments: &EncodedArgumentList,
    storage: &S,
) -> Result<DecodedArguments, DecodeError> {
    let tags = arguments.tags();
    let expected = schema.total_arity();
    if tags.len() != expected {
        return Err(DecodeError::ArityMismatch {
            expected,
            actual: tags.len(),
        });
    }

    let mut cursor = 0;
    let mut parameters = Vec::with_capacity(schema.parameters().len());
    for param in schema.parameters() {
        let arity = param.kind.arity();
        let value = decode_param(param, &tags[cursor..cursor + arity], cursor, storage)?;
        debug!(
            "Decoded parameter '{}' ({}) from tags {cursor}..{}",
            param.name,
            param.kind,
            cursor + arity
        );
        parameters.push(DecodedParameter {
            name: param.name.clone(),
            value,
        });
        cursor += arity;
    }

    if cursor != tags.len() {
        return Err(DecodeError::CursorInvariant {
            cursor,
            len: tags.len(),
        });
    }

    info!(
        "Decoded {} parameters from {} tags for computation '{}'",
        parameters.len(),
        tags.len(),
        schema.computation()
    );
    Ok(DecodedArguments::new(
        schema.computation().to_string(),
        parameters,
    ))
}

/// Look up the invoked computation and decode its arguments.
pub fn decode_invocation<S: AccountStorage + ?Sized>(
    registry: &SchemaRegistry,
    invocation: &Invocation,
    storage: &S,
) -> Result<DecodedArguments, DecodeError> {
    let schema = registry
        .get(&invocation.computation)
        .ok_or_else(|| DecodeError::SchemaNotFound {
            computation: invocation.computation.clone(),
        })?;
    decode(&schema, &invocation.arguments, storage)
}
