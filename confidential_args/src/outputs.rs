//! Computation results and their contract with the decoded inputs.

use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::schema::{OutputKind, ParameterSchema};
use crate::types::PublicKey;
use crate::value::{DecodedArguments, DecodedValue};

/// Ciphertext produced by a computation, with the nonce it was encrypted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedOutput {
    pub nonce: u128,
    pub ciphertexts: Vec<[u8; 32]>,
}

/// One computation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputValue {
    Revealed(u128),
    Boolean(bool),
    Owned(EncryptedOutput),
    Shared {
        recipient: PublicKey,
        output: EncryptedOutput,
    },
}

impl OutputValue {
    fn describe(&self) -> &'static str {
        match self {
            OutputValue::Revealed(_) => "revealed value",
            OutputValue::Boolean(_) => "revealed boolean",
            OutputValue::Owned(_) => "owned ciphertext",
            OutputValue::Shared { .. } => "shared ciphertext",
        }
    }
}

/// Check that `outputs` honour the schema's declared results.
///
/// Shared outputs must be encrypted under exactly the key and nonce supplied in
/// their context parameter. Owned outputs must carry a nonce that appears
/// nowhere among the inputs.
pub fn verify_outputs(
    schema: &ParameterSchema,
    inputs: &DecodedArguments,
    outputs: &[OutputValue],
) -> Result<(), OutputError> {
    let declared = schema.outputs();
    if declared.len() != outputs.len() {
        return Err(OutputError::CountMismatch {
            expected: declared.len(),
            actual: outputs.len(),
        });
    }

    let input_nonces = inputs.nonces();
    for (decl, value) in declared.iter().zip(outputs) {
        let kind_mismatch = || OutputError::KindMismatch {
            output: decl.name.clone(),
            expected: decl.kind.clone(),
            actual: value.describe(),
        };

        match (&decl.kind, value) {
            (OutputKind::Revealed(bit_width), OutputValue::Revealed(v)) => {
                if !bit_width.fits(*v) {
                    return Err(OutputError::ValueOutOfRange {
                        output: decl.name.clone(),
                        bit_width: *bit_width,
                        value: *v,
                    });
                }
            }
            (OutputKind::Boolean, OutputValue::Boolean(_)) => {}
            (OutputKind::OwnedCiphertext, OutputValue::Owned(out)) => {
                if input_nonces.contains(&out.nonce) {
                    return Err(OutputError::NonceReuse {
                        output: decl.name.clone(),
                        nonce: out.nonce,
                    });
                }
            }
            (OutputKind::SharedCiphertext { context }, OutputValue::Shared { recipient, output }) => {
                match inputs.get(context) {
                    Some(DecodedValue::SharedContext {
                        recipient: expected_recipient,
                        nonce,
                    }) => {
                        if expected_recipient != recipient || *nonce != output.nonce {
                            return Err(OutputError::ContextMismatch {
                                output: decl.name.clone(),
                                context: context.clone(),
                            });
                        }
                    }
                    _ => {
                        return Err(OutputError::MissingContext {
                            output: decl.name.clone(),
                            context: context.clone(),
                        });
                    }
                }
            }
            _ => return Err(kind_mismatch()),
        }
    }
    Ok(())
}
