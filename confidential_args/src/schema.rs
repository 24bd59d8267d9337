//! Parameter kinds and the schemas built from them.
//!
//! Every [`ParameterKind`] consumes a fixed number of wire tags. A schema's
//! total arity is the sum over its parameters, and an argument list whose length
//! differs from it is rejected before any value is reconstructed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::types::{BitWidth, TagKind};

/// Declared kind of a computation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// One plaintext scalar of the given width.
    Scalar(BitWidth),
    /// Ciphertext owned by the computation engine: nonce, account.
    OwnedCiphertext,
    /// Ciphertext owned by an external party, read as input: key, nonce, account.
    SharedCiphertextInput,
    /// Encryption context for a new output: key, nonce.
    SharedContextOutput,
}

impl ParameterKind {
    /// Number of wire tags this kind consumes.
    pub const fn arity(self) -> usize {
        match self {
            ParameterKind::Scalar(_) => 1,
            ParameterKind::OwnedCiphertext => 2,
            ParameterKind::SharedCiphertextInput => 3,
            ParameterKind::SharedContextOutput => 2,
        }
    }

    /// Expected tag kind at each position.
    pub fn layout(self) -> Vec<TagKind> {
        let nonce = TagKind::Plaintext(BitWidth::U128);
        match self {
            ParameterKind::Scalar(bw) => vec![TagKind::Plaintext(bw)],
            ParameterKind::OwnedCiphertext => vec![nonce, TagKind::Account],
            ParameterKind::SharedCiphertextInput => {
                vec![TagKind::PublicKey, nonce, TagKind::Account]
            }
            ParameterKind::SharedContextOutput => vec![TagKind::PublicKey, nonce],
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Scalar(bw) => write!(f, "scalar {bw}"),
            ParameterKind::OwnedCiphertext => write!(f, "owned ciphertext"),
            ParameterKind::SharedCiphertextInput => write!(f, "shared ciphertext input"),
            ParameterKind::SharedContextOutput => write!(f, "shared output context"),
        }
    }
}

/// A named schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

/// Declared kind of a computation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// Plaintext value revealed by the computation.
    Revealed(BitWidth),
    /// Revealed boolean.
    Boolean,
    /// Ciphertext for the engine's own context, under a nonce the engine picks.
    OwnedCiphertext,
    /// Ciphertext for the party named by a `SharedContextOutput` parameter.
    SharedCiphertext { context: String },
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Revealed(bw) => write!(f, "revealed {bw}"),
            OutputKind::Boolean => write!(f, "revealed boolean"),
            OutputKind::OwnedCiphertext => write!(f, "owned ciphertext"),
            OutputKind::SharedCiphertext { context } => {
                write!(f, "shared ciphertext for '{context}'")
            }
        }
    }
}

/// A named result declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDecl {
    pub name: String,
    pub kind: OutputKind,
}

/// Ordered input signature of one computation, plus its declared results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    computation: String,
    parameters: Vec<Parameter>,
    #[serde(default)]
    outputs: Vec<OutputDecl>,
}

impl ParameterSchema {
    pub fn builder(computation: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            computation: computation.into(),
            parameters: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn computation(&self) -> &str {
        &self.computation
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn outputs(&self) -> &[OutputDecl] {
        &self.outputs
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Sum of parameter arities, i.e. the exact length of a valid argument list.
    pub fn total_arity(&self) -> usize {
        self.parameters.iter().map(|p| p.kind.arity()).sum()
    }

    /// Check naming and output bindings.
    ///
    /// Deserialized schemas skip the builder, so the registry runs this again
    /// on publication.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.computation.is_empty() {
            return Err(SchemaError::EmptyComputationName);
        }

        let mut kinds = HashMap::with_capacity(self.parameters.len());
        for (index, param) in self.parameters.iter().enumerate() {
            if param.name.is_empty() {
                return Err(SchemaError::EmptyParameterName { index });
            }
            if kinds.insert(param.name.as_str(), param.kind).is_some() {
                return Err(SchemaError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
        }

        let mut output_names = HashSet::with_capacity(self.outputs.len());
        let mut bound_contexts = HashSet::new();
        for (index, output) in self.outputs.iter().enumerate() {
            if output.name.is_empty() {
                return Err(SchemaError::EmptyOutputName { index });
            }
            if !output_names.insert(output.name.as_str()) {
                return Err(SchemaError::DuplicateOutput {
                    name: output.name.clone(),
                });
            }
            if let OutputKind::SharedCiphertext { context } = &output.kind {
                match kinds.get(context.as_str()) {
                    None => {
                        return Err(SchemaError::UnknownOutputContext {
                            output: output.name.clone(),
                            context: context.clone(),
                        });
                    }
                    Some(ParameterKind::SharedContextOutput) => {}
                    Some(_) => {
                        return Err(SchemaError::NotAnOutputContext {
                            output: output.name.clone(),
                            context: context.clone(),
                        });
                    }
                }
                if !bound_contexts.insert(context.as_str()) {
                    return Err(SchemaError::ContextBoundTwice {
                        context: context.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Builder for [`ParameterSchema`]. Parameters keep insertion order.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    computation: String,
    parameters: Vec<Parameter>,
    outputs: Vec<OutputDecl>,
}

impl SchemaBuilder {
    pub fn param(mut self, name: impl Into<String>, kind: ParameterKind) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn scalar(self, name: impl Into<String>, bit_width: BitWidth) -> Self {
        self.param(name, ParameterKind::Scalar(bit_width))
    }

    pub fn owned_ciphertext(self, name: impl Into<String>) -> Self {
        self.param(name, ParameterKind::OwnedCiphertext)
    }

    pub fn shared_input(self, name: impl Into<String>) -> Self {
        self.param(name, ParameterKind::SharedCiphertextInput)
    }

    pub fn shared_output_context(self, name: impl Into<String>) -> Self {
        self.param(name, ParameterKind::SharedContextOutput)
    }

    pub fn output(mut self, name: impl Into<String>, kind: OutputKind) -> Self {
        self.outputs.push(OutputDecl {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn build(self) -> Result<ParameterSchema, SchemaError> {
        let schema = ParameterSchema {
            computation: self.computation,
            parameters: self.parameters,
            outputs: self.outputs,
        };
        schema.validate()?;
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_length_matches_arity() {
        let kinds = [
            ParameterKind::Scalar(BitWidth::U8),
            ParameterKind::Scalar(BitWidth::U128),
            ParameterKind::OwnedCiphertext,
            ParameterKind::SharedCiphertextInput,
            ParameterKind::SharedContextOutput,
        ];
        for kind in kinds {
            assert_eq!(kind.layout().len(), kind.arity(), "{kind}");
        }
    }

    #[test]
    fn test_total_arity() {
        let schema = ParameterSchema::builder("mixed")
            .shared_input("balance")
            .scalar("amount", BitWidth::U64)
            .shared_output_context("recipient")
            .build()
            .unwrap();
        assert_eq!(schema.total_arity(), 6);
    }

    #[test]
    fn test_empty_schema_has_zero_arity() {
        let schema = ParameterSchema::builder("noop").build().unwrap();
        assert_eq!(schema.total_arity(), 0);
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = ParameterSchema::builder("dup")
            .scalar("x", BitWidth::U8)
            .owned_ciphertext("x")
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateParameter { name: "x".into() });
    }

    #[test]
    fn test_empty_names_rejected() {
        assert_eq!(
            ParameterSchema::builder("").build().unwrap_err(),
            SchemaError::EmptyComputationName
        );
        assert_eq!(
            ParameterSchema::builder("c")
                .scalar("a", BitWidth::U8)
                .scalar("", BitWidth::U8)
                .build()
                .unwrap_err(),
            SchemaError::EmptyParameterName { index: 1 }
        );
    }

    #[test]
    fn test_shared_output_must_bind_output_context() {
        let err = ParameterSchema::builder("c")
            .owned_ciphertext("balance")
            .output(
                "out",
                OutputKind::SharedCiphertext {
                    context: "balance".into(),
                },
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::NotAnOutputContext { .. }));

        let err = ParameterSchema::builder("c")
            .output(
                "out",
                OutputKind::SharedCiphertext {
                    context: "nobody".into(),
                },
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownOutputContext { .. }));
    }

    #[test]
    fn test_context_bound_twice_rejected() {
        let shared = || OutputKind::SharedCiphertext {
            context: "client".into(),
        };
        let err = ParameterSchema::builder("c")
            .shared_output_context("client")
            .output("a", shared())
            .output("b", shared())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::ContextBoundTwice {
                context: "client".into()
            }
        );
    }
}
