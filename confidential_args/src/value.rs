//! Caller-supplied argument values and the values a decoder reconstructs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{AccountRef, BitWidth, PublicKey};

/// Semantic value for one parameter, before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentValue {
    Scalar(u128),
    Owned {
        nonce: u128,
        account: AccountRef,
    },
    SharedInput {
        owner: PublicKey,
        nonce: u128,
        account: AccountRef,
    },
    SharedOutput {
        recipient: PublicKey,
        nonce: u128,
    },
}

impl ArgumentValue {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            ArgumentValue::Scalar(_) => "scalar",
            ArgumentValue::Owned { .. } => "owned ciphertext",
            ArgumentValue::SharedInput { .. } => "shared ciphertext input",
            ArgumentValue::SharedOutput { .. } => "shared output context",
        }
    }
}

/// Named values for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentValues(BTreeMap<String, ArgumentValue>);

impl ArgumentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) -> Option<ArgumentValue> {
        self.0.insert(name.into(), value)
    }

    pub fn with(mut self, name: impl Into<String>, value: ArgumentValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn scalar(self, name: impl Into<String>, value: u128) -> Self {
        self.with(name, ArgumentValue::Scalar(value))
    }

    pub fn owned(self, name: impl Into<String>, nonce: u128, account: AccountRef) -> Self {
        self.with(name, ArgumentValue::Owned { nonce, account })
    }

    pub fn shared_input(
        self,
        name: impl Into<String>,
        owner: PublicKey,
        nonce: u128,
        account: AccountRef,
    ) -> Self {
        self.with(
            name,
            ArgumentValue::SharedInput {
                owner,
                nonce,
                account,
            },
        )
    }

    pub fn shared_output(self, name: impl Into<String>, recipient: PublicKey, nonce: u128) -> Self {
        self.with(name, ArgumentValue::SharedOutput { recipient, nonce })
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, ArgumentValue)> for ArgumentValues {
    fn from_iter<I: IntoIterator<Item = (String, ArgumentValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A reconstructed, typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedValue {
    Scalar {
        bit_width: BitWidth,
        value: u128,
    },
    OwnedCiphertext {
        nonce: u128,
        account: AccountRef,
        ciphertext: Vec<u8>,
    },
    SharedCiphertext {
        owner: PublicKey,
        nonce: u128,
        account: AccountRef,
        ciphertext: Vec<u8>,
    },
    SharedContext {
        recipient: PublicKey,
        nonce: u128,
    },
}

impl DecodedValue {
    /// The caller value this was decoded from. Resolved ciphertext bytes are dropped.
    pub fn to_argument_value(&self) -> ArgumentValue {
        match self {
            DecodedValue::Scalar { value, .. } => ArgumentValue::Scalar(*value),
            DecodedValue::OwnedCiphertext { nonce, account, .. } => ArgumentValue::Owned {
                nonce: *nonce,
                account: *account,
            },
            DecodedValue::SharedCiphertext {
                owner,
                nonce,
                account,
                ..
            } => ArgumentValue::SharedInput {
                owner: *owner,
                nonce: *nonce,
                account: *account,
            },
            DecodedValue::SharedContext { recipient, nonce } => ArgumentValue::SharedOutput {
                recipient: *recipient,
                nonce: *nonce,
            },
        }
    }

    /// Nonce carried by this value, if any.
    pub fn nonce(&self) -> Option<u128> {
        match self {
            DecodedValue::Scalar { .. } => None,
            DecodedValue::OwnedCiphertext { nonce, .. }
            | DecodedValue::SharedCiphertext { nonce, .. }
            | DecodedValue::SharedContext { nonce, .. } => Some(*nonce),
        }
    }

    /// Resolved ciphertext bytes, for values read from an account.
    pub fn ciphertext(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::OwnedCiphertext { ciphertext, .. }
            | DecodedValue::SharedCiphertext { ciphertext, .. } => Some(ciphertext),
            _ => None,
        }
    }
}

/// A decoded parameter bound to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedParameter {
    pub name: String,
    pub value: DecodedValue,
}

/// Decoded parameters in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedArguments {
    computation: String,
    parameters: Vec<DecodedParameter>,
}

impl DecodedArguments {
    pub(crate) fn new(computation: String, parameters: Vec<DecodedParameter>) -> Self {
        Self {
            computation,
            parameters,
        }
    }

    pub fn computation(&self) -> &str {
        &self.computation
    }

    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodedParameter> {
        self.parameters.iter()
    }

    /// Every nonce supplied with the inputs, in schema order.
    pub fn nonces(&self) -> Vec<u128> {
        self.parameters
            .iter()
            .filter_map(|p| p.value.nonce())
            .collect()
    }

    pub fn to_values(&self) -> ArgumentValues {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.value.to_argument_value()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a DecodedArguments {
    type Item = &'a DecodedParameter;
    type IntoIter = std::slice::Iter<'a, DecodedParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
