//! Wire tags and the primitive values they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared width of a plaintext tag. Nonces always use `U128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BitWidth {
    U8 = 8,
    U16 = 16,
    U32 = 32,
    U64 = 64,
    U128 = 128,
}

impl BitWidth {
    /// Get the maximum unsigned value for this bit width.
    pub fn max_unsigned(self) -> u128 {
        match self {
            BitWidth::U8 => u8::MAX as u128,
            BitWidth::U16 => u16::MAX as u128,
            BitWidth::U32 => u32::MAX as u128,
            BitWidth::U64 => u64::MAX as u128,
            BitWidth::U128 => u128::MAX,
        }
    }

    /// Whether `value` is representable as an unsigned integer of this width.
    pub fn fits(self, value: u128) -> bool {
        value <= self.max_unsigned()
    }
}

impl From<BitWidth> for u8 {
    fn from(bw: BitWidth) -> u8 {
        bw as u8
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", u8::from(*self))
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

/// A 32-byte public key identifying a party's encryption context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

/// A 32-byte address of a persisted account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountKey(pub [u8; 32]);

macro_rules! impl_key_fmt {
    ($ty:ident) => {
        impl $ty {
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl From<[u8; 32]> for $ty {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_hex(f, &self.0)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($ty), "("))?;
                write_hex(f, &self.0)?;
                write!(f, ")")
            }
        }
    };
}

impl_key_fmt!(PublicKey);
impl_key_fmt!(AccountKey);

/// Reference to a byte range inside an account's data blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRef {
    pub owner: AccountKey,
    pub offset: u32,
    pub length: u32,
}

impl AccountRef {
    pub fn new(owner: AccountKey, offset: u32, length: u32) -> Self {
        Self {
            owner,
            offset,
            length,
        }
    }

    /// One past the last referenced byte. Computed in `u64` so it cannot overflow.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }
}

/// A single tagged value in an encoded argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentTag {
    /// Unsigned integer of a declared bit width.
    Plaintext { bit_width: BitWidth, value: u128 },
    /// Public key of an encryption context.
    PublicKey(PublicKey),
    /// Ciphertext bytes held in an account.
    Account(AccountRef),
}

impl ArgumentTag {
    pub fn plaintext(bit_width: BitWidth, value: u128) -> Self {
        ArgumentTag::Plaintext { bit_width, value }
    }

    /// Nonces always travel as 128-bit plaintext.
    pub fn nonce(value: u128) -> Self {
        ArgumentTag::Plaintext {
            bit_width: BitWidth::U128,
            value,
        }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            ArgumentTag::Plaintext { bit_width, .. } => TagKind::Plaintext(*bit_width),
            ArgumentTag::PublicKey(_) => TagKind::PublicKey,
            ArgumentTag::Account(_) => TagKind::Account,
        }
    }
}

/// The runtime kind of an [`ArgumentTag`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    Plaintext(BitWidth),
    PublicKey,
    Account,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Plaintext(bw) => write!(f, "plaintext {bw}"),
            TagKind::PublicKey => write!(f, "public key"),
            TagKind::Account => write!(f, "account reference"),
        }
    }
}

/// Ordered argument tags for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedArgumentList(Vec<ArgumentTag>);

impl EncodedArgumentList {
    pub fn new(tags: Vec<ArgumentTag>) -> Self {
        Self(tags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tags(&self) -> &[ArgumentTag] {
        &self.0
    }

    pub fn into_tags(self) -> Vec<ArgumentTag> {
        self.0
    }
}

impl From<Vec<ArgumentTag>> for EncodedArgumentList {
    fn from(tags: Vec<ArgumentTag>) -> Self {
        Self(tags)
    }
}

impl IntoIterator for EncodedArgumentList {
    type Item = ArgumentTag;
    type IntoIter = std::vec::IntoIter<ArgumentTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// An encoded call to a named computation, as carried by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub computation: String,
    pub arguments: EncodedArgumentList,
}
