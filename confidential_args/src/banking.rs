//! The confidential banking computations and the account layout they read.

use sha2::{Digest, Sha256};

use crate::error::{RegistryError, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::{OutputKind, ParameterSchema};
use crate::types::{AccountKey, AccountRef, BitWidth, PublicKey};
use crate::value::ArgumentValues;

pub const INITIALIZE_ACCOUNTS: &str = "initialize_accounts";
pub const PROCESS_PAYMENT: &str = "process_payment";
pub const CHECK_BALANCE: &str = "check_balance";
pub const CALCULATE_REWARDS: &str = "calculate_rewards";

/// Byte layout of a persisted user account.
///
/// ```text
/// [discriminator: 8][account_id: 8][owner: 32][encrypted_balance: 32]
/// [balance_nonce: 16][transaction_count: 8][reward_points: 8]
/// [owner_enc_pubkey: 32][account_state: 1][bump: 1]
/// ```
///
/// Integers are little-endian.
pub struct UserAccountLayout;

impl UserAccountLayout {
    pub const DISCRIMINATOR_LEN: u32 = 8;
    pub const ENCRYPTED_BALANCE_OFFSET: u32 = Self::DISCRIMINATOR_LEN + 8 + 32;
    pub const ENCRYPTED_BALANCE_LEN: u32 = 32;
    pub const BALANCE_NONCE_OFFSET: u32 = Self::ENCRYPTED_BALANCE_OFFSET + Self::ENCRYPTED_BALANCE_LEN;
    pub const DATA_LEN: u32 = Self::BALANCE_NONCE_OFFSET + 16 + 8 + 8 + 32 + 1 + 1;

    /// Reference to the encrypted balance of the account at `key`.
    pub fn balance_ref(key: AccountKey) -> AccountRef {
        AccountRef::new(
            key,
            Self::ENCRYPTED_BALANCE_OFFSET,
            Self::ENCRYPTED_BALANCE_LEN,
        )
    }

    /// First `DISCRIMINATOR_LEN` bytes of `SHA-256("account:UserAccount")`.
    pub fn discriminator() -> [u8; UserAccountLayout::DISCRIMINATOR_LEN as usize] {
        let digest = Sha256::digest(b"account:UserAccount");
        let mut out = [0u8; Self::DISCRIMINATOR_LEN as usize];
        let n = out.len();
        out.copy_from_slice(&digest[..n]);
        out
    }
}

/// Lifecycle state stored in a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccountState {
    Initializing = 0,
    Active = 1,
    Frozen = 2,
    Closed = 3,
}

/// A user account as persisted on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub account_id: u64,
    pub owner: [u8; 32],
    pub encrypted_balance: [u8; 32],
    pub balance_nonce: u128,
    pub transaction_count: u64,
    pub reward_points: u64,
    pub owner_enc_pubkey: PublicKey,
    pub account_state: AccountState,
    pub bump: u8,
}

impl UserAccount {
    /// Serialize with the discriminator prefix, following [`UserAccountLayout`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(UserAccountLayout::DATA_LEN as usize);
        buf.extend_from_slice(&UserAccountLayout::discriminator());
        buf.extend_from_slice(&self.account_id.to_le_bytes());
        buf.extend_from_slice(&self.owner);
        buf.extend_from_slice(&self.encrypted_balance);
        buf.extend_from_slice(&self.balance_nonce.to_le_bytes());
        buf.extend_from_slice(&self.transaction_count.to_le_bytes());
        buf.extend_from_slice(&self.reward_points.to_le_bytes());
        buf.extend_from_slice(self.owner_enc_pubkey.as_bytes());
        buf.push(self.account_state as u8);
        buf.push(self.bump);
        buf
    }
}

/// `initialize_accounts(initial_balance, mxe_nonce, client, client_again)`.
pub fn initialize_accounts_schema() -> Result<ParameterSchema, SchemaError> {
    ParameterSchema::builder(INITIALIZE_ACCOUNTS)
        .scalar("initial_balance", BitWidth::U64)
        .scalar("mxe_nonce", BitWidth::U128)
        .shared_output_context("client")
        .shared_output_context("client_again")
        .output("mxe_balance", OutputKind::OwnedCiphertext)
        .output(
            "client_balance",
            OutputKind::SharedCiphertext {
                context: "client_again".into(),
            },
        )
        .build()
}

/// `process_payment(sender_balance, receiver_balance, amount, receiver_key)`.
pub fn process_payment_schema() -> Result<ParameterSchema, SchemaError> {
    ParameterSchema::builder(PROCESS_PAYMENT)
        .owned_ciphertext("sender_balance")
        .owned_ciphertext("receiver_balance")
        .scalar("amount", BitWidth::U64)
        .shared_output_context("receiver_key")
        .output("new_sender_balance", OutputKind::OwnedCiphertext)
        .output(
            "new_receiver_balance",
            OutputKind::SharedCiphertext {
                context: "receiver_key".into(),
            },
        )
        .output("is_sufficient", OutputKind::Boolean)
        .build()
}

/// `check_balance(balance, threshold)`.
pub fn check_balance_schema() -> Result<ParameterSchema, SchemaError> {
    ParameterSchema::builder(CHECK_BALANCE)
        .owned_ciphertext("balance")
        .scalar("threshold", BitWidth::U64)
        .output("is_above_threshold", OutputKind::Boolean)
        .build()
}

/// `calculate_rewards(transaction_count, balance)`.
pub fn calculate_rewards_schema() -> Result<ParameterSchema, SchemaError> {
    ParameterSchema::builder(CALCULATE_REWARDS)
        .scalar("transaction_count", BitWidth::U64)
        .owned_ciphertext("balance")
        .output("reward_points", OutputKind::Revealed(BitWidth::U64))
        .build()
}

/// A registry holding all four banking computations.
pub fn banking_registry() -> Result<SchemaRegistry, RegistryError> {
    SchemaRegistry::from_schemas([
        initialize_accounts_schema()?,
        process_payment_schema()?,
        check_balance_schema()?,
        calculate_rewards_schema()?,
    ])
}

pub fn initialize_accounts_args(
    initial_balance: u64,
    mxe_nonce: u128,
    client: PublicKey,
    client_nonce: u128,
) -> ArgumentValues {
    ArgumentValues::new()
        .scalar("initial_balance", initial_balance.into())
        .scalar("mxe_nonce", mxe_nonce)
        .shared_output("client", client, client_nonce)
        .shared_output("client_again", client, client_nonce)
}

/// Arguments for a payment between two accounts, read at their stored nonces.
pub fn process_payment_args(
    sender: (AccountKey, &UserAccount),
    receiver: (AccountKey, &UserAccount),
    amount: u64,
    receiver_new_nonce: u128,
) -> ArgumentValues {
    ArgumentValues::new()
        .owned(
            "sender_balance",
            sender.1.balance_nonce,
            UserAccountLayout::balance_ref(sender.0),
        )
        .owned(
            "receiver_balance",
            receiver.1.balance_nonce,
            UserAccountLayout::balance_ref(receiver.0),
        )
        .scalar("amount", amount.into())
        .shared_output(
            "receiver_key",
            receiver.1.owner_enc_pubkey,
            receiver_new_nonce,
        )
}

pub fn check_balance_args(key: AccountKey, account: &UserAccount, threshold: u64) -> ArgumentValues {
    ArgumentValues::new()
        .owned(
            "balance",
            account.balance_nonce,
            UserAccountLayout::balance_ref(key),
        )
        .scalar("threshold", threshold.into())
}

pub fn calculate_rewards_args(key: AccountKey, account: &UserAccount) -> ArgumentValues {
    ArgumentValues::new()
        .scalar("transaction_count", account.transaction_count.into())
        .owned(
            "balance",
            account.balance_nonce,
            UserAccountLayout::balance_ref(key),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banking_arities() {
        assert_eq!(initialize_accounts_schema().unwrap().total_arity(), 6);
        assert_eq!(process_payment_schema().unwrap().total_arity(), 7);
        assert_eq!(check_balance_schema().unwrap().total_arity(), 3);
        assert_eq!(calculate_rewards_schema().unwrap().total_arity(), 3);
    }

    #[test]
    fn test_user_account_layout() {
        let account = UserAccount {
            account_id: 1,
            owner: [2; 32],
            encrypted_balance: [0xee; 32],
            balance_nonce: 0xabc,
            transaction_count: 4,
            reward_points: 0,
            owner_enc_pubkey: PublicKey([5; 32]),
            account_state: AccountState::Active,
            bump: 255,
        };
        let bytes = account.to_bytes();
        assert_eq!(bytes.len(), UserAccountLayout::DATA_LEN as usize);

        let start = UserAccountLayout::ENCRYPTED_BALANCE_OFFSET as usize;
        assert_eq!(&bytes[start..start + 32], &[0xee; 32]);

        let nonce_start = UserAccountLayout::BALANCE_NONCE_OFFSET as usize;
        let nonce = u128::from_le_bytes(bytes[nonce_start..nonce_start + 16].try_into().unwrap());
        assert_eq!(nonce, 0xabc);
    }

    #[test]
    fn test_registry_holds_all_computations() {
        let registry = banking_registry().unwrap();
        assert_eq!(registry.len(), 4);
        for name in [INITIALIZE_ACCOUNTS, PROCESS_PAYMENT, CHECK_BALANCE, CALCULATE_REWARDS] {
            assert!(registry.get(name).is_some(), "{name}");
        }
    }
}
