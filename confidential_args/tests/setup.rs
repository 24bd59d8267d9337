use std::{fs::write, path::PathBuf};

use confidential_args::{
    AccountKey, InMemoryAccounts, Invocation, PublicKey,
    banking::{self, AccountState, UserAccount},
    encode_invocation, serialize_accounts, serialize_invocation,
};
use tempfile::TempDir;

pub const SENDER: AccountKey = AccountKey([0x11; 32]);
pub const RECEIVER: AccountKey = AccountKey([0x22; 32]);

pub fn user_account(account_id: u64, balance_byte: u8, balance_nonce: u128) -> UserAccount {
    UserAccount {
        account_id,
        owner: [account_id as u8; 32],
        encrypted_balance: [balance_byte; 32],
        balance_nonce,
        transaction_count: 3,
        reward_points: 0,
        owner_enc_pubkey: PublicKey([0x40 + account_id as u8; 32]),
        account_state: AccountState::Active,
        bump: 254,
    }
}

pub fn accounts() -> (InMemoryAccounts, UserAccount, UserAccount) {
    let sender = user_account(1, 0xaa, 0x1001);
    let receiver = user_account(2, 0xbb, 0x2002);
    let mut accounts = InMemoryAccounts::new();
    accounts.insert(SENDER, sender.to_bytes());
    accounts.insert(RECEIVER, receiver.to_bytes());
    (accounts, sender, receiver)
}

pub fn payment_invocation(sender: &UserAccount, receiver: &UserAccount) -> Invocation {
    let registry = banking::banking_registry().unwrap();
    let values =
        banking::process_payment_args((SENDER, sender), (RECEIVER, receiver), 250, 0x3003);
    encode_invocation(&registry, banking::PROCESS_PAYMENT, &values).unwrap()
}

// Only the binary tests write fixtures to disk; the library tests share
// `accounts` and `payment_invocation` but never build a `TestSetup`.
#[allow(dead_code)]
pub struct TestSetup {
    pub sender: UserAccount,
    pub receiver: UserAccount,
    pub accounts_path: PathBuf,
    pub invocation_path: PathBuf,
    pub test_dir: TempDir,
}

#[allow(dead_code)]
pub fn setup() -> TestSetup {
    let test_dir = TempDir::new().unwrap();
    let (accounts, sender, receiver) = accounts();

    let accounts_path = test_dir.path().join("accounts.bin");
    write(&accounts_path, serialize_accounts(&accounts).unwrap()).unwrap();

    let invocation_path = test_dir.path().join("invocation.bin");
    let invocation = payment_invocation(&sender, &receiver);
    write(&invocation_path, serialize_invocation(&invocation).unwrap()).unwrap();

    TestSetup {
        sender,
        receiver,
        accounts_path,
        invocation_path,
        test_dir,
    }
}
