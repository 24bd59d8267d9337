//! Account storage collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::types::{AccountKey, AccountRef};

/// Resolves account references to ciphertext bytes.
///
/// The decoder asks for the declared data length first and only reads the
/// range once it has been validated against that length.
pub trait AccountStorage {
    /// Total declared data length of the account.
    fn data_length(&self, owner: &AccountKey) -> Result<u64, StorageError>;

    /// Raw bytes of the referenced range.
    fn read_range(&self, account: &AccountRef) -> Result<Vec<u8>, StorageError>;
}

impl<S: AccountStorage + ?Sized> AccountStorage for &S {
    fn data_length(&self, owner: &AccountKey) -> Result<u64, StorageError> {
        (**self).data_length(owner)
    }

    fn read_range(&self, account: &AccountRef) -> Result<Vec<u8>, StorageError> {
        (**self).read_range(account)
    }
}

/// Account data held in memory, keyed by account address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryAccounts {
    accounts: BTreeMap<AccountKey, Vec<u8>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `owner`, returning the previous data if any.
    pub fn insert(&mut self, owner: AccountKey, data: Vec<u8>) -> Option<Vec<u8>> {
        self.accounts.insert(owner, data)
    }

    pub fn get(&self, owner: &AccountKey) -> Option<&[u8]> {
        self.accounts.get(owner).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStorage for InMemoryAccounts {
    fn data_length(&self, owner: &AccountKey) -> Result<u64, StorageError> {
        self.get(owner)
            .map(|data| data.len() as u64)
            .ok_or(StorageError::AccountNotFound { owner: *owner })
    }

    fn read_range(&self, account: &AccountRef) -> Result<Vec<u8>, StorageError> {
        let data = self.get(&account.owner).ok_or(StorageError::AccountNotFound {
            owner: account.owner,
        })?;
        let start = account.offset as usize;
        let end = start + account.length as usize;
        data.get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(StorageError::RangeUnavailable {
                owner: account.owner,
                offset: account.offset,
                length: account.length,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_range() {
        let key = AccountKey([3; 32]);
        let mut accounts = InMemoryAccounts::new();
        accounts.insert(key, (0u8..10).collect());

        assert_eq!(accounts.data_length(&key).unwrap(), 10);
        assert_eq!(
            accounts.read_range(&AccountRef::new(key, 8, 2)).unwrap(),
            vec![8, 9]
        );
        assert_eq!(
            accounts.read_range(&AccountRef::new(key, 9, 2)),
            Err(StorageError::RangeUnavailable {
                owner: key,
                offset: 9,
                length: 2
            })
        );
    }

    #[test]
    fn test_missing_account() {
        let accounts = InMemoryAccounts::new();
        let key = AccountKey([9; 32]);
        assert_eq!(
            accounts.data_length(&key),
            Err(StorageError::AccountNotFound { owner: key })
        );
    }
}
