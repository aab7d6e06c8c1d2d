//! # Viewing Keys
//!
//! Per-account secret gating confidential reads.
//!
//! Only the SHA-256 digest of a key is stored. Verification hashes the
//! supplied key and compares digests with `subtle::ConstantTimeEq`, so the
//! comparison time does not depend on how many leading bytes match. When an
//! account has no key the supplied key is still hashed and compared against
//! an all-zero digest: "unset" and "wrong" follow the same path.

use crate::domain::value_objects::AccountAddress;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;

/// Digest size of a stored viewing key.
pub const VIEWING_KEY_SIZE: usize = 32;

/// Stored form of a viewing key.
pub type HashedViewingKey = [u8; VIEWING_KEY_SIZE];

/// A plaintext viewing key as supplied by a caller. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ViewingKey(String);

impl ViewingKey {
    /// Wraps a plaintext key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// True for an empty key, which is never stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 digest of the key.
    #[must_use]
    pub fn to_hashed(&self) -> HashedViewingKey {
        Sha256::digest(self.0.as_bytes()).into()
    }

    /// Constant-time check against a stored digest.
    #[must_use]
    pub fn check_viewing_key(&self, hashed: &[u8]) -> bool {
        let mine = self.to_hashed();
        mine.as_slice().ct_eq(hashed).into()
    }
}

impl fmt::Debug for ViewingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewingKey(<redacted>)")
    }
}

/// One hashed viewing key per account.
#[derive(Clone, Default)]
pub struct ViewingKeyStore {
    keys: BTreeMap<AccountAddress, HashedViewingKey>,
}

impl ViewingKeyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or overwrites) the key for `account`.
    pub fn set(&mut self, account: &AccountAddress, key: &ViewingKey) {
        self.keys.insert(account.clone(), key.to_hashed());
    }

    /// Returns true iff `key` is the key currently stored for `account`.
    ///
    /// An account without a key is checked against an all-zero digest
    /// before being refused.
    #[must_use]
    pub fn verify(&self, account: &AccountAddress, key: &ViewingKey) -> bool {
        match self.keys.get(account) {
            Some(stored) => key.check_viewing_key(stored),
            None => {
                let _ = key.check_viewing_key(&[0u8; VIEWING_KEY_SIZE]);
                false
            }
        }
    }

    /// True if `account` has ever set a key.
    #[must_use]
    pub fn contains(&self, account: &AccountAddress) -> bool {
        self.keys.contains_key(account)
    }

    /// Number of accounts with a key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if no account has a key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for ViewingKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewingKeyStore")
            .field("accounts", &self.keys.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
