//! # Commitment Ledger
//!
//! Per-user purchase intents and the user's contact record.
//!
//! ## Data Structures
//!
//! - `users`: one `UserRecord` per account holding contact data and the
//!   account's commitments keyed by item
//! - `by_item`: reverse index item -> committed accounts, used to clear
//!   every commitment of an item in one pass
//!
//! Both maps are `BTreeMap`/`BTreeSet` so iteration order is deterministic.

use crate::domain::entities::{ContactData, UserProductQuantity};
use crate::domain::value_objects::{AccountAddress, ItemKey};
use crate::errors::ContractError;
use std::collections::{BTreeMap, BTreeSet};

/// A user's contact data and open commitments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    /// Latest contact data supplied with a commitment.
    pub contact_data: ContactData,
    /// Committed quantity per item.
    pub commitments: BTreeMap<ItemKey, u32>,
}

/// Commitment store.
///
/// INVARIANTS:
/// - At most one commitment per `(user, item)` (map key)
/// - Every stored quantity is >= 1 (checked in `upsert()`)
/// - `by_item` mirrors `users` exactly
/// - A user record exists only while it holds a commitment
#[derive(Clone, Debug, Default)]
pub struct CommitmentLedger {
    users: BTreeMap<AccountAddress, UserRecord>,
    by_item: BTreeMap<ItemKey, BTreeSet<AccountAddress>>,
}

impl CommitmentLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces `user`'s commitment on `item`.
    ///
    /// The supplied contact data replaces the user's stored contact data.
    /// Returns the quantity delta against the previous commitment (the full
    /// quantity when there was none).
    ///
    /// # Errors
    /// `InvalidQuantity` when `quantity` is zero.
    pub fn upsert(
        &mut self,
        user: &AccountAddress,
        item: &ItemKey,
        quantity: u32,
        contact_data: ContactData,
    ) -> Result<i64, ContractError> {
        if quantity == 0 {
            return Err(ContractError::InvalidQuantity(quantity));
        }

        let record = self
            .users
            .entry(user.clone())
            .or_insert_with(|| UserRecord {
                contact_data: contact_data.clone(),
                commitments: BTreeMap::new(),
            });
        record.contact_data = contact_data;
        let old = record
            .commitments
            .insert(item.clone(), quantity)
            .unwrap_or(0);

        self.by_item
            .entry(item.clone())
            .or_default()
            .insert(user.clone());

        Ok(i64::from(quantity) - i64::from(old))
    }

    /// `user`'s committed quantity on `item`, if any.
    #[must_use]
    pub fn quantity(&self, user: &AccountAddress, item: &ItemKey) -> Option<u32> {
        self.users
            .get(user)
            .and_then(|record| record.commitments.get(item))
            .copied()
    }

    /// Removes one commitment and returns its quantity.
    pub fn remove(&mut self, user: &AccountAddress, item: &ItemKey) -> Option<u32> {
        let record = self.users.get_mut(user)?;
        let quantity = record.commitments.remove(item)?;
        if record.commitments.is_empty() {
            self.users.remove(user);
        }
        self.unindex(user, item);
        Some(quantity)
    }

    /// Removes every commitment on `item`, for all users.
    ///
    /// Returns `(user, quantity)` pairs in address order.
    pub fn remove_all_for_item(&mut self, item: &ItemKey) -> Vec<(AccountAddress, u32)> {
        let Some(users) = self.by_item.remove(item) else {
            return Vec::new();
        };

        let mut cleared = Vec::with_capacity(users.len());
        for user in users {
            let Some(record) = self.users.get_mut(&user) else {
                continue;
            };
            if let Some(quantity) = record.commitments.remove(item) {
                cleared.push((user.clone(), quantity));
            }
            if record.commitments.is_empty() {
                self.users.remove(&user);
            }
        }
        cleared
    }

    /// Every commitment of `user`.
    #[must_use]
    pub fn list_for_user(&self, user: &AccountAddress) -> Vec<(ItemKey, u32)> {
        self.users
            .get(user)
            .map(|record| {
                record
                    .commitments
                    .iter()
                    .map(|(key, quantity)| (key.clone(), *quantity))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `user`'s commitments within one category, as `(url, quantity)`.
    #[must_use]
    pub fn list_for_user_in_category(
        &self,
        user: &AccountAddress,
        category: &str,
    ) -> Vec<UserProductQuantity> {
        let Some(record) = self.users.get(user) else {
            return Vec::new();
        };
        record
            .commitments
            .range(ItemKey::category_start(category)..)
            .take_while(|(key, _)| key.category == category)
            .map(|(key, quantity)| UserProductQuantity {
                url: key.url.clone(),
                quantity: *quantity,
            })
            .collect()
    }

    /// `user`'s stored contact data, present while they hold a commitment.
    #[must_use]
    pub fn contact_data(&self, user: &AccountAddress) -> Option<&ContactData> {
        self.users.get(user).map(|record| &record.contact_data)
    }

    /// Number of users committed to `item`.
    #[must_use]
    pub fn participants(&self, item: &ItemKey) -> usize {
        self.by_item.get(item).map_or(0, BTreeSet::len)
    }

    /// Sum of all committed quantities on `item`.
    #[must_use]
    pub fn total_for_item(&self, item: &ItemKey) -> u64 {
        self.by_item.get(item).map_or(0, |users| {
            users
                .iter()
                .filter_map(|user| self.quantity(user, item))
                .map(u64::from)
                .sum()
        })
    }

    /// Every item that has at least one commitment.
    pub fn committed_items(&self) -> impl Iterator<Item = &ItemKey> {
        self.by_item.keys()
    }

    /// Number of users holding at least one commitment.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// True if no commitment exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn unindex(&mut self, user: &AccountAddress, item: &ItemKey) {
        if let Some(users) = self.by_item.get_mut(item) {
            users.remove(user);
            if users.is_empty() {
                self.by_item.remove(item);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
