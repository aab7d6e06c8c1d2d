//! # Query Authorizer
//!
//! Gate for the confidential read path.
//!
//! ```text
//! [Unauthorized] --verify(address, key) ok--> [Authorized(address)]
//! ```
//!
//! There is no other transition. An unauthorized caller gets
//! `ContractError::Unauthorized` and no user-scoped data, whatever the
//! reason (unknown account, key not set, wrong key).

use crate::domain::catalog::ItemCatalog;
use crate::domain::entities::{ContactData, ItemData, UserProductQuantity};
use crate::domain::ledger::CommitmentLedger;
use crate::domain::value_objects::AccountAddress;
use crate::domain::viewing_key::{ViewingKey, ViewingKeyStore};
use crate::errors::ContractError;

/// Authorization state of one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    /// Key check not passed.
    Unauthorized,
    /// Key verified for this account.
    Authorized(AccountAddress),
}

impl Authorization {
    /// The verified account.
    ///
    /// # Errors
    /// `Unauthorized` when the key check did not pass.
    pub fn require(self) -> Result<AccountAddress, ContractError> {
        match self {
            Self::Authorized(address) => Ok(address),
            Self::Unauthorized => Err(ContractError::Unauthorized),
        }
    }
}

/// What an authorized caller may see in one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerView {
    /// Public data of every item in the category.
    pub items: Vec<ItemData>,
    /// The caller's own commitments in the category.
    pub user_items: Vec<UserProductQuantity>,
    /// The caller's contact data, only if they committed in the category.
    pub contact_data: Option<ContactData>,
}

/// Verifies viewing keys and assembles caller-scoped views.
pub struct QueryAuthorizer<'a> {
    keys: &'a ViewingKeyStore,
}

impl<'a> QueryAuthorizer<'a> {
    /// Creates an authorizer over the given key store.
    #[must_use]
    pub fn new(keys: &'a ViewingKeyStore) -> Self {
        Self { keys }
    }

    /// Runs the key check.
    #[must_use]
    pub fn authorize(&self, address: &AccountAddress, key: &ViewingKey) -> Authorization {
        if self.keys.verify(address, key) {
            Authorization::Authorized(address.clone())
        } else {
            Authorization::Unauthorized
        }
    }

    /// Authorizes `address` and builds its view of `category`.
    ///
    /// # Errors
    /// `Unauthorized` when the key does not verify.
    pub fn caller_view(
        &self,
        address: &AccountAddress,
        key: &ViewingKey,
        catalog: &ItemCatalog,
        ledger: &CommitmentLedger,
        category: &str,
    ) -> Result<CallerView, ContractError> {
        let caller = self.authorize(address, key).require()?;

        let items = catalog.list(category);
        let user_items = ledger.list_for_user_in_category(&caller, category);
        let contact_data = if user_items.is_empty() {
            None
        } else {
            ledger.contact_data(&caller).cloned()
        };

        Ok(CallerView {
            items,
            user_items,
            contact_data,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
