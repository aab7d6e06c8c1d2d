//! # Contract State
//!
//! Persistent state root. Owns the catalog, the commitment ledger and the
//! viewing key store.
//!
//! Writes never touch the committed state directly: they run on a staged
//! clone, the clone is checked against the domain invariants, and only then
//! does it replace the committed state.

use crate::domain::catalog::ItemCatalog;
use crate::domain::invariants::check_all_invariants;
use crate::domain::ledger::CommitmentLedger;
use crate::domain::viewing_key::ViewingKeyStore;
use crate::errors::ContractError;

/// Everything the contract persists.
#[derive(Clone, Debug, Default)]
pub struct ContractState {
    /// Listed items.
    pub catalog: ItemCatalog,
    /// Open commitments and contact records.
    pub ledger: CommitmentLedger,
    /// Hashed viewing keys.
    pub viewing_keys: ViewingKeyStore,
}

impl ContractState {
    /// Empty state, as at instantiation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` on a staged copy and returns the checked copy without
    /// committing it.
    ///
    /// # Errors
    /// Whatever `f` returns, or `InvariantViolated` if the staged state is
    /// inconsistent.
    pub fn stage<T, F>(&self, f: F) -> Result<(Self, T), ContractError>
    where
        F: FnOnce(&mut Self) -> Result<T, ContractError>,
    {
        let mut staged = self.clone();
        let out = f(&mut staged)?;
        staged.verify_invariants()?;
        Ok((staged, out))
    }

    /// Runs `f` as one all-or-nothing transaction.
    ///
    /// # Errors
    /// Same as [`ContractState::stage`]; `self` is untouched on error.
    pub fn transact<T, F>(&mut self, f: F) -> Result<T, ContractError>
    where
        F: FnOnce(&mut Self) -> Result<T, ContractError>,
    {
        let (staged, out) = self.stage(f)?;
        *self = staged;
        Ok(out)
    }

    /// Checks every domain invariant.
    ///
    /// # Errors
    /// `InvariantViolated` describing each failed check.
    pub fn verify_invariants(&self) -> Result<(), ContractError> {
        check_all_invariants(self).into_result()
    }
}

// =============================================================================
// TESTS
// =============================================================================
