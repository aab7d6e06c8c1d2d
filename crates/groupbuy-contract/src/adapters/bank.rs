//! # In-Memory Bank
//!
//! Single-denomination balance book for tests and local runs.
//! A host deployment would implement [`Bank`] against its own ledger.

use crate::domain::entities::Transfer;
use crate::domain::value_objects::{AccountAddress, Amount};
use crate::errors::BankError;
use crate::ports::outbound::Bank;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory balances for one denomination.
#[derive(Debug)]
pub struct InMemoryBank {
    denom: String,
    balances: RwLock<BTreeMap<AccountAddress, Amount>>,
}

impl InMemoryBank {
    /// Creates an empty bank for `denom`.
    #[must_use]
    pub fn new(denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            balances: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builder form of [`InMemoryBank::set_balance`].
    #[must_use]
    pub fn with_balance(self, address: impl Into<AccountAddress>, amount: Amount) -> Self {
        self.set_balance(&address.into(), amount);
        self
    }

    /// Overwrites a balance.
    pub fn set_balance(&self, address: &AccountAddress, amount: Amount) {
        self.balances.write().insert(address.clone(), amount);
    }

    /// Current balance, zero for unknown accounts.
    #[must_use]
    pub fn balance_of(&self, address: &AccountAddress) -> Amount {
        self.balances
            .read()
            .get(address)
            .copied()
            .unwrap_or_default()
    }

    /// Denomination handled by this bank.
    #[must_use]
    pub fn denom(&self) -> &str {
        &self.denom
    }

    fn check_denom(&self, denom: &str) -> Result<(), BankError> {
        if denom == self.denom {
            Ok(())
        } else {
            Err(BankError::UnknownDenom(denom.to_string()))
        }
    }
}

/// Moves funds inside `balances`; leaves it untouched on error.
fn apply(
    balances: &mut BTreeMap<AccountAddress, Amount>,
    from: &AccountAddress,
    to: &AccountAddress,
    amount: Amount,
) -> Result<(), BankError> {
    let available = balances.get(from).copied().unwrap_or_default();
    let debited = available
        .checked_sub(amount)
        .ok_or_else(|| BankError::InsufficientBalance {
            address: from.clone(),
            required: amount,
            available,
        })?;

    if from == to {
        return Ok(());
    }

    let credited = balances
        .get(to)
        .copied()
        .unwrap_or_default()
        .checked_add(amount)
        .ok_or_else(|| BankError::Overflow(to.clone()))?;

    balances.insert(from.clone(), debited);
    balances.insert(to.clone(), credited);
    Ok(())
}

#[async_trait]
impl Bank for InMemoryBank {
    async fn balance(&self, address: &AccountAddress, denom: &str) -> Result<Amount, BankError> {
        self.check_denom(denom)?;
        Ok(self.balance_of(address))
    }

    async fn transfer(
        &self,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: Amount,
        denom: &str,
    ) -> Result<(), BankError> {
        self.check_denom(denom)?;
        apply(&mut self.balances.write(), from, to, amount)
    }

    async fn execute_transfers(&self, transfers: &[Transfer]) -> Result<(), BankError> {
        for transfer in transfers {
            self.check_denom(&transfer.denom)?;
        }

        let mut balances = self.balances.write();
        let mut staged = balances.clone();
        for transfer in transfers {
            apply(&mut staged, &transfer.from, &transfer.to, transfer.amount)?;
        }
        *balances = staged;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
