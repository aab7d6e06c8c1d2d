//! # Settlement Engine
//!
//! Group size accounting and the clearing of an item once demand meets its
//! goal.
//!
//! ## Settlement Rule
//!
//! ```text
//! current_group_size >= group_size_goal
//!     -> remove item from catalog
//!     -> remove every commitment on it (all users)
//!     -> payout = current_group_size * wanted_price  (overshoot included)
//!     -> transfer payout to seller_address
//! ```
//!
//! Funds leaving the contract within one transition go through [`Escrow`],
//! which refuses any reservation the contract balance cannot cover.

use crate::domain::catalog::ItemCatalog;
use crate::domain::entities::ItemData;
use crate::domain::ledger::CommitmentLedger;
use crate::domain::value_objects::{AccountAddress, Amount, ItemKey};
use crate::errors::ContractError;

/// Outcome of clearing one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// The item as it was when it settled.
    pub item: ItemData,
    /// Number of distinct committed users.
    pub participants: usize,
    /// Amount owed to the seller.
    pub payout: Amount,
    /// Payout recipient.
    pub seller: AccountAddress,
}

/// Stateless settlement rules.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Applies a commitment delta to a group size.
    ///
    /// # Errors
    /// - `InvariantViolated` if the result would be negative
    /// - `AmountOverflow` if it does not fit a `u32`
    pub fn apply_delta(current: u32, delta: i64) -> Result<u32, ContractError> {
        let next = i64::from(current)
            .checked_add(delta)
            .ok_or(ContractError::AmountOverflow)?;
        if next < 0 {
            return Err(ContractError::InvariantViolated(format!(
                "group size would become negative: {current} {delta:+}"
            )));
        }
        u32::try_from(next).map_err(|_| ContractError::AmountOverflow)
    }

    /// Seller payout for an item at its current group size.
    ///
    /// # Errors
    /// `AmountOverflow` if the product does not fit 256 bits.
    pub fn payout(item: &ItemData) -> Result<Amount, ContractError> {
        item.static_data
            .wanted_price
            .checked_mul_units(item.current_group_size)
            .ok_or(ContractError::AmountOverflow)
    }

    /// Refund owed for `quantity` units at `wanted_price`.
    ///
    /// # Errors
    /// `AmountOverflow` if the product does not fit 256 bits.
    pub fn refund_amount(quantity: u32, wanted_price: Amount) -> Result<Amount, ContractError> {
        wanted_price
            .checked_mul_units(quantity)
            .ok_or(ContractError::AmountOverflow)
    }

    /// Clears `key` from the catalog and the ledger.
    ///
    /// Callers run this on staged state only; on any later failure the
    /// staged state is dropped and the item stays listed.
    ///
    /// # Errors
    /// `NotFound` if the item is not listed, `AmountOverflow` on payout
    /// overflow.
    pub fn settle(
        catalog: &mut ItemCatalog,
        ledger: &mut CommitmentLedger,
        key: &ItemKey,
    ) -> Result<Settlement, ContractError> {
        let payout = Self::payout(catalog.get(key)?)?;
        let item = catalog.remove(key)?;
        let participants = ledger.remove_all_for_item(key).len();
        let seller = item.static_data.seller_address.clone();

        Ok(Settlement {
            item,
            participants,
            payout,
            seller,
        })
    }
}

// =============================================================================
// ESCROW
// =============================================================================

/// Running total of funds a transition will move out of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Escrow {
    available: Amount,
    reserved: Amount,
}

impl Escrow {
    /// Starts with the contract's balance and nothing reserved.
    #[must_use]
    pub fn new(available: Amount) -> Self {
        Self {
            available,
            reserved: Amount::zero(),
        }
    }

    /// Reserves `amount` for an outgoing transfer.
    ///
    /// # Errors
    /// `InsufficientFunds` if the total reserved would exceed the balance.
    /// Nothing is reserved on error.
    pub fn reserve(&mut self, amount: Amount) -> Result<(), ContractError> {
        let required = self
            .reserved
            .checked_add(amount)
            .ok_or(ContractError::AmountOverflow)?;
        if required > self.available {
            return Err(ContractError::InsufficientFunds {
                required,
                available: self.available,
            });
        }
        self.reserved = required;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
