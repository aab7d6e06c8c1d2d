//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the group-buy service depends on. The host runtime provides
//! the implementation; `InMemoryBank` covers tests and local runs.

use crate::domain::entities::Transfer;
use crate::domain::value_objects::{AccountAddress, Amount};
use crate::errors::BankError;
use async_trait::async_trait;

// =============================================================================
// BANK
// =============================================================================

/// Balance lookup and funds movement, keyed by address.
///
/// ## Implementation Notes
///
/// `execute_transfers` MUST be all-or-nothing: if any transfer in the batch
/// fails, no balance may change.
#[async_trait]
pub trait Bank: Send + Sync {
    /// Balance of `address` in `denom`.
    async fn balance(&self, address: &AccountAddress, denom: &str) -> Result<Amount, BankError>;

    /// Moves `amount` of `denom` from `from` to `to`.
    async fn transfer(
        &self,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: Amount,
        denom: &str,
    ) -> Result<(), BankError>;

    /// Applies a batch of transfers atomically.
    async fn execute_transfers(&self, transfers: &[Transfer]) -> Result<(), BankError>;
}
