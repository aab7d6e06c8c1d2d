//! # Domain Layer
//!
//! Pure domain logic for the group-buy ledger.
//! Nothing here performs I/O; every operation is a synchronous function of
//! the state it is given.
//!
//! ## Modules
//!
//! - `value_objects` - Addresses, exact amounts, item keys
//! - `entities` - Items, contact data, commitment payloads, transfers
//! - `viewing_key` - Hashed per-account viewing keys
//! - `catalog` - Items keyed by `(category, url)`
//! - `ledger` - Per-user commitments and contact records
//! - `settlement` - Group size accounting, payout and refund math, escrow
//! - `authorizer` - Viewing-key gate for the read path
//! - `state` - Persistent state root and staged transactions
//! - `invariants` - Post-write consistency checks

pub mod authorizer;
pub mod catalog;
pub mod entities;
pub mod invariants;
pub mod ledger;
pub mod settlement;
pub mod state;
pub mod value_objects;
pub mod viewing_key;

pub use authorizer::{Authorization, CallerView, QueryAuthorizer};
pub use catalog::ItemCatalog;
pub use entities::{
    ContactData, ItemData, StaticItemData, Transfer, TransferReason, UpdateItemData,
    UserItemDetails, UserProductQuantity,
};
pub use invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};
pub use ledger::{CommitmentLedger, UserRecord};
pub use settlement::{Escrow, Settlement, SettlementEngine};
pub use state::ContractState;
pub use value_objects::{AccountAddress, Amount, ItemKey, U256};
pub use viewing_key::{ViewingKey, ViewingKeyStore};
