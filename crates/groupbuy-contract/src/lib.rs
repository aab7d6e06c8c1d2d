//! # Group-Buy Contract - Confidential Group-Buying Ledger
//!
//! A catalog of purchasable items plus per-user purchase commitments. When the
//! committed quantity of an item reaches its goal, the item settles
//! atomically: it is delisted, every commitment on it is cleared, and the
//! seller is paid `current_group_size * wanted_price` from the contract's
//! escrow. Buyer contact data and individual quantities are readable only by
//! their owner, through a per-account viewing key.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Unique `(category, url)` | `domain/catalog.rs` - `ItemCatalog::add_item()` |
//! | One commitment per `(user, item)` | `domain/ledger.rs` - `CommitmentLedger::upsert()` |
//! | Quantity >= 1 | `contract.rs` - `update_item`, `domain/ledger.rs` - `upsert()` |
//! | Group size below goal while listed | `domain/invariants.rs` - `check_below_goal_invariant()` |
//! | Group size equals committed total | `domain/invariants.rs` - `check_group_size_invariant()` |
//! | All-or-nothing transitions | `domain/state.rs` - `ContractState::transact()` |
//! | Escrow covers every transfer | `domain/settlement.rs` - `Escrow::reserve()` |
//! | Uniform authorization failure | `domain/authorizer.rs` - `QueryAuthorizer` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (catalog, ledger, settlement, keys)
//! - `contract.rs` - Synchronous transition functions
//! - `ports/` - Port traits (inbound API, outbound bank)
//! - `adapters/` - In-memory bank, JSON codec
//! - `service.rs` - Async host-side service
//!
//! ## Usage Example
//!
//! ```ignore
//! use groupbuy_contract::prelude::*;
//!
//! let service = create_test_service();
//! service.handle_execute(&seller, ExecuteMsg::AddItem(item)).await?;
//! service.handle_execute(&bob, ExecuteMsg::UpdateItem(commitment)).await?;
//!
//! let answer = service.handle_query(QueryMsg::GetItems { category, address, key }).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod contract;
pub mod domain;
pub mod errors;
pub mod events;
pub mod messages;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{
        check_all_invariants, AccountAddress, Amount, Authorization, CallerView, CommitmentLedger,
        ContactData, ContractState, Escrow, InvariantCheckResult, InvariantViolation, ItemCatalog,
        ItemData, ItemKey, QueryAuthorizer, Settlement, SettlementEngine, StaticItemData,
        Transfer, TransferReason, UpdateItemData, UserItemDetails, UserProductQuantity,
        ViewingKey, ViewingKeyStore, U256,
    };

    // Contract
    pub use crate::config::{ConfigError, ContractConfig};
    pub use crate::contract::{Contract, ExecuteResponse, ExecutionEnv};
    pub use crate::events::{ContractEvent, EventLog, EVENT_LOG_VERSION};
    pub use crate::messages::{
        ExecuteAnswer, ExecuteMsg, GetItemsResponse, QueryAnswer, QueryMsg, ResponseStatus,
    };

    // Errors
    pub use crate::errors::{BankError, CodecError, ContractError, ServiceError};

    // Ports & adapters
    pub use crate::adapters::{InMemoryBank, MessageCodec};
    pub use crate::ports::inbound::GroupBuyApi;
    pub use crate::ports::outbound::Bank;

    // Service
    pub use crate::service::{create_test_service, GroupBuyService, ServiceConfig, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
