//! # Error Types
//!
//! All error types for the group-buy ledger.

use crate::domain::value_objects::{AccountAddress, Amount};
use thiserror::Error;

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors raised by contract transitions and queries.
///
/// Every write-path error aborts the whole transition: the staged state is
/// dropped and nothing is persisted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// An item with the same `(category, url)` is already listed.
    #[error("item already exists: {category}/{url}")]
    DuplicateItem {
        /// Item category.
        category: String,
        /// Item url.
        url: String,
    },

    /// No item (or no commitment) under this key.
    #[error("item not found: {category}/{url}")]
    NotFound {
        /// Item category.
        category: String,
        /// Item url.
        url: String,
    },

    /// Commitment quantity must be at least one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Commitment quantity exceeds the configured ceiling.
    #[error("quantity too large: {quantity} > {max}")]
    QuantityTooLarge {
        /// Requested quantity.
        quantity: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// Viewing key mismatch, unset key, or caller acting for someone else.
    ///
    /// The message is the same in every case.
    #[error("wrong viewing key for this address or viewing key not set")]
    Unauthorized,

    /// The contract's escrow balance cannot cover the transfers.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Total the transition would move out.
        required: Amount,
        /// Contract balance.
        available: Amount,
    },

    /// Item data failed validation.
    #[error("invalid item: {0}")]
    InvalidItem(String),

    /// Category already holds the maximum number of items.
    #[error("category {category} is full: {max} items")]
    CategoryFull {
        /// Full category.
        category: String,
        /// Configured item limit.
        max: usize,
    },

    /// Amount or group size arithmetic overflowed.
    #[error("arithmetic overflow")]
    AmountOverflow,

    /// A post-write invariant failed; the transition is discarded.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

impl ContractError {
    /// Shorthand for [`ContractError::NotFound`].
    #[must_use]
    pub fn not_found(category: &str, url: &str) -> Self {
        Self::NotFound {
            category: category.to_string(),
            url: url.to_string(),
        }
    }

    /// Returns true if this error was caused by the caller's input rather
    /// than by the contract's own state.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvariantViolated(_) | Self::AmountOverflow)
    }
}

// =============================================================================
// BANK ERRORS
// =============================================================================

/// Errors from the funds-transfer port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    /// Source account balance too low.
    #[error("insufficient balance for {address}: required {required}, available {available}")]
    InsufficientBalance {
        /// Debited account.
        address: AccountAddress,
        /// Amount to debit.
        required: Amount,
        /// Current balance.
        available: Amount,
    },

    /// Transfer denomination not handled by this bank.
    #[error("unknown denomination: {0}")]
    UnknownDenom(String),

    /// Balance arithmetic overflowed.
    #[error("balance overflow for {0}")]
    Overflow(AccountAddress),

    /// Bank backend not reachable.
    #[error("bank unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// CODEC ERRORS
// =============================================================================

/// Errors decoding or encoding boundary messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Payload is not a valid message.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Response could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

// =============================================================================
// SERVICE ERRORS
// =============================================================================

/// Errors surfaced by the host-side service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Contract rejected the transition or query.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Transfers could not be applied; the transition was discarded.
    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    /// Boundary message could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl ServiceError {
    /// Non-zero result code reported to the host for a failed transaction.
    #[must_use]
    pub fn result_code(&self) -> u32 {
        match self {
            Self::Codec(_) => 2,
            Self::Contract(ContractError::Unauthorized) => 4,
            Self::Contract(ContractError::InsufficientFunds { .. }) | Self::Bank(_) => 5,
            Self::Contract(ContractError::NotFound { .. }) => 6,
            Self::Contract(_) => 3,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
