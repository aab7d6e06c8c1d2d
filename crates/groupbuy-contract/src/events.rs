//! # Event Log
//!
//! Typed, versioned record of what one transition did, returned with every
//! successful execute. Hosts that need flat attributes use
//! [`EventLog::attributes`].
//!
//! ## Confidentiality
//!
//! Buyer contact data, buyer addresses and per-buyer quantities or amounts
//! never appear here. Commitment events carry only the public group size,
//! settlement reports only the participant count, and refunds are reported
//! as a transfer count.

use crate::domain::entities::{Transfer, TransferReason};
use crate::domain::value_objects::{AccountAddress, Amount, ItemKey};
use serde::{Deserialize, Serialize};

/// Schema version of [`EventLog`].
pub const EVENT_LOG_VERSION: u32 = 1;

/// Attribute key carrying the action name.
pub const ACTION_ATTRIBUTE: &str = "message.action";

/// Attribute key carrying the contract address.
pub const CONTRACT_ADDRESS_ATTRIBUTE: &str = "contract_address";

/// One state change reported by a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractEvent {
    /// A new item was listed.
    ItemAdded {
        /// Item key.
        item: ItemKey,
    },
    /// A commitment was created or replaced.
    CommitmentUpdated {
        /// Item key.
        item: ItemKey,
        /// Group size after the change.
        current_group_size: u32,
    },
    /// A commitment was withdrawn.
    CommitmentWithdrawn {
        /// Item key.
        item: ItemKey,
        /// Group size after the withdrawal.
        current_group_size: u32,
    },
    /// Goal reached; item and commitments cleared.
    GroupSettled {
        /// Item key.
        item: ItemKey,
        /// Amount paid to the seller.
        payout: Amount,
        /// Number of distinct committed users.
        participants: usize,
    },
    /// Seller delisted an item.
    ItemRemoved {
        /// Item key.
        item: ItemKey,
        /// Number of committers refunded.
        refunded: usize,
    },
    /// Funds left the contract for one purpose.
    ///
    /// Amounts stay in the transfer list handed to the host. The seller
    /// payout total is public through [`ContractEvent::GroupSettled`].
    FundsTransferred {
        /// Purpose.
        reason: TransferReason,
        /// Number of transfers.
        transfers: usize,
    },
    /// Sender set a viewing key.
    ViewingKeySet,
}

impl ContractEvent {
    /// Snake-case event name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemAdded { .. } => "item_added",
            Self::CommitmentUpdated { .. } => "commitment_updated",
            Self::CommitmentWithdrawn { .. } => "commitment_withdrawn",
            Self::GroupSettled { .. } => "group_settled",
            Self::ItemRemoved { .. } => "item_removed",
            Self::FundsTransferred { .. } => "funds_transferred",
            Self::ViewingKeySet => "viewing_key_set",
        }
    }

    /// Counts `transfers` sharing `reason` into one event.
    ///
    /// Returns `None` when none match.
    #[must_use]
    pub fn funds_transferred(transfers: &[Transfer], reason: TransferReason) -> Option<Self> {
        let count = transfers.iter().filter(|t| t.reason == reason).count();
        (count > 0).then_some(Self::FundsTransferred {
            reason,
            transfers: count,
        })
    }

    fn push_fields(&self, out: &mut Vec<(String, String)>) {
        let mut push = |key: &str, value: String| out.push((key.to_string(), value));
        match self {
            Self::ItemAdded { item } => push("item", item.to_string()),
            Self::CommitmentUpdated {
                item,
                current_group_size,
            }
            | Self::CommitmentWithdrawn {
                item,
                current_group_size,
            } => {
                push("item", item.to_string());
                push("current_group_size", current_group_size.to_string());
            }
            Self::GroupSettled {
                item,
                payout,
                participants,
            } => {
                push("item", item.to_string());
                push("payout", payout.to_string());
                push("participants", participants.to_string());
            }
            Self::ItemRemoved { item, refunded } => {
                push("item", item.to_string());
                push("refunded", refunded.to_string());
            }
            Self::FundsTransferred { reason, transfers } => {
                let reason = match reason {
                    TransferReason::SellerPayout => "seller_payout",
                    TransferReason::Refund => "refund",
                };
                push("reason", reason.to_string());
                push("transfers", transfers.to_string());
            }
            Self::ViewingKeySet => {}
        }
    }
}

/// Events of one transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// Schema version.
    pub version: u32,
    /// Action that produced the events.
    pub action: String,
    /// Address of the contract that ran.
    pub contract_address: AccountAddress,
    /// Events in emission order.
    pub events: Vec<ContractEvent>,
}

impl EventLog {
    /// Empty log for one action.
    #[must_use]
    pub fn new(action: impl Into<String>, contract_address: AccountAddress) -> Self {
        Self {
            version: EVENT_LOG_VERSION,
            action: action.into(),
            contract_address,
            events: Vec::new(),
        }
    }

    /// Appends an event.
    pub fn push(&mut self, event: ContractEvent) {
        self.events.push(event);
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Flat `(key, value)` attributes, action and contract address first.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut out = vec![
            (ACTION_ATTRIBUTE.to_string(), self.action.clone()),
            (
                CONTRACT_ADDRESS_ATTRIBUTE.to_string(),
                self.contract_address.to_string(),
            ),
        ];
        for event in &self.events {
            out.push(("event".to_string(), event.kind().to_string()));
            event.push_fields(&mut out);
        }
        out
    }

    /// First value recorded under `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

// =============================================================================
// TESTS
// =============================================================================
