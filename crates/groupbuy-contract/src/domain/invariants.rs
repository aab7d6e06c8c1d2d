//! # Domain Invariants
//!
//! Consistency rules that MUST hold after every committed write.
//!
//! - Below Goal: every listed item has `current_group_size < group_size_goal`
//! - Group Size Sum: `current_group_size` equals the sum of the item's
//!   commitment quantities
//! - Listed Reference: every commitment references a listed item
//!
//! A transition whose staged state fails any check is discarded.

use crate::domain::entities::ItemData;
use crate::domain::ledger::CommitmentLedger;
use crate::domain::state::ContractState;
use crate::domain::value_objects::ItemKey;
use crate::errors::ContractError;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Below Goal
///
/// An item that reached its goal must have been settled in the same
/// transition.
#[must_use]
pub fn check_below_goal_invariant(item: &ItemData) -> bool {
    item.current_group_size < item.static_data.group_size_goal
}

/// Group Size Sum
///
/// The running group size is derived state; it must agree with the ledger.
#[must_use]
pub fn check_group_size_invariant(item: &ItemData, ledger: &CommitmentLedger) -> bool {
    u64::from(item.current_group_size) == ledger.total_for_item(&item.key())
}

/// Listed Reference
///
/// No commitment outlives its item.
#[must_use]
pub fn check_listed_invariant(key: &ItemKey, state: &ContractState) -> bool {
    state.catalog.contains(key)
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &ContractState) -> InvariantCheckResult {
    let mut violations = Vec::new();

    for item in state.catalog.iter() {
        if !check_below_goal_invariant(item) {
            violations.push(InvariantViolation::GoalReachedButListed {
                key: item.key(),
                size: item.current_group_size,
                goal: item.static_data.group_size_goal,
            });
        }
        if !check_group_size_invariant(item, &state.ledger) {
            violations.push(InvariantViolation::GroupSizeMismatch {
                key: item.key(),
                recorded: item.current_group_size,
                committed: state.ledger.total_for_item(&item.key()),
            });
        }
    }

    for key in state.ledger.committed_items() {
        if !check_listed_invariant(key, state) {
            violations.push(InvariantViolation::DanglingCommitment { key: key.clone() });
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Converts into a contract result.
    ///
    /// # Errors
    /// `InvariantViolated` listing every violation.
    pub fn into_result(self) -> Result<(), ContractError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(violations) => {
                let detail = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(ContractError::InvariantViolated(detail))
            }
        }
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Item reached its goal but is still listed.
    GoalReachedButListed {
        /// Offending item.
        key: ItemKey,
        /// Recorded group size.
        size: u32,
        /// Group size goal.
        goal: u32,
    },
    /// Group size disagrees with the ledger.
    GroupSizeMismatch {
        /// Offending item.
        key: ItemKey,
        /// Group size stored on the item.
        recorded: u32,
        /// Sum of the ledger's commitments.
        committed: u64,
    },
    /// Commitment on an item that is not listed.
    DanglingCommitment {
        /// Missing item.
        key: ItemKey,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoalReachedButListed { key, size, goal } => {
                write!(f, "{key} reached goal ({size} >= {goal}) but is still listed")
            }
            Self::GroupSizeMismatch {
                key,
                recorded,
                committed,
            } => {
                write!(
                    f,
                    "{key} group size {recorded} != committed total {committed}"
                )
            }
            Self::DanglingCommitment { key } => {
                write!(f, "commitment on unlisted item {key}")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
