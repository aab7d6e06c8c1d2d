//! # Contract
//!
//! Transition functions of the group-buy ledger:
//!
//! - `execute(state, env, msg)`: one all-or-nothing write
//! - `query(state, msg)`: one read of committed state
//!
//! ## Write Path
//!
//! ```text
//! ExecuteMsg ──→ staged clone ──→ handler ──→ invariants ──→ commit
//!                    │               │
//!                    │               └─ Escrow: every transfer reserved
//!                    │                  against the contract balance
//!                    └─ dropped on any error
//! ```
//!
//! Transfers are returned to the host in [`ExecuteResponse::transfers`];
//! the contract itself never moves funds.

use crate::config::{ConfigError, ContractConfig};
use crate::domain::authorizer::QueryAuthorizer;
use crate::domain::entities::{StaticItemData, Transfer, TransferReason, UpdateItemData};
use crate::domain::settlement::{Escrow, SettlementEngine};
use crate::domain::state::ContractState;
use crate::domain::value_objects::{AccountAddress, Amount, ItemKey};
use crate::domain::viewing_key::ViewingKey;
use crate::errors::ContractError;
use crate::events::{ContractEvent, EventLog};
use crate::messages::{
    ExecuteAnswer, ExecuteMsg, GetItemsResponse, QueryAnswer, QueryMsg, ResponseStatus,
};
use tracing::debug;

// =============================================================================
// ENVIRONMENT & RESPONSE
// =============================================================================

/// Host-supplied context of one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionEnv {
    /// Authenticated transaction sender.
    pub sender: AccountAddress,
    /// This contract's address (source of every transfer).
    pub contract_address: AccountAddress,
    /// Contract balance in the configured denomination.
    pub contract_balance: Amount,
}

/// Result of a successful execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteResponse {
    /// Answer returned to the sender.
    pub answer: ExecuteAnswer,
    /// Transfers the host must perform.
    pub transfers: Vec<Transfer>,
    /// Events of this transition.
    pub log: EventLog,
}

/// Per-transition bookkeeping: reserved funds, pending transfers, events.
struct Transition<'a> {
    env: &'a ExecutionEnv,
    denom: &'a str,
    escrow: Escrow,
    transfers: Vec<Transfer>,
    log: EventLog,
}

impl<'a> Transition<'a> {
    fn new(env: &'a ExecutionEnv, denom: &'a str, action: &str) -> Self {
        Self {
            env,
            denom,
            escrow: Escrow::new(env.contract_balance),
            transfers: Vec::new(),
            log: EventLog::new(action, env.contract_address.clone()),
        }
    }

    /// Queues a transfer out of the contract. Zero amounts are skipped.
    fn pay(
        &mut self,
        to: &AccountAddress,
        amount: Amount,
        reason: TransferReason,
    ) -> Result<(), ContractError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.escrow.reserve(amount)?;
        self.transfers.push(Transfer {
            from: self.env.contract_address.clone(),
            to: to.clone(),
            amount,
            denom: self.denom.to_string(),
            reason,
        });
        Ok(())
    }

    fn emit(&mut self, event: ContractEvent) {
        self.log.push(event);
    }

    fn finish(mut self, answer: ExecuteAnswer) -> ExecuteResponse {
        for reason in [TransferReason::SellerPayout, TransferReason::Refund] {
            if let Some(event) = ContractEvent::funds_transferred(&self.transfers, reason) {
                self.log.push(event);
            }
        }
        ExecuteResponse {
            answer,
            transfers: self.transfers,
            log: self.log,
        }
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// The group-buy ledger's transition functions.
#[derive(Clone, Debug, Default)]
pub struct Contract {
    config: ContractConfig,
}

impl Contract {
    /// Creates a contract with the given limits.
    ///
    /// # Errors
    /// [`ConfigError`] if the configuration fails [`ContractConfig::validate`].
    pub fn new(config: ContractConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Executes `msg` and commits the result into `state`.
    ///
    /// # Errors
    /// Any [`ContractError`]; `state` is unchanged on error.
    pub fn execute(
        &self,
        state: &mut ContractState,
        env: &ExecutionEnv,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ContractError> {
        state.transact(|staged| self.apply(staged, env, msg))
    }

    /// Executes `msg` on a staged copy and returns it uncommitted.
    ///
    /// The caller commits the returned state once the transfers went
    /// through.
    ///
    /// # Errors
    /// Any [`ContractError`].
    pub fn execute_staged(
        &self,
        state: &ContractState,
        env: &ExecutionEnv,
        msg: ExecuteMsg,
    ) -> Result<(ContractState, ExecuteResponse), ContractError> {
        state.stage(|staged| self.apply(staged, env, msg))
    }

    /// Answers a read.
    ///
    /// # Errors
    /// `Unauthorized` when the viewing key does not verify.
    pub fn query(
        &self,
        state: &ContractState,
        msg: QueryMsg,
    ) -> Result<QueryAnswer, ContractError> {
        match msg {
            QueryMsg::GetItems {
                category,
                address,
                key,
            } => {
                let view = QueryAuthorizer::new(&state.viewing_keys).caller_view(
                    &address,
                    &ViewingKey::new(key),
                    &state.catalog,
                    &state.ledger,
                    &category,
                )?;
                Ok(QueryAnswer::GetItems(GetItemsResponse {
                    items: view.items,
                    user_items: view.user_items,
                    contact_data: view.contact_data,
                    status: ResponseStatus::Success,
                }))
            }
        }
    }

    fn apply(
        &self,
        state: &mut ContractState,
        env: &ExecutionEnv,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ContractError> {
        let mut tx = Transition::new(env, &self.config.denom, msg.action_name());

        let answer = match msg {
            ExecuteMsg::AddItem(data) => self.add_item(state, &mut tx, data)?,
            ExecuteMsg::UpdateItem(data) => self.update_item(state, &mut tx, data)?,
            ExecuteMsg::Withdraw { category, url } => {
                Self::withdraw(state, &mut tx, &ItemKey::new(category, url))?
            }
            ExecuteMsg::RemoveItem { category, url, key } => Self::remove_item(
                state,
                &mut tx,
                &ItemKey::new(category, url),
                &ViewingKey::new(key),
            )?,
            ExecuteMsg::SetViewingKey { key } => {
                Self::set_viewing_key(state, &mut tx, &ViewingKey::new(key))
            }
        };

        Ok(tx.finish(answer))
    }

    // =========================================================================
    // HANDLERS
    // =========================================================================

    fn add_item(
        &self,
        state: &mut ContractState,
        tx: &mut Transition<'_>,
        data: StaticItemData,
    ) -> Result<ExecuteAnswer, ContractError> {
        let key = data.key();
        state
            .catalog
            .add_item(data, self.config.max_items_per_category)?;
        tx.emit(ContractEvent::ItemAdded { item: key });

        Ok(ExecuteAnswer::AddItem {
            status: ResponseStatus::Success,
        })
    }

    fn update_item(
        &self,
        state: &mut ContractState,
        tx: &mut Transition<'_>,
        data: UpdateItemData,
    ) -> Result<ExecuteAnswer, ContractError> {
        let sender = tx.env.sender.clone();
        if data.user_details.account_address != sender {
            return Err(ContractError::Unauthorized);
        }

        let quantity = data.user_details.quantity;
        if quantity == 0 {
            return Err(ContractError::InvalidQuantity(quantity));
        }
        let max = self.config.max_quantity_per_commitment;
        if quantity > max {
            return Err(ContractError::QuantityTooLarge { quantity, max });
        }

        let key = data.key();
        let item = state.catalog.get(&key)?;
        let wanted_price = item.static_data.wanted_price;
        let goal = item.static_data.group_size_goal;
        let current = item.current_group_size;

        let delta = state
            .ledger
            .upsert(&sender, &key, quantity, data.user_details.contact_data)?;
        let size = SettlementEngine::apply_delta(current, delta)?;
        state.catalog.set_group_size(&key, size)?;
        tx.emit(ContractEvent::CommitmentUpdated {
            item: key.clone(),
            current_group_size: size,
        });

        if delta < 0 {
            let lowered =
                u32::try_from(delta.unsigned_abs()).map_err(|_| ContractError::AmountOverflow)?;
            let refund = SettlementEngine::refund_amount(lowered, wanted_price)?;
            tx.pay(&sender, refund, TransferReason::Refund)?;
        }

        if size >= goal {
            let settlement = SettlementEngine::settle(&mut state.catalog, &mut state.ledger, &key)?;
            debug!(
                item = %key,
                payout = %settlement.payout,
                participants = settlement.participants,
                "group goal reached"
            );
            tx.pay(
                &settlement.seller,
                settlement.payout,
                TransferReason::SellerPayout,
            )?;
            tx.emit(ContractEvent::GroupSettled {
                item: key,
                payout: settlement.payout,
                participants: settlement.participants,
            });
        }

        Ok(ExecuteAnswer::UpdateItem {
            status: ResponseStatus::Success,
        })
    }

    fn withdraw(
        state: &mut ContractState,
        tx: &mut Transition<'_>,
        key: &ItemKey,
    ) -> Result<ExecuteAnswer, ContractError> {
        let sender = tx.env.sender.clone();
        let item = state.catalog.get(key)?;
        let wanted_price = item.static_data.wanted_price;
        let current = item.current_group_size;

        let quantity = state
            .ledger
            .remove(&sender, key)
            .ok_or_else(|| ContractError::not_found(&key.category, &key.url))?;
        let size = SettlementEngine::apply_delta(current, -i64::from(quantity))?;
        state.catalog.set_group_size(key, size)?;

        let refund = SettlementEngine::refund_amount(quantity, wanted_price)?;
        tx.pay(&sender, refund, TransferReason::Refund)?;
        tx.emit(ContractEvent::CommitmentWithdrawn {
            item: key.clone(),
            current_group_size: size,
        });

        Ok(ExecuteAnswer::Withdraw {
            status: ResponseStatus::Success,
        })
    }

    fn remove_item(
        state: &mut ContractState,
        tx: &mut Transition<'_>,
        key: &ItemKey,
        viewing_key: &ViewingKey,
    ) -> Result<ExecuteAnswer, ContractError> {
        let sender = tx.env.sender.clone();
        let item = state.catalog.get(key)?;

        let key_ok = state.viewing_keys.verify(&sender, viewing_key);
        if !key_ok || item.static_data.seller_address != sender {
            return Err(ContractError::Unauthorized);
        }

        let item = state.catalog.remove(key)?;
        let cleared = state.ledger.remove_all_for_item(key);
        for (user, quantity) in &cleared {
            let refund = SettlementEngine::refund_amount(*quantity, item.static_data.wanted_price)?;
            tx.pay(user, refund, TransferReason::Refund)?;
        }
        tx.emit(ContractEvent::ItemRemoved {
            item: key.clone(),
            refunded: cleared.len(),
        });

        Ok(ExecuteAnswer::RemoveItem {
            status: ResponseStatus::Success,
        })
    }

    fn set_viewing_key(
        state: &mut ContractState,
        tx: &mut Transition<'_>,
        viewing_key: &ViewingKey,
    ) -> ExecuteAnswer {
        if viewing_key.is_empty() {
            return ExecuteAnswer::SetViewingKey {
                status: ResponseStatus::Failure,
            };
        }

        state.viewing_keys.set(&tx.env.sender, viewing_key);
        tx.emit(ContractEvent::ViewingKeySet);

        ExecuteAnswer::SetViewingKey {
            status: ResponseStatus::Success,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
