//! # Group-Buy Service
//!
//! Host-side wrapper around the contract core.
//!
//! ## Concurrency
//!
//! - Writes hold the state write lock for the whole transition, including
//!   the balance lookup and the bank transfers
//! - Reads take the read lock and run concurrently with each other
//!
//! ## Write Sequence
//!
//! ```text
//! lock(write) → Bank::balance → Contract::execute_staged
//!             → Bank::execute_transfers → commit staged state → unlock
//! ```
//!
//! A failure at any step drops the staged state; nothing is committed and no
//! funds move.

use crate::adapters::{InMemoryBank, MessageCodec};
use crate::config::{ConfigError, ContractConfig};
use crate::contract::{Contract, ExecuteResponse, ExecutionEnv};
use crate::domain::state::ContractState;
use crate::domain::value_objects::AccountAddress;
use crate::errors::ServiceError;
use crate::events::ContractEvent;
use crate::messages::{ExecuteMsg, QueryAnswer, QueryMsg};
use crate::ports::inbound::GroupBuyApi;
use crate::ports::outbound::Bank;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Group-buy service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Contract limits and denomination.
    pub contract: ContractConfig,
    /// Address the contract holds its escrow under.
    pub contract_address: AccountAddress,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            contract: ContractConfig::default(),
            contract_address: AccountAddress::new("groupbuy-contract"),
        }
    }
}

/// Statistics for the group-buy service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total execute messages handled.
    pub transactions_executed: u64,
    /// Committed transitions.
    pub successful_executions: u64,
    /// Rejected or aborted transitions.
    pub failed_executions: u64,
    /// Items settled.
    pub settlements: u64,
    /// Queries answered.
    pub queries_served: u64,
    /// Queries refused (bad viewing key).
    pub rejected_queries: u64,
    /// Average execution time in microseconds.
    pub avg_execution_time_us: u64,
}

/// The group-buy service.
///
/// This service:
/// 1. Serializes every write behind the state write lock
/// 2. Funds transitions from the contract's bank balance
/// 3. Applies the resulting transfers before committing
/// 4. Maintains execution statistics
pub struct GroupBuyService<B: Bank> {
    /// Transition functions.
    contract: Contract,
    /// Escrow address.
    contract_address: AccountAddress,
    /// Bank adapter.
    bank: Arc<B>,
    /// Committed state.
    state: Arc<RwLock<ContractState>>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<B: Bank> GroupBuyService<B> {
    /// Create a new service over `bank`, starting from empty state.
    ///
    /// # Errors
    /// [`ConfigError`] if the contract configuration does not validate.
    pub fn new(bank: B, config: ServiceConfig) -> Result<Self, ConfigError> {
        let contract = Contract::new(config.contract)?;
        Ok(Self::with_contract(bank, contract, config.contract_address))
    }

    fn with_contract(bank: B, contract: Contract, contract_address: AccountAddress) -> Self {
        Self {
            contract,
            contract_address,
            bank: Arc::new(bank),
            state: Arc::new(RwLock::new(ContractState::new())),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// The bank adapter.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Escrow address.
    pub fn contract_address(&self) -> &AccountAddress {
        &self.contract_address
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> ContractState {
        self.state.read().await.clone()
    }

    /// Handle one execute message from `sender`.
    #[instrument(skip(self, sender, msg), fields(action = msg.action_name(), sender = %sender))]
    pub async fn handle_execute(
        &self,
        sender: &AccountAddress,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ServiceError> {
        let start = Instant::now();
        let result = self.execute_internal(sender, msg).await;
        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        // Update statistics
        {
            let mut stats = self.stats.write().await;
            stats.transactions_executed += 1;
            match &result {
                Ok(response) => {
                    stats.successful_executions += 1;
                    stats.settlements += response
                        .log
                        .events
                        .iter()
                        .filter(|e| matches!(e, ContractEvent::GroupSettled { .. }))
                        .count() as u64;
                }
                Err(_) => stats.failed_executions += 1,
            }
            let total = stats.transactions_executed;
            stats.avg_execution_time_us =
                (stats.avg_execution_time_us * (total - 1) + elapsed_us) / total;
        }

        match &result {
            Ok(response) => info!(
                status = ?response.answer.status(),
                transfers = response.transfers.len(),
                events = response.log.events.len(),
                "Transition committed"
            ),
            Err(e @ ServiceError::Contract(inner)) if inner.is_client_error() => {
                warn!(error = %e, code = e.result_code(), "Transition rejected");
            }
            Err(e) => error!(error = %e, code = e.result_code(), "Transition aborted"),
        }

        result
    }

    /// Handle one query.
    #[instrument(skip(self, msg))]
    pub async fn handle_query(&self, msg: QueryMsg) -> Result<QueryAnswer, ServiceError> {
        let result = {
            let state = self.state.read().await;
            self.contract.query(&state, msg)
        };

        let mut stats = self.stats.write().await;
        match &result {
            Ok(_) => stats.queries_served += 1,
            Err(e) => {
                stats.rejected_queries += 1;
                debug!(error = %e, "Query refused");
            }
        }

        result.map_err(ServiceError::from)
    }

    /// Decode, execute and encode the answer.
    ///
    /// # Errors
    /// `Codec` on a malformed message, otherwise as [`Self::handle_execute`].
    pub async fn handle_raw_execute(
        &self,
        sender: &AccountAddress,
        bytes: &[u8],
    ) -> Result<Vec<u8>, ServiceError> {
        let msg = MessageCodec::decode_execute(bytes)?;
        let response = self.handle_execute(sender, msg).await?;
        Ok(MessageCodec::encode(&response.answer)?)
    }

    /// Decode, query and encode the answer.
    ///
    /// # Errors
    /// `Codec` on a malformed message, otherwise as [`Self::handle_query`].
    pub async fn handle_raw_query(&self, bytes: &[u8]) -> Result<Vec<u8>, ServiceError> {
        let msg = MessageCodec::decode_query(bytes)?;
        let answer = self.handle_query(msg).await?;
        Ok(MessageCodec::encode(&answer)?)
    }

    async fn execute_internal(
        &self,
        sender: &AccountAddress,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ServiceError> {
        let mut state = self.state.write().await;

        let denom = &self.contract.config().denom;
        let contract_balance = self.bank.balance(&self.contract_address, denom).await?;
        let env = ExecutionEnv {
            sender: sender.clone(),
            contract_address: self.contract_address.clone(),
            contract_balance,
        };

        let (staged, response) = self.contract.execute_staged(&state, &env, msg)?;

        if !response.transfers.is_empty() {
            if let Err(e) = self.bank.execute_transfers(&response.transfers).await {
                error!(error = %e, "Transfers failed, discarding staged state");
                return Err(e.into());
            }
        }

        *state = staged;
        Ok(response)
    }
}

/// Create a default service with an in-memory bank (for testing).
#[must_use]
pub fn create_test_service() -> GroupBuyService<InMemoryBank> {
    let config = ServiceConfig::default();
    let bank = InMemoryBank::new(config.contract.denom.clone());
    GroupBuyService::with_contract(bank, Contract::default(), config.contract_address)
}

// =============================================================================
// GroupBuyApi Implementation
// =============================================================================

#[async_trait]
impl<B: Bank> GroupBuyApi for GroupBuyService<B> {
    async fn execute(
        &self,
        sender: &AccountAddress,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ServiceError> {
        self.handle_execute(sender, msg).await
    }

    async fn query(&self, msg: QueryMsg) -> Result<QueryAnswer, ServiceError> {
        self.handle_query(msg).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
