//! # Driving Ports (API - Inbound)
//!
//! The interface the host uses to drive the group-buy ledger.

use crate::contract::ExecuteResponse;
use crate::domain::value_objects::AccountAddress;
use crate::errors::ServiceError;
use crate::messages::{ExecuteMsg, QueryAnswer, QueryMsg};
use async_trait::async_trait;

/// Group-buy ledger API.
///
/// Writes are serialized; reads may run concurrently with each other but
/// never observe a write in progress.
#[async_trait]
pub trait GroupBuyApi: Send + Sync {
    /// Runs one state-changing message sent by `sender`.
    ///
    /// On error nothing is persisted and no funds move.
    async fn execute(
        &self,
        sender: &AccountAddress,
        msg: ExecuteMsg,
    ) -> Result<ExecuteResponse, ServiceError>;

    /// Answers a read against committed state.
    async fn query(&self, msg: QueryMsg) -> Result<QueryAnswer, ServiceError>;
}
