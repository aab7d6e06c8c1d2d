//! # Boundary Messages
//!
//! Execute and query messages, encoded as externally tagged snake_case JSON:
//!
//! ```text
//! {"add_item": {"name": "...", "category": "...", ...}}
//! {"update_item": {"category": "...", "url": "...", "user_details": {...}}}
//! {"withdraw": {"category": "...", "url": "..."}}
//! {"remove_item": {"category": "...", "url": "...", "key": "..."}}
//! {"set_viewing_key": {"key": "..."}}
//! {"get_items": {"category": "...", "address": "...", "key": "..."}}
//! ```

use crate::domain::entities::{
    ContactData, ItemData, StaticItemData, UpdateItemData, UserProductQuantity,
};
use crate::domain::value_objects::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome reported inside an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Operation applied.
    Success,
    /// Operation refused without writing anything.
    Failure,
}

// =============================================================================
// EXECUTE
// =============================================================================

/// State-changing messages.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// List a new item.
    AddItem(StaticItemData),
    /// Create or replace the sender's commitment on an item.
    UpdateItem(UpdateItemData),
    /// Drop the sender's commitment on an item, with refund.
    Withdraw {
        /// Item category.
        category: String,
        /// Item url.
        url: String,
    },
    /// Delist an item (seller only), refunding every committer.
    RemoveItem {
        /// Item category.
        category: String,
        /// Item url.
        url: String,
        /// Seller's viewing key.
        key: String,
    },
    /// Set or overwrite the sender's viewing key.
    SetViewingKey {
        /// New plaintext key.
        key: String,
    },
}

impl ExecuteMsg {
    /// Action name as reported in the event log.
    #[must_use]
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "add_item",
            Self::UpdateItem(_) => "update_item",
            Self::Withdraw { .. } => "withdraw",
            Self::RemoveItem { .. } => "remove_item",
            Self::SetViewingKey { .. } => "set_viewing_key",
        }
    }
}

// Keys and contact data stay out of debug output.
impl fmt::Debug for ExecuteMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddItem(data) => f.debug_tuple("AddItem").field(&data.key()).finish(),
            Self::UpdateItem(data) => f.debug_tuple("UpdateItem").field(&data.key()).finish(),
            Self::Withdraw { category, url } => f
                .debug_struct("Withdraw")
                .field("category", category)
                .field("url", url)
                .finish(),
            Self::RemoveItem { category, url, .. } => f
                .debug_struct("RemoveItem")
                .field("category", category)
                .field("url", url)
                .finish_non_exhaustive(),
            Self::SetViewingKey { .. } => f.debug_struct("SetViewingKey").finish_non_exhaustive(),
        }
    }
}

/// Answers to execute messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteAnswer {
    /// Answer to `add_item`.
    AddItem {
        /// Outcome.
        status: ResponseStatus,
    },
    /// Answer to `update_item`.
    UpdateItem {
        /// Outcome.
        status: ResponseStatus,
    },
    /// Answer to `withdraw`.
    Withdraw {
        /// Outcome.
        status: ResponseStatus,
    },
    /// Answer to `remove_item`.
    RemoveItem {
        /// Outcome.
        status: ResponseStatus,
    },
    /// Answer to `set_viewing_key`.
    SetViewingKey {
        /// Outcome.
        status: ResponseStatus,
    },
}

impl ExecuteAnswer {
    /// Status carried by any answer.
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::AddItem { status }
            | Self::UpdateItem { status }
            | Self::Withdraw { status }
            | Self::RemoveItem { status }
            | Self::SetViewingKey { status } => *status,
        }
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// Read-only messages.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// Items of one category plus the caller's own data.
    GetItems {
        /// Category to list.
        category: String,
        /// Caller's address.
        address: AccountAddress,
        /// Caller's viewing key.
        key: String,
    },
}

impl fmt::Debug for QueryMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetItems {
                category, address, ..
            } => f
                .debug_struct("GetItems")
                .field("category", category)
                .field("address", address)
                .finish_non_exhaustive(),
        }
    }
}

/// Answers to query messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryAnswer {
    /// Answer to `get_items`.
    GetItems(GetItemsResponse),
}

/// Items of a category and the caller's own data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetItemsResponse {
    /// Every listed item of the category.
    pub items: Vec<ItemData>,
    /// The caller's commitments in the category.
    pub user_items: Vec<UserProductQuantity>,
    /// The caller's contact data, if they committed in the category.
    pub contact_data: Option<ContactData>,
    /// Outcome.
    pub status: ResponseStatus,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_msg_wire_format() {
        let json = r#"{"set_viewing_key":{"key":"wefhjyr"}}"#;
        let msg: ExecuteMsg = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ExecuteMsg::SetViewingKey {
                key: "wefhjyr".to_string()
            }
        );
        assert_eq!(msg.action_name(), "set_viewing_key");

        let json = r#"{"withdraw":{"category":"laptops","url":"www.item.com"}}"#;
        let msg: ExecuteMsg = serde_json::from_str(json).unwrap();
        assert_eq!(msg.action_name(), "withdraw");
    }

    #[test]
    fn test_update_item_wire_format() {
        let json = r#"{"update_item":{"category":"laptops","url":"www.item.com",
            "user_details":{"account_address":"bob",
            "contact_data":{"email":"bob@email.com","delivery_address":"Main St"},
            "quantity":3}}}"#;
        let ExecuteMsg::UpdateItem(data) = serde_json::from_str(json).unwrap() else {
            panic!("expected update_item");
        };
        assert_eq!(data.user_details.quantity, 3);
        assert_eq!(data.user_details.account_address.as_str(), "bob");
    }

    #[test]
    fn test_answer_wire_format() {
        let answer = ExecuteAnswer::SetViewingKey {
            status: ResponseStatus::Failure,
        };
        assert_eq!(
            serde_json::to_string(&answer).unwrap(),
            r#"{"set_viewing_key":{"status":"failure"}}"#
        );
        assert_eq!(answer.status(), ResponseStatus::Failure);
    }

    #[test]
    fn test_empty_get_items_response_shape() {
        let response = QueryAnswer::GetItems(GetItemsResponse {
            items: vec![],
            user_items: vec![],
            contact_data: None,
            status: ResponseStatus::Success,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"get_items": {
                "items": [], "user_items": [], "contact_data": null, "status": "success"
            }})
        );
    }

    #[test]
    fn test_debug_hides_keys() {
        let msg = ExecuteMsg::SetViewingKey {
            key: "supersecret".to_string(),
        };
        assert!(!format!("{msg:?}").contains("supersecret"));

        let query = QueryMsg::GetItems {
            category: "laptops".to_string(),
            address: AccountAddress::new("bob"),
            key: "supersecret".to_string(),
        };
        assert!(!format!("{query:?}").contains("supersecret"));
    }
}
