//! # Core Domain Entities
//!
//! Items, user contact data, commitment payloads and the transfers the
//! contract asks the host to perform.

use crate::domain::value_objects::{AccountAddress, Amount, ItemKey};
use crate::errors::ContractError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ITEM
// =============================================================================

/// Seller-supplied, immutable description of an item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticItemData {
    /// Display name.
    pub name: String,
    /// Category the item is listed under.
    pub category: String,
    /// Product url, unique within the category.
    pub url: String,
    /// Product image url.
    pub img_url: String,
    /// Account paid on settlement.
    pub seller_address: AccountAddress,
    /// Seller contact email (public).
    pub seller_email: String,
    /// List price per unit.
    pub price: Amount,
    /// Group price per unit, paid to the seller on settlement.
    pub wanted_price: Amount,
    /// Cumulative quantity that triggers settlement.
    pub group_size_goal: u32,
}

impl StaticItemData {
    /// Catalog key of this item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category.clone(), self.url.clone())
    }

    /// Validates the fields a listing cannot work without.
    ///
    /// # Errors
    ///
    /// [`ContractError::InvalidItem`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.category.trim().is_empty() {
            return Err(ContractError::InvalidItem("category is empty".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(ContractError::InvalidItem("url is empty".to_string()));
        }
        if self.seller_address.is_empty() {
            return Err(ContractError::InvalidItem(
                "seller_address is empty".to_string(),
            ));
        }
        if self.group_size_goal == 0 {
            return Err(ContractError::InvalidItem(
                "group_size_goal must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A listed item with its running group size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Seller-supplied data.
    pub static_data: StaticItemData,
    /// Sum of all open commitment quantities.
    pub current_group_size: u32,
}

impl ItemData {
    /// Wraps freshly listed data with an empty group.
    #[must_use]
    pub fn new(static_data: StaticItemData) -> Self {
        Self {
            static_data,
            current_group_size: 0,
        }
    }

    /// Catalog key of this item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.static_data.key()
    }

    /// True once committed demand meets the goal.
    #[must_use]
    pub fn goal_reached(&self) -> bool {
        self.current_group_size >= self.static_data.group_size_goal
    }
}

// =============================================================================
// USER DATA
// =============================================================================

/// Buyer contact details. Confidential: only the owner may read them back.
///
/// `Debug` prints no field values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    /// Buyer email.
    pub email: String,
    /// Shipping address.
    pub delivery_address: String,
}

impl fmt::Debug for ContactData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContactData { .. }")
    }
}

/// Per-user part of an `update_item` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserItemDetails {
    /// Account the commitment is made for (must be the sender).
    pub account_address: AccountAddress,
    /// Contact data stored on the user's record.
    pub contact_data: ContactData,
    /// Requested quantity (replaces any previous one).
    pub quantity: u32,
}

/// Payload of `update_item`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemData {
    /// Item category.
    pub category: String,
    /// Item url.
    pub url: String,
    /// Commitment details.
    pub user_details: UserItemDetails,
}

impl UpdateItemData {
    /// Catalog key of the referenced item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category.clone(), self.url.clone())
    }
}

/// One of the caller's own commitments, as returned by `get_items`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProductQuantity {
    /// Item url.
    pub url: String,
    /// Committed quantity.
    pub quantity: u32,
}

// =============================================================================
// TRANSFERS
// =============================================================================

/// Why the contract moves funds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferReason {
    /// Group goal reached, seller receives the escrowed group price.
    SellerPayout,
    /// Commitment lowered, withdrawn, or item delisted.
    Refund,
}

/// Funds movement out of the contract's escrow, executed by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Source (always the contract address).
    pub from: AccountAddress,
    /// Recipient.
    pub to: AccountAddress,
    /// Amount in `denom`.
    pub amount: Amount,
    /// Coin denomination.
    pub denom: String,
    /// Purpose of the transfer.
    pub reason: TransferReason,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::laptop;

    #[test]
    fn test_validate_accepts_complete_item() {
        assert!(laptop().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_goal() {
        let mut item = laptop();
        item.group_size_goal = 0;
        assert!(matches!(item.validate(), Err(ContractError::InvalidItem(_))));
    }

    #[test]
    fn test_validate_rejects_missing_key_parts() {
        let mut item = laptop();
        item.url = String::new();
        assert!(item.validate().is_err());

        let mut item = laptop();
        item.category = " ".to_string();
        assert!(item.validate().is_err());

        let mut item = laptop();
        item.seller_address = AccountAddress::default();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_goal_reached() {
        let mut item = ItemData::new(laptop());
        assert!(!item.goal_reached());
        item.current_group_size = 10;
        assert!(item.goal_reached());
        item.current_group_size = 12;
        assert!(item.goal_reached());
    }

    #[test]
    fn test_contact_data_debug_is_redacted() {
        let contact = ContactData {
            email: "user@email.com".to_string(),
            delivery_address: "1 Main St".to_string(),
        };
        let debug = format!("{contact:?}");
        assert!(!debug.contains("user@email.com"));
        assert!(!debug.contains("Main"));
    }

    #[test]
    fn test_static_item_wire_shape() {
        let json = serde_json::to_value(laptop()).unwrap();
        assert_eq!(json["price"], "1000");
        assert_eq!(json["seller_address"], "seller");
        assert_eq!(json["group_size_goal"], 10);
    }
}
