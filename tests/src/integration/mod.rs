//! # Integration Tests
//!
//! Shared fixtures for the flow and property suites.

pub mod flows;
pub mod properties;

use groupbuy_contract::prelude::*;

/// Category used by every fixture item.
pub const CATEGORY: &str = "laptops";

/// Url of the default fixture item.
pub const URL: &str = "www.item.com";

/// The reference listing: goal 10, price 1000, wanted price 900.
pub fn laptop() -> StaticItemData {
    StaticItemData {
        name: "Cool item".to_string(),
        category: CATEGORY.to_string(),
        url: URL.to_string(),
        img_url: "www.image-item.com".to_string(),
        seller_address: AccountAddress::new("seller"),
        seller_email: "seller@email.com".to_string(),
        price: Amount::from(1000u128),
        wanted_price: Amount::from(900u128),
        group_size_goal: 10,
    }
}

/// Address shorthand.
pub fn addr(s: &str) -> AccountAddress {
    AccountAddress::new(s)
}

/// Contact data derived from a user name.
pub fn contact(user: &str) -> ContactData {
    ContactData {
        email: format!("{user}@email.com"),
        delivery_address: format!("{user} street 1"),
    }
}

/// `update_item` for the default item on behalf of `user`.
pub fn commit(user: &str, quantity: u32) -> ExecuteMsg {
    ExecuteMsg::UpdateItem(UpdateItemData {
        category: CATEGORY.to_string(),
        url: URL.to_string(),
        user_details: UserItemDetails {
            account_address: addr(user),
            contact_data: contact(user),
            quantity,
        },
    })
}

/// `set_viewing_key`.
pub fn set_key(key: &str) -> ExecuteMsg {
    ExecuteMsg::SetViewingKey {
        key: key.to_string(),
    }
}

/// `get_items` on the fixture category.
pub fn get_items(user: &str, key: &str) -> QueryMsg {
    QueryMsg::GetItems {
        category: CATEGORY.to_string(),
        address: addr(user),
        key: key.to_string(),
    }
}

/// Service with a funded escrow and the default item listed.
pub async fn listed_service(escrow: u128) -> GroupBuyService<InMemoryBank> {
    groupbuy_telemetry::init_test_logging();

    let service = create_test_service();
    service
        .bank()
        .set_balance(service.contract_address(), Amount::from(escrow));
    service
        .handle_execute(&addr("seller"), ExecuteMsg::AddItem(laptop()))
        .await
        .expect("listing the fixture item");
    service
}
