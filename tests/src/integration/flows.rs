//! # End-to-End Flows
//!
//! Drives `GroupBuyService` through the `GroupBuyApi` port with an
//! in-memory bank, the way a host would.
//!
//! ## Flows Tested:
//!
//! 1. **Commit below goal**: item stays listed, owner sees own data
//! 2. **Commit reaching goal**: item settles, seller is paid, reads go empty
//! 3. **Wrong viewing key**: no user data leaks
//! 4. **Seller removal and withdrawals**: refunds flow back to buyers
//! 5. **Insufficient escrow**: nothing changes

#[cfg(test)]
mod tests {
    use super::super::*;
    use groupbuy_contract::prelude::*;
    use std::sync::Arc;

    async fn items(
        service: &GroupBuyService<InMemoryBank>,
        user: &str,
        key: &str,
    ) -> Result<GetItemsResponse, ServiceError> {
        let QueryAnswer::GetItems(response) = service.query(get_items(user, key)).await?;
        Ok(response)
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[tokio::test]
    async fn test_commit_below_goal_keeps_item_listed() {
        let service = listed_service(0).await;
        service.execute(&addr("bob"), set_key("wefhjyr")).await.unwrap();

        let response = service.execute(&addr("bob"), commit("bob", 1)).await.unwrap();
        assert_eq!(response.answer.status(), ResponseStatus::Success);

        let view = items(&service, "bob", "wefhjyr").await.unwrap();
        assert_eq!(view.status, ResponseStatus::Success);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].current_group_size, 1);
        assert_eq!(view.items[0].static_data.price, Amount::from(1000u128));
        assert_eq!(
            view.user_items,
            vec![UserProductQuantity {
                url: URL.to_string(),
                quantity: 1
            }]
        );
        assert_eq!(view.contact_data, Some(contact("bob")));
    }

    #[tokio::test]
    async fn test_reaching_goal_settles_and_empties_reads() {
        let service = listed_service(50_000).await;
        service.execute(&addr("bob"), set_key("wefhjyr")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 1)).await.unwrap();

        let response = service.execute(&addr("bob"), commit("bob", 10)).await.unwrap();
        assert_eq!(response.answer.status(), ResponseStatus::Success);
        assert_eq!(response.transfers.len(), 1);
        assert_eq!(response.transfers[0].reason, TransferReason::SellerPayout);

        let view = items(&service, "bob", "wefhjyr").await.unwrap();
        assert!(view.items.is_empty());
        assert!(view.user_items.is_empty());
        assert_eq!(view.contact_data, None);
        assert_eq!(view.status, ResponseStatus::Success);

        assert_eq!(
            service.bank().balance_of(&addr("seller")),
            Amount::from(9000u128)
        );
        assert_eq!(
            service.bank().balance_of(service.contract_address()),
            Amount::from(41_000u128)
        );
    }

    #[tokio::test]
    async fn test_settlement_clears_every_participant() {
        let service = listed_service(50_000).await;
        for (user, quantity) in [("bob", 3), ("alice", 3), ("carol", 3)] {
            service.execute(&addr(user), set_key(user)).await.unwrap();
            service.execute(&addr(user), commit(user, quantity)).await.unwrap();
        }

        let response = service.execute(&addr("dave"), commit("dave", 2)).await.unwrap();
        assert!(response.log.events.iter().any(|e| matches!(
            e,
            ContractEvent::GroupSettled { participants: 4, .. }
        )));
        // 11 units, overshoot included
        assert_eq!(
            service.bank().balance_of(&addr("seller")),
            Amount::from(9900u128)
        );

        for user in ["bob", "alice", "carol"] {
            let view = items(&service, user, user).await.unwrap();
            assert!(view.items.is_empty());
            assert!(view.user_items.is_empty());
            assert_eq!(view.contact_data, None);
        }
    }

    #[tokio::test]
    async fn test_wrong_key_leaks_nothing() {
        let service = listed_service(0).await;
        service.execute(&addr("bob"), set_key("wefhjyr")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 1)).await.unwrap();

        let wrong = items(&service, "bob", "wrong_vk").await.unwrap_err();
        let unset = items(&service, "carol", "wefhjyr").await.unwrap_err();

        assert_eq!(wrong, ServiceError::Contract(ContractError::Unauthorized));
        assert_eq!(wrong.to_string(), unset.to_string());
        assert_eq!(wrong.result_code(), 4);
    }

    #[tokio::test]
    async fn test_only_latest_viewing_key_is_valid() {
        let service = listed_service(0).await;
        service.execute(&addr("bob"), set_key("first")).await.unwrap();
        service.execute(&addr("bob"), set_key("second")).await.unwrap();

        assert!(items(&service, "bob", "first").await.is_err());
        assert!(items(&service, "bob", "second").await.is_ok());

        let refused = service.execute(&addr("bob"), set_key("")).await.unwrap();
        assert_eq!(refused.answer.status(), ResponseStatus::Failure);
        assert!(items(&service, "bob", "second").await.is_ok());
    }

    // =========================================================================
    // COMMITMENT UPDATES
    // =========================================================================

    #[tokio::test]
    async fn test_update_replaces_and_refunds_decrease() {
        let service = listed_service(50_000).await;
        service.execute(&addr("bob"), set_key("k")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 3)).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 5)).await.unwrap();

        let view = items(&service, "bob", "k").await.unwrap();
        assert_eq!(view.items[0].current_group_size, 5);
        assert_eq!(view.user_items[0].quantity, 5);

        let response = service.execute(&addr("bob"), commit("bob", 2)).await.unwrap();
        assert_eq!(response.transfers.len(), 1);
        assert_eq!(response.transfers[0].amount, Amount::from(2700u128));
        assert_eq!(service.bank().balance_of(&addr("bob")), Amount::from(2700u128));

        let view = items(&service, "bob", "k").await.unwrap();
        assert_eq!(view.items[0].current_group_size, 2);
    }

    #[tokio::test]
    async fn test_withdraw_refunds_and_forgets_contact() {
        let service = listed_service(50_000).await;
        service.execute(&addr("bob"), set_key("k")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 4)).await.unwrap();

        let withdraw = ExecuteMsg::Withdraw {
            category: CATEGORY.to_string(),
            url: URL.to_string(),
        };
        service.execute(&addr("bob"), withdraw).await.unwrap();

        assert_eq!(service.bank().balance_of(&addr("bob")), Amount::from(3600u128));
        let view = items(&service, "bob", "k").await.unwrap();
        assert_eq!(view.items[0].current_group_size, 0);
        assert!(view.user_items.is_empty());
        assert_eq!(view.contact_data, None);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let service = listed_service(0).await;
        let err = service.execute(&addr("bob"), commit("bob", 0)).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Contract(ContractError::InvalidQuantity(0))
        );
        assert_eq!(err.result_code(), 3);
    }

    // =========================================================================
    // SELLER REMOVAL
    // =========================================================================

    #[tokio::test]
    async fn test_seller_removal_refunds_everyone() {
        let service = listed_service(50_000).await;
        service.execute(&addr("seller"), set_key("seller_vk")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 2)).await.unwrap();
        service.execute(&addr("alice"), commit("alice", 3)).await.unwrap();

        let remove = |key: &str| ExecuteMsg::RemoveItem {
            category: CATEGORY.to_string(),
            url: URL.to_string(),
            key: key.to_string(),
        };

        let err = service.execute(&addr("bob"), remove("seller_vk")).await.unwrap_err();
        assert_eq!(err, ServiceError::Contract(ContractError::Unauthorized));
        let err = service.execute(&addr("seller"), remove("guess")).await.unwrap_err();
        assert_eq!(err, ServiceError::Contract(ContractError::Unauthorized));
        assert!(service.snapshot().await.catalog.contains(&laptop().key()));

        let response = service.execute(&addr("seller"), remove("seller_vk")).await.unwrap();
        assert_eq!(response.answer.status(), ResponseStatus::Success);
        assert_eq!(service.bank().balance_of(&addr("bob")), Amount::from(1800u128));
        assert_eq!(service.bank().balance_of(&addr("alice")), Amount::from(2700u128));

        let state = service.snapshot().await;
        assert!(state.catalog.is_empty());
        assert!(state.ledger.is_empty());

        let err = service.execute(&addr("seller"), remove("seller_vk")).await.unwrap_err();
        assert_eq!(err.result_code(), 6);
    }

    // =========================================================================
    // ESCROW
    // =========================================================================

    #[tokio::test]
    async fn test_insufficient_escrow_preserves_everything() {
        let service = listed_service(1000).await;
        service.execute(&addr("bob"), set_key("k")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 4)).await.unwrap();
        let before = items(&service, "bob", "k").await.unwrap();

        let err = service.execute(&addr("alice"), commit("alice", 7)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Contract(ContractError::InsufficientFunds { .. })
        ));

        let after = items(&service, "bob", "k").await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after.items[0].current_group_size, 4);
        assert_eq!(service.bank().balance_of(&addr("seller")), Amount::zero());
        assert_eq!(
            service.bank().balance_of(service.contract_address()),
            Amount::from(1000u128)
        );
    }

    // =========================================================================
    // EVENT LOG & CODEC
    // =========================================================================

    #[tokio::test]
    async fn test_event_log_reports_action_and_contract() {
        let service = listed_service(0).await;
        let response = service.execute(&addr("bob"), commit("bob", 1)).await.unwrap();

        assert_eq!(
            response.log.attribute("message.action").as_deref(),
            Some("update_item")
        );
        assert_eq!(
            response.log.attribute("contract_address"),
            Some(service.contract_address().to_string())
        );
        let flat = format!("{:?}", response.log.attributes());
        assert!(!flat.contains("bob@email.com"));
    }

    #[tokio::test]
    async fn test_json_boundary() {
        let service = listed_service(0).await;
        let answer = service
            .handle_raw_execute(
                &addr("bob"),
                br#"{"update_item":{"category":"laptops","url":"www.item.com",
                    "user_details":{"account_address":"bob",
                    "contact_data":{"email":"bob@email.com","delivery_address":"x"},
                    "quantity":2}}}"#,
            )
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&answer).unwrap();
        assert_eq!(json["update_item"]["status"], "success");
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_run_alongside_writes() {
        let service = Arc::new(listed_service(1_000_000).await);
        service.execute(&addr("bob"), set_key("k")).await.unwrap();
        service.execute(&addr("bob"), commit("bob", 1)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    let user = format!("writer{i}");
                    service
                        .execute(&addr(&user), commit(&user, 1))
                        .await
                        .map(|_| ())
                } else {
                    service.query(get_items("bob", "k")).await.map(|answer| {
                        let QueryAnswer::GetItems(view) = answer;
                        // A read never sees a half-applied write.
                        let size = view.items[0].current_group_size;
                        assert!((1..=5).contains(&size));
                    })
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let view = items(&service, "bob", "k").await.unwrap();
        assert_eq!(view.items[0].current_group_size, 5);
    }
}
