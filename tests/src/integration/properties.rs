//! # Property Tests
//!
//! Random message sequences against the synchronous contract core.
//!
//! After every step:
//! - the domain invariants hold
//! - a rejected message leaves the state exactly as it was
//! - a settled item is gone together with all of its commitments
//! - a query answers only under the caller's latest viewing key

#[cfg(test)]
mod tests {
    use super::super::*;
    use groupbuy_contract::prelude::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const USERS: [&str; 4] = ["bob", "alice", "carol", "seller"];
    const KEYS: [&str; 3] = ["", "alpha", "beta"];

    #[derive(Clone, Debug)]
    enum Op {
        Commit { user: usize, quantity: u32 },
        Withdraw { user: usize },
        SetKey { user: usize, key: usize },
        Query { user: usize, key: usize },
        Relist,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..3usize, 0..12u32).prop_map(|(user, quantity)| Op::Commit { user, quantity }),
            1 => (0..3usize).prop_map(|user| Op::Withdraw { user }),
            2 => (0..USERS.len(), 0..KEYS.len()).prop_map(|(user, key)| Op::SetKey { user, key }),
            2 => (0..USERS.len(), 0..KEYS.len()).prop_map(|(user, key)| Op::Query { user, key }),
            1 => Just(Op::Relist),
        ]
    }

    type Fingerprint = (
        Vec<ItemData>,
        Vec<(Vec<(ItemKey, u32)>, Option<ContactData>)>,
        usize,
    );

    fn fingerprint(state: &ContractState) -> Fingerprint {
        let items = state.catalog.iter().cloned().collect();
        let users = USERS
            .iter()
            .map(|user| {
                let user = addr(user);
                (
                    state.ledger.list_for_user(&user),
                    state.ledger.contact_data(&user).cloned(),
                )
            })
            .collect();
        (items, users, state.viewing_keys.len())
    }

    fn to_msg(op: &Op) -> Option<(AccountAddress, ExecuteMsg)> {
        match *op {
            Op::Commit { user, quantity } => {
                Some((addr(USERS[user]), commit(USERS[user], quantity)))
            }
            Op::Withdraw { user } => Some((
                addr(USERS[user]),
                ExecuteMsg::Withdraw {
                    category: CATEGORY.to_string(),
                    url: URL.to_string(),
                },
            )),
            Op::SetKey { user, key } => Some((addr(USERS[user]), set_key(KEYS[key]))),
            Op::Relist => Some((addr("seller"), ExecuteMsg::AddItem(laptop()))),
            Op::Query { .. } => None,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn random_sequences_preserve_invariants(
            escrow in 0u128..40_000,
            ops in prop::collection::vec(op_strategy(), 1..40),
        ) {
            let contract = Contract::default();
            let contract_address = addr("groupbuy-contract");
            let mut state = ContractState::new();
            let mut balance = Amount::from(escrow);
            let mut keys: HashMap<usize, &str> = HashMap::new();
            let item = laptop().key();

            let listing = ExecutionEnv {
                sender: addr("seller"),
                contract_address: contract_address.clone(),
                contract_balance: balance,
            };
            contract
                .execute(&mut state, &listing, ExecuteMsg::AddItem(laptop()))
                .unwrap();

            for op in &ops {
                if let Op::Query { user, key } = *op {
                    let result = contract.query(&state, get_items(USERS[user], KEYS[key]));
                    match keys.get(&user) {
                        Some(set) if *set == KEYS[key] => prop_assert!(result.is_ok()),
                        _ => prop_assert_eq!(result, Err(ContractError::Unauthorized)),
                    }
                    continue;
                }

                let Some((sender, msg)) = to_msg(op) else { continue };
                let env = ExecutionEnv {
                    sender,
                    contract_address: contract_address.clone(),
                    contract_balance: balance,
                };
                let before = fingerprint(&state);

                match contract.execute(&mut state, &env, msg) {
                    Ok(response) => {
                        for transfer in &response.transfers {
                            prop_assert_eq!(&transfer.from, &contract_address);
                            balance = balance
                                .checked_sub(transfer.amount)
                                .ok_or_else(|| TestCaseError::fail("escrow overdrawn"))?;
                        }

                        if let Op::SetKey { user, key } = *op {
                            if !KEYS[key].is_empty() {
                                keys.insert(user, KEYS[key]);
                            }
                        }

                        let settled = response
                            .log
                            .events
                            .iter()
                            .any(|e| matches!(e, ContractEvent::GroupSettled { .. }));
                        if settled {
                            prop_assert!(!state.catalog.contains(&item));
                            prop_assert_eq!(state.ledger.participants(&item), 0);
                            for user in USERS {
                                prop_assert!(state.ledger.quantity(&addr(user), &item).is_none());
                            }
                        }
                    }
                    Err(_) => prop_assert_eq!(fingerprint(&state), before),
                }

                prop_assert!(check_all_invariants(&state).is_valid());
            }
        }
    }
}
