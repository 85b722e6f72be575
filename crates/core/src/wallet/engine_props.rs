//! Property-based tests for the operation engine.
//!
//! A sequence of accepted operations must leave a balance equal to the
//! signed sum of their amounts, and no sequence may drive it below zero.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::WalletId;

use super::balance::replay_balance;
use super::engine::OperationEngine;
use super::error::WalletError;
use super::types::{OperationRequest, OperationType, Wallet};

/// Strategy to generate a valid amount from 0.01 to 99,999.99.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn operation_type_strategy() -> impl Strategy<Value = OperationType> {
    prop_oneof![Just(OperationType::Deposit), Just(OperationType::Withdraw)]
}

fn request_strategy() -> impl Strategy<Value = OperationRequest> {
    (operation_type_strategy(), amount_strategy()).prop_map(|(operation_type, amount)| {
        OperationRequest {
            operation_type,
            amount,
        }
    })
}

fn empty_wallet() -> Wallet {
    Wallet::new(WalletId::parse("prop-wallet").unwrap(), Utc::now())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The final balance equals the replay of the accepted operations.
    #[test]
    fn prop_balance_matches_replayed_log(
        requests in prop::collection::vec(request_strategy(), 0..50),
    ) {
        let mut wallet = empty_wallet();
        let mut log = Vec::new();

        for request in &requests {
            match OperationEngine::apply(&wallet, request, Utc::now()) {
                Ok(outcome) => {
                    wallet.balance = outcome.new_balance;
                    log.push(outcome.transaction);
                }
                Err(WalletError::InsufficientFunds { .. }) => {
                    prop_assert_eq!(request.operation_type, OperationType::Withdraw);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        prop_assert_eq!(replay_balance(&log), wallet.balance);
    }

    /// No sequence of operations produces a negative balance.
    #[test]
    fn prop_balance_never_negative(
        requests in prop::collection::vec(request_strategy(), 1..50),
    ) {
        let mut wallet = empty_wallet();

        for request in &requests {
            if let Ok(outcome) = OperationEngine::apply(&wallet, request, Utc::now()) {
                wallet.balance = outcome.new_balance;
            }
            prop_assert!(wallet.balance >= Decimal::ZERO);
        }
    }

    /// Withdrawing the whole balance leaves exactly zero; one cent more fails.
    #[test]
    fn prop_withdraw_boundary(balance in amount_strategy()) {
        let drained = OperationEngine::compute_balance(balance, OperationType::Withdraw, balance);
        prop_assert_eq!(drained, Ok(Decimal::ZERO));

        let over = balance + Decimal::new(1, 2);
        let result = OperationEngine::compute_balance(balance, OperationType::Withdraw, over);
        let is_insufficient = matches!(result, Err(WalletError::InsufficientFunds { .. }));
        prop_assert!(is_insufficient);
    }

    /// A rejected withdrawal reports the balance it was checked against.
    #[test]
    fn prop_insufficient_funds_reports_balance(
        balance in amount_strategy(),
        extra in amount_strategy(),
    ) {
        let requested = balance + extra;
        let result = OperationEngine::compute_balance(balance, OperationType::Withdraw, requested);
        prop_assert_eq!(
            result,
            Err(WalletError::InsufficientFunds { balance, requested })
        );
    }

    /// Deposits always succeed and keep cents precision.
    #[test]
    fn prop_deposit_always_succeeds(balance in amount_strategy(), amount in amount_strategy()) {
        let result = OperationEngine::compute_balance(balance, OperationType::Deposit, amount);
        prop_assert_eq!(result.clone(), Ok(balance + amount));
        prop_assert_eq!(result.map(|b| b.scale()), Ok(2));
    }
}
