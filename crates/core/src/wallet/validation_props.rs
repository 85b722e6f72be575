//! Property-based tests for request validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::WalletError;
use super::validation::{validate_amount, validate_operation};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any positive cents amount up to 99,999,999.99 is accepted unchanged.
    #[test]
    fn prop_cents_amounts_accepted(cents in 1i64..10_000_000_000i64) {
        let amount = Decimal::new(cents, 2);
        prop_assert_eq!(validate_amount(amount), Ok(amount));
    }

    /// Zero and negative amounts are rejected.
    #[test]
    fn prop_non_positive_rejected(cents in 0i64..10_000_000_000i64) {
        let amount = Decimal::new(-cents, 2);
        let rejected = matches!(validate_amount(amount), Err(WalletError::InvalidRequest(_)));
        prop_assert!(rejected);
    }

    /// A third significant decimal place is rejected.
    #[test]
    fn prop_sub_cent_rejected(mills in 1i64..100_000_000i64) {
        prop_assume!(mills % 10 != 0);
        let amount = Decimal::new(mills, 3);
        let rejected = matches!(validate_amount(amount), Err(WalletError::InvalidRequest(_)));
        prop_assert!(rejected);
    }

    /// Amounts with nine or more integer digits are rejected.
    #[test]
    fn prop_too_many_digits_rejected(units in 100_000_000i64..1_000_000_000_000i64) {
        let rejected = matches!(
            validate_amount(Decimal::from(units)),
            Err(WalletError::InvalidRequest(_))
        );
        prop_assert!(rejected);
    }

    /// Operation types outside the closed set never validate.
    #[test]
    fn prop_unknown_operation_type_rejected(raw in "[A-Za-z_]{0,12}") {
        prop_assume!(raw != "DEPOSIT" && raw != "WITHDRAW");
        let rejected = matches!(
            validate_operation(&raw, Decimal::ONE),
            Err(WalletError::InvalidRequest(_))
        );
        prop_assert!(rejected);
    }
}
