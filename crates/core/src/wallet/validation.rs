//! Boundary validation for wallet requests.
//!
//! These checks run before a request reaches the coordinator. An amount must
//! be positive, carry at most two decimal places, and fit in ten digits.

use rust_decimal::Decimal;
use tally_shared::types::WalletId;
use tally_shared::types::money::{fractional_digits, integer_digits};

use super::error::WalletError;
use super::types::{OperationRequest, OperationType};

/// Maximum number of digits in an amount.
pub const MAX_AMOUNT_DIGITS: u32 = 10;

/// Maximum number of fractional digits in an amount.
pub const MAX_AMOUNT_DECIMALS: u32 = 2;

/// Validates an operation amount.
///
/// # Errors
///
/// Returns `InvalidRequest` if the amount is not positive, has more than two
/// decimal places, or has more than ten digits in total.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::InvalidRequest(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let decimals = fractional_digits(amount);
    if decimals > MAX_AMOUNT_DECIMALS {
        return Err(WalletError::InvalidRequest(format!(
            "Amount must have at most {MAX_AMOUNT_DECIMALS} decimal places"
        )));
    }

    if integer_digits(amount) > MAX_AMOUNT_DIGITS - MAX_AMOUNT_DECIMALS {
        return Err(WalletError::InvalidRequest(format!(
            "Amount must have at most {MAX_AMOUNT_DIGITS} digits in total"
        )));
    }

    Ok(amount)
}

/// Parses an operation type.
///
/// # Errors
///
/// Returns `InvalidRequest` for anything other than `DEPOSIT` or `WITHDRAW`.
pub fn parse_operation_type(raw: &str) -> Result<OperationType, WalletError> {
    raw.parse()
}

/// Validates a caller-supplied wallet id.
///
/// # Errors
///
/// Returns `InvalidRequest` if the id is empty or too long.
pub fn validate_wallet_id(raw: &str) -> Result<WalletId, WalletError> {
    WalletId::parse(raw).map_err(|e| WalletError::InvalidRequest(e.to_string()))
}

/// Validates both halves of an operation request.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn validate_operation(
    operation_type: &str,
    amount: Decimal,
) -> Result<OperationRequest, WalletError> {
    Ok(OperationRequest {
        operation_type: parse_operation_type(operation_type)?,
        amount: validate_amount(amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(1500))]
    #[case(dec!(100.00))]
    #[case(dec!(999999.99))]
    #[case(dec!(99999999.99))]
    #[case(dec!(1.500))]
    fn test_valid_amounts(#[case] amount: Decimal) {
        assert_eq!(validate_amount(amount).unwrap(), amount);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    #[case(dec!(0.001))]
    #[case(dec!(1.005))]
    #[case(dec!(100000000))]
    #[case(dec!(123456789.12))]
    fn test_invalid_amounts(#[case] amount: Decimal) {
        assert!(matches!(
            validate_amount(amount),
            Err(WalletError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_operation() {
        let req = validate_operation("WITHDRAW", dec!(300)).unwrap();
        assert_eq!(req, OperationRequest::withdraw(dec!(300)));

        assert!(validate_operation("INVALID_TYPE", dec!(100)).is_err());
        assert!(validate_operation("DEPOSIT", dec!(-100)).is_err());
        assert!(validate_operation("DEPOSIT", dec!(0)).is_err());
    }

    #[test]
    fn test_validate_wallet_id() {
        assert!(validate_wallet_id("abc").is_ok());
        assert!(matches!(
            validate_wallet_id(""),
            Err(WalletError::InvalidRequest(_))
        ));
    }
}
