//! Wallet error types.
//!
//! Business-rule failures (`AlreadyExists`, `NotFound`, `InsufficientFunds`) are
//! ordinary results the caller can act on. `OperationFailed` wraps anything
//! unexpected that forced the unit of work to roll back.

use rust_decimal::Decimal;
use tally_shared::types::WalletId;
use thiserror::Error;

/// Errors that can occur during wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// A wallet with this id already exists.
    #[error("Wallet already exists: {0}")]
    AlreadyExists(WalletId),

    /// No wallet with this id.
    #[error("Wallet not found: {0}")]
    NotFound(WalletId),

    /// Withdrawal would make the balance negative.
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance at the time of the attempt.
        balance: Decimal,
        /// Amount the caller tried to withdraw.
        requested: Decimal,
    },

    /// Malformed operation type, amount, or wallet id.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected storage or infrastructure failure; the unit of work was rolled back.
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl WalletError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "WALLET_ALREADY_EXISTS",
            Self::NotFound(_) => "WALLET_NOT_FOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::OperationFailed(_) => "OPERATION_FAILED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AlreadyExists(_) => 409,
            Self::NotFound(_) => 404,
            Self::InsufficientFunds { .. } => 400,
            Self::InvalidRequest(_) => 422,
            Self::OperationFailed(_) => 500,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::OperationFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wallet_id() -> WalletId {
        WalletId::parse("w-1").unwrap()
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WalletError::AlreadyExists(wallet_id()).error_code(),
            "WALLET_ALREADY_EXISTS"
        );
        assert_eq!(
            WalletError::NotFound(wallet_id()).error_code(),
            "WALLET_NOT_FOUND"
        );
        assert_eq!(
            WalletError::InsufficientFunds {
                balance: dec!(1.00),
                requested: dec!(2.00),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            WalletError::InvalidRequest(String::new()).error_code(),
            "INVALID_REQUEST"
        );
        assert_eq!(
            WalletError::OperationFailed(String::new()).error_code(),
            "OPERATION_FAILED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(WalletError::AlreadyExists(wallet_id()).http_status_code(), 409);
        assert_eq!(WalletError::NotFound(wallet_id()).http_status_code(), 404);
        assert_eq!(
            WalletError::InsufficientFunds {
                balance: dec!(0),
                requested: dec!(1),
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            WalletError::InvalidRequest(String::new()).http_status_code(),
            422
        );
        assert_eq!(
            WalletError::OperationFailed(String::new()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            WalletError::AlreadyExists(wallet_id()).to_string(),
            "Wallet already exists: w-1"
        );
        assert_eq!(
            WalletError::NotFound(wallet_id()).to_string(),
            "Wallet not found: w-1"
        );
        assert_eq!(
            WalletError::InsufficientFunds {
                balance: dec!(100.00),
                requested: dec!(500.00),
            }
            .to_string(),
            "Insufficient funds: balance 100.00, requested 500.00"
        );
    }

    #[test]
    fn test_only_operation_failures_are_retryable() {
        assert!(WalletError::OperationFailed(String::new()).is_retryable());
        assert!(!WalletError::NotFound(wallet_id()).is_retryable());
        assert!(
            !WalletError::InsufficientFunds {
                balance: dec!(0),
                requested: dec!(1),
            }
            .is_retryable()
        );
    }
}
