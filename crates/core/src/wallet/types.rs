//! Wallet domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::money::serialize_money;
use tally_shared::types::{TransactionId, WalletId};

use super::error::WalletError;

/// Kind of balance mutation.
///
/// Closed set: no other value is ever accepted or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// Adds the amount to the balance.
    Deposit,
    /// Subtracts the amount from the balance.
    Withdraw,
}

impl OperationType {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        }
    }

    /// Returns the amount with the sign this operation applies to a balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposit => amount,
            Self::Withdraw => -amount,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            other => Err(WalletError::InvalidRequest(format!(
                "Unknown operation type: {other}"
            ))),
        }
    }
}

/// A validated request to mutate one wallet's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    /// Deposit or withdraw.
    pub operation_type: OperationType,
    /// Positive amount, at most two decimal places.
    pub amount: Decimal,
}

impl OperationRequest {
    /// Creates a deposit request.
    #[must_use]
    pub const fn deposit(amount: Decimal) -> Self {
        Self {
            operation_type: OperationType::Deposit,
            amount,
        }
    }

    /// Creates a withdrawal request.
    #[must_use]
    pub const fn withdraw(amount: Decimal) -> Self {
        Self {
            operation_type: OperationType::Withdraw,
            amount,
        }
    }
}

/// A wallet as read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// Caller-supplied id.
    pub id: WalletId,
    /// Current balance, never negative.
    #[serde(serialize_with = "serialize_money")]
    pub balance: Decimal,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// When the balance last changed; `None` until the first operation.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// Creates a fresh wallet with a zero balance.
    #[must_use]
    pub fn new(id: WalletId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            balance: Decimal::ZERO,
            created_at,
            updated_at: None,
        }
    }
}

/// Immutable record of one completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTransaction {
    /// Generated id.
    pub id: TransactionId,
    /// Owning wallet.
    pub wallet_id: WalletId,
    /// Deposit or withdraw.
    pub operation_type: OperationType,
    /// Amount as submitted, always positive.
    pub amount: Decimal,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Result of applying an operation to a wallet snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Balance to persist, at cents precision.
    pub new_balance: Decimal,
    /// Record to append to the log in the same unit of work.
    pub transaction: LedgerTransaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("DEPOSIT", OperationType::Deposit)]
    #[case("WITHDRAW", OperationType::Withdraw)]
    fn test_operation_type_from_str(#[case] raw: &str, #[case] expected: OperationType) {
        assert_eq!(OperationType::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("deposit")]
    #[case("INVALID_TYPE")]
    #[case("")]
    #[case("TRANSFER")]
    fn test_operation_type_rejects(#[case] raw: &str) {
        assert!(matches!(
            OperationType::from_str(raw),
            Err(WalletError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(OperationType::Deposit.signed(dec!(10.50)), dec!(10.50));
        assert_eq!(OperationType::Withdraw.signed(dec!(10.50)), dec!(-10.50));
    }

    #[test]
    fn test_operation_type_serde() {
        assert_eq!(
            serde_json::to_string(&OperationType::Withdraw).unwrap(),
            "\"WITHDRAW\""
        );
        let parsed: OperationType = serde_json::from_str("\"DEPOSIT\"").unwrap();
        assert_eq!(parsed, OperationType::Deposit);
        assert!(serde_json::from_str::<OperationType>("\"INVALID_TYPE\"").is_err());
    }

    #[test]
    fn test_new_wallet_serializes_zero_balance() {
        let wallet = Wallet::new(WalletId::parse("w-1").unwrap(), Utc::now());
        let json = serde_json::to_value(&wallet).unwrap();
        assert_eq!(json["balance"], "0.00");
        assert!(json["updated_at"].is_null());
    }
}
