//! Replaying the append-only log back to a balance.
//!
//! Transactions summed with sign by type, starting from zero, must always
//! equal the wallet's stored balance.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::money::serialize_money;
use tally_shared::types::{WalletId, to_money_scale};

use super::types::LedgerTransaction;

/// Replays a transaction log from zero, returning the balance at cents precision.
#[must_use]
pub fn replay_balance<'a, I>(log: I) -> Decimal
where
    I: IntoIterator<Item = &'a LedgerTransaction>,
{
    let total: Decimal = log
        .into_iter()
        .map(|tx| tx.operation_type.signed(tx.amount))
        .sum();
    to_money_scale(total)
}

/// Comparison of a stored balance against its replayed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// The wallet checked.
    pub wallet_id: WalletId,
    /// Balance as stored on the wallet row.
    #[serde(serialize_with = "serialize_money")]
    pub stored_balance: Decimal,
    /// Balance obtained by replaying every transaction.
    #[serde(serialize_with = "serialize_money")]
    pub replayed_balance: Decimal,
    /// Number of transactions replayed.
    pub transaction_count: usize,
    /// Whether the two balances agree.
    pub is_consistent: bool,
}

impl Reconciliation {
    /// Builds a reconciliation report from a stored balance and its log.
    #[must_use]
    pub fn new(wallet_id: WalletId, stored_balance: Decimal, log: &[LedgerTransaction]) -> Self {
        let replayed_balance = replay_balance(log);
        Self {
            wallet_id,
            stored_balance: to_money_scale(stored_balance),
            replayed_balance,
            transaction_count: log.len(),
            is_consistent: replayed_balance == stored_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::types::OperationType;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tally_shared::types::TransactionId;

    fn tx(operation_type: OperationType, amount: Decimal) -> LedgerTransaction {
        LedgerTransaction {
            id: TransactionId::new(),
            wallet_id: WalletId::parse("replay").unwrap(),
            operation_type,
            amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_log_replays_to_zero() {
        assert_eq!(replay_balance(&Vec::new()).to_string(), "0.00");
    }

    #[test]
    fn test_mixed_sequence_replays() {
        let log = vec![
            tx(OperationType::Deposit, dec!(1000)),
            tx(OperationType::Withdraw, dec!(200)),
            tx(OperationType::Deposit, dec!(500)),
            tx(OperationType::Withdraw, dec!(300)),
        ];
        assert_eq!(replay_balance(&log).to_string(), "1000.00");
    }

    #[test]
    fn test_cents_replay_exactly() {
        let log = vec![
            tx(OperationType::Deposit, dec!(0.01)),
            tx(OperationType::Deposit, dec!(0.02)),
            tx(OperationType::Deposit, dec!(0.03)),
        ];
        assert_eq!(replay_balance(&log).to_string(), "0.06");
    }

    #[test]
    fn test_reconciliation_detects_drift() {
        let id = WalletId::parse("replay").unwrap();
        let log = vec![tx(OperationType::Deposit, dec!(10))];

        let ok = Reconciliation::new(id.clone(), dec!(10.00), &log);
        assert!(ok.is_consistent);
        assert_eq!(ok.transaction_count, 1);

        let drifted = Reconciliation::new(id, dec!(9.99), &log);
        assert!(!drifted.is_consistent);
        assert_eq!(drifted.replayed_balance, dec!(10.00));
    }
}
