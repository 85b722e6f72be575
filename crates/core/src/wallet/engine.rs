//! Operation engine: validate an operation against a locked balance.
//!
//! The engine never touches storage. Given the wallet snapshot read under the
//! exclusive lock and an operation request, it either produces the new
//! balance together with the transaction record to append, or rejects the
//! operation. Persisting both is the caller's job, inside one unit of work.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::{TransactionId, to_money_scale};

use super::error::WalletError;
use super::types::{LedgerTransaction, OperationOutcome, OperationRequest, OperationType, Wallet};

/// Operation engine for balance computation.
///
/// Pure business logic with no database dependencies.
pub struct OperationEngine;

impl OperationEngine {
    /// Applies an operation to a wallet snapshot.
    ///
    /// 1. Re-checks that the amount is positive
    /// 2. Computes the new balance (deposits always succeed)
    /// 3. Rejects withdrawals larger than the balance
    /// 4. Builds the transaction record with a fresh id
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the amount is zero or negative
    /// - `InsufficientFunds` if a withdrawal exceeds the balance
    /// - `OperationFailed` if a deposit would overflow the decimal range
    pub fn apply(
        wallet: &Wallet,
        request: &OperationRequest,
        now: DateTime<Utc>,
    ) -> Result<OperationOutcome, WalletError> {
        let new_balance =
            Self::compute_balance(wallet.balance, request.operation_type, request.amount)?;

        let transaction = LedgerTransaction {
            id: TransactionId::new(),
            wallet_id: wallet.id.clone(),
            operation_type: request.operation_type,
            amount: request.amount,
            created_at: now,
        };

        Ok(OperationOutcome {
            new_balance,
            transaction,
        })
    }

    /// Computes the balance after one operation, at cents precision.
    ///
    /// A withdrawal equal to the balance is allowed and leaves zero.
    ///
    /// # Errors
    ///
    /// Same as [`OperationEngine::apply`].
    pub fn compute_balance(
        balance: Decimal,
        operation_type: OperationType,
        amount: Decimal,
    ) -> Result<Decimal, WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidRequest(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let new_balance = match operation_type {
            OperationType::Deposit => balance
                .checked_add(amount)
                .ok_or_else(|| WalletError::OperationFailed("Balance overflow".to_string()))?,
            OperationType::Withdraw => {
                if balance < amount {
                    return Err(WalletError::InsufficientFunds {
                        balance: to_money_scale(balance),
                        requested: amount,
                    });
                }
                balance - amount
            }
        };

        Ok(to_money_scale(new_balance))
    }
}
