//! Wallet balance logic.
//!
//! This module implements the pure half of the balance-mutation protocol:
//! - Domain types for wallets, operations, and transaction records
//! - Boundary validation for incoming operation requests
//! - The operation engine that computes a new balance
//! - Replay of the append-only log back to a balance
//! - Error types shared by every layer that touches a wallet

pub mod balance;
pub mod engine;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod engine_props;
#[cfg(test)]
mod validation_props;

pub use balance::{Reconciliation, replay_balance};
pub use engine::OperationEngine;
pub use error::WalletError;
pub use types::{LedgerTransaction, OperationOutcome, OperationRequest, OperationType, Wallet};
pub use validation::{parse_operation_type, validate_amount, validate_operation, validate_wallet_id};
