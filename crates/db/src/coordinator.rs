//! Ledger coordinator: the atomic balance-mutation protocol.
//!
//! `perform_operation` walks one wallet through
//! `Start -> WalletLocked -> Validated -> Persisted | Aborted`:
//!
//! 1. Begin a database transaction
//! 2. Lock the wallet row (`FOR UPDATE`)
//! 3. Run the operation engine against the locked snapshot
//! 4. Write the new balance and append the transaction record
//! 5. Commit, which also releases the row lock
//!
//! Any failure before the commit rolls the whole unit back, so the balance and
//! the transaction log always move together.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use tally_core::wallet::{
    LedgerTransaction, OperationEngine, OperationOutcome, OperationRequest, Reconciliation,
    Wallet, WalletError,
};
use tally_shared::LedgerConfig;
use tally_shared::types::{PageRequest, PageResponse, WalletId};
use tracing::{debug, error, info, warn};

use crate::lock::WalletLockManager;
use crate::repositories::{LedgerStore, StoreError};

/// Tunables for the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSettings {
    /// How long to wait for a wallet lock. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl From<&LedgerConfig> for LedgerSettings {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            lock_timeout: config.lock_timeout(),
        }
    }
}

/// Runs every wallet read and write, each inside its own unit of work.
#[derive(Debug)]
pub struct LedgerCoordinator {
    db: DatabaseConnection,
    locks: WalletLockManager,
}

impl LedgerCoordinator {
    /// Creates a coordinator over a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection, settings: LedgerSettings) -> Self {
        Self {
            db,
            locks: WalletLockManager::new(settings.lock_timeout),
        }
    }

    /// Creates a wallet with a zero balance.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the id is taken, including by a concurrent creation
    /// - `OperationFailed` on any storage failure
    pub async fn create_wallet(&self, id: WalletId) -> Result<Wallet, WalletError> {
        let txn = self.begin().await?;

        let result = async {
            if LedgerStore::find_wallet(&txn, &id).await?.is_some() {
                return Err(StoreError::DuplicateWallet(id.clone()));
            }
            LedgerStore::insert_wallet(&txn, &id, now()).await
        }
        .await;

        match result {
            Ok(wallet) => {
                txn.commit().await.map_err(operation_failed)?;
                info!(wallet_id = %id, "Wallet created");
                Ok(wallet)
            }
            Err(StoreError::DuplicateWallet(existing)) => {
                abort(txn, &id).await;
                warn!(wallet_id = %id, "Wallet already exists");
                Err(WalletError::AlreadyExists(existing))
            }
            Err(e) => {
                abort(txn, &id).await;
                error!(wallet_id = %id, error = %e, "Wallet creation failed");
                Err(operation_failed(e))
            }
        }
    }

    /// Reads a wallet without locking it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the wallet does not exist
    /// - `OperationFailed` on any storage failure
    pub async fn get_wallet(&self, id: &WalletId) -> Result<Wallet, WalletError> {
        LedgerStore::find_wallet(&self.db, id)
            .await
            .map_err(operation_failed)?
            .ok_or_else(|| WalletError::NotFound(id.clone()))
    }

    /// Applies a deposit or withdrawal atomically.
    ///
    /// Concurrent calls for the same wallet are serialized by the row lock;
    /// calls for different wallets run in parallel.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the wallet does not exist
    /// - `InsufficientFunds` if a withdrawal exceeds the balance
    /// - `InvalidRequest` if the amount is not positive
    /// - `OperationFailed` on any storage failure, after rollback
    pub async fn perform_operation(
        &self,
        id: &WalletId,
        request: &OperationRequest,
    ) -> Result<LedgerTransaction, WalletError> {
        debug!(wallet_id = %id, operation = %request.operation_type, "Starting operation");
        let txn = self.begin().await?;
        let txn_ref = &txn;

        let locked = self
            .locks
            .with_exclusive_wallet(txn_ref, id, |locked| async move {
                let wallet = locked.ok_or_else(|| WalletError::NotFound(id.clone()))?;
                debug!(wallet_id = %id, balance = %wallet.balance, "Wallet locked");

                let now = now();
                let outcome = OperationEngine::apply(&wallet, request, now)?;
                debug!(wallet_id = %id, new_balance = %outcome.new_balance, "Operation validated");

                persist(txn_ref, &outcome, now)
                    .await
                    .map_err(operation_failed)?;
                Ok::<_, WalletError>(outcome)
            })
            .await;

        let result = match locked {
            Ok(inner) => inner,
            Err(e) => Err(operation_failed(e)),
        };

        match result {
            Ok(outcome) => {
                txn.commit().await.map_err(operation_failed)?;
                info!(
                    wallet_id = %id,
                    transaction_id = %outcome.transaction.id,
                    operation = %request.operation_type,
                    amount = %request.amount,
                    new_balance = %outcome.new_balance,
                    "Operation persisted"
                );
                Ok(outcome.transaction)
            }
            Err(err) => {
                abort(txn, id).await;
                if err.is_retryable() {
                    error!(wallet_id = %id, error = %err, "Operation aborted");
                } else {
                    warn!(wallet_id = %id, error = %err, "Operation rejected");
                }
                Err(err)
            }
        }
    }

    /// Lists a wallet's transactions in insertion order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the wallet does not exist
    /// - `OperationFailed` on any storage failure
    pub async fn list_transactions(
        &self,
        id: &WalletId,
        page: &PageRequest,
    ) -> Result<PageResponse<LedgerTransaction>, WalletError> {
        let page = page.normalized();
        self.get_wallet(id).await?;

        let (data, total) = LedgerStore::list_transactions(&self.db, id, &page)
            .await
            .map_err(operation_failed)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Replays a wallet's log and compares it with the stored balance.
    ///
    /// Both reads come from one repeatable-read snapshot, so a concurrent
    /// operation cannot land between them. No lock is taken.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the wallet does not exist
    /// - `OperationFailed` on any storage failure
    pub async fn reconcile(&self, id: &WalletId) -> Result<Reconciliation, WalletError> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .map_err(operation_failed)?;

        let result = async {
            let wallet = LedgerStore::find_wallet(&txn, id)
                .await
                .map_err(operation_failed)?
                .ok_or_else(|| WalletError::NotFound(id.clone()))?;
            let log = LedgerStore::all_transactions(&txn, id)
                .await
                .map_err(operation_failed)?;
            Ok::<_, WalletError>(Reconciliation::new(wallet.id, wallet.balance, &log))
        }
        .await;

        abort(txn, id).await;

        if let Ok(report) = &result
            && !report.is_consistent
        {
            error!(
                wallet_id = %id,
                stored = %report.stored_balance,
                replayed = %report.replayed_balance,
                "Balance does not match transaction log"
            );
        }
        result
    }

    async fn begin(&self) -> Result<DatabaseTransaction, WalletError> {
        self.db.begin().await.map_err(operation_failed)
    }
}

async fn persist(
    txn: &DatabaseTransaction,
    outcome: &OperationOutcome,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let wallet_id = &outcome.transaction.wallet_id;
    LedgerStore::update_balance(txn, wallet_id, outcome.new_balance, now).await?;
    LedgerStore::insert_transaction(txn, &outcome.transaction).await
}

async fn abort(txn: DatabaseTransaction, id: &WalletId) {
    if let Err(e) = txn.rollback().await {
        error!(wallet_id = %id, error = %e, "Rollback failed");
    }
}

fn operation_failed(err: impl Display) -> WalletError {
    WalletError::OperationFailed(err.to_string())
}

// PostgreSQL keeps microseconds
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
