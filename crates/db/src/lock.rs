//! Per-wallet exclusive sections backed by PostgreSQL row locks.
//!
//! There is no in-process mutex here. The `FOR UPDATE` row lock is held by
//! the database for the lifetime of the caller's transaction, so every
//! service instance sharing the database serializes on the same lock.
//!
//! # Usage
//!
//! ```ignore
//! let txn = db.begin().await?;
//! let locks = WalletLockManager::new(None);
//! let balance = locks
//!     .with_exclusive_wallet(&txn, &wallet_id, |locked| async move {
//!         locked.map(|wallet| wallet.balance)
//!     })
//!     .await?;
//! txn.commit().await?;
//! ```

use std::future::Future;
use std::time::Duration;

use sea_orm::DatabaseTransaction;
use tally_core::wallet::Wallet;
use tally_shared::types::WalletId;
use tracing::debug;

use crate::repositories::{LedgerStore, StoreError};

/// Grants at most one in-flight balance mutation per wallet id.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletLockManager {
    lock_timeout: Option<Duration>,
}

impl WalletLockManager {
    /// Creates a lock manager. `None` waits for a lock indefinitely.
    #[must_use]
    pub const fn new(lock_timeout: Option<Duration>) -> Self {
        Self { lock_timeout }
    }

    /// Locks the wallet row and runs `f` with the locked snapshot.
    ///
    /// `f` receives `None` when the wallet does not exist; no lock is taken
    /// in that case. The lock is released when `txn` commits or rolls back,
    /// not when `f` returns, so writes made by `f` through `txn` are covered.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the lock cannot be acquired. Errors produced
    /// by `f` are returned inside `Ok`.
    pub async fn with_exclusive_wallet<F, Fut, T>(
        &self,
        txn: &DatabaseTransaction,
        id: &WalletId,
        f: F,
    ) -> Result<T, StoreError>
    where
        F: FnOnce(Option<Wallet>) -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(timeout) = self.lock_timeout {
            LedgerStore::set_lock_timeout(txn, timeout).await?;
        }

        let locked = LedgerStore::find_wallet_for_update(txn, id).await?;
        debug!(wallet_id = %id, found = locked.is_some(), "Wallet lock acquired");

        Ok(f(locked).await)
    }
}
