//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The ledger store for wallet rows and the transaction log
//! - Per-wallet row locking and the atomic ledger coordinator
//! - Database migrations

pub mod coordinator;
pub mod entities;
pub mod lock;
pub mod migration;
pub mod repositories;

pub use coordinator::{LedgerCoordinator, LedgerSettings};
pub use lock::WalletLockManager;
pub use repositories::{LedgerStore, StoreError};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_shared::DatabaseConfig;

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
