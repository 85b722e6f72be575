//! Ledger store: wallet rows and the append-only transaction log.
//!
//! Every function takes the connection to run on, so callers decide which
//! unit of work a read or write belongs to. Nothing written here is durable
//! until the caller commits.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr,
};
use tally_core::wallet::{LedgerTransaction, Wallet};
use tally_shared::types::{PageRequest, TransactionId, WalletId, to_money_scale};

use crate::entities::{transactions, wallets};

/// PostgreSQL SQLSTATE for `lock_not_available`, raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Error types for ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Insert hit the wallet primary key.
    #[error("Wallet already exists: {0}")]
    DuplicateWallet(WalletId),

    /// Waiting for a wallet row lock exceeded `lock_timeout`.
    #[error("Timed out waiting for wallet lock")]
    LockTimeout,

    /// A persisted row no longer fits the domain types.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if is_lock_timeout(&err) {
            Self::LockTimeout
        } else {
            Self::Database(err)
        }
    }
}

fn is_lock_timeout(err: &DbErr) -> bool {
    let (DbErr::Query(runtime) | DbErr::Exec(runtime) | DbErr::Conn(runtime)) = err else {
        return false;
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE)
        }
        _ => false,
    }
}

/// Storage operations for wallets and their transaction log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerStore;

impl LedgerStore {
    /// Reads a wallet without locking it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_wallet<C: ConnectionTrait>(
        conn: &C,
        id: &WalletId,
    ) -> Result<Option<Wallet>, StoreError> {
        wallets::Entity::find_by_id(id.as_str())
            .one(conn)
            .await?
            .map(into_wallet)
            .transpose()
    }

    /// Reads a wallet with `SELECT ... FOR UPDATE`.
    ///
    /// The row stays locked until the transaction `conn` belongs to commits
    /// or rolls back. Concurrent callers locking the same id block here.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` if a configured lock timeout expires, or a
    /// database error.
    pub async fn find_wallet_for_update<C: ConnectionTrait>(
        conn: &C,
        id: &WalletId,
    ) -> Result<Option<Wallet>, StoreError> {
        wallets::Entity::find_by_id(id.as_str())
            .lock_exclusive()
            .one(conn)
            .await?
            .map(into_wallet)
            .transpose()
    }

    /// Inserts a new wallet with a zero balance.
    ///
    /// The primary key decides whether the id is taken, so two racing
    /// creations cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateWallet` on a unique violation, or a database error.
    pub async fn insert_wallet<C: ConnectionTrait>(
        conn: &C,
        id: &WalletId,
        now: DateTime<Utc>,
    ) -> Result<Wallet, StoreError> {
        let wallet = Wallet {
            balance: to_money_scale(Decimal::ZERO),
            ..Wallet::new(id.clone(), now)
        };

        let model = wallets::ActiveModel {
            id: Set(wallet.id.as_str().to_owned()),
            balance: Set(wallet.balance),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        match wallets::Entity::insert(model)
            .exec_without_returning(conn)
            .await
        {
            Ok(_) => Ok(wallet),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::DuplicateWallet(id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sets a wallet's balance and `updated_at`.
    ///
    /// Only call this while holding the row lock for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or matches no row.
    pub async fn update_balance<C: ConnectionTrait>(
        conn: &C,
        id: &WalletId,
        new_balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = now.into();

        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Balance, Expr::value(new_balance))
            .col_expr(wallets::Column::UpdatedAt, Expr::value(updated_at))
            .filter(wallets::Column::Id.eq(id.as_str()))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::Database(DbErr::RecordNotUpdated));
        }

        Ok(())
    }

    /// Appends a transaction record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert_transaction<C: ConnectionTrait>(
        conn: &C,
        transaction: &LedgerTransaction,
    ) -> Result<(), StoreError> {
        let model = transactions::ActiveModel {
            id: Set(transaction.id.into_inner()),
            seq: NotSet,
            wallet_id: Set(transaction.wallet_id.as_str().to_owned()),
            operation_type: Set(transaction.operation_type.into()),
            amount: Set(transaction.amount),
            created_at: Set(transaction.created_at.into()),
        };

        transactions::Entity::insert(model)
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }

    /// Lists one page of a wallet's transactions in insertion order, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions<C: ConnectionTrait>(
        conn: &C,
        wallet_id: &WalletId,
        page: &PageRequest,
    ) -> Result<(Vec<LedgerTransaction>, u64), StoreError> {
        let page = page.normalized();
        let query = transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(wallet_id.as_str()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Seq);

        let total = query.clone().count(conn).await?;
        let rows = query
            .offset(page.offset())
            .limit(page.limit())
            .all(conn)
            .await?;

        let transactions = rows
            .into_iter()
            .map(into_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((transactions, total))
    }

    /// Reads a wallet's whole transaction log in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all_transactions<C: ConnectionTrait>(
        conn: &C,
        wallet_id: &WalletId,
    ) -> Result<Vec<LedgerTransaction>, StoreError> {
        transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(wallet_id.as_str()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Seq)
            .all(conn)
            .await?
            .into_iter()
            .map(into_transaction)
            .collect()
    }

    /// Bounds how long lock acquisition may wait in the current transaction.
    ///
    /// Uses `SET LOCAL`, so the setting ends with the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn set_lock_timeout<C: ConnectionTrait>(
        conn: &C,
        timeout: Duration,
    ) -> Result<(), StoreError> {
        conn.execute_unprepared(&lock_timeout_sql(timeout)).await?;
        Ok(())
    }
}

fn lock_timeout_sql(timeout: Duration) -> String {
    format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis())
}

fn into_wallet(model: wallets::Model) -> Result<Wallet, StoreError> {
    Ok(Wallet {
        id: parse_wallet_id(model.id)?,
        balance: to_money_scale(model.balance),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
    })
}

fn into_transaction(model: transactions::Model) -> Result<LedgerTransaction, StoreError> {
    Ok(LedgerTransaction {
        id: TransactionId::from_uuid(model.id),
        wallet_id: parse_wallet_id(model.wallet_id)?,
        operation_type: model.operation_type.into(),
        amount: to_money_scale(model.amount),
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn parse_wallet_id(raw: String) -> Result<WalletId, StoreError> {
    WalletId::parse(raw).map_err(|e| StoreError::InvalidRow(e.to_string()))
}
