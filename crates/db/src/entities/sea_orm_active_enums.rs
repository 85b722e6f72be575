//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::wallet::OperationType as DomainOperationType;

/// `operation_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operation_type")]
pub enum OperationType {
    /// Balance increase.
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    /// Balance decrease.
    #[sea_orm(string_value = "WITHDRAW")]
    Withdraw,
}

impl From<DomainOperationType> for OperationType {
    fn from(value: DomainOperationType) -> Self {
        match value {
            DomainOperationType::Deposit => Self::Deposit,
            DomainOperationType::Withdraw => Self::Withdraw,
        }
    }
}

impl From<OperationType> for DomainOperationType {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Deposit => Self::Deposit,
            OperationType::Withdraw => Self::Withdraw,
        }
    }
}
