//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::{MAX_WALLET_ID_LEN, TransactionId, WalletId, WalletIdError};
pub use money::{MONEY_SCALE, to_money_scale};
pub use pagination::{PageMeta, PageRequest, PageResponse};
