//! Entity re-exports.

pub use super::transactions::Entity as Transactions;
pub use super::wallets::Entity as Wallets;
