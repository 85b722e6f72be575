//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All wallet types, validation rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `wallet` - Wallet balances, operations, and the append-only transaction log

pub mod wallet;
