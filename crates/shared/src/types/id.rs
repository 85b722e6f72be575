//! Typed IDs for type-safe entity references.
//!
//! Wallet ids are chosen by the caller; transaction ids are generated here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a wallet id, matching the width of the persisted column.
pub const MAX_WALLET_ID_LEN: usize = 36;

/// Unique identifier for a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    /// Creates a new random ID (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Why a wallet id was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletIdError {
    /// The id was the empty string.
    #[error("Wallet id must not be empty")]
    Empty,
    /// The id is longer than the column allows.
    #[error("Wallet id must be at most {MAX_WALLET_ID_LEN} characters, got {0}")]
    TooLong(usize),
}

/// Caller-supplied wallet identifier. Opaque and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletId(String);

impl WalletId {
    /// Validates and wraps a wallet id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than [`MAX_WALLET_ID_LEN`].
    pub fn parse(raw: impl Into<String>) -> Result<Self, WalletIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(WalletIdError::Empty);
        }
        let len = raw.chars().count();
        if len > MAX_WALLET_ID_LEN {
            return Err(WalletIdError::TooLong(len));
        }
        Ok(Self(raw))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for WalletId {
    type Error = WalletIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletId> for String {
    fn from(id: WalletId) -> Self {
        id.0
    }
}

impl AsRef<str> for WalletId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for WalletId {
    type Err = WalletIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
