use std::fmt;

use thiserror::Error;

use crate::outcome::FieldErrors;

/// Mutation that was refused because the account is in a locked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedAction {
    Update,
    Delete,
    DeleteAll,
}

impl fmt::Display for LockedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockedAction::Update => f.write_str("update"),
            LockedAction::Delete | LockedAction::DeleteAll => f.write_str("delete"),
        }
    }
}

/// Error types for the account administration service
#[derive(Error, Debug)]
pub enum AdminError {
    /// Referenced account or product does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Account state is 1001 or 1004
    #[error("you can't {action} account {} whose state is 1001 or 1004", .account_ids.join(","))]
    LockedState {
        action: LockedAction,
        account_ids: Vec<String>,
    },

    /// Payload violates field constraints
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A write or transaction failed and was rolled back
    #[error("persisting account {account_id} failed: {source}")]
    Persistence {
        account_id: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Error from a read against the store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AdminError {
    pub fn account_not_found(account_id: &str) -> Self {
        Self::NotFound {
            entity: "account",
            id: account_id.to_owned(),
        }
    }

    pub fn product_not_found(product_ids: &[String]) -> Self {
        Self::NotFound {
            entity: "product",
            id: product_ids.join(","),
        }
    }

    pub fn locked(action: LockedAction, account_ids: Vec<String>) -> Self {
        Self::LockedState {
            action,
            account_ids,
        }
    }
}

/// Type alias for Result with AdminError
pub type Result<T> = std::result::Result<T, AdminError>;
