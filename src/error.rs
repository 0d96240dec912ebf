//! Error types for the contract scheduling engine.

use crate::contract::{Contract, ContractId, TechnicianId};
use crate::schedule::dates::ShortDateFormat;

/// Top-level error type for the scheduling engine.
#[derive(Debug, thiserror::Error)]
pub enum FieldVisitError {
    /// Bad user input, rejected before any mutation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backing store failure, surfaced verbatim.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Ownership transfer failed, possibly half-way through.
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Reminder state persistence error.
    #[error("reminder error: {0}")]
    Reminder(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A short date string that does not match the expected representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid {format} date")]
pub struct DateParseError {
    /// The rejected input, untrimmed.
    pub input: String,
    /// The representation the caller asked for.
    pub format: ShortDateFormat,
}

/// User input rejected at the mutation boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} is required")]
    EmptyField(&'static str),

    /// Visits per year did not parse as an integer.
    #[error("visits per year must be a number, got '{0}'")]
    VisitsNotANumber(String),

    /// Visits per year parsed but falls outside `[1, 99]`.
    #[error("visits per year must be between 1 and 99, got {0}")]
    VisitsOutOfRange(i64),

    /// A manually entered date did not match the expected format.
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),

    /// Source and destination owner are the same technician.
    #[error("contract already belongs to {0}")]
    SameOwner(TechnicianId),
}

/// Backing store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Generic backend failure (network, quota, injected fault).
    #[error("backend failure: {0}")]
    Backend(String),

    /// No such contract in the owner's collection.
    #[error("contract {id} not found for {owner}")]
    NotFound {
        /// Collection that was searched.
        owner: TechnicianId,
        /// Missing contract id.
        id: ContractId,
    },

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Internal lock poisoned.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Step of an ownership transfer that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    /// Removing from the source collection failed; nothing moved.
    Delete,
    /// Source removal succeeded but the insert into the destination failed.
    /// The contract is now in neither collection.
    InsertAfterDelete,
    /// Single-step reassignment failed; nothing moved.
    Reassign,
}

impl std::fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => f.write_str("delete"),
            Self::InsertAfterDelete => f.write_str("insert-after-delete"),
            Self::Reassign => f.write_str("reassign"),
        }
    }
}

/// Ownership transfer failure.
///
/// Carries the contract as it was before the move so an operator can
/// re-insert it into the original owner after a partial failure.
#[derive(Debug, thiserror::Error)]
#[error("moving contract {} from {from} to {to} failed during {phase}: {source}", .contract.id)]
pub struct TransferError {
    /// Step that failed.
    pub phase: TransferPhase,
    /// Snapshot of the contract before the move started.
    pub contract: Contract,
    /// Original owner.
    pub from: TechnicianId,
    /// Intended owner.
    pub to: TechnicianId,
    /// Underlying store failure.
    #[source]
    pub source: StoreError,
}

impl TransferError {
    /// Returns `true` when the contract was removed from its source but never
    /// landed in the destination.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.phase == TransferPhase::InsertAfterDelete
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FieldVisitError>;
