//! Core error types for cadence-core.
//!
//! This module defines the error hierarchy using thiserror. Validation and
//! business-rule failures are detected before any write; persistence and
//! notification failures leave the store in a state that is safe to retry.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input (cycle references, timestamps, program dates)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A domain rule rejected the operation
    #[error("Business rule violation: {0}")]
    BusinessRule(#[from] BusinessRuleError),

    /// A referenced entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Outbound notification errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl CoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Cycle references must look like "2025-01"
    #[error("cycle reference '{input}' must use the YYYY-MM format")]
    InvalidCycleReference { input: String },

    /// Timestamp text that is neither RFC 3339 nor a plain local datetime
    #[error("unrecognized timestamp '{0}'")]
    UnparsableTimestamp(String),

    /// Program end date at or before its start date
    #[error("program end date must be after its start date")]
    ProgramDatesInverted,
}

/// Business-rule violations.
#[derive(Error, Debug)]
pub enum BusinessRuleError {
    #[error("activity date cannot be in the future")]
    FutureActivityDate,

    #[error("activity date is outside the program date range")]
    OutsideProgramWindow,

    /// One activity per user/program/calendar day
    #[error("an activity is already registered for this user on {day}")]
    DuplicateActivityForDay { day: NaiveDate },

    /// A channel bound to more than one program cannot receive activities
    /// without an explicit program choice.
    #[error("{count} programs are linked to channel '{channel}'; cannot determine which one to use")]
    AmbiguousChannel { channel: String, count: usize },

    /// Activities may only be removed while their month is still editable
    #[error("activities can only be removed within the current or previous month")]
    EditWindowClosed,

    #[error("{entity} already exists with {field} '{value}'")]
    DuplicateEntity {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Notification-delivery errors.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// The chat API answered but refused the message
    #[error("chat API rejected the message: {0}")]
    Rejected(String),

    /// The message never reached the chat API
    #[error("failed to deliver notification to '{channel}': {message}")]
    DeliveryFailed { channel: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
