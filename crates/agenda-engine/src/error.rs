//! Error types for agenda-engine operations.

use thiserror::Error;

use crate::position::EntryPosition;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    /// A position that needs a concrete entry date was given none.
    #[error("Entry date is required at position {position}")]
    MissingEntryDate { position: EntryPosition },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, AgendaError>;
