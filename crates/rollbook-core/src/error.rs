//! Roster error handling
//!
//! Field-level validation failures and roster operation failures.
//! Storage failures live in [`crate::storage::StorageError`].

use thiserror::Error;

/// A field value outside its allowed domain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name was empty
    #[error("Name cannot be empty")]
    EmptyName,

    /// Name spans more than one line
    #[error("Name cannot contain line breaks")]
    MultiLineName,

    /// Roll number below zero
    #[error("Roll number cannot be negative (got {0})")]
    NegativeRollNumber(i64),

    /// Marks outside [0, 100] (or NaN)
    #[error("Marks must be between 0 and 100 (got {0})")]
    MarksOutOfRange(f64),
}

/// Errors returned by roster operations
///
/// A failed operation leaves the roster exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    /// A field failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Roll number collision on add
    #[error("Student with roll number {roll_number} already exists")]
    DuplicateKey { roll_number: i64 },

    /// Operation targets a roll number that is not in the roster
    #[error("Student with roll number {roll_number} not found")]
    NotFound { roll_number: i64 },

    /// Aggregate requested on an empty roster
    #[error("No students in the roster")]
    EmptyCollection,
}

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
