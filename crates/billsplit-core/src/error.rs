//! # Error Types
//!
//! Domain-specific error types for billsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billsplit-core errors (this file)                                     │
//! │  ├── CoreError        - Bill mutation failures                         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ImportError      - Rejected import payloads                       │
//! │                                                                         │
//! │  billsplit-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Host errors (in app)                                                  │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front end              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! An item whose consumption record does not add up (nobody selected, too
//! many units) is a normal editing state. It is reported through
//! [`crate::validation::is_item_valid`] and contributes nothing to totals.
//! None of the types below are raised for it.

use thiserror::Error;

use crate::types::SplitMode;

// =============================================================================
// Core Error
// =============================================================================

/// Bill mutation errors.
///
/// Raised when a caller asks for a change that cannot be applied to the
/// current bill state. The original state is always left untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Participant id does not exist in the bill.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// Line item id does not exist in the bill.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The operation only applies to items in a different split mode.
    ///
    /// ## When This Occurs
    /// - Ticking a participant on a UNIT item
    /// - Assigning unit counts on an EQUAL item
    #[error("Item {item_id} is split by {actual}, operation requires {expected}")]
    SplitModeMismatch {
        item_id: String,
        expected: SplitMode,
        actual: SplitMode,
    },

    /// The bill already holds the maximum number of participants.
    #[error("Bill cannot have more than {max} participants")]
    TooManyParticipants { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user or imported input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be a finite number (no NaN / Infinity).
    #[error("{field} must be a finite number")]
    MustBeFinite { field: String },

    /// Invalid format (e.g., a fractional unit count).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Import Error
// =============================================================================

/// Errors raised while parsing externally supplied bill data.
///
/// Imports are atomic: any of these rejects the whole payload, so a bill
/// never ends up holding half of an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not valid JSON.
    #[error("Invalid JSON format: {0}")]
    MalformedJson(String),

    /// The payload has no `items` array.
    #[error("Response is missing the required `items` array")]
    MissingItems,

    /// One of the items could not be read.
    #[error("Item {index} is invalid: {reason}")]
    InvalidItem { index: usize, reason: String },

    /// A bill-level field (tax, discount) could not be read.
    #[error("Invalid bill field: {0}")]
    InvalidField(#[from] ValidationError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with ImportError.
pub type ImportResult<T> = Result<T, ImportError>;

// =============================================================================
// Unit Tests
// =============================================================================
