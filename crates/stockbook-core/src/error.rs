//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError         - Voucher draft operation failures              │
//! │  ├── ValidationError   - One invalid field                             │
//! │  └── ValidationReport  - Every invalid field, one message              │
//! │                                                                         │
//! │  stockbook-client errors (separate crate)                              │
//! │  └── ClientError       - Config, HTTP and backend failures             │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationReport → ClientError → CLI / UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing rule itself never fails; only draft operations and the
//! pre-submission validation pass produce errors.

use std::fmt;

use thiserror::Error;

use crate::types::EntryStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Errors from operations on a voucher draft.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No entry with this id in the draft.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The entry is in a state that does not allow the operation.
    ///
    /// ## When This Occurs
    /// - Voiding an entry that is already voided
    /// - Unvoiding an entry that is active
    /// - Editing a voided entry
    #[error("Entry {entry_id} is {status}, cannot {operation}")]
    InvalidEntryStatus {
        entry_id: String,
        status: EntryStatus,
        operation: &'static str,
    },

    /// The draft has reached its entry cap.
    #[error("Voucher cannot have more than {max} entries")]
    VoucherTooLarge { max: usize },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is the label the user sees, e.g. `"line 2 rate"`.
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

    /// Value must be greater than zero.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Discounts exceed the line amount.
    #[error("{field} is negative after discounts")]
    NegativeTotal { field: String },

    /// Amounts too large to compute.
    #[error("{field} is too large to calculate")]
    Overflow { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two lines sharing one entry id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Validation Report
// =============================================================================

/// Every problem found by a validation pass, reported as one message.
///
/// The form shows [`ValidationReport`]'s `Display` in a single snackbar
/// instead of failing on the first bad field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        ValidationReport::default()
    }

    /// Records a problem.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records the error of a single-field check, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// `Ok(())` when nothing was recorded, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "No validation errors"),
            [only] => write!(f, "Please fix: {}", only),
            many => {
                write!(f, "Please fix {} problems: ", many.len())?;
                for (i, e) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationReport {}

impl From<ValidationError> for ValidationReport {
    fn from(error: ValidationError) -> Self {
        ValidationReport {
            errors: vec![error],
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidEntryStatus {
            entry_id: "e-1".to_string(),
            status: EntryStatus::Voided,
            operation: "void",
        };
        assert_eq!(err.to_string(), "Entry e-1 is voided, cannot void");

        let err = CoreError::VoucherTooLarge { max: 200 };
        assert_eq!(err.to_string(), "Voucher cannot have more than 200 entries");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "party".to_string(),
        };
        assert_eq!(err.to_string(), "party is required");

        let err = ValidationError::OutOfRange {
            field: "line 1 GST %".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "line 1 GST % must be between 0 and 100");
    }

    #[test]
    fn test_duplicate_message() {
        let err = ValidationError::Duplicate {
            field: "line 2 id".to_string(),
            value: "e-1".to_string(),
        };
        assert_eq!(err.to_string(), "line 2 id 'e-1' already exists");
    }

    #[test]
    fn test_report_aggregates_into_one_message() {
        let mut report = ValidationReport::new();
        report.push(ValidationError::Required {
            field: "party".to_string(),
        });
        report.check(Err(ValidationError::Negative {
            field: "line 1 rate".to_string(),
        }));
        report.check(Ok(()));

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.to_string(),
            "Please fix 2 problems: party is required; line 1 rate must not be negative"
        );
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_report_single_and_empty() {
        let report = ValidationReport::from(ValidationError::Required {
            field: "date".to_string(),
        });
        assert_eq!(report.to_string(), "Please fix: date is required");
        assert!(ValidationReport::new().into_result().is_ok());
    }
}
