//! Defines the crate level error types and the conversion from SQLite errors.

/// Input that breaks a rule of the domain.
///
/// These errors are always recoverable: the caller should correct the input
/// and try again.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The amount was zero or negative.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// The amount could not be read as a finite number.
    #[error("amount must be numeric")]
    NonNumericAmount(String),

    /// The date string is not shaped like `YYYY-MM-DD`.
    #[error("date must be in YYYY-MM-DD format, got \"{0}\"")]
    MalformedDate(String),

    /// The date string is shaped correctly but does not name a real calendar day,
    /// e.g. `2025-02-30`.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// The transaction type was not exactly `Income` or `Expense`.
    #[error("type must be Income or Expense, got \"{0}\"")]
    InvalidType(String),

    /// The category is not in the category registry.
    #[error("invalid category \"{0}\"")]
    UnknownCategory(String),

    /// Admitting the expense would push the month's spending over its budget.
    #[error("budget exceeded for {category}: {limit:.2} allowed, {total:.2} would be spent")]
    BudgetExceeded {
        /// The category the budget applies to.
        category: String,
        /// The configured budget for the month.
        limit: f64,
        /// The spending so far plus the rejected amount.
        total: f64,
    },

    /// A budget was set to zero or a negative amount.
    #[error("budget amount must be positive")]
    NonPositiveBudget,
}

/// The storage medium could not complete an operation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StorageError {
    /// A lookup by ID did not match any row.
    #[error("the requested record could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

/// The errors that may occur in the finance ledger.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The input was malformed or violated a rule, see [ValidationError].
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database failed, see [StorageError].
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Whether the error can be fixed by correcting the input and retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound.into(),
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                StorageError::Sql(error).into()
            }
        }
    }
}

/// Whether `error` was raised by a `CHECK` constraint in the schema.
pub(crate) fn is_check_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
            },
            _,
        )
    )
}

#[cfg(test)]
mod tests {
    use crate::{Error, StorageError, ValidationError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::Storage(StorageError::NotFound));
        assert!(!error.is_validation());
    }

    #[test]
    fn budget_exceeded_reports_limit_and_total() {
        let error = ValidationError::BudgetExceeded {
            category: "Food".to_owned(),
            limit: 50.0,
            total: 60.0,
        };

        assert_eq!(
            error.to_string(),
            "budget exceeded for Food: 50.00 allowed, 60.00 would be spent"
        );
    }

    #[test]
    fn validation_errors_are_recoverable() {
        let error: Error = ValidationError::NonPositiveAmount.into();

        assert!(error.is_validation());
        assert_eq!(error.to_string(), "amount must be positive");
    }
}
