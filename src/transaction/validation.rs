//! Field level checks for transaction input.
//!
//! These functions are pure, they only look at their argument.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{ValidationError, transaction::TransactionType};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Check that `amount` is strictly positive and return it unchanged.
///
/// # Errors
///
/// Returns [ValidationError::NonPositiveAmount] if `amount <= 0` and
/// [ValidationError::NonNumericAmount] if `amount` is NaN or infinite.
pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonNumericAmount(amount.to_string()));
    }

    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    Ok(amount)
}

/// Read a raw amount field as a number and check that it is positive.
///
/// # Errors
///
/// Returns [ValidationError::NonNumericAmount] if `text` is not a finite
/// number and [ValidationError::NonPositiveAmount] if it is not positive.
pub fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NonNumericAmount(text.to_owned()))?;

    validate_amount(amount)
}

/// Parse an ISO `YYYY-MM-DD` date that names a real calendar day.
///
/// # Errors
///
/// Returns [ValidationError::MalformedDate] if `text` is not exactly four
/// digits, a dash, two digits, a dash and two digits, and
/// [ValidationError::InvalidDate] if it is shaped correctly but the day does
/// not exist, e.g. `2025-13-01` or `2025-02-30`.
pub fn validate_date(text: &str) -> Result<Date, ValidationError> {
    if !has_iso_date_shape(text) {
        return Err(ValidationError::MalformedDate(text.to_owned()));
    }

    Date::parse(text, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// Whether `text` looks like `dddd-dd-dd`.
fn has_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();

    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Parse a transaction type, accepting exactly `Income` or `Expense`.
///
/// # Errors
///
/// Returns [ValidationError::InvalidType] for any other string, including
/// other capitalisations.
pub fn validate_type(text: &str) -> Result<TransactionType, ValidationError> {
    match text {
        "Income" => Ok(TransactionType::Income),
        "Expense" => Ok(TransactionType::Expense),
        other => Err(ValidationError::InvalidType(other.to_owned())),
    }
}

#[cfg(test)]
mod amount_tests {
    use crate::{
        ValidationError,
        transaction::{parse_amount, validate_amount},
    };

    #[test]
    fn positive_amounts_are_returned_unchanged() {
        for amount in [0.01, 1.0, 100.0, 1234.56, f64::MAX] {
            assert_eq!(validate_amount(amount), Ok(amount));
        }
    }

    #[test]
    fn non_positive_amounts_fail() {
        for amount in [0.0, -0.0, -0.01, -100.0, f64::MIN] {
            assert_eq!(
                validate_amount(amount),
                Err(ValidationError::NonPositiveAmount),
                "want {amount} to be rejected"
            );
        }
    }

    #[test]
    fn nan_and_infinity_are_not_numeric() {
        assert!(matches!(
            validate_amount(f64::NAN),
            Err(ValidationError::NonNumericAmount(_))
        ));
        assert!(matches!(
            validate_amount(f64::INFINITY),
            Err(ValidationError::NonNumericAmount(_))
        ));
    }

    #[test]
    fn parse_coerces_text() {
        assert_eq!(parse_amount("100"), Ok(100.0));
        assert_eq!(parse_amount(" 12.50 "), Ok(12.5));
    }

    #[test]
    fn parse_fails_on_text_that_is_not_a_number() {
        assert_eq!(
            parse_amount("twelve"),
            Err(ValidationError::NonNumericAmount("twelve".to_owned()))
        );
        assert_eq!(
            parse_amount(""),
            Err(ValidationError::NonNumericAmount("".to_owned()))
        );
    }

    #[test]
    fn parse_fails_on_negative_number() {
        assert_eq!(parse_amount("-5"), Err(ValidationError::NonPositiveAmount));
    }
}

#[cfg(test)]
mod date_tests {
    use time::macros::date;

    use crate::{ValidationError, transaction::validate_date};

    #[test]
    fn valid_date_passes() {
        assert_eq!(validate_date("2025-06-12"), Ok(date!(2025 - 06 - 12)));
    }

    #[test]
    fn leap_day_passes_in_leap_year() {
        assert_eq!(validate_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn impossible_days_fail_the_calendar_check() {
        for text in ["2025-13-01", "2025-02-30", "2025-00-10", "2025-06-00", "2023-02-29"] {
            assert_eq!(
                validate_date(text),
                Err(ValidationError::InvalidDate(text.to_owned())),
                "want {text} to be rejected"
            );
        }
    }

    #[test]
    fn badly_shaped_dates_fail_the_pattern_check() {
        for text in [
            "",
            "2025-6-12",
            "25-06-12",
            "2025/06/12",
            "2025-06-12 ",
            "2025-06-120",
            "12-06-2025",
            "2025-06-1a",
            "+025-06-12",
        ] {
            assert_eq!(
                validate_date(text),
                Err(ValidationError::MalformedDate(text.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }
}

#[cfg(test)]
mod type_tests {
    use crate::{
        ValidationError,
        transaction::{TransactionType, validate_type},
    };

    #[test]
    fn accepts_income_and_expense() {
        assert_eq!(validate_type("Income"), Ok(TransactionType::Income));
        assert_eq!(validate_type("Expense"), Ok(TransactionType::Expense));
    }

    #[test]
    fn rejects_everything_else() {
        for text in ["income", "EXPENSE", "Expenses", " Income", "", "Transfer"] {
            assert_eq!(
                validate_type(text),
                Err(ValidationError::InvalidType(text.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn from_str_uses_the_same_rules() {
        assert_eq!("Expense".parse(), Ok(TransactionType::Expense));
        assert!("expense".parse::<TransactionType>().is_err());
    }
}
