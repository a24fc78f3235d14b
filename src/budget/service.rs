//! Budget rules: setting limits and checking expenses against them.
//!
//! [check_budget] is a precondition the caller runs before storing an
//! expense. It does not store anything itself, so a check followed by a
//! separate insert can race with another writer doing the same.
//! [Ledger::record_transaction](crate::Ledger::record_transaction) runs the
//! check and the insert in one database transaction instead.

use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    Error, ValidationError,
    budget::{Budget, get_budget, upsert_budget},
    transaction::get_category_spending,
};

/// Set the spending limit for `category` in `month` (`YYYY-MM`).
///
/// # Errors
/// This function will return a:
/// - [ValidationError::NonPositiveBudget] if `amount` is not greater than zero,
/// - or [crate::StorageError::Sql] if there is some SQL error.
pub fn set_budget(
    category: &str,
    amount: f64,
    month: &str,
    connection: &Connection,
) -> Result<Budget, Error> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(ValidationError::NonPositiveBudget.into());
    }

    let budget = upsert_budget(category, amount, month, connection)?;
    tracing::info!("Set budget for {category} in {month} to {amount:.2}");

    Ok(budget)
}

/// Check that spending `amount` more in `category` stays within its budget.
///
/// `month` defaults to [current_month]. When no budget is set for the
/// category and month the check always passes.
///
/// Nothing is stored, so calling this and then [crate::transaction::create_transaction]
/// on a shared database can admit expenses that together exceed the budget.
/// [crate::Ledger::record_transaction] runs both inside one database transaction.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::BudgetExceeded] if the month's spending plus `amount` is more than the budget,
/// - or [crate::StorageError::Sql] if there is some SQL error.
pub fn check_budget(
    category: &str,
    amount: f64,
    month: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let month = match month {
        Some(month) => month.to_owned(),
        None => current_month(),
    };

    let Some(limit) = get_budget(category, &month, connection)? else {
        return Ok(());
    };

    let spent = get_category_spending(category, &month, connection)?;
    let total = spent + amount;

    if total > limit {
        tracing::warn!("Rejected {amount:.2} for {category} in {month}: {total:.2} > {limit:.2}");
        return Err(ValidationError::BudgetExceeded {
            category: category.to_owned(),
            limit,
            total,
        }
        .into());
    }

    Ok(())
}

/// The current local month as `YYYY-MM`.
///
/// Falls back to UTC if the local offset cannot be determined.
pub fn current_month() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

    month_key(now.date())
}

/// The month `date` falls in, formatted as `YYYY-MM`.
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}
