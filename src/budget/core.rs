//! Defines the budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, ValidationError, database_id::BudgetId, error::is_check_violation};

/// A monthly spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category the limit applies to.
    pub category: String,
    /// The most that may be spent in the category during `month`.
    pub amount: f64,
    /// The month the limit applies to, formatted as `YYYY-MM`.
    pub month: String,
}

/// Create or replace the budget for `category` in `month`.
///
/// There is at most one budget per category and month, so setting a budget
/// that already exists overwrites its amount and keeps its ID.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::NonPositiveBudget] if `amount` breaks the table's `CHECK` constraint,
/// - or [crate::StorageError::Sql] if there is some other SQL error.
pub fn upsert_budget(
    category: &str,
    amount: f64,
    month: &str,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (category, amount, month)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(category, month) DO UPDATE SET
                 amount = excluded.amount
             RETURNING id, category, amount, month",
        )?
        .query_row((category, amount, month), map_budget_row)
        .map_err(|error| {
            if is_check_violation(&error) {
                Error::from(ValidationError::NonPositiveBudget)
            } else {
                Error::from(error)
            }
        })?;

    tracing::debug!(
        "Stored budget {} for {} in {}",
        budget.amount,
        budget.category,
        budget.month
    );

    Ok(budget)
}

/// The budget amount for `category` in `month`, or `None` if no budget is set.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn get_budget(category: &str, month: &str, connection: &Connection) -> Result<Option<f64>, Error> {
    let result = connection
        .prepare("SELECT amount FROM budget WHERE category = ?1 AND month = ?2")?
        .query_row((category, month), |row| row.get(0));

    match result {
        Ok(amount) => Ok(Some(amount)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// The number of budget rows stored for `category` in `month`.
///
/// The schema allows at most one, so this is either zero or one.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn count_budgets(category: &str, month: &str, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM budget WHERE category = ?1 AND month = ?2",
            (category, month),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                month TEXT NOT NULL,
                UNIQUE(category, month)
                )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        month: row.get(3)?,
    })
}
