//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, ValidationError,
    database_id::TransactionId,
    error::is_check_violation,
    transaction::validation::{parse_amount, validate_date, validate_type},
};

/// The number of transactions returned by a listing when the caller does not
/// ask for a specific amount.
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 50;

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent. Expenses count towards budgets.
    Expense,
}

impl TransactionType {
    /// The name stored in the database and shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_type(s)
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or expense that has been stored in the database.
///
/// To create a new `Transaction`, use [Transaction::build] or
/// [NewTransaction::from_fields] and then [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// The name of the category the transaction is filed under.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability. The fields are taken
    /// as given, use [NewTransaction::from_fields] to validate raw user input.
    pub fn build(amount: f64, category: &str, date: Date, kind: TransactionType) -> NewTransaction {
        NewTransaction {
            amount,
            category: category.to_owned(),
            date,
            kind,
        }
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, {}: {:.2}, {}, {}",
            self.id, self.kind, self.amount, self.category, self.date
        )
    }
}

/// A transaction that has not been stored yet.
///
/// Storage trusts these fields, so a `NewTransaction` built from user input
/// should come from [NewTransaction::from_fields].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned, must be positive.
    pub amount: f64,
    /// The category name. Membership in the category registry is checked at
    /// admission, not here.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
}

impl NewTransaction {
    /// Validate the raw form fields of a transaction.
    ///
    /// # Errors
    ///
    /// Returns the [ValidationError] of the first field that fails, checked
    /// in the order amount, date, type.
    pub fn from_fields(
        amount: &str,
        category: &str,
        date: &str,
        kind: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            category: category.to_owned(),
            date: validate_date(date)?,
            kind: validate_type(kind)?,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store a new transaction and return it with its generated ID.
///
/// The fields are not validated, callers are expected to validate first.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::NonPositiveAmount] if the amount breaks the table's `CHECK` constraint,
/// - or [crate::StorageError::Sql] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, category, date, type)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, category, date, type",
        )?
        .query_row(
            (
                new_transaction.amount,
                &new_transaction.category,
                new_transaction.date,
                new_transaction.kind,
            ),
            map_transaction_row,
        )
        .map_err(|error| {
            if is_check_violation(&error) {
                Error::from(ValidationError::NonPositiveAmount)
            } else {
                Error::from(error)
            }
        })?;

    tracing::debug!("Stored transaction {}", transaction);

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [crate::StorageError::NotFound] if `id` does not refer to a stored transaction,
/// - or [crate::StorageError::Sql] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare("SELECT id, amount, category, date, type FROM \"transaction\" WHERE id = :id")?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve up to `limit` transactions, most recent date first.
///
/// Transactions on the same date are ordered by most recently inserted first.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn get_transactions(limit: u32, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, category, date, type FROM \"transaction\"
             ORDER BY date DESC, id DESC
             LIMIT :limit",
        )?
        .query_map(&[(":limit", &limit)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// The number of rows changed by a statement.
pub type RowsAffected = usize;

/// Delete the transaction with `id`.
///
/// Deleting an ID that does not exist is not an error, it affects zero rows.
/// Callers that need to report whether something was deleted should check
/// the returned row count.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    tracing::debug!("Deleted {rows_affected} transaction(s) with ID {id}");

    Ok(rows_affected)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('Income', 'Expense'))
                )",
        (),
    )?;

    // Used by the monthly spending and summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category = row.get(2)?;
    let date = row.get(3)?;
    let kind = row.get(4)?;

    Ok(Transaction {
        id,
        amount,
        category,
        date,
        kind,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use time::macros::date;

    use crate::{
        ValidationError,
        transaction::{NewTransaction, Transaction, TransactionType},
    };

    #[test]
    fn from_fields_succeeds_on_valid_input() {
        let got = NewTransaction::from_fields("100", "Food", "2025-06-12", "Expense");

        assert_eq!(
            got,
            Ok(Transaction::build(
                100.0,
                "Food",
                date!(2025 - 06 - 12),
                TransactionType::Expense
            ))
        );
    }

    #[test]
    fn from_fields_fails_on_negative_amount() {
        let got = NewTransaction::from_fields("-100", "Food", "2025-06-12", "Expense");

        assert_eq!(got, Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn from_fields_fails_on_invalid_month() {
        let got = NewTransaction::from_fields("100", "Food", "2025-13-01", "Expense");

        assert_eq!(got, Err(ValidationError::InvalidDate("2025-13-01".to_owned())));
    }

    #[test]
    fn from_fields_fails_on_unknown_type() {
        let got = NewTransaction::from_fields("100", "Food", "2025-06-12", "Refund");

        assert_eq!(got, Err(ValidationError::InvalidType("Refund".to_owned())));
    }

    #[test]
    fn display_matches_listing_format() {
        let transaction = Transaction {
            id: 7,
            amount: 12.5,
            category: "Food".to_owned(),
            date: date!(2025 - 06 - 01),
            kind: TransactionType::Expense,
        };

        assert_eq!(
            transaction.to_string(),
            "ID: 7, Expense: 12.50, Food, 2025-06-01"
        );
    }

    #[test]
    fn serializes_kind_as_type() {
        let transaction = Transaction {
            id: 1,
            amount: 1000.0,
            category: "Salary".to_owned(),
            date: date!(2025 - 06 - 01),
            kind: TransactionType::Income,
        };

        let json = serde_json::to_value(&transaction).expect("Could not serialize transaction");

        assert_eq!(json["type"], "Income");
        assert_eq!(json["category"], "Salary");
    }
}
