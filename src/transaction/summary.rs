//! Monthly totals over stored transactions.
//!
//! Months are matched textually: a transaction belongs to `month` when the
//! first seven characters of its ISO date equal `month`. A malformed month,
//! e.g. `"2025-6"`, matches nothing rather than raising an error.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionType};

/// Income and expense totals for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income in the month.
    pub income: f64,
    /// The sum of all expenses in the month.
    pub expense: f64,
}

/// The total spent in `category` during `month` (`YYYY-MM`).
///
/// Returns zero when there are no matching expenses.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn get_category_spending(
    category: &str,
    month: &str,
    connection: &Connection,
) -> Result<f64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
             WHERE category = :category
               AND type = :type
               AND substr(date, 1, 7) = :month",
        )?
        .query_row(
            rusqlite::named_params! {
                ":category": category,
                ":type": TransactionType::Expense,
                ":month": month,
            },
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Total income and expenses in `month` (`YYYY-MM`).
///
/// A type with no transactions in the month reports zero.
///
/// # Errors
/// This function will return a [crate::StorageError::Sql] if there is some SQL error.
pub fn get_summary(month: &str, connection: &Connection) -> Result<Summary, Error> {
    let mut summary = Summary::default();

    let mut statement = connection.prepare(
        "SELECT type, SUM(amount) FROM \"transaction\"
         WHERE substr(date, 1, 7) = :month
         GROUP BY type",
    )?;
    let totals = statement.query_map(&[(":month", &month)], |row| {
        Ok((row.get::<_, TransactionType>(0)?, row.get::<_, f64>(1)?))
    })?;

    for total in totals {
        match total? {
            (TransactionType::Income, amount) => summary.income = amount,
            (TransactionType::Expense, amount) => summary.expense = amount,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{
            Summary, Transaction, TransactionType, create_transaction, get_category_spending,
            get_summary,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert(amount: f64, category: &str, date: time::Date, kind: TransactionType, conn: &Connection) {
        create_transaction(Transaction::build(amount, category, date, kind), conn)
            .expect("Could not create transaction");
    }

    #[test]
    fn summary_sums_income_and_expenses() {
        let conn = get_test_connection();
        insert(1000.0, "Salary", date!(2025 - 06 - 01), TransactionType::Income, &conn);
        insert(300.0, "Food", date!(2025 - 06 - 02), TransactionType::Expense, &conn);

        let summary = get_summary("2025-06", &conn);

        assert_eq!(
            summary,
            Ok(Summary {
                income: 1000.0,
                expense: 300.0
            })
        );
    }

    #[test]
    fn summary_of_empty_month_is_zero() {
        let conn = get_test_connection();
        insert(1000.0, "Salary", date!(2025 - 06 - 01), TransactionType::Income, &conn);

        let summary = get_summary("2025-07", &conn);

        assert_eq!(
            summary,
            Ok(Summary {
                income: 0.0,
                expense: 0.0
            })
        );
    }

    #[test]
    fn summary_reports_zero_for_missing_type() {
        let conn = get_test_connection();
        insert(40.0, "Food", date!(2025 - 06 - 03), TransactionType::Expense, &conn);
        insert(2.5, "Food", date!(2025 - 06 - 30), TransactionType::Expense, &conn);

        let summary = get_summary("2025-06", &conn);

        assert_eq!(
            summary,
            Ok(Summary {
                income: 0.0,
                expense: 42.5
            })
        );
    }

    #[test]
    fn summary_excludes_neighbouring_months() {
        let conn = get_test_connection();
        insert(10.0, "Food", date!(2025 - 05 - 31), TransactionType::Expense, &conn);
        insert(20.0, "Food", date!(2025 - 06 - 15), TransactionType::Expense, &conn);
        insert(30.0, "Food", date!(2025 - 07 - 01), TransactionType::Expense, &conn);
        insert(40.0, "Food", date!(2024 - 06 - 15), TransactionType::Expense, &conn);

        let summary = get_summary("2025-06", &conn).expect("Could not get summary");

        assert_eq!(summary.expense, 20.0);
    }

    #[test]
    fn spending_only_counts_expenses_in_category_and_month() {
        let conn = get_test_connection();
        insert(30.0, "Food", date!(2025 - 06 - 01), TransactionType::Expense, &conn);
        insert(12.0, "Food", date!(2025 - 06 - 28), TransactionType::Expense, &conn);
        insert(500.0, "Food", date!(2025 - 06 - 10), TransactionType::Income, &conn);
        insert(99.0, "Travel", date!(2025 - 06 - 10), TransactionType::Expense, &conn);
        insert(77.0, "Food", date!(2025 - 07 - 01), TransactionType::Expense, &conn);

        let spent = get_category_spending("Food", "2025-06", &conn);

        assert_eq!(spent, Ok(42.0));
    }

    #[test]
    fn spending_is_zero_without_matching_rows() {
        let conn = get_test_connection();

        let spent = get_category_spending("Food", "2025-06", &conn);

        assert_eq!(spent, Ok(0.0));
    }

    #[test]
    fn malformed_month_matches_nothing() {
        let conn = get_test_connection();
        insert(30.0, "Food", date!(2025 - 06 - 01), TransactionType::Expense, &conn);

        assert_eq!(get_category_spending("Food", "2025-6", &conn), Ok(0.0));
        assert_eq!(get_category_spending("Food", "2025", &conn), Ok(0.0));
        assert_eq!(get_summary("June", &conn), Ok(Summary::default()));
    }
}
