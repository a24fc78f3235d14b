//! Implements the handle that callers use to work with the finance ledger.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, StorageError,
    budget::{self, Budget, month_key},
    category::CategoryRegistry,
    db::initialize,
    database_id::TransactionId,
    transaction::{
        NewTransaction, Summary, Transaction, TransactionType, create_transaction,
        delete_transaction, get_category_spending, get_summary, get_transaction,
        get_transactions, validate_amount,
    },
};

/// A database connection paired with the category registry used to admit
/// transactions into it.
///
/// The connection is opened once when the ledger is created and closed when
/// the ledger is dropped. Every operation locks the connection for its
/// duration, so a ledger shared between threads (e.g. in an `Arc`) handles
/// one caller at a time.
///
/// The category registry belongs to this ledger alone and starts from the
/// defaults every time a ledger is created.
#[derive(Debug)]
pub struct Ledger {
    db_connection: Mutex<Connection>,
    categories: CategoryRegistry,
}

impl Ledger {
    /// Create a ledger over an open SQLite connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Mutex::new(db_connection),
            categories: CategoryRegistry::new(),
        })
    }

    /// Open, or create, the SQLite database at `path`.
    ///
    /// # Errors
    /// Returns a [StorageError] if the file cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let connection = Connection::open(path)?;
        tracing::debug!("Opened database at {}", path.display());

        Self::new(connection)
    }

    /// Create a ledger backed by a private in-memory database.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    /// The categories transactions may currently be filed under.
    pub fn categories(&self) -> &[String] {
        self.categories.categories()
    }

    /// Register a new category for the lifetime of this ledger.
    ///
    /// Empty and duplicate names are ignored.
    pub fn add_category(&mut self, category: &str) {
        self.categories.add(category);
    }

    /// Admit a new transaction and store it.
    ///
    /// The category must be registered and the amount positive. Expenses are
    /// checked against the budget for the month of the transaction's date.
    /// The budget check and the insert happen inside one database
    /// transaction while the connection is locked, so two expenses cannot
    /// both be admitted against the same remaining budget.
    ///
    /// # Errors
    /// This function will return a:
    /// - [crate::ValidationError::UnknownCategory] if the category is not registered,
    /// - [crate::ValidationError::NonPositiveAmount] if the amount is not positive,
    /// - [crate::ValidationError::BudgetExceeded] if the expense would exceed the budget,
    /// - or [StorageError] if the database fails.
    pub fn record_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        self.categories.validate(&new_transaction.category)?;
        validate_amount(new_transaction.amount)?;

        let connection = self.connection()?;
        let sql_transaction =
            SqlTransaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;

        if new_transaction.kind == TransactionType::Expense {
            budget::check_budget(
                &new_transaction.category,
                new_transaction.amount,
                Some(&month_key(new_transaction.date)),
                &sql_transaction,
            )?;
        }

        let transaction = create_transaction(new_transaction, &sql_transaction)?;
        sql_transaction.commit()?;

        tracing::info!("Recorded transaction {transaction}");

        Ok(transaction)
    }

    /// Retrieve a stored transaction by its `id`.
    ///
    /// # Errors
    /// Returns [StorageError::NotFound] if there is no transaction with `id`.
    pub fn transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        get_transaction(id, &*self.connection()?)
    }

    /// Up to `limit` transactions, most recent date first.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database fails.
    pub fn transactions(&self, limit: u32) -> Result<Vec<Transaction>, Error> {
        get_transactions(limit, &*self.connection()?)
    }

    /// Delete the transaction with `id`.
    ///
    /// Returns `false` if there was no such transaction, in which case nothing
    /// changed.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database fails.
    pub fn remove_transaction(&self, id: TransactionId) -> Result<bool, Error> {
        let rows_affected = delete_transaction(id, &*self.connection()?)?;

        if rows_affected == 0 {
            tracing::info!("No transaction with ID {id} to delete");
        } else {
            tracing::info!("Deleted transaction {id}");
        }

        Ok(rows_affected > 0)
    }

    /// Set the spending limit for `category` in `month` (`YYYY-MM`).
    ///
    /// # Errors
    /// Returns [crate::ValidationError::NonPositiveBudget] if `amount` is not
    /// positive, or a [StorageError] if the database fails.
    pub fn set_budget(&self, category: &str, amount: f64, month: &str) -> Result<Budget, Error> {
        budget::set_budget(category, amount, month, &*self.connection()?)
    }

    /// The spending limit for `category` in `month`, if one is set.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database fails.
    pub fn budget(&self, category: &str, month: &str) -> Result<Option<f64>, Error> {
        budget::get_budget(category, month, &*self.connection()?)
    }

    /// Check whether spending `amount` more in `category` would stay within
    /// budget, without storing anything.
    ///
    /// `month` defaults to the current month.
    ///
    /// # Errors
    /// Returns [crate::ValidationError::BudgetExceeded] if it would not, or a
    /// [StorageError] if the database fails.
    pub fn check_budget(&self, category: &str, amount: f64, month: Option<&str>) -> Result<(), Error> {
        budget::check_budget(category, amount, month, &*self.connection()?)
    }

    /// The total spent in `category` during `month`.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database fails.
    pub fn category_spending(&self, category: &str, month: &str) -> Result<f64, Error> {
        get_category_spending(category, month, &*self.connection()?)
    }

    /// Total income and expenses for `month`.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database fails.
    pub fn summary(&self, month: &str) -> Result<Summary, Error> {
        get_summary(month, &*self.connection()?)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .map_err(|_| StorageError::DatabaseLock.into())
    }
}
