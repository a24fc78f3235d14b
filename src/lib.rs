//! A ledger for personal finances.
//!
//! Records income and expenses in a SQLite database, enforces monthly
//! per-category budgets, and reports monthly totals.
//!
//! Most callers should go through [Ledger], which owns the database
//! connection and the [CategoryRegistry] and admits transactions atomically.
//! The free functions in [transaction] and [budget] work directly on a
//! `rusqlite::Connection` initialized with [initialize_db].

#![warn(missing_docs)]

pub mod budget;
mod category;
mod database_id;
mod db;
mod error;
mod ledger;
mod logging;
pub mod transaction;

pub use budget::Budget;
pub use category::{CategoryRegistry, DEFAULT_CATEGORIES};
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::{Error, StorageError, ValidationError};
pub use ledger::Ledger;
pub use logging::{DEFAULT_LOG_FILTER, setup_logging};
pub use transaction::{NewTransaction, Summary, Transaction, TransactionType};
