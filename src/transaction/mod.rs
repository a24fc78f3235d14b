//! Transaction management for the finance ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating transactions
//! - Field validation for raw transaction input
//! - Database functions for storing, listing, deleting and totalling transactions

mod core;
mod summary;
mod validation;

pub use core::{
    DEFAULT_TRANSACTION_LIMIT, NewTransaction, RowsAffected, Transaction, TransactionType,
    count_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions, map_transaction_row,
};
pub use summary::{Summary, get_category_spending, get_summary};
pub use validation::{parse_amount, validate_amount, validate_date, validate_type};
