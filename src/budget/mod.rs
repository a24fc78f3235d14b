//! Monthly per-category budgets.
//!
//! This module contains the `Budget` model with its database functions, and
//! the rules for setting budgets and checking expenses against them.

mod core;
mod service;

pub use core::{Budget, count_budgets, create_budget_table, get_budget, upsert_budget};
pub use service::{check_budget, current_month, month_key, set_budget};
