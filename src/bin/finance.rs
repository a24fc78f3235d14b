use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use time::OffsetDateTime;

use finance_ledger::{
    Error, Ledger, NewTransaction, TransactionId,
    budget::{current_month, month_key},
    setup_logging,
    transaction::DEFAULT_TRANSACTION_LIMIT,
};

/// Record income and expenses, and keep spending within monthly budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, env = "FINANCE_DB", default_value = "finance.db")]
    db_path: PathBuf,

    /// Extra categories to accept alongside the defaults. May be repeated.
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a transaction.
    Add {
        /// The amount of money, must be positive.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// The category the transaction is filed under.
        #[arg(long)]
        category: String,

        /// When the transaction happened, as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Either Income or Expense.
        #[arg(long = "type", default_value = "Expense")]
        kind: String,
    },

    /// List the most recent transactions.
    List {
        /// The most transactions to show.
        #[arg(short, long, default_value_t = DEFAULT_TRANSACTION_LIMIT)]
        limit: u32,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete a transaction by its ID.
    Delete {
        /// The ID shown by `list`.
        id: TransactionId,
    },

    /// Set the spending limit for a category in a month.
    SetBudget {
        /// The category the limit applies to.
        category: String,

        /// The most that may be spent.
        #[arg(allow_hyphen_values = true)]
        amount: f64,

        /// The month, as YYYY-MM.
        month: String,
    },

    /// Show the spending limit for a category.
    Budget {
        /// The category to look up.
        category: String,

        /// The month, as YYYY-MM. Defaults to this month.
        month: Option<String>,
    },

    /// Show how much has been spent in a category.
    Spending {
        /// The category to total.
        category: String,

        /// The month, as YYYY-MM. Defaults to this month.
        month: Option<String>,
    },

    /// Show total income and expenses for a month.
    Summary {
        /// The month, as YYYY-MM. Defaults to this month.
        month: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the categories transactions may be filed under.
    Categories,
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) if error.is_validation() => {
            eprintln!("Input error: {error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let mut ledger = Ledger::open(&args.db_path)?;

    for category in &args.categories {
        ledger.add_category(category);
    }

    match args.command {
        Command::Add {
            amount,
            category,
            date,
            kind,
        } => {
            let date = date.unwrap_or_else(today);
            let new_transaction = NewTransaction::from_fields(&amount, &category, &date, &kind)?;
            let transaction = ledger.record_transaction(new_transaction)?;
            println!("Transaction added! {transaction}");
        }
        Command::List { limit, json } => {
            let transactions = ledger.transactions(limit)?;

            if json {
                println!("{}", to_json(&transactions));
            } else {
                for transaction in transactions {
                    println!("{transaction}");
                }
            }
        }
        Command::Delete { id } => {
            if ledger.remove_transaction(id)? {
                println!("Transaction deleted");
            } else {
                println!("No transaction with ID {id}");
            }
        }
        Command::SetBudget {
            category,
            amount,
            month,
        } => {
            let budget = ledger.set_budget(&category, amount, &month)?;
            println!(
                "Budget for {} in {} set to {:.2}",
                budget.category, budget.month, budget.amount
            );
        }
        Command::Budget { category, month } => {
            let month = month.unwrap_or_else(current_month);

            match ledger.budget(&category, &month)? {
                Some(amount) => println!("{category} in {month}: {amount:.2}"),
                None => println!("{category} in {month}: no budget set"),
            }
        }
        Command::Spending { category, month } => {
            let month = month.unwrap_or_else(current_month);
            let spent = ledger.category_spending(&category, &month)?;

            match ledger.budget(&category, &month)? {
                Some(limit) => println!("{category} in {month}: {spent:.2} of {limit:.2} spent"),
                None => println!("{category} in {month}: {spent:.2} spent"),
            }
        }
        Command::Summary { month, json } => {
            let month = month.unwrap_or_else(current_month);
            let summary = ledger.summary(&month)?;

            if json {
                println!("{}", to_json(&summary));
            } else {
                println!("{month}");
                println!("  Income:  {:.2}", summary.income);
                println!("  Expense: {:.2}", summary.expense);
            }
        }
        Command::Categories => {
            for category in ledger.categories() {
                println!("{category}");
            }
        }
    }

    Ok(())
}

/// Today's date in the local timezone as `YYYY-MM-DD`.
fn today() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let date = now.date();

    format!("{}-{:02}", month_key(date), date.day())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::error!("Could not serialize output as JSON: {error}");
        String::from("null")
    })
}
