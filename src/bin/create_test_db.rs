use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    Email, PasswordHash, ValidatedPassword,
    datetime::to_millis,
    initialize_db,
    stores::{TransactionStore, sqlite::SQLiteTransactionStore},
    transaction::{Transaction, TransactionType},
    user::create_user,
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Title, amount, category, type and how many days ago.
const SAMPLE_TRANSACTIONS: [(&str, f64, &str, TransactionType, i64); 10] = [
    ("Salary", 4200.0, "Salary", TransactionType::Income, 1),
    ("Coffee", 5.5, "Food", TransactionType::Expense, 0),
    ("Groceries", 86.4, "Food", TransactionType::Expense, 2),
    ("Bus fare", 3.2, "Transport", TransactionType::Expense, 3),
    ("Movie tickets", 32.0, "Entertainment", TransactionType::Expense, 5),
    ("Power bill", 145.0, "Bills", TransactionType::Expense, 9),
    ("Running shoes", 120.0, "Shopping", TransactionType::Expense, 16),
    ("Dentist", 95.0, "Health", TransactionType::Expense, 24),
    ("Birthday present", 40.0, "Gifts", TransactionType::Expense, 40),
    ("Salary", 4200.0, "Salary", TransactionType::Income, 31),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user test@example.com...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    create_user(Email::new("test@example.com")?, password_hash, &conn)?;

    println!("Creating sample transactions...");

    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let now = OffsetDateTime::now_utc();

    for (title, amount, category, kind, days_ago) in SAMPLE_TRANSACTIONS {
        let occurred_at = to_millis(now - Duration::days(days_ago));
        store.create(Transaction::build(title, amount, category, kind, occurred_at))?;
    }

    println!("Success!");

    Ok(())
}
