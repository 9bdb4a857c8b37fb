use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CategoryName, PasswordHash, Transaction, TransactionType, ValidatedPassword, create_category,
    create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the expense_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to generate, counting back from today.
    #[arg(long, default_value_t = 120)]
    days: i64,
}

/// (category, type, payment mode, amount in cents, every n days)
const SAMPLE_TRANSACTIONS: [(&str, TransactionType, &str, i64, i64); 6] = [
    ("Salary", TransactionType::Income, "Bank Transfer", 450_000, 30),
    ("Rent", TransactionType::Expense, "Bank Transfer", 180_000, 30),
    ("Groceries", TransactionType::Expense, "Card", 8_750, 4),
    ("Transport", TransactionType::Expense, "Card", 2_400, 3),
    ("Eating Out", TransactionType::Expense, "Cash", 3_200, 6),
    ("Utilities", TransactionType::Expense, "Bank Transfer", 12_500, 30),
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

    println!("Creating test user 'test' with the password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", password_hash, &conn)?;

    println!("Creating categories...");

    for (name, transaction_type, ..) in SAMPLE_TRANSACTIONS {
        create_category(user.id, CategoryName::new(name)?, transaction_type, &conn)?;
    }

    println!("Creating transactions for the last {} days...", args.days);

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for day in 0..args.days {
        let date = today - Duration::days(day);

        for (category, transaction_type, payment_mode, cents, every) in SAMPLE_TRANSACTIONS {
            if day % every != 0 {
                continue;
            }

            let transaction =
                Transaction::build(transaction_type, Decimal::new(cents, 2), category, date)
                    .payment_mode(payment_mode)
                    .description(&format!("{category} on {date}"));
            create_transaction(user.id, transaction, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
