//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, auth::UserID, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database and in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The name to show users, e.g. "Income".
    pub fn label(&self) -> &'static str {
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
    type Err = Error;

    /// Parse "income" or "expense", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(Error::InvalidTransactionType(s.to_owned()))
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|_| FromSqlError::Other(format!("invalid transaction type {text:?}").into()))
    }
}

/// The payment mode recorded when the user does not give one.
pub const DEFAULT_PAYMENT_MODE: &str = "Cash";

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// How the money was paid, e.g. "Cash" or "Card".
    pub payment_mode: String,
    /// The amount of money spent or earned. Always greater than zero.
    pub amount: Decimal,
    /// The name of the category, e.g. "Groceries".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded. Never changes after creation.
    pub created_at: OffsetDateTime,
    /// The identifier shared with the copy of this transaction in the mirror store.
    pub mirror_id: Uuid,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: Decimal,
        category: &str,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            category: category.to_owned(),
            date,
            payment_mode: DEFAULT_PAYMENT_MODE.to_owned(),
            description: String::new(),
        }
    }
}

/// The user editable fields of a [Transaction].
///
/// The builder is used both to create transactions and to replace the fields
/// of an existing transaction.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The monetary amount of the transaction. Must be greater than zero.
    pub amount: Decimal,
    /// The name of the category, e.g. "Groceries".
    pub category: String,
    /// The date when the transaction occurred.
    pub date: Date,
    /// How the money was paid. Defaults to [DEFAULT_PAYMENT_MODE].
    pub payment_mode: String,
    /// A human-readable description of the transaction.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the payment mode for the transaction.
    pub fn payment_mode(mut self, payment_mode: &str) -> Self {
        self.payment_mode = payment_mode.to_owned();
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns read by [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str = "id, user_id, transaction_type, payment_mode, \
    amount, category, description, date, created_at, mirror_id";

/// Create a new transaction owned by `user_id` in the database from a builder.
///
/// The creation timestamp and the mirror ID are assigned here.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// e.g. `user_id` does not refer to a user.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();
    let mirror_id = Uuid::new_v4();

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, transaction_type, payment_mode, amount, \
                category, description, date, created_at, mirror_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                builder.transaction_type,
                builder.payment_mode,
                builder.amount.to_string(),
                builder.category,
                builder.description,
                builder.date,
                created_at,
                mirror_id.to_string(),
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the transaction with `id` that belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)
        .map_err(|error| error.into())
}

/// Replace the user editable fields of the transaction with `id` that belongs to `user_id`.
///
/// The owner, creation timestamp and mirror ID are left unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET transaction_type = ?1, payment_mode = ?2, amount = ?3, category = ?4,
                 description = ?5, date = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.transaction_type,
                builder.payment_mode,
                builder.amount.to_string(),
                builder.category,
                builder.description,
                builder.date,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction with `id` that belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the `limit` most recent transactions of `user_id`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_recent_transactions(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = ?1
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT ?2"
        ))?
        .query_map((user_id.as_i64(), limit), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the distinct category names used by the transactions of `user_id`, in alphabetical order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT category FROM \"transaction\" WHERE user_id = ?1 ORDER BY category ASC",
        )?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
                payment_mode TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                mirror_id TEXT NOT NULL UNIQUE,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_user_category ON \"transaction\"(user_id, category);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must hold the columns in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_amount: String = row.get(4)?;
    let amount = Decimal::from_str(&raw_amount)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;
    let raw_mirror_id: String = row.get(9)?;
    let mirror_id = Uuid::parse_str(&raw_mirror_id)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        transaction_type: row.get(2)?,
        payment_mode: row.get(3)?,
        amount,
        category: row.get(5)?,
        description: row.get(6)?,
        date: row.get(7)?,
        created_at: row.get(8)?,
        mirror_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================
