//! Database operations for categories.
//!
//! Transactions refer to categories by name, so renaming a category also
//! renames the category of the owner's transactions, and a category cannot be
//! deleted while any of the owner's transactions use its name.

use std::collections::HashMap;

use rusqlite::{Connection, Row, TransactionBehavior, Transaction as SqlTransaction};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryName},
    database_id::CategoryId,
    transaction::TransactionType,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if the user already has a category with
/// the same name and type.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    category_type: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name, category_type) VALUES (?1, ?2, ?3)",
            (user_id.as_i64(), name.as_ref(), category_type),
        )
        .map_err(|error| map_duplicate_error(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id,
        name,
        category_type,
    })
}

/// Retrieve the category with `category_id` owned by `user_id`.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category_type FROM category WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((category_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Retrieve the categories of `user_id` ordered by type and then name.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category_type FROM category WHERE user_id = ?1
            ORDER BY category_type ASC, name ASC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the distinct names of the categories of `user_id` in alphabetical order.
pub fn get_category_names(user_id: UserID, connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT name FROM category WHERE user_id = ?1 ORDER BY name ASC")?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// Rename a category and every transaction of its owner that uses the old name.
///
/// Both changes are made in one database transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingCategory] if the category does not exist or is owned by another user,
/// - [Error::DuplicateCategory] if the owner already has a category with the new name and
///   the same type, in which case nothing is changed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn rename_category(
    category_id: CategoryId,
    user_id: UserID,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let category = match get_category(category_id, user_id, &transaction) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::UpdateMissingCategory),
        Err(error) => return Err(error),
    };

    if category.name == new_name {
        return Ok(category);
    }

    transaction
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (new_name.as_ref(), category_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_error(error, &new_name))?;

    let renamed_transactions = transaction.execute(
        "UPDATE \"transaction\" SET category = ?1 WHERE user_id = ?2 AND category = ?3",
        (new_name.as_ref(), user_id.as_i64(), category.name.as_ref()),
    )?;

    transaction.commit()?;

    tracing::info!(
        "Renamed category {category_id} from {:?} to {:?} and updated {renamed_transactions} transaction(s)",
        category.name.as_ref(),
        new_name.as_ref()
    );

    Ok(Category {
        name: new_name,
        ..category
    })
}

/// Delete a category that no transaction of its owner uses.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingCategory] if the category does not exist or is owned by another user,
/// - [Error::CategoryInUse] if any transaction of the owner uses the category name,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let category = match get_category(category_id, user_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error),
    };

    let count = count_category_transactions(user_id, category.name.as_ref(), connection)?;

    if count > 0 {
        return Err(Error::CategoryInUse {
            name: category.name.to_string(),
            count,
        });
    }

    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count the transactions of `user_id` whose category is `name`.
pub fn count_category_transactions(
    user_id: UserID,
    name: &str,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(1) FROM \"transaction\" WHERE user_id = ?1 AND category = ?2",
            (user_id.as_i64(), name),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count the transactions of `user_id` per category name.
pub fn count_transactions_per_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<HashMap<String, u32>, Error> {
    let result: Result<HashMap<String, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category, COUNT(1) FROM \"transaction\" WHERE user_id = ?1 GROUP BY category",
        )?
        .query_map([user_id.as_i64()], |row| {
            let name = row.get(0)?;
            let count = row.get(1)?;

            Ok((name, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            category_type TEXT NOT NULL CHECK (category_type IN ('income', 'expense')),
            UNIQUE(user_id, name, category_type),
            FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_duplicate_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
            Error::DuplicateCategory(name.to_string())
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: CategoryName::new_unchecked(&raw_name),
        category_type: row.get(3)?,
    })
}
