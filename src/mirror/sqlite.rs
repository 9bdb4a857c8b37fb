use std::sync::Mutex;

use rusqlite::Connection;
use uuid::Uuid;

use crate::{Error, auth::UserID};

use super::{MirrorRecord, MirrorStore};

/// A [MirrorStore] that keeps each record as a JSON document in its own SQLite database.
#[derive(Debug)]
pub struct SQLiteMirrorStore {
    connection: Mutex<Connection>,
}

impl SQLiteMirrorStore {
    /// Wrap `connection` and create the mirror table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transaction_mirror (
                    mirror_id TEXT PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    document TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Create a mirror store backed by an in-memory database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database could not be opened.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    /// The number of records in the store.
    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<u32, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        connection
            .query_row("SELECT COUNT(*) FROM transaction_mirror", [], |row| {
                row.get(0)
            })
            .map_err(|error| error.into())
    }
}

impl MirrorStore for SQLiteMirrorStore {
    fn insert(&self, record: &MirrorRecord) -> Result<(), Error> {
        let document = serde_json::to_string(record)?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO transaction_mirror (mirror_id, user_id, document) VALUES (?1, ?2, ?3)",
            (
                record.mirror_id.to_string(),
                record.user_id.as_i64(),
                document,
            ),
        )?;

        Ok(())
    }

    fn update(&self, record: &MirrorRecord) -> Result<(), Error> {
        let document = serde_json::to_string(record)?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let rows_affected = connection.execute(
            "UPDATE transaction_mirror SET document = ?1 WHERE mirror_id = ?2 AND user_id = ?3",
            (
                document,
                record.mirror_id.to_string(),
                record.user_id.as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn get(&self, mirror_id: Uuid, user_id: UserID) -> Result<MirrorRecord, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let document: String = connection.query_row(
            "SELECT document FROM transaction_mirror WHERE mirror_id = ?1 AND user_id = ?2",
            (mirror_id.to_string(), user_id.as_i64()),
            |row| row.get(0),
        )?;

        Ok(serde_json::from_str(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{OffsetDateTime, macros::date};
    use uuid::Uuid;

    use crate::{Error, auth::UserID, mirror::MirrorStore, transaction::TransactionType};

    use super::{MirrorRecord, SQLiteMirrorStore};

    fn record(user_id: i64) -> MirrorRecord {
        MirrorRecord {
            mirror_id: Uuid::new_v4(),
            transaction_id: 1,
            user_id: UserID::new(user_id),
            transaction_type: TransactionType::Income,
            payment_mode: "Bank transfer".to_owned(),
            amount: Decimal::new(200000, 2),
            category: "Salary".to_owned(),
            description: String::new(),
            date: date!(2025 - 01 - 01),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn insert_and_get() {
        let store = SQLiteMirrorStore::open_in_memory().unwrap();
        let want = record(1);

        store.insert(&want).unwrap();

        assert_eq!(store.get(want.mirror_id, want.user_id), Ok(want));
    }

    #[test]
    fn duplicate_insert_fails() {
        let store = SQLiteMirrorStore::open_in_memory().unwrap();
        let want = record(1);
        store.insert(&want).unwrap();

        assert!(store.insert(&want).is_err());
    }

    #[test]
    fn update_matches_owner() {
        let store = SQLiteMirrorStore::open_in_memory().unwrap();
        let original = record(1);
        store.insert(&original).unwrap();

        let mut foreign = original.clone();
        foreign.user_id = UserID::new(2);
        foreign.category = "Bonus".to_owned();

        assert_eq!(store.update(&foreign), Err(Error::NotFound));
        assert_eq!(store.get(original.mirror_id, original.user_id), Ok(original));
    }

    #[test]
    fn update_replaces_document() {
        let store = SQLiteMirrorStore::open_in_memory().unwrap();
        let mut want = record(1);
        store.insert(&want).unwrap();

        want.amount = Decimal::new(250000, 2);
        store.update(&want).unwrap();

        assert_eq!(store.get(want.mirror_id, want.user_id), Ok(want));
    }
}
