//! The secondary store that keeps a denormalized copy of every transaction write.
//!
//! Nothing in the application reads from the mirror. Writes to it happen after
//! the primary write has committed and are best effort: a failed mirror write
//! is logged and otherwise ignored.

mod record;
mod sqlite;

use std::fmt::Debug;

use uuid::Uuid;

use crate::{Error, auth::UserID, transaction::Transaction};

pub use record::MirrorRecord;
pub use sqlite::SQLiteMirrorStore;

/// A store that receives copies of transactions written to the primary database.
///
/// Records are matched by the `mirror_id` shared with the primary store and
/// by their owner.
pub trait MirrorStore: Debug + Send + Sync {
    /// Add a new record.
    ///
    /// # Errors
    /// Returns an error if the record could not be written.
    fn insert(&self, record: &MirrorRecord) -> Result<(), Error>;

    /// Replace the record with the same `mirror_id` and owner as `record`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no record matches, or another error if the
    /// record could not be written.
    fn update(&self, record: &MirrorRecord) -> Result<(), Error>;

    /// Get the record with `mirror_id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no record matches.
    fn get(&self, mirror_id: Uuid, user_id: UserID) -> Result<MirrorRecord, Error>;
}

/// Copy a newly created transaction to the mirror, logging any failure.
pub(crate) fn mirror_insert(store: &dyn MirrorStore, transaction: &Transaction) {
    let record = MirrorRecord::from(transaction);

    if let Err(error) = store.insert(&record) {
        tracing::warn!(
            "could not copy transaction {} to the mirror store: {error}",
            transaction.id
        );
    }
}

/// Copy an edited transaction to the mirror, logging any failure.
pub(crate) fn mirror_update(store: &dyn MirrorStore, transaction: &Transaction) {
    let record = MirrorRecord::from(transaction);

    if let Err(error) = store.update(&record) {
        tracing::warn!(
            "could not update the mirror copy of transaction {}: {error}",
            transaction.id
        );
    }
}

/// A mirror store whose writes always fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingMirrorStore;

#[cfg(test)]
impl MirrorStore for FailingMirrorStore {
    fn insert(&self, _record: &MirrorRecord) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn update(&self, _record: &MirrorRecord) -> Result<(), Error> {
        Err(Error::DatabaseLockError)
    }

    fn get(&self, _mirror_id: Uuid, _user_id: UserID) -> Result<MirrorRecord, Error> {
        Err(Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        auth::{PasswordHash, create_user},
        db::initialize,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{
        FailingMirrorStore, MirrorRecord, MirrorStore, SQLiteMirrorStore, mirror_insert,
        mirror_update,
    };

    fn create_test_transaction() -> crate::transaction::Transaction {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("alice", PasswordHash::new_unchecked("a"), &conn).unwrap();

        create_transaction(
            user.id,
            Transaction::build(
                TransactionType::Expense,
                Decimal::new(1999, 2),
                "Food",
                date!(2025 - 03 - 14),
            ),
            &conn,
        )
        .unwrap()
    }

    #[test]
    fn insert_then_update_keeps_one_copy() {
        let store = SQLiteMirrorStore::open_in_memory().unwrap();
        let mut transaction = create_test_transaction();

        mirror_insert(&store, &transaction);
        transaction.category = "Groceries".to_owned();
        mirror_update(&store, &transaction);

        let got = store.get(transaction.mirror_id, transaction.user_id).unwrap();
        assert_eq!(got, MirrorRecord::from(&transaction));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn failures_are_swallowed() {
        let transaction = create_test_transaction();

        mirror_insert(&FailingMirrorStore, &transaction);
        mirror_update(&FailingMirrorStore, &transaction);
    }
}
