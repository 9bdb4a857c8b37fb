use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, mirror::MirrorStore};

/// The state needed by the transaction pages and endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The store that receives a copy of each created or edited transaction.
    pub mirror_store: Arc<dyn MirrorStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            mirror_store: state.mirror_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_state {
    use std::sync::{Arc, Mutex};

    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        mirror::{MirrorStore, SQLiteMirrorStore},
    };

    use super::TransactionState;

    /// The state shared by a test, with two registered users.
    pub(crate) struct TestState {
        pub state: TransactionState,
        pub mirror: Arc<SQLiteMirrorStore>,
        pub alice: UserID,
        pub bob: UserID,
    }

    pub(crate) fn get_key() -> Key {
        Key::from(&Sha512::digest("transactions"))
    }

    pub(crate) fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(get_key())
    }

    pub(crate) fn get_test_state() -> TestState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = create_user("alice", PasswordHash::new_unchecked("a"), &connection)
            .unwrap()
            .id;
        let bob = create_user("bob", PasswordHash::new_unchecked("b"), &connection)
            .unwrap()
            .id;
        let mirror = Arc::new(SQLiteMirrorStore::open_in_memory().unwrap());

        TestState {
            state: TransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
                mirror_store: mirror.clone() as Arc<dyn MirrorStore>,
                local_timezone: "Etc/UTC".to_owned(),
            },
            mirror,
            alice,
            bob,
        }
    }
}
