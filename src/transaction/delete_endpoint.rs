use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    alert::{Alert, redirect_with_flash},
    auth::UserID,
    database_id::TransactionId,
    endpoints,
    transaction::{core::delete_transaction, state::TransactionState},
};

/// A route handler for deleting a transaction owned by the current user.
///
/// Always redirects to the transactions view with a flash message. The mirror
/// store keeps its copy of deleted transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    jar: PrivateCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let alert = match delete_transaction(transaction_id, user_id, &connection) {
        Ok(()) => {
            tracing::info!("User {user_id} deleted transaction {transaction_id}");
            Alert::success("Transaction deleted successfully!")
        }
        Err(error) => Alert::error(error.user_message()),
    };

    redirect_with_flash(jar, endpoints::TRANSACTIONS_VIEW, alert)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
    };
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        alert::Alert,
        endpoints,
        test_utils::{assert_redirect, get_flash},
        transaction::{
            Transaction, TransactionType,
            core::{create_transaction, get_transaction},
            state::test_state::{get_jar, get_key, get_test_state},
        },
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn can_delete_transaction() {
        let test = get_test_state();
        let transaction = {
            let connection = test.state.db_connection.lock().unwrap();
            create_transaction(
                test.alice,
                Transaction::build(
                    TransactionType::Expense,
                    Decimal::ONE,
                    "Food",
                    date!(2025 - 10 - 05),
                ),
                &connection,
            )
            .unwrap()
        };

        let response = delete_transaction_endpoint(
            State(test.state.clone()),
            Extension(test.alice),
            Path(transaction.id),
            get_jar(),
        )
        .await;

        assert_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::success("Transaction deleted successfully!"))
        );
        let connection = test.state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, test.alice, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_transaction_reports_failure() {
        let test = get_test_state();

        let response = delete_transaction_endpoint(
            State(test.state),
            Extension(test.alice),
            Path(42),
            get_jar(),
        )
        .await;

        assert_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::error("Transaction not found."))
        );
    }

    #[tokio::test]
    async fn cannot_delete_foreign_transaction() {
        let test = get_test_state();
        let transaction = {
            let connection = test.state.db_connection.lock().unwrap();
            create_transaction(
                test.bob,
                Transaction::build(
                    TransactionType::Expense,
                    Decimal::ONE,
                    "Food",
                    date!(2025 - 10 - 05),
                ),
                &connection,
            )
            .unwrap()
        };

        let response = delete_transaction_endpoint(
            State(test.state.clone()),
            Extension(test.alice),
            Path(transaction.id),
            get_jar(),
        )
        .await;

        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::error("Transaction not found."))
        );
        let connection = test.state.db_connection.lock().unwrap();
        assert!(get_transaction(transaction.id, test.bob, &connection).is_ok());
    }
}
