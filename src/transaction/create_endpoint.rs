//! Defines the endpoint for creating a new transaction.

use axum::{Extension, extract::State, response::Response};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, PrivateCookieJar};

use crate::{
    Error,
    alert::{Alert, redirect_with_flash},
    auth::UserID,
    endpoints,
    mirror::mirror_insert,
    transaction::{
        Transaction, core::create_transaction, form::RawTransactionForm, state::TransactionState,
    },
};

/// A route handler for creating a new transaction.
///
/// Redirects to the transactions view on success, or back to the new
/// transaction page if the form is invalid. Both carry a flash message.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<RawTransactionForm>,
) -> Response {
    match try_create_transaction(&state, user_id, &form) {
        Ok(transaction) => {
            tracing::info!("User {user_id} created transaction {}", transaction.id);
            mirror_insert(state.mirror_store.as_ref(), &transaction);

            redirect_with_flash(
                jar,
                endpoints::TRANSACTIONS_VIEW,
                Alert::success("Transaction added successfully!"),
            )
        }
        Err(error) => redirect_with_flash(
            jar,
            endpoints::NEW_TRANSACTION_VIEW,
            Alert::error(error.user_message()),
        ),
    }
}

fn try_create_transaction(
    state: &TransactionState,
    user_id: UserID,
    form: &RawTransactionForm,
) -> Result<Transaction, Error> {
    let builder = form.validate()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_transaction(user_id, builder, &connection)
}
