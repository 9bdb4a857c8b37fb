//! Defines the endpoint for updating an existing transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::{Form, PrivateCookieJar};

use crate::{
    Error,
    alert::{Alert, redirect_with_flash},
    auth::UserID,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    mirror::mirror_update,
    transaction::{
        Transaction, core::update_transaction, form::RawTransactionForm, state::TransactionState,
    },
};

/// A route handler for replacing the fields of a transaction owned by the current user.
///
/// Invalid forms redirect back to the edit page. Missing or foreign
/// transactions redirect to the transactions view with an error message.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    jar: PrivateCookieJar,
    Form(form): Form<RawTransactionForm>,
) -> Response {
    match try_update_transaction(&state, user_id, transaction_id, &form) {
        Ok(transaction) => {
            tracing::info!("User {user_id} updated transaction {transaction_id}");
            mirror_update(state.mirror_store.as_ref(), &transaction);

            redirect_with_flash(
                jar,
                endpoints::TRANSACTIONS_VIEW,
                Alert::success("Transaction updated successfully!"),
            )
        }
        Err(error @ Error::UpdateMissingTransaction) => redirect_with_flash(
            jar,
            endpoints::TRANSACTIONS_VIEW,
            Alert::error(error.user_message()),
        ),
        Err(error) => redirect_with_flash(
            jar,
            &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id),
            Alert::error(error.user_message()),
        ),
    }
}

fn try_update_transaction(
    state: &TransactionState,
    user_id: UserID,
    transaction_id: TransactionId,
    form: &RawTransactionForm,
) -> Result<Transaction, Error> {
    let builder = form.validate()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    update_transaction(transaction_id, user_id, builder, &connection)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
    };
    use axum_extra::extract::Form;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        alert::Alert,
        auth::UserID,
        endpoints::{self, format_endpoint},
        mirror::{MirrorRecord, MirrorStore, mirror_insert},
        test_utils::{assert_redirect, get_flash},
        transaction::{
            Transaction, TransactionType,
            core::{create_transaction, get_transaction},
            form::RawTransactionForm,
            state::test_state::{TestState, get_jar, get_key, get_test_state},
        },
    };

    use super::update_transaction_endpoint;

    fn create_food_transaction(test: &TestState, user_id: UserID) -> Transaction {
        let connection = test.state.db_connection.lock().unwrap();
        let transaction = create_transaction(
            user_id,
            Transaction::build(
                TransactionType::Expense,
                Decimal::new(1000, 2),
                "Food",
                date!(2025 - 10 - 05),
            ),
            &connection,
        )
        .unwrap();
        mirror_insert(test.mirror.as_ref(), &transaction);

        transaction
    }

    fn form(amount: &str, category: &str) -> RawTransactionForm {
        RawTransactionForm {
            transaction_type: Some("expense".to_owned()),
            amount: Some(amount.to_owned()),
            category: Some(category.to_owned()),
            description: Some("Dinner".to_owned()),
            date: Some("2025-10-06".to_owned()),
            payment: Some("Card".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let test = get_test_state();
        let original = create_food_transaction(&test, test.alice);

        let response = update_transaction_endpoint(
            State(test.state.clone()),
            Extension(test.alice),
            Path(original.id),
            get_jar(),
            Form(form("25.5", "Eating out")),
        )
        .await;

        assert_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::success("Transaction updated successfully!"))
        );
        let updated = {
            let connection = test.state.db_connection.lock().unwrap();
            get_transaction(original.id, test.alice, &connection).unwrap()
        };
        assert_eq!(updated.amount, Decimal::new(2550, 2));
        assert_eq!(updated.category, "Eating out");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(
            test.mirror.get(original.mirror_id, test.alice),
            Ok(MirrorRecord::from(&updated))
        );
    }

    #[tokio::test]
    async fn invalid_form_redirects_to_edit_page() {
        let test = get_test_state();
        let original = create_food_transaction(&test, test.alice);

        let response = update_transaction_endpoint(
            State(test.state.clone()),
            Extension(test.alice),
            Path(original.id),
            get_jar(),
            Form(form("12", "")),
        )
        .await;

        assert_redirect(
            &response,
            &format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, original.id),
        );
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::error("Please fill all required fields."))
        );
        let connection = test.state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(original.id, test.alice, &connection),
            Ok(original)
        );
    }

    #[tokio::test]
    async fn cannot_update_foreign_transaction() {
        let test = get_test_state();
        let original = create_food_transaction(&test, test.bob);

        let response = update_transaction_endpoint(
            State(test.state.clone()),
            Extension(test.alice),
            Path(original.id),
            get_jar(),
            Form(form("1", "Hacked")),
        )
        .await;

        assert_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::error("Transaction not found."))
        );
        let connection = test.state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(original.id, test.bob, &connection),
            Ok(original)
        );
    }
}
