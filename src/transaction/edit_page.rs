//! Defines the route handler for the page for editing an existing transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Alert, redirect_with_flash, take_flash},
    auth::UserID,
    category::get_category_names,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, alert_slot, base},
    navigation::NavBar,
    transaction::{
        core::get_transaction,
        form::{RawTransactionForm, transaction_form_fields},
        state::TransactionState,
    },
};

fn edit_transaction_view(
    transaction_id: TransactionId,
    values: &RawTransactionForm,
    categories: &[String],
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let update_route = format_endpoint(endpoints::UPDATE_TRANSACTION, transaction_id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (alert_slot(alert))

            form
                method="post"
                action=(update_route)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (transaction_form_fields(values, categories))

                div class="flex gap-4"
                {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Update Transaction"
                    }
                }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}

/// Renders the page for editing a transaction, prefilled with its current values.
///
/// Unknown transactions and those owned by other users redirect to the
/// transactions view with an error message.
pub async fn get_edit_transaction_page(
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

    let transaction = match get_transaction(transaction_id, user_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => {
            return redirect_with_flash(
                jar,
                endpoints::TRANSACTIONS_VIEW,
                Alert::error(Error::UpdateMissingTransaction.to_string()),
            );
        }
        Err(error) => return error.into_response(),
    };

    let categories = match get_category_names(user_id, &connection) {
        Ok(categories) => categories,
        Err(error) => return error.into_response(),
    };

    let values = RawTransactionForm::from(&transaction);
    let (jar, alert) = take_flash(jar);

    (
        jar,
        edit_transaction_view(transaction_id, &values, &categories, alert),
    )
        .into_response()
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
        alert::Alert,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_action, assert_form_input_with_value, assert_redirect, assert_status_ok,
            assert_valid_html, get_flash, must_get_form, parse_html_document,
        },
        transaction::{
            Transaction, TransactionType,
            core::create_transaction,
            state::test_state::{get_jar, get_key, get_test_state},
        },
    };

    use super::get_edit_transaction_page;

    #[tokio::test]
    async fn renders_prefilled_form() {
        let test = get_test_state();
        let transaction = {
            let connection = test.state.db_connection.lock().unwrap();
            create_transaction(
                test.alice,
                Transaction::build(
                    TransactionType::Expense,
                    Decimal::new(1230, 2),
                    "Food",
                    date!(2025 - 10 - 05),
                ),
                &connection,
            )
            .unwrap()
        };

        let response = get_edit_transaction_page(
            State(test.state),
            Extension(test.alice),
            Path(transaction.id),
            get_jar(),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_action(
            &form,
            &format_endpoint(endpoints::UPDATE_TRANSACTION, transaction.id),
        );
        assert_form_input_with_value(&form, "amount", "number", "12.30");
        assert_form_input_with_value(&form, "category", "text", "Food");
        assert_form_input_with_value(&form, "date", "date", "2025-10-05");
    }

    #[tokio::test]
    async fn foreign_transaction_redirects_with_message() {
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

        let response = get_edit_transaction_page(
            State(test.state),
            Extension(test.alice),
            Path(transaction.id),
            get_jar(),
        )
        .await;

        assert_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            get_flash(&response, get_key()),
            Some(Alert::error("Transaction not found."))
        );
    }
}
