//! Defines the route handler for the page for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Alert, take_flash},
    auth::UserID,
    category::get_category_names,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, alert_slot, base},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        form::{RawTransactionForm, transaction_form_fields},
        state::TransactionState,
    },
};

fn new_transaction_view(
    values: &RawTransactionForm,
    categories: &[String],
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (alert_slot(alert))

            form
                method="post"
                action=(endpoints::TRANSACTIONS_API)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (transaction_form_fields(values, categories))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Transaction"
                }
            }
        }
    };

    base("New Transaction", &[], &content)
}

/// Renders the page for creating a transaction, with the date set to today.
pub async fn get_new_transaction_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let categories = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_category_names(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        }
    };

    let values = RawTransactionForm {
        date: Some(today.to_string()),
        ..Default::default()
    };
    let (jar, alert) = take_flash(jar);

    (jar, new_transaction_view(&values, &categories, alert)).into_response()
}
