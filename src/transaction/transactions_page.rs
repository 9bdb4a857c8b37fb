//! The page listing the current user's transactions with category, type and month filters.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Alert, take_flash},
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        alert_slot, base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    transaction::{
        Transaction, TransactionType,
        core::get_transaction_categories,
        query::{FilterParams, TransactionFilter, query_transactions},
        state::TransactionState,
    },
};

/// Renders the transactions page, applying the filters in the query string.
///
/// Malformed filter values are ignored.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(params): Query<FilterParams>,
    jar: PrivateCookieJar,
) -> Response {
    let filter = TransactionFilter::from_params(&params);

    let (transactions, categories) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let transactions = match query_transactions(user_id, &filter, &connection) {
            Ok(transactions) => transactions,
            Err(error) => return error.into_response(),
        };

        let categories = match get_transaction_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };

        (transactions, categories)
    };

    let (jar, alert) = take_flash(jar);

    (
        jar,
        transactions_view(&transactions, &categories, &params, alert),
    )
        .into_response()
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn transactions_view(
    transactions: &[Transaction],
    categories: &[String],
    params: &FilterParams,
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (alert_slot(alert))

            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (filter_form(categories, params))

                p id="filter-summary" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (filter_summary(transactions.len(), params))
                }

                div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let sign = match transaction.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(transaction.date) { (transaction.date) } }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (transaction.payment_mode) }
            td class={ "px-6 py-4 text-right font-medium " (amount_class(transaction.transaction_type)) }
            {
                (sign) (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this transaction? This cannot be undone.",
                    ))
                }
            }
        }
    }
}

fn filter_form(categories: &[String], params: &FilterParams) -> Markup {
    let selected_category = params.category.as_deref().unwrap_or_default();
    let selected_type = params
        .transaction_type
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let month = params.month.as_deref().unwrap_or_default();

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            id="transaction-filters"
            class="grid gap-4 md:grid-cols-4 items-end"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in categories {
                        option value=(category) selected[category.as_str() == selected_category] { (category) }
                    }
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All types" }

                    @for transaction_type in [TransactionType::Income, TransactionType::Expense] {
                        option
                            value=(transaction_type)
                            selected[selected_type == transaction_type.as_str()]
                        {
                            (transaction_type.label())
                        }
                    }
                }
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                input type="month" name="month" id="month" value=(month) class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

/// Describe the number of results and the filters the user asked for.
fn filter_summary(count: usize, params: &FilterParams) -> String {
    let mut summary = format!(
        "Showing {count} transaction{}",
        if count == 1 { "" } else { "s" }
    );

    let echoes = [
        ("category", &params.category),
        ("type", &params.transaction_type),
        ("month", &params.month),
    ];

    let active: Vec<String> = echoes
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{name}: {value}"))
        })
        .collect();

    if !active.is_empty() {
        summary.push_str(" for ");
        summary.push_str(&active.join(", "));
    }

    summary
}
