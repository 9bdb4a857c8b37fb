//! The reports page handler and view.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    aggregation::{
        REPORT_MONTHS, TOP_CATEGORY_COUNT, daily_expenses, expenses_by_category,
        expenses_by_payment_mode, monthly_series, top_expense_categories, totals,
    },
    alert::{Alert, take_flash},
    auth::UserID,
    charts::{
        PageChart, breakdown_pie_chart, charts_script, charts_view, daily_line_chart,
        monthly_bar_chart,
    },
    dashboard::totals_cards,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_CDN, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        LINK_STYLE, alert_slot, base,
    },
    navigation::NavBar,
    report::tables::{payment_modes_table, top_categories_table},
    timezone::local_today,
    transaction::{
        FilterParams, Transaction, TransactionFilter, get_transaction_categories,
        query_transactions,
    },
};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the reports page.
///
/// Empty or malformed values are ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ReportParams {
    /// The first date to include, formatted as "YYYY-MM-DD".
    pub from: Option<String>,
    /// The last date to include, formatted as "YYYY-MM-DD".
    pub to: Option<String>,
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
}

impl From<&ReportParams> for FilterParams {
    fn from(params: &ReportParams) -> Self {
        FilterParams {
            category: params.category.clone(),
            from: params.from.clone(),
            to: params.to.clone(),
            ..Default::default()
        }
    }
}

/// Render the reports page for the transactions matching the query parameters.
pub async fn get_reports_page(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    Query(params): Query<ReportParams>,
    jar: PrivateCookieJar,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let filter = TransactionFilter::from_params(&FilterParams::from(&params));

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
            Err(error) => {
                tracing::error!("Could not get transactions for report: {error}");
                return error.into_response();
            }
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
        reports_view(&transactions, &categories, &params, today, alert),
    )
        .into_response()
}

fn build_report_charts(transactions: &[Transaction], today: Date) -> [PageChart; 4] {
    [
        PageChart::new(
            "category-chart",
            breakdown_pie_chart(
                "Expenses by Category",
                "Selected period",
                &expenses_by_category(transactions),
            ),
        ),
        PageChart::new(
            "monthly-chart",
            monthly_bar_chart(
                "Income vs Expenses",
                "Last twelve months",
                &monthly_series(transactions, REPORT_MONTHS),
            ),
        ),
        PageChart::new(
            "daily-chart",
            daily_line_chart(
                "Daily Expenses",
                "Last 30 days",
                &daily_expenses(transactions, today),
            ),
        ),
        PageChart::new(
            "payment-mode-chart",
            breakdown_pie_chart(
                "Expenses by Payment Mode",
                "Selected period",
                &expenses_by_payment_mode(transactions),
            ),
        ),
    ]
}

fn reports_view(
    transactions: &[Transaction],
    categories: &[String],
    params: &ReportParams,
    today: Date,
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let charts = build_report_charts(transactions, today);
    let top_categories = top_expense_categories(transactions, TOP_CATEGORY_COUNT);
    let payment_modes = expenses_by_payment_mode(transactions);

    let content = html!(
        (nav_bar)

        div
            id="report-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (alert_slot(alert))

            section class="w-full mb-8 space-y-4"
            {
                h1 class="text-xl font-bold" { "Reports" }

                (report_filter_form(categories, params))
            }

            (totals_cards(&totals(transactions)))

            (charts_view(&charts))

            section class="w-full grid grid-cols-1 xl:grid-cols-2 gap-4 mb-8"
            {
                (top_categories_table(&top_categories))
                (payment_modes_table(&payment_modes))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&charts),
    ];

    base("Reports", &scripts, &content)
}

fn report_filter_form(categories: &[String], params: &ReportParams) -> Markup {
    let selected_category = params.category.as_deref().unwrap_or_default();
    let from = params.from.as_deref().unwrap_or_default();
    let to = params.to.as_deref().unwrap_or_default();

    html! {
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            id="report-filters"
            class="grid gap-4 md:grid-cols-4 items-end"
        {
            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }

                input type="date" name="from" id="from" value=(from) class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }

                input type="date" name="to" id="to" value=(to) class=(FORM_TEXT_INPUT_STYLE);
            }

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

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                a href=(endpoints::REPORTS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}
