//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{DASHBOARD_MONTHS, Totals, expenses_by_category, monthly_series, totals},
    alert::{Alert, take_flash},
    auth::UserID,
    charts::{PageChart, breakdown_pie_chart, charts_script, charts_view, monthly_line_chart},
    dashboard::{cards::totals_cards, tables::recent_transactions_table},
    endpoints,
    html::{ECHARTS_CDN, HeadElement, alert_slot, base, link},
    navigation::NavBar,
    transaction::{Transaction, TransactionFilter, get_recent_transactions, query_transactions},
};

/// How many of the latest transactions the dashboard lists.
const RECENT_TRANSACTION_COUNT: u32 = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    totals: Totals,
    recent_transactions: Vec<Transaction>,
    charts: [PageChart; 2],
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let data = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match build_dashboard_data(user_id, &connection) {
            Ok(data) => data,
            Err(error) => return error.into_response(),
        }
    };

    let (jar, alert) = take_flash(jar);

    let page = match data {
        Some(data) => dashboard_view(&data, alert),
        None => dashboard_no_data_view(alert),
    };

    (jar, page).into_response()
}

/// Fetches the user's transactions and builds the dashboard data.
///
/// Returns `None` if the user has no transactions.
fn build_dashboard_data(
    user_id: UserID,
    connection: &Connection,
) -> Result<Option<DashboardData>, Error> {
    let transactions = query_transactions(user_id, &TransactionFilter::default(), connection)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    if transactions.is_empty() {
        return Ok(None);
    }

    let recent_transactions =
        get_recent_transactions(user_id, RECENT_TRANSACTION_COUNT, connection).inspect_err(
            |error| tracing::error!("Could not get recent transactions: {error}"),
        )?;

    Ok(Some(DashboardData {
        totals: totals(&transactions),
        recent_transactions,
        charts: build_dashboard_charts(&transactions),
    }))
}

fn build_dashboard_charts(transactions: &[Transaction]) -> [PageChart; 2] {
    [
        PageChart::new(
            "category-chart",
            breakdown_pie_chart(
                "Expenses by Category",
                "All time",
                &expenses_by_category(transactions),
            ),
        ),
        PageChart::new(
            "monthly-chart",
            monthly_line_chart(
                "Income vs Expenses",
                "Last six months",
                &monthly_series(transactions, DASHBOARD_MONTHS),
            ),
        ),
    ]
}

/// Renders the dashboard page when the user has no transactions.
fn dashboard_no_data_view(alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            (alert_slot(alert))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Totals and charts will show up here once you record some
                income or expenses. Get started by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(data: &DashboardData, alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (alert_slot(alert))

            (totals_cards(&data.totals))

            (recent_transactions_table(&data.recent_transactions))

            (charts_view(&data.charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}
