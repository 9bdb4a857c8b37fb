//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, get_log_in_page, get_log_out, get_register_page, post_log_in, register_user},
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    report::get_reports_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::UPDATE_TRANSACTION,
            post(update_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            post(delete_transaction_endpoint),
        )
        .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
        .route(endpoints::UPDATE_CATEGORY, post(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, post(delete_category_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        auth::COOKIE_TOKEN,
        endpoints::{self, format_endpoint},
        mirror::SQLiteMirrorStore,
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let mirror_store = Arc::new(SQLiteMirrorStore::open_in_memory().unwrap());
        let state = AppState::new(connection, mirror_store, "routing", "Etc/UTC").unwrap();

        TestServer::new(build_router(state))
    }

    async fn register_and_log_in(server: &TestServer) -> Cookie<'static> {
        server
            .post(endpoints::USERS)
            .form(&[
                ("username", "alice"),
                ("password", "hunter2"),
                ("confirm_password", "hunter2"),
            ])
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "alice"), ("password", "hunter2")])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn anonymous_requests_are_sent_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::REPORTS_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(&format!("{}?redirect_url=", endpoints::LOG_IN_VIEW)),
            "got location {location:?}"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server.get("/definitely/not/a/page").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn register_log_in_and_record_an_expense() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookie(token.clone())
            .form(&[
                ("type", "expense"),
                ("amount", "12.30"),
                ("category", "Food"),
                ("description", "Lunch"),
                ("date", "2025-01-10"),
                ("payment", "Card"),
            ])
            .await;
        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::TRANSACTIONS_VIEW);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(token.clone())
            .await;
        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("$12.30"), "dashboard should show the new expense");

        let response = server
            .get(endpoints::REPORTS_VIEW)
            .add_cookie(token)
            .add_query_param("category", "Food")
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("payment-mode-chart"));
    }

    #[tokio::test]
    async fn categories_can_be_created_and_renamed() {
        let server = get_test_server();
        let token = register_and_log_in(&server).await;

        server
            .post(endpoints::CATEGORIES_API)
            .add_cookie(token.clone())
            .form(&[("name", "Groceries"), ("type", "expense")])
            .await
            .assert_status_see_other();

        server
            .post(&format_endpoint(endpoints::UPDATE_CATEGORY, 1))
            .add_cookie(token.clone())
            .form(&[("name", "Food")])
            .await
            .assert_status_see_other();

        let response = server
            .get(endpoints::CATEGORIES_VIEW)
            .add_cookie(token)
            .await;
        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Food"));
        assert!(!text.contains("Groceries"));
    }
}
