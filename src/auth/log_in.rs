//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    alert::{Alert, redirect_with_flash, take_flash},
    auth::{
        get_user_by_username, invalidate_auth_cookie,
        redirect::{build_log_in_redirect_url_from_target, normalize_redirect_url},
        set_auth_cookie,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, text_input},
};

/// The query parameters for the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct LogInQuery {
    /// The local URL to return to after logging in.
    pub redirect_url: Option<String>,
}

fn log_in_form(username: &str, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN_API)
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (text_input("Username", "username", "text", username))
            (text_input("Password", "password", "password", ""))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(jar: PrivateCookieJar, Query(query): Query<LogInQuery>) -> Response {
    let (jar, alert) = take_flash(jar);
    let redirect_url = query
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url);

    let form = log_in_form("", redirect_url.as_deref());
    let content = log_in_register("Log in to your account", alert, &form);

    (jar, base("Log In", &[], &content)).into_response()
}

/// The state needed for logging in a user.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
    /// Where to send the user after a successful log-in.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// dashboard, or to `redirect_url` if it is a local page. On failure the
/// client is sent back to the log-in page with an error message.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let redirect_url = log_in_data
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url);
    let log_in_page = redirect_url
        .as_deref()
        .and_then(build_log_in_redirect_url_from_target)
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned());

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        get_user_by_username(log_in_data.username.trim(), &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) => return invalid_credentials(jar, &log_in_page),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return redirect_with_flash(jar, &log_in_page, Alert::error(error.user_message()));
        }
    };

    match user.password_hash.verify(&log_in_data.password) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(jar, &log_in_page),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return invalid_credentials(jar, &log_in_page);
        }
    }

    let target = redirect_url.unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    match set_auth_cookie(jar.clone(), user.id, state.cookie_duration) {
        Ok(jar) => (jar, Redirect::to(&target)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (invalidate_auth_cookie(jar), error).into_response()
        }
    }
}

fn invalid_credentials(jar: PrivateCookieJar, log_in_page: &str) -> Response {
    redirect_with_flash(
        jar,
        log_in_page,
        Alert::error(Error::InvalidCredentials.to_string()),
    )
}
