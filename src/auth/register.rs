//! The registration page and the handler that creates new users.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::{Alert, redirect_with_flash, take_flash},
    auth::{PasswordHash, ValidatedPassword, create_user},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, text_input},
};

fn register_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::USERS)
            class="space-y-4 md:space-y-6"
        {
            (text_input("Username", "username", "text", ""))
            (text_input("Password", "password", "password", ""))
            (text_input("Confirm Password", "confirm_password", "password", ""))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page(jar: PrivateCookieJar) -> Response {
    let (jar, alert) = take_flash(jar);
    let content = log_in_register("Create an account", alert, &register_form());

    (jar, base("Register", &[], &content)).into_response()
}

/// The state needed for registering a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name to log in with.
    pub username: String,
    /// The new password.
    pub password: String,
    /// The new password typed a second time.
    pub confirm_password: String,
}

/// Create a new user from the registration form.
///
/// On success the client is sent to the log-in page, otherwise back to the
/// registration page. Both carry a flash message.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    match try_register_user(&state, &form) {
        Ok(()) => redirect_with_flash(
            jar,
            endpoints::LOG_IN_VIEW,
            Alert::success("Account created successfully. Please log in."),
        ),
        Err(error) => redirect_with_flash(
            jar,
            endpoints::REGISTER_VIEW,
            Alert::error(error.user_message()),
        ),
    }
}

fn try_register_user(state: &RegistrationState, form: &RegisterForm) -> Result<(), Error> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
        return Err(Error::MissingCredentials);
    }

    if form.password != form.confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let password = ValidatedPassword::new(&form.password)?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = create_user(username, password_hash, &connection)?;
    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    Ok(())
}
