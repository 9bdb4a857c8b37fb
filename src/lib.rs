//! Expense Tracker is a web app for recording income and expenses, organising
//! them into categories and viewing dashboards and reports of where the money
//! went.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod auth;
mod category;
mod charts;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod mirror;
mod navigation;
mod not_found;
mod report;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use category::{CategoryName, create_category};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use mirror::{MirrorRecord, MirrorStore, SQLiteMirrorStore};
pub use routing::build_router;
pub use transaction::{Transaction, TransactionType, create_transaction};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password combination did not match a user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The registration form was missing a username or password.
    #[error("All fields are required.")]
    MissingCredentials,

    /// The password and its confirmation did not match.
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Another user has already registered the username.
    #[error("Username already taken.")]
    UsernameTaken,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be decoded or has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// One of amount, category or date was not filled in.
    #[error("Please fill all required fields.")]
    MissingRequiredFields,

    /// The amount could not be parsed as a decimal with at most two decimal places.
    #[error("{0:?} is not a valid amount. Enter a number with at most two decimal places.")]
    InvalidAmount(String),

    /// The amount was zero or negative.
    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    /// The date was not a calendar date in the format YYYY-MM-DD.
    #[error("{0:?} is not a valid date.")]
    InvalidDate(String),

    /// The transaction type was neither income nor expense.
    #[error("{0:?} is not a valid transaction type. Choose income or expense.")]
    InvalidTransactionType(String),

    /// An empty string was used as a category name.
    #[error("Category name cannot be empty.")]
    EmptyCategoryName,

    /// The category name is longer than the database allows.
    #[error("Category name cannot be longer than {0} characters.")]
    CategoryNameTooLong(usize),

    /// The user already has a category with the same name and type.
    #[error("Category \"{0}\" already exists.")]
    DuplicateCategory(String),

    /// The category cannot be deleted while transactions refer to it.
    #[error("Cannot delete category \"{name}\": {count} transaction(s) use it.")]
    CategoryInUse {
        /// The name of the category.
        name: String,
        /// How many of the user's transactions use the category.
        count: u32,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist or belongs to another user.
    #[error("Transaction not found.")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or belongs to another user.
    #[error("Transaction not found.")]
    DeleteMissingTransaction,

    /// Tried to rename a category that does not exist or belongs to another user.
    #[error("Category not found.")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist or belongs to another user.
    #[error("Category not found.")]
    DeleteMissingCategory,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the user's input rather than a fault on
    /// the server. These errors are shown to the user verbatim.
    pub(crate) fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials
                | Error::MissingCredentials
                | Error::PasswordMismatch
                | Error::UsernameTaken
                | Error::MissingRequiredFields
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount
                | Error::InvalidDate(_)
                | Error::InvalidTransactionType(_)
                | Error::EmptyCategoryName
                | Error::CategoryNameTooLong(_)
                | Error::DuplicateCategory(_)
                | Error::CategoryInUse { .. }
                | Error::UpdateMissingTransaction
                | Error::DeleteMissingTransaction
                | Error::UpdateMissingCategory
                | Error::DeleteMissingCategory
        )
    }

    /// The message to show the user in a flash alert.
    ///
    /// Internal errors are replaced with a generic message so that server
    /// details are only written to the logs.
    pub(crate) fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            tracing::error!("An unexpected error occurred: {self}");
            "Something went wrong. Try again or check the server logs.".to_owned()
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
