//! Endpoint for deleting a category.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    Error,
    alert::{Alert, redirect_with_flash},
    auth::UserID,
    category::{delete_category, state::CategoryState},
    database_id::CategoryId,
    endpoints,
};

/// A route handler for deleting a category that none of the user's transactions use.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    jar: PrivateCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let alert = match delete_category(category_id, user_id, &connection) {
        Ok(()) => {
            tracing::info!("User {user_id} deleted category {category_id}");
            Alert::success("Category deleted successfully!")
        }
        Err(error) => {
            if !error.is_user_facing() {
                tracing::error!("Could not delete category {category_id}: {error}");
            }

            Alert::error(error.user_message())
        }
    };

    redirect_with_flash(jar, endpoints::CATEGORIES_VIEW, alert)
}
