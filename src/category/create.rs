//! Endpoint for creating a category.

use std::str::FromStr;

use axum::{Extension, extract::State, response::Response};
use axum_extra::extract::{Form, PrivateCookieJar};

use crate::{
    Error,
    alert::{Alert, redirect_with_flash},
    auth::UserID,
    category::{
        Category, CategoryName, create_category, domain::CategoryFormData, state::CategoryState,
    },
    endpoints,
    transaction::TransactionType,
};

/// A route handler for creating a category for the current user.
///
/// Redirects to the categories page with a flash message on success and failure.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let alert = match try_create_category(&state, user_id, &form) {
        Ok(category) => {
            tracing::info!(
                "User {user_id} created {} category {}",
                category.category_type,
                category.id
            );
            Alert::success(format!("Category \"{}\" created successfully!", category.name))
        }
        Err(error) => Alert::error(error.user_message()),
    };

    redirect_with_flash(jar, endpoints::CATEGORIES_VIEW, alert)
}

fn try_create_category(
    state: &CategoryState,
    user_id: UserID,
    form: &CategoryFormData,
) -> Result<Category, Error> {
    let name = CategoryName::new(&form.name)?;
    let category_type = TransactionType::from_str(&form.category_type)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_category(user_id, name, category_type, &connection)
}
