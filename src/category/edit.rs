//! Category renaming page and endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Alert, redirect_with_flash, take_flash},
    auth::UserID,
    category::{
        Category, CategoryName, domain::RenameCategoryFormData, get_category, rename_category,
        state::CategoryState,
    },
    database_id::CategoryId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        alert_slot, base,
    },
    navigation::NavBar,
};

/// Render the page for renaming a category.
///
/// Unknown categories and those owned by other users redirect to the
/// categories page with an error message.
pub async fn get_edit_category_page(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    jar: PrivateCookieJar,
) -> Response {
    let category = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_category(category_id, user_id, &connection) {
            Ok(category) => category,
            Err(Error::NotFound) => {
                return redirect_with_flash(
                    jar,
                    endpoints::CATEGORIES_VIEW,
                    Alert::error(Error::UpdateMissingCategory.to_string()),
                );
            }
            Err(error) => {
                tracing::error!("Failed to retrieve category {category_id}: {error}");
                return error.into_response();
            }
        }
    };

    let (jar, alert) = take_flash(jar);

    (jar, edit_category_view(&category, alert)).into_response()
}

/// Handle the rename form submission.
///
/// Invalid names and name conflicts redirect back to the edit page.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    jar: PrivateCookieJar,
    Form(form): Form<RenameCategoryFormData>,
) -> Response {
    match try_rename_category(&state, user_id, category_id, &form) {
        Ok(category) => redirect_with_flash(
            jar,
            endpoints::CATEGORIES_VIEW,
            Alert::success(format!("Category renamed to \"{}\".", category.name)),
        ),
        Err(error @ Error::UpdateMissingCategory) => redirect_with_flash(
            jar,
            endpoints::CATEGORIES_VIEW,
            Alert::error(error.user_message()),
        ),
        Err(error) => {
            if !error.is_user_facing() {
                tracing::error!(
                    "An unexpected error occurred while renaming category {category_id}: {error}"
                );
            }

            redirect_with_flash(
                jar,
                &format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id),
                Alert::error(error.user_message()),
            )
        }
    }
}

fn try_rename_category(
    state: &CategoryState,
    user_id: UserID,
    category_id: CategoryId,
    form: &RenameCategoryFormData,
) -> Result<Category, Error> {
    let name = CategoryName::new(&form.name)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    rename_category(category_id, user_id, name, &connection)
}

fn edit_category_view(category: &Category, alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::UPDATE_CATEGORY, category.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (alert_slot(alert))

            form
                method="post"
                action=(update_endpoint)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold"
                {
                    "Rename " (category.category_type.label()) " Category"
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="Category Name"
                        value=(category.name)
                        maxlength="50"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Transactions in this category will be renamed too."
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Rename Category" }
            }
        }
    };

    base("Edit Category", &[], &content)
}
