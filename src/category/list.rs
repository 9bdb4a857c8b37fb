//! Categories listing page with the form for creating a category.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    alert::{Alert, take_flash},
    auth::UserID,
    category::{Category, count_transactions_per_category, get_categories, state::CategoryState},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, alert_slot,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    transaction::TransactionType,
};

/// A category with the number of the owner's transactions that use its name.
struct CategoryRow {
    category: Category,
    transaction_count: u32,
}

/// Render the categories page for the current user.
pub async fn get_categories_page(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let rows = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let categories = match get_categories(user_id, &connection) {
            Ok(categories) => categories,
            Err(error) => {
                tracing::error!("Failed to retrieve categories for user {user_id}: {error}");
                return error.into_response();
            }
        };

        let transactions_per_category = match count_transactions_per_category(user_id, &connection)
        {
            Ok(counts) => counts,
            Err(error) => {
                tracing::error!("Could not count transactions per category: {error}");
                return error.into_response();
            }
        };

        categories
            .into_iter()
            .map(|category| CategoryRow {
                transaction_count: *transactions_per_category
                    .get(category.name.as_ref())
                    .unwrap_or(&0),
                category,
            })
            .collect::<Vec<_>>()
    };

    let (jar, alert) = take_flash(jar);

    (jar, categories_view(&rows, alert)).into_response()
}

fn categories_view(rows: &[CategoryRow], alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryRow| {
        let edit_url = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, row.category.id);
        let delete_url = format_endpoint(endpoints::DELETE_CATEGORY, row.category.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'?",
            row.category.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-category-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (row.category.name) }
                }

                td class=(TABLE_CELL_STYLE) { (row.category.category_type.label()) }

                td class=(TABLE_CELL_STYLE) { (row.transaction_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(&edit_url, &delete_url, &confirm_message))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (alert_slot(alert))

            section class="w-full max-w-3xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (create_category_form())

                div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No categories yet. Create one above."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

fn create_category_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::CATEGORIES_API)
            class="flex flex-wrap gap-4 items-end"
        {
            div class="flex-1 min-w-48"
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category Name"
                    maxlength="50"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select id="type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for transaction_type in [TransactionType::Expense, TransactionType::Income] {
                        option value=(transaction_type.as_str()) { (transaction_type.label()) }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
            }
        }
    }
}

#[cfg(test)]
mod categories_page_tests {
    use axum::{Extension, extract::State};
    use rust_decimal::Decimal;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        category::{
            CategoryName, create_category,
            state::test_state::{get_jar, get_test_state},
        },
        endpoints,
        test_utils::{
            assert_form_action, assert_form_input, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::get_categories_page;

    #[tokio::test]
    async fn renders_create_form() {
        let test = get_test_state();

        let response = get_categories_page(State(test.state), Extension(test.alice), get_jar()).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_action(&form, endpoints::CATEGORIES_API);
        assert_form_input(&form, "name", "text");
        let select = form
            .select(&Selector::parse("select[name=type] option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        assert_eq!(select, vec!["expense", "income"]);
    }

    #[tokio::test]
    async fn lists_own_categories_with_transaction_counts() {
        let test = get_test_state();
        {
            let connection = test.state.db_connection.lock().unwrap();
            for (name, category_type) in [
                ("Salary", TransactionType::Income),
                ("Food", TransactionType::Expense),
            ] {
                create_category(
                    test.alice,
                    CategoryName::new_unchecked(name),
                    category_type,
                    &connection,
                )
                .unwrap();
            }
            create_category(
                test.bob,
                CategoryName::new_unchecked("Bob's"),
                TransactionType::Expense,
                &connection,
            )
            .unwrap();
            for _ in 0..2 {
                create_transaction(
                    test.alice,
                    Transaction::build(
                        TransactionType::Expense,
                        Decimal::ONE,
                        "Food",
                        date!(2025 - 03 - 01),
                    ),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_categories_page(State(test.state), Extension(test.alice), get_jar()).await;

        let html = parse_html_document(response).await;
        let row_selector = Selector::parse("tr[data-category-row]").unwrap();
        let cell_selector = Selector::parse("td").unwrap();
        let rows: Vec<Vec<String>> = html
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .take(3)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["Food".to_owned(), "Expense".to_owned(), "2".to_owned()],
                vec!["Salary".to_owned(), "Income".to_owned(), "0".to_owned()],
            ]
        );
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let test = get_test_state();

        let response = get_categories_page(State(test.state), Extension(test.alice), get_jar()).await;

        let html = parse_html_document(response).await;
        let empty = html
            .select(&Selector::parse("[data-empty-state]").unwrap())
            .count();
        assert_eq!(empty, 1);
    }
}
