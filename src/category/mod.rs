//! Category management.
//!
//! Categories are named per user and typed as income or expense. Transactions
//! store their category as free text, so this module also keeps transactions
//! in step when a category is renamed or deleted.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod state;

pub use create::create_category_endpoint;
pub use db::{
    count_category_transactions, count_transactions_per_category, create_category,
    create_category_table, delete_category, get_categories, get_category, get_category_names,
    rename_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryName, MAX_CATEGORY_NAME_LENGTH};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
pub use state::CategoryState;
