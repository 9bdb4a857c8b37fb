//! Dashboard module
//!
//! Provides an overview page with the user's totals, latest transactions and
//! charts of expenses by category and monthly income against expenses.

mod cards;
mod handlers;
mod tables;

pub(crate) use cards::totals_cards;
pub use handlers::{DashboardState, get_dashboard_page};
