//! Reports over a date range and category with charts and breakdown tables.

mod handlers;
mod tables;

pub use handlers::{ReportParams, ReportState, get_reports_page};
