//! Filtering of a user's transactions for the transactions list and the reports page.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, auth::UserID};

use super::core::{TRANSACTION_COLUMNS, Transaction, TransactionType, map_transaction_row};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The raw filter query parameters as sent by the browser.
///
/// Every field is optional and empty strings are treated as absent.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct FilterParams {
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
    /// Only include "income" or "expense" transactions, ignoring case.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only include transactions in this month, formatted as "YYYY-MM".
    pub month: Option<String>,
    /// Only include transactions on or after this date, formatted as "YYYY-MM-DD".
    pub from: Option<String>,
    /// Only include transactions on or before this date, formatted as "YYYY-MM-DD".
    pub to: Option<String>,
}

/// How the transaction type filter resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// Only transactions of this type.
    Only(TransactionType),
    /// The requested type is neither income nor expense, so nothing can match.
    Unmatched,
}

/// A resolved set of conditions on a user's transactions. All conditions must hold.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Exact category name.
    pub category: Option<String>,
    /// Transaction type.
    pub transaction_type: Option<TypeFilter>,
    /// Inclusive lower bound on the date.
    pub from: Option<Date>,
    /// Inclusive upper bound on the date.
    pub to: Option<Date>,
    /// A condition resolved to something no date can satisfy, e.g. month 13.
    pub matches_nothing: bool,
}

/// How the month filter resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthFilter {
    /// The first and last day of the month.
    Range(Date, Date),
    /// Two integers that do not name a calendar month.
    Unmatched,
}

impl TransactionFilter {
    /// Resolve the raw query parameters into a filter.
    ///
    /// Malformed dates and months are ignored rather than treated as errors.
    /// A month of two integers that is not a calendar month, e.g. "2025-13",
    /// matches nothing. A month narrows any `from`/`to` range that is also given.
    pub fn from_params(params: &FilterParams) -> Self {
        let category = non_empty(&params.category).map(str::to_owned);

        let transaction_type = non_empty(&params.transaction_type).map(|raw| {
            raw.parse::<TransactionType>()
                .map_or(TypeFilter::Unmatched, TypeFilter::Only)
        });

        let mut from = non_empty(&params.from).and_then(parse_date);
        let mut to = non_empty(&params.to).and_then(parse_date);

        let mut matches_nothing = false;

        match non_empty(&params.month).and_then(parse_month) {
            Some(MonthFilter::Range(month_start, month_end)) => {
                from = Some(from.map_or(month_start, |date| date.max(month_start)));
                to = Some(to.map_or(month_end, |date| date.min(month_end)));
            }
            Some(MonthFilter::Unmatched) => matches_nothing = true,
            None => {}
        }

        Self {
            category,
            transaction_type,
            from,
            to,
            matches_nothing,
        }
    }
}

/// The value as sent, unless it is absent or only whitespace.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
}

fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text, DATE_FORMAT).ok()
}

/// Parse "YYYY-MM" into the first and last day of that month.
///
/// Returns `None` unless the text is two integers separated by a dash.
fn parse_month(text: &str) -> Option<MonthFilter> {
    let (year, month) = text.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: i64 = month.parse().ok()?;

    let range = u8::try_from(month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .and_then(|month| {
            let start = Date::from_calendar_date(year, month, 1).ok()?;
            let end = Date::from_calendar_date(year, month, month.length(year)).ok()?;
            Some(MonthFilter::Range(start, end))
        });

    Some(range.unwrap_or(MonthFilter::Unmatched))
}

/// Get the transactions of `user_id` that match `filter`, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn query_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses = vec!["user_id = ?".to_owned()];
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(category) = &filter.category {
        clauses.push("category = ?".to_owned());
        params.push(Value::Text(category.clone()));
    }

    match filter.transaction_type {
        Some(TypeFilter::Only(transaction_type)) => {
            clauses.push("transaction_type = ?".to_owned());
            params.push(Value::Text(transaction_type.as_str().to_owned()));
        }
        Some(TypeFilter::Unmatched) => clauses.push("0".to_owned()),
        None => {}
    }

    if filter.matches_nothing {
        clauses.push("0".to_owned());
    }

    if let Some(from) = filter.from {
        clauses.push("date >= ?".to_owned());
        params.push(Value::Text(from.to_string()));
    }

    if let Some(to) = filter.to {
        clauses.push("date <= ?".to_owned());
        params.push(Value::Text(to.to_string()));
    }

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} \
        ORDER BY date DESC, created_at DESC, id DESC",
        clauses.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod filter_tests {
    use time::macros::date;

    use crate::transaction::TransactionType;

    use super::{FilterParams, TransactionFilter, TypeFilter};

    fn params() -> FilterParams {
        FilterParams::default()
    }

    #[test]
    fn empty_params_give_empty_filter() {
        let params = FilterParams {
            category: Some(String::new()),
            transaction_type: Some("  ".to_owned()),
            ..params()
        };

        assert_eq!(
            TransactionFilter::from_params(&params),
            TransactionFilter::default()
        );
    }

    #[test]
    fn month_resolves_to_date_range() {
        let params = FilterParams {
            month: Some("2024-02".to_owned()),
            ..params()
        };

        let filter = TransactionFilter::from_params(&params);

        assert_eq!(filter.from, Some(date!(2024 - 02 - 01)));
        assert_eq!(filter.to, Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn malformed_month_is_ignored() {
        for month in ["2025", "2025-ab", "January", "2025-1.5", " 2025-01"] {
            let params = FilterParams {
                month: Some(month.to_owned()),
                ..params()
            };

            let filter = TransactionFilter::from_params(&params);

            assert_eq!(filter.from, None, "month {month:?} should be ignored");
            assert_eq!(filter.to, None, "month {month:?} should be ignored");
            assert!(!filter.matches_nothing, "month {month:?} should be ignored");
        }
    }

    #[test]
    fn out_of_range_month_matches_nothing() {
        for month in ["2025-13", "2025-00", "2025--1"] {
            let params = FilterParams {
                month: Some(month.to_owned()),
                ..params()
            };

            let filter = TransactionFilter::from_params(&params);

            assert!(filter.matches_nothing, "month {month:?} should match nothing");
        }
    }

    #[test]
    fn single_digit_month_is_accepted() {
        let params = FilterParams {
            month: Some("2025-1".to_owned()),
            ..params()
        };

        let filter = TransactionFilter::from_params(&params);

        assert_eq!(filter.from, Some(date!(2025 - 01 - 01)));
        assert_eq!(filter.to, Some(date!(2025 - 01 - 31)));
        assert!(!filter.matches_nothing);
    }

    #[test]
    fn values_are_not_trimmed_before_matching() {
        let params = FilterParams {
            category: Some(" Food".to_owned()),
            transaction_type: Some(" income ".to_owned()),
            ..params()
        };

        let filter = TransactionFilter::from_params(&params);

        assert_eq!(filter.category.as_deref(), Some(" Food"));
        assert_eq!(filter.transaction_type, Some(TypeFilter::Unmatched));
    }

    #[test]
    fn malformed_dates_are_ignored() {
        let params = FilterParams {
            from: Some("yesterday".to_owned()),
            to: Some("2025-02-30".to_owned()),
            ..params()
        };

        let filter = TransactionFilter::from_params(&params);

        assert_eq!(filter.from, None);
        assert_eq!(filter.to, None);
    }

    #[test]
    fn month_narrows_date_range() {
        let params = FilterParams {
            month: Some("2025-03".to_owned()),
            from: Some("2025-03-10".to_owned()),
            to: Some("2025-06-01".to_owned()),
            ..params()
        };

        let filter = TransactionFilter::from_params(&params);

        assert_eq!(filter.from, Some(date!(2025 - 03 - 10)));
        assert_eq!(filter.to, Some(date!(2025 - 03 - 31)));
    }

    #[test]
    fn type_is_parsed_case_insensitively() {
        let params = FilterParams {
            transaction_type: Some("Income".to_owned()),
            ..params()
        };

        assert_eq!(
            TransactionFilter::from_params(&params).transaction_type,
            Some(TypeFilter::Only(TransactionType::Income))
        );
    }

    #[test]
    fn unknown_type_matches_nothing() {
        let params = FilterParams {
            transaction_type: Some("transfer".to_owned()),
            ..params()
        };

        assert_eq!(
            TransactionFilter::from_params(&params).transaction_type,
            Some(TypeFilter::Unmatched)
        );
    }
}
