//! Summaries of a user's transactions for the dashboard and reports.
//!
//! Every function here works on an already filtered slice of transactions and
//! sums amounts as exact decimals. Grouped results are sorted by descending
//! total with ties broken by ascending name. Conversion to floats is left to
//! the chart layer.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use time::{Date, Duration, Month};

use crate::transaction::{Transaction, TransactionType};

/// The number of months shown in the dashboard's income and expense chart.
pub const DASHBOARD_MONTHS: usize = 6;

/// The number of months shown in the report's income and expense chart.
pub const REPORT_MONTHS: usize = 12;

/// The number of categories listed in the report's top categories table.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// How many days before today the daily expense series reaches back.
pub const DAILY_WINDOW_DAYS: i64 = 30;

/// Income, expense and net totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// The sum of income amounts.
    pub income: Decimal,
    /// The sum of expense amounts.
    pub expense: Decimal,
    /// Income minus expenses.
    pub net: Decimal,
    /// The number of transactions.
    pub count: usize,
}

/// Parallel label and value sequences, e.g. for a pie chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over (label, value) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// The total and number of expenses in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

/// Income and expense totals per calendar month.
///
/// `labels`, `income` and `expense` always have the same length, and months
/// with transactions of only one type have zero for the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySeries {
    /// Month labels such as "Jan 2025", oldest first.
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
}

/// Expense totals per day, oldest first. Days without expenses are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySeries {
    pub dates: Vec<Date>,
    pub values: Vec<Decimal>,
}

/// Sum income and expenses and count the transactions.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expense += transaction.amount,
        }
    }

    Totals {
        income,
        expense,
        net: income - expense,
        count: transactions.len(),
    }
}

/// Sum expenses per category.
pub fn expenses_by_category(transactions: &[Transaction]) -> Breakdown {
    group_expenses(transactions, |transaction| &transaction.category)
}

/// Sum expenses per payment mode.
pub fn expenses_by_payment_mode(transactions: &[Transaction]) -> Breakdown {
    group_expenses(transactions, |transaction| &transaction.payment_mode)
}

/// The `limit` expense categories with the largest totals, with the number of
/// expenses in each.
pub fn top_expense_categories(transactions: &[Transaction], limit: usize) -> Vec<CategorySummary> {
    let mut groups: HashMap<&str, (Decimal, usize)> = HashMap::new();

    for transaction in expenses(transactions) {
        let (total, count) = groups
            .entry(transaction.category.as_str())
            .or_insert((Decimal::ZERO, 0));
        *total += transaction.amount;
        *count += 1;
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_owned(),
            total,
            count,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    summaries.truncate(limit);

    summaries
}

/// Sum income and expenses per calendar month and keep the latest `months` months
/// that have any transactions.
pub fn monthly_series(transactions: &[Transaction], months: usize) -> MonthlySeries {
    let mut totals_by_month: BTreeMap<Date, (Decimal, Decimal)> = BTreeMap::new();

    for transaction in transactions {
        let (income, expense) = totals_by_month
            .entry(first_of_month(transaction.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));

        match transaction.transaction_type {
            TransactionType::Income => *income += transaction.amount,
            TransactionType::Expense => *expense += transaction.amount,
        }
    }

    let skip = totals_by_month.len().saturating_sub(months);
    let mut series = MonthlySeries::default();

    for (month, (income, expense)) in totals_by_month.into_iter().skip(skip) {
        series.labels.push(format_month_label(month));
        series.income.push(income);
        series.expense.push(expense);
    }

    series
}

/// Sum expenses per day from [DAILY_WINDOW_DAYS] days before `today` up to
/// and including `today`.
pub fn daily_expenses(transactions: &[Transaction], today: Date) -> DailySeries {
    let start = today - Duration::days(DAILY_WINDOW_DAYS);
    let mut totals_by_day: BTreeMap<Date, Decimal> = BTreeMap::new();

    for transaction in expenses(transactions) {
        if (start..=today).contains(&transaction.date) {
            *totals_by_day
                .entry(transaction.date)
                .or_insert(Decimal::ZERO) += transaction.amount;
        }
    }

    let (dates, values) = totals_by_day.into_iter().unzip();

    DailySeries { dates, values }
}

/// Formats a month as a three-letter abbreviation and a four-digit year, e.g. "Jan 2025".
pub fn format_month_label(date: Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{month} {:04}", date.year())
}

fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
}

fn group_expenses<'a, F>(transactions: &'a [Transaction], key: F) -> Breakdown
where
    F: Fn(&'a Transaction) -> &'a String,
{
    let mut groups: HashMap<&str, Decimal> = HashMap::new();

    for transaction in expenses(transactions) {
        *groups
            .entry(key(transaction).as_str())
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    let mut sorted: Vec<(&str, Decimal)> = groups.into_iter().collect();
    sorted.sort_by(|(a_label, a_total), (b_label, b_total)| {
        b_total.cmp(a_total).then_with(|| a_label.cmp(b_label))
    });

    let (labels, values) = sorted
        .into_iter()
        .map(|(label, total)| (label.to_owned(), total))
        .unzip();

    Breakdown { labels, values }
}
