//! Breakdown tables for the reports page.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    aggregation::{Breakdown, CategorySummary},
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// Lists the categories with the largest expense totals.
pub(super) fn top_categories_table(summaries: &[CategorySummary]) -> Markup {
    html! {
        div id="top-categories"
        {
            h3 class="text-xl font-semibold mb-4" { "Top Expense Categories" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Total" }
                            th scope="col" class="px-6 py-3 text-right" { "Transactions" }
                        }
                    }

                    tbody
                    {
                        @for summary in summaries {
                            tr class=(TABLE_ROW_STYLE) data-row="true"
                            {
                                td class=(TABLE_CELL_STYLE) { (summary.category) }
                                td class="px-6 py-4 text-right" { (format_currency(summary.total)) }
                                td class="px-6 py-4 text-right" { (summary.count) }
                            }
                        }

                        @if summaries.is_empty() {
                            (empty_row(3))
                        }
                    }
                }
            }
        }
    }
}

/// Lists expense totals per payment mode with each mode's share of all expenses.
pub(super) fn payment_modes_table(breakdown: &Breakdown) -> Markup {
    let total: Decimal = breakdown.values.iter().sum();

    html! {
        div id="payment-modes"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Payment Mode" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Payment Mode" }
                            th scope="col" class="px-6 py-3 text-right" { "Total" }
                            th scope="col" class="px-6 py-3 text-right" { "Share" }
                        }
                    }

                    tbody
                    {
                        @for (mode, amount) in breakdown.iter() {
                            tr class=(TABLE_ROW_STYLE) data-row="true"
                            {
                                td class=(TABLE_CELL_STYLE) { (mode) }
                                td class="px-6 py-4 text-right" { (format_currency(amount)) }
                                td class="px-6 py-4 text-right" { (format_share(amount, total)) }
                            }
                        }

                        @if breakdown.is_empty() {
                            (empty_row(3))
                        }
                    }
                }
            }
        }
    }
}

fn empty_row(columns: u8) -> Markup {
    html! {
        tr
        {
            td colspan=(columns) data-empty-state="true" class="px-6 py-4 text-center"
            {
                "No expenses in this period."
            }
        }
    }
}

/// Formats `amount` as a whole percentage of `total`.
fn format_share(amount: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "0%".to_owned();
    }

    let percent = (amount * Decimal::ONE_HUNDRED / total).round();
    format!("{percent}%")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};

    use crate::aggregation::{Breakdown, CategorySummary};

    use super::{format_share, payment_modes_table, top_categories_table};

    fn rows(html: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("tr[data-row]").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        html.select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn top_categories_lists_totals_and_counts() {
        let summaries = vec![CategorySummary {
            category: "Food".to_owned(),
            total: Decimal::new(15000, 2),
            count: 2,
        }];

        let html = Html::parse_fragment(&top_categories_table(&summaries).into_string());

        assert_eq!(rows(&html), vec![vec!["Food", "$150.00", "2"]]);
    }

    #[test]
    fn payment_modes_show_share() {
        let breakdown = Breakdown {
            labels: vec!["Card".to_owned(), "Cash".to_owned()],
            values: vec![Decimal::new(75, 0), Decimal::new(25, 0)],
        };

        let html = Html::parse_fragment(&payment_modes_table(&breakdown).into_string());

        assert_eq!(
            rows(&html),
            vec![
                vec!["Card", "$75.00", "75%"],
                vec!["Cash", "$25.00", "25%"]
            ]
        );
    }

    #[test]
    fn empty_tables_show_empty_state() {
        let html = Html::parse_fragment(&payment_modes_table(&Breakdown::default()).into_string());

        assert!(rows(&html).is_empty());
        assert_eq!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .count(),
            1
        );
    }

    #[test]
    fn share_of_zero_total_is_zero() {
        assert_eq!(format_share(Decimal::ZERO, Decimal::ZERO), "0%");
        assert_eq!(format_share(Decimal::ONE, Decimal::new(3, 0)), "33%");
    }
}
