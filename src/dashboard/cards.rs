//! Summary cards with the income, expense, balance and transaction count totals.

use maud::{Markup, html};

use crate::{aggregation::Totals, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";
const CARD_LABEL_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

/// Renders one card per total in a responsive grid.
pub(crate) fn totals_cards(totals: &Totals) -> Markup {
    let balance_style = if totals.net.is_sign_negative() {
        "text-red-600 dark:text-red-400"
    } else {
        "text-blue-600 dark:text-blue-400"
    };

    html! {
        section
            id="totals"
            class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-8"
        {
            (card("total-income", "Total Income", &format_currency(totals.income),
                "text-green-600 dark:text-green-400"))
            (card("total-expense", "Total Expenses", &format_currency(totals.expense),
                "text-red-600 dark:text-red-400"))
            (card("balance", "Balance", &format_currency(totals.net), balance_style))
            (card("transaction-count", "Transactions", &totals.count.to_string(),
                "text-gray-900 dark:text-white"))
        }
    }
}

fn card(id: &str, label: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            span class=(CARD_LABEL_STYLE) { (label) }
            span data-value="true" class={(CARD_VALUE_STYLE) " " (value_style)} { (value) }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};

    use crate::aggregation::Totals;

    use super::totals_cards;

    fn card_value(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} [data-value]")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find card {id}"))
            .text()
            .collect()
    }

    #[test]
    fn renders_each_total() {
        let totals = Totals {
            income: Decimal::new(2000, 0),
            expense: Decimal::new(15050, 2),
            net: Decimal::new(184950, 2),
            count: 3,
        };

        let html = Html::parse_fragment(&totals_cards(&totals).into_string());

        assert_eq!(card_value(&html, "total-income"), "$2,000.00");
        assert_eq!(card_value(&html, "total-expense"), "$150.50");
        assert_eq!(card_value(&html, "balance"), "$1,849.50");
        assert_eq!(card_value(&html, "transaction-count"), "3");
    }

    #[test]
    fn negative_balance_is_red() {
        let totals = Totals {
            income: Decimal::ZERO,
            expense: Decimal::TEN,
            net: -Decimal::TEN,
            count: 1,
        };

        let html = Html::parse_fragment(&totals_cards(&totals).into_string());

        assert_eq!(card_value(&html, "balance"), "-$10.00");
        let balance = html
            .select(&Selector::parse("#balance [data-value]").unwrap())
            .next()
            .unwrap();
        assert!(balance.value().attr("class").unwrap().contains("text-red-600"));
    }
}
