//! The table of the most recent transactions on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::{Transaction, TransactionType},
};

pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        section id="recent-transactions" class="w-full mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                @match transaction.transaction_type {
                                    TransactionType::Income => td
                                        class="px-6 py-4 text-right text-green-700 dark:text-green-300"
                                    {
                                        "+" (format_currency(transaction.amount))
                                    },
                                    TransactionType::Expense => td
                                        class="px-6 py-4 text-right text-red-700 dark:text-red-300"
                                    {
                                        "-" (format_currency(transaction.amount))
                                    },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
