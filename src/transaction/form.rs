//! The transaction form shared by the new and edit pages, and validation of its submissions.

use std::str::FromStr;

use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{DEFAULT_PAYMENT_MODE, Transaction, TransactionBuilder, TransactionType},
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The largest amount that can be recorded, i.e. ten significant digits.
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// The fields submitted by the new and edit transaction forms.
///
/// Every field is kept as text so that validation can report which field was wrong.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionForm {
    /// "income" or "expense". Defaults to expense when absent.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
    /// The amount in dollars, e.g. "12.30".
    #[serde(default)]
    pub amount: Option<String>,
    /// The category name.
    #[serde(default)]
    pub category: Option<String>,
    /// What the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// The date formatted as "YYYY-MM-DD".
    #[serde(default)]
    pub date: Option<String>,
    /// How the money was paid. Defaults to "Cash" when absent.
    #[serde(default)]
    pub payment: Option<String>,
}

impl RawTransactionForm {
    /// Check the submitted fields and convert them into a [TransactionBuilder].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingRequiredFields] if amount, category or date is empty,
    /// - [Error::InvalidAmount] if the amount is not a number with at most two decimal
    ///   places and ten significant digits,
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - [Error::InvalidTransactionType] if the type is neither income nor expense,
    /// - [Error::InvalidDate] if the date is not a valid "YYYY-MM-DD" date.
    pub fn validate(&self) -> Result<TransactionBuilder, Error> {
        let (Some(raw_amount), Some(category), Some(raw_date)) = (
            non_empty(&self.amount),
            non_empty(&self.category),
            non_empty(&self.date),
        ) else {
            return Err(Error::MissingRequiredFields);
        };

        let amount = parse_amount(raw_amount)?;

        let transaction_type = match non_empty(&self.transaction_type) {
            Some(raw_type) => raw_type.parse()?,
            None => TransactionType::Expense,
        };

        let date = Date::parse(raw_date, DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(raw_date.to_owned()))?;

        let payment_mode = non_empty(&self.payment).unwrap_or(DEFAULT_PAYMENT_MODE);
        let description = self.description.as_deref().unwrap_or_default().trim();

        Ok(
            Transaction::build(transaction_type, amount, category, date)
                .payment_mode(payment_mode)
                .description(description),
        )
    }
}

impl From<&Transaction> for RawTransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            transaction_type: Some(transaction.transaction_type.as_str().to_owned()),
            amount: Some(transaction.amount.to_string()),
            category: Some(transaction.category.clone()),
            description: Some(transaction.description.clone()),
            date: Some(transaction.date.to_string()),
            payment: Some(transaction.payment_mode.clone()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_amount(raw_amount: &str) -> Result<Decimal, Error> {
    let mut amount =
        Decimal::from_str(raw_amount).map_err(|_| Error::InvalidAmount(raw_amount.to_owned()))?;

    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount);
    }

    amount = amount.normalize();

    if amount.scale() > 2 || amount > MAX_AMOUNT {
        return Err(Error::InvalidAmount(raw_amount.to_owned()));
    }

    amount.rescale(2);

    Ok(amount)
}

/// Render the inputs of the transaction form, prefilled with `values`.
///
/// `categories` are offered as suggestions for the category input.
pub fn transaction_form_fields(values: &RawTransactionForm, categories: &[String]) -> Markup {
    let is_income = values
        .transaction_type
        .as_deref()
        .is_some_and(|raw_type| raw_type.eq_ignore_ascii_case("income"));
    let payment = non_empty(&values.payment).unwrap_or(DEFAULT_PAYMENT_MODE);

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-expense"
                        type="radio"
                        value="expense"
                        checked[!is_income]
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for="transaction-type-expense" class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type"
                        id="transaction-type-income"
                        type="radio"
                        value="income"
                        checked[is_income]
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for="transaction-type-income" class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                autofocus
                value=[values.amount.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            input
                name="category"
                id="category"
                type="text"
                list="category-options"
                placeholder="e.g. Groceries"
                required
                value=[values.category.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-options"
            {
                @for category in categories {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                required
                value=[values.date.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="payment" class=(FORM_LABEL_STYLE) { "Payment mode" }

            input
                name="payment"
                id="payment"
                type="text"
                value=(payment)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[values.description.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod validate_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{Error, transaction::TransactionType};

    use super::RawTransactionForm;

    fn valid_form() -> RawTransactionForm {
        RawTransactionForm {
            transaction_type: Some("expense".to_owned()),
            amount: Some("12.3".to_owned()),
            category: Some("Food".to_owned()),
            description: Some("Lunch".to_owned()),
            date: Some("2025-10-05".to_owned()),
            payment: Some("Card".to_owned()),
        }
    }

    #[test]
    fn valid_form_builds_transaction() {
        let builder = valid_form().validate().unwrap();

        assert_eq!(builder.transaction_type, TransactionType::Expense);
        assert_eq!(builder.amount.to_string(), "12.30");
        assert_eq!(builder.category, "Food");
        assert_eq!(builder.description, "Lunch");
        assert_eq!(builder.date, date!(2025 - 10 - 05));
        assert_eq!(builder.payment_mode, "Card");
    }

    #[test]
    fn optional_fields_have_defaults() {
        let form = RawTransactionForm {
            transaction_type: None,
            description: None,
            payment: Some(String::new()),
            ..valid_form()
        };

        let builder = form.validate().unwrap();

        assert_eq!(builder.transaction_type, TransactionType::Expense);
        assert_eq!(builder.payment_mode, "Cash");
        assert_eq!(builder.description, "");
    }

    #[test]
    fn type_is_case_insensitive() {
        let form = RawTransactionForm {
            transaction_type: Some("INCOME".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            form.validate().unwrap().transaction_type,
            TransactionType::Income
        );
    }

    #[test]
    fn missing_required_fields() {
        let forms = [
            RawTransactionForm {
                amount: None,
                ..valid_form()
            },
            RawTransactionForm {
                category: Some("   ".to_owned()),
                ..valid_form()
            },
            RawTransactionForm {
                date: Some(String::new()),
                ..valid_form()
            },
        ];

        for form in forms {
            assert_eq!(form.validate(), Err(Error::MissingRequiredFields));
        }
    }

    #[test]
    fn rejects_invalid_amounts() {
        for amount in ["abc", "1.234", "100000000.00", "12.3.4"] {
            let form = RawTransactionForm {
                amount: Some(amount.to_owned()),
                ..valid_form()
            };

            assert_eq!(
                form.validate(),
                Err(Error::InvalidAmount(amount.to_owned())),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_largest_amount() {
        let form = RawTransactionForm {
            amount: Some("99999999.99".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            form.validate().unwrap().amount,
            Decimal::new(9_999_999_999, 2)
        );
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in ["0", "0.00", "-5"] {
            let form = RawTransactionForm {
                amount: Some(amount.to_owned()),
                ..valid_form()
            };

            assert_eq!(form.validate(), Err(Error::NonPositiveAmount));
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let form = RawTransactionForm {
            transaction_type: Some("transfer".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn rejects_invalid_date() {
        let form = RawTransactionForm {
            date: Some("2025-02-30".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::InvalidDate("2025-02-30".to_owned()))
        );
    }
}
