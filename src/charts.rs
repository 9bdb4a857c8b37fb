//! ECharts chart options and their HTML containers.
//!
//! Charts are built with `charming` from the decimal summaries in
//! [crate::aggregation]. Amounts become floats here and nowhere else.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    aggregation::{Breakdown, DailySeries, MonthlySeries},
    html::HeadElement,
};

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JavaScript object literal
    pub options: String,
}

impl PageChart {
    pub fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders a grid of empty containers that the chart script fills in.
pub fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart="true"
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initializes each chart once the page has loaded.
///
/// Charts follow the browser's dark mode preference and resize with the window.
pub fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A doughnut chart of `breakdown`, e.g. expenses per category.
pub fn breakdown_pie_chart(title: &str, subtitle: &str, breakdown: &Breakdown) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(label, value)| (to_chart_value(value), label))
        .collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// A line chart of monthly income and expenses.
pub fn monthly_line_chart(title: &str, subtitle: &str, series: &MonthlySeries) -> Chart {
    monthly_axes(title, subtitle, series)
        .series(
            Line::new()
                .name("Income")
                .data(to_chart_values(&series.income)),
        )
        .series(
            Line::new()
                .name("Expense")
                .data(to_chart_values(&series.expense)),
        )
}

/// A grouped bar chart of monthly income and expenses.
pub fn monthly_bar_chart(title: &str, subtitle: &str, series: &MonthlySeries) -> Chart {
    monthly_axes(title, subtitle, series)
        .series(
            bar::Bar::new()
                .name("Income")
                .data(to_chart_values(&series.income)),
        )
        .series(
            bar::Bar::new()
                .name("Expense")
                .data(to_chart_values(&series.expense)),
        )
}

/// A line chart of expenses per day.
pub fn daily_line_chart(title: &str, subtitle: &str, series: &DailySeries) -> Chart {
    let labels: Vec<String> = series.dates.iter().map(|date| date.to_string()).collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(currency_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Expenses")
                .data(to_chart_values(&series.values)),
        )
}

fn monthly_axes(title: &str, subtitle: &str, series: &MonthlySeries) -> Chart {
    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(70)
        .contain_label(true)
}

/// Converts an amount to a float for chart data.
pub fn to_chart_value(amount: Decimal) -> f64 {
    amount.round_dp(2).to_f64().unwrap_or_default()
}

fn to_chart_values(amounts: &[Decimal]) -> Vec<f64> {
    amounts.iter().copied().map(to_chart_value).collect()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
