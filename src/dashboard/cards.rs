//! Stat cards for the headline KPIs.

use maud::{Markup, html};

use crate::{dashboard::payload::KpiData, html::CARD_STYLE};

/// One headline number with its label.
pub(super) struct StatCard<'a> {
    pub title: &'a str,
    pub value: String,
    /// Decorative glyph shown next to the title.
    pub icon: &'a str,
    /// Printed after the value, e.g. "per day".
    pub unit: Option<&'a str>,
    /// Signed percentage change vs. last month, e.g. "+4.2".
    pub change: Option<&'a str>,
}

impl StatCard<'_> {
    pub fn into_html(self) -> Markup {
        html! {
            div
                class=(CARD_STYLE)
                data-kpi=(self.title)
            {
                div class="flex items-center space-x-3 mb-2"
                {
                    span class="text-indigo-600 text-xl" aria-hidden="true" { (self.icon) }
                    p class="text-sm font-medium text-gray-600 dark:text-gray-400" { (self.title) }
                }

                p class="kpi-value text-3xl font-bold text-gray-900 dark:text-white mb-2"
                {
                    (self.value)
                    @if let Some(unit) = self.unit {
                        " "
                        span class="text-lg ml-1 font-medium text-gray-500" { (unit) }
                    }
                }

                @if let Some(change) = self.change {
                    p class="kpi-change text-xs text-gray-500 dark:text-gray-400"
                    {
                        span class=(change_style(change)) { (format!("{change}%")) }
                        " vs. last month"
                    }
                }
            }
        }
    }
}

fn change_style(change: &str) -> &'static str {
    if change.starts_with('+') {
        "font-semibold text-green-600"
    } else {
        "font-semibold text-red-600"
    }
}

/// The six KPI cards, in display order.
pub(super) fn kpi_cards(kpi: &KpiData) -> Vec<StatCard<'_>> {
    vec![
        StatCard {
            title: "Households Employed",
            value: kpi.households.to_string(),
            icon: "👥",
            unit: None,
            change: kpi.change.as_deref(),
        },
        StatCard {
            title: "Total Work Days",
            value: kpi.work_days.to_string(),
            icon: "📅",
            unit: None,
            change: None,
        },
        StatCard {
            title: "Funds Disbursed",
            value: kpi.funds.to_string(),
            icon: "💵",
            unit: None,
            change: None,
        },
        StatCard {
            title: "Works Completed",
            value: kpi.completed.to_string(),
            icon: "✅",
            unit: None,
            change: None,
        },
        StatCard {
            title: "Average Wage Paid",
            value: kpi.average_wage.to_string(),
            icon: "₹",
            unit: Some("per day"),
            change: None,
        },
        StatCard {
            title: "Work Completion Rate",
            value: kpi.completion_rate.to_string(),
            icon: "%",
            unit: Some("%"),
            change: None,
        },
    ]
}

/// Renders the grid of KPI cards.
pub(super) fn kpi_cards_view(kpi: &KpiData) -> Markup {
    html! {
        div id="kpi-cards" class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-5"
        {
            @for card in kpi_cards(kpi) {
                (card.into_html())
            }
        }
    }
}
