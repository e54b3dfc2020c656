//! Chart generation and rendering for the district report.
//!
//! This module creates interactive ECharts visualizations from the report data:
//! - **Monthly Trend**: work days per month as a line chart
//! - **District Comparison**: expenditure of the top districts as horizontal bars
//! - **Fund Utilization**: share of funds per category as a pie chart
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a titled HTML container and JavaScript initialization code.
//! The charts are pure functions of their input: points are plotted in the
//! order the backend sent them.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{AxisType, Color, Tooltip, Trigger},
    series::{Line, Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::payload::{
        ComparisonPoint, DashboardData, EXPENDITURE_SERIES, FundSlice, MonthlyTrendPoint,
        WORK_DAYS_SERIES,
    },
    html::CARD_STYLE,
};

/// Line color of the monthly trend.
const TREND_COLOR: &str = "#4f46e5";
/// Bar color of the district comparison.
const COMPARISON_COLOR: &str = "#10b981";
/// Fund slices take these colors in turn.
pub(super) const PIE_COLORS: [&str; 3] = ["#4f46e5", "#10b981", "#f59e0b"];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The heading shown above the chart
    pub title: &'static str,
    /// The number of data points plotted
    pub entries: usize,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Creates the three report charts from the report data.
pub(super) fn build_dashboard_charts(data: &DashboardData) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "monthly-trend-chart",
            title: "Monthly Trend (Work Days)",
            entries: data.monthly_data.len(),
            options: monthly_trend_chart(&data.monthly_data).to_string(),
        },
        DashboardChart {
            id: "district-comparison-chart",
            title: "Top 10 Districts (Expenditure)",
            entries: data.comparison_data.len(),
            options: district_comparison_chart(&data.comparison_data).to_string(),
        },
        DashboardChart {
            id: "fund-breakdown-chart",
            title: "Fund Utilization",
            entries: data.fund_data.len(),
            options: fund_breakdown_chart(&data.fund_data).to_string(),
        },
    ]
}

/// Renders a titled panel with an empty container for each chart.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="grid grid-cols-1 lg:grid-cols-3 gap-6"
        {
            @for chart in charts {
                div
                    class=(CARD_STYLE)
                {
                    h3 class="text-lg font-semibold text-gray-800 dark:text-white mb-4"
                    {
                        (chart.title)
                    }

                    div
                        id=(chart.id)
                        data-entries=(chart.entries)
                        class="h-80 rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates a script that initializes the chart containers rendered by
/// [charts_view].
///
/// The script runs as soon as it is inserted, so it must be placed after the
/// containers. This holds both for the full page and for report fragments
/// swapped in by htmx.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
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
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!(script { (PreEscaped(script_content)) })
}

/// Escapes `<` in JSON destined for an inline script.
///
/// Strings in the chart options come from the reporting API, so a name such
/// as `</script>` must not end the script element. `<` only occurs inside
/// JSON strings, where `\u003c` decodes to the same text.
fn escape_script_text(json: &str) -> String {
    json.replace('<', "\\u003c")
}

pub(super) fn monthly_trend_chart(points: &[MonthlyTrendPoint]) -> Chart {
    let labels = points
        .iter()
        .map(|point| point.name.as_str())
        .collect::<Vec<_>>();
    let values = points
        .iter()
        .map(|point| point.work_days)
        .collect::<Vec<_>>();

    Chart::new()
        .color(vec![Color::from(TREND_COLOR)])
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name(WORK_DAYS_SERIES).data(values))
}

pub(super) fn district_comparison_chart(points: &[ComparisonPoint]) -> Chart {
    let labels = points
        .iter()
        .map(|point| point.name.as_str())
        .collect::<Vec<_>>();
    let values = points
        .iter()
        .map(|point| point.expenditure)
        .collect::<Vec<_>>();

    Chart::new()
        .color(vec![Color::from(COMPARISON_COLOR)])
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Value))
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(bar::Bar::new().name(EXPENDITURE_SERIES).data(values))
}

pub(super) fn fund_breakdown_chart(slices: &[FundSlice]) -> Chart {
    let data = slices
        .iter()
        .map(|slice| (slice.value, slice.name.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .color(fund_colors(slices.len()))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new())
        .series(Pie::new().name("Fund Utilization").data(data))
}

/// One color per fund slice, cycling through [PIE_COLORS].
fn fund_colors(count: usize) -> Vec<Color> {
    PIE_COLORS
        .iter()
        .cycle()
        .take(count.max(1))
        .map(|color| Color::from(*color))
        .collect()
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use serde_json::Value;

    use crate::test_utils::{count_matches, full_data, sample_data};

    use super::{
        PIE_COLORS, build_dashboard_charts, charts_script, charts_view,
        district_comparison_chart, escape_script_text, fund_breakdown_chart, fund_colors,
        monthly_trend_chart,
    };

    fn chart_json(chart: charming::Chart) -> Value {
        serde_json::from_str(&chart.to_string()).expect("chart options should be valid JSON")
    }

    fn first_series(options: &Value) -> &Value {
        let series = &options["series"];
        if series.is_array() {
            &series[0]
        } else {
            series
        }
    }

    #[test]
    fn monthly_trend_plots_points_in_order() {
        let data = full_data();
        let options = chart_json(monthly_trend_chart(&data.monthly_data));
        let series = first_series(&options);

        assert_eq!(series["type"], "line");
        assert_eq!(series["name"], "Work Days (in Lakhs)");
        assert_eq!(series["data"].as_array().unwrap().len(), 3);

        let options = options.to_string();
        let jul = options.find("\"Jul\"").unwrap();
        let aug = options.find("\"Aug\"").unwrap();
        let sep = options.find("\"Sep\"").unwrap();
        assert!(jul < aug && aug < sep, "months are out of order: {options}");
    }

    #[test]
    fn district_comparison_uses_bar_series() {
        let data = full_data();
        let options = chart_json(district_comparison_chart(&data.comparison_data));
        let series = first_series(&options);

        assert_eq!(series["type"], "bar");
        assert_eq!(series["name"], "Expenditure (Cr)");
        assert_eq!(series["data"].as_array().unwrap().len(), 2);
        assert!(options.to_string().contains("Mayurbhanj"));
    }

    #[test]
    fn fund_breakdown_has_one_slice_per_category() {
        let data = full_data();
        let options = chart_json(fund_breakdown_chart(&data.fund_data));
        let series = first_series(&options);

        assert_eq!(series["type"], "pie");
        assert_eq!(series["data"].as_array().unwrap().len(), 4);
        assert!(options.to_string().contains("Administrative"));
    }

    #[test]
    fn fund_colors_cycle_through_palette() {
        let colors = fund_colors(4)
            .into_iter()
            .map(|color| serde_json::to_value(color).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0], PIE_COLORS[0]);
        assert_eq!(colors[2], PIE_COLORS[2]);
        assert_eq!(colors[3], PIE_COLORS[0]);
    }

    #[test]
    fn chart_containers_report_entry_counts() {
        let charts = build_dashboard_charts(&full_data());
        let html = Html::parse_fragment(&charts_view(&charts).into_string());

        assert_eq!(count_matches(&html, "#monthly-trend-chart[data-entries='3']"), 1);
        assert_eq!(
            count_matches(&html, "#district-comparison-chart[data-entries='2']"),
            1
        );
        assert_eq!(count_matches(&html, "#fund-breakdown-chart[data-entries='4']"), 1);
    }

    #[test]
    fn empty_series_render_zero_entries() {
        let charts = build_dashboard_charts(&sample_data());
        let html = Html::parse_fragment(&charts_view(&charts).into_string());

        assert_eq!(count_matches(&html, "[data-entries]"), 3);
        assert_eq!(count_matches(&html, "[data-entries='0']"), 3);
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = build_dashboard_charts(&full_data());
        let script = charts_script(&charts).into_string();

        for chart in &charts {
            assert!(
                script.contains(&format!("getElementById(\"{}\")", chart.id)),
                "no initialization for {}",
                chart.id
            );
        }
    }

    #[test]
    fn escaped_options_decode_to_the_same_json() {
        let json = r#"{"name":"</script><b>Wages</b>"}"#;

        let escaped = escape_script_text(json);

        assert!(!escaped.contains('<'));
        let decoded: Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(decoded["name"], "</script><b>Wages</b>");
    }

    #[test]
    fn backend_names_cannot_close_the_script() {
        let mut data = full_data();
        data.fund_data[0].name = "</script><img src=x onerror=alert(1)>".to_owned();
        data.monthly_data[0].name = "<!--Jul".to_owned();
        let charts = build_dashboard_charts(&data);

        let script = charts_script(&charts).into_string();

        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.ends_with("</script>"));
        assert!(!script.contains("<img"));
        assert!(!script.contains("<!--"));
        assert!(script.contains(r"\u003c/script>\u003cimg src=x onerror=alert(1)>"));
    }
}
