//! The response schema of the reporting API's dashboard endpoint.
//!
//! Deserializing into these types is the validation step: a payload with a
//! missing bucket, a missing KPI or a mistyped value is rejected before it
//! reaches the views.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Everything needed to render one district report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub kpi_data: KpiData,
    pub monthly_data: Vec<MonthlyTrendPoint>,
    pub comparison_data: Vec<ComparisonPoint>,
    pub fund_data: Vec<FundSlice>,
}

/// The six headline numbers for a district and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub households: KpiValue,
    pub work_days: KpiValue,
    pub funds: KpiValue,
    pub completed: KpiValue,
    pub average_wage: KpiValue,
    pub completion_rate: KpiValue,
    /// Signed percentage relative to the previous month, e.g. "+4.2".
    #[serde(default)]
    pub change: Option<String>,
}

/// A KPI is either a raw number or a string the backend has already
/// formatted for display (e.g. "₹12L").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(serde_json::Number),
    Text(String),
}

impl Display for KpiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KpiValue::Number(number) => write!(f, "{number}"),
            KpiValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for KpiValue {
    fn from(value: i64) -> Self {
        KpiValue::Number(value.into())
    }
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        KpiValue::Text(value.to_owned())
    }
}

/// Series name of the monthly trend, also its JSON key.
pub const WORK_DAYS_SERIES: &str = "Work Days (in Lakhs)";
/// Series name of the district comparison, also its JSON key.
pub const EXPENDITURE_SERIES: &str = "Expenditure (Cr)";

/// One month of the work-day trend. Points arrive in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub name: String,
    #[serde(rename = "Work Days (in Lakhs)")]
    pub work_days: f64,
}

/// One district's expenditure, used for the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub name: String,
    #[serde(rename = "Expenditure (Cr)")]
    pub expenditure: f64,
}

/// One category of fund utilisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSlice {
    pub name: String,
    pub value: f64,
}

/// The body the reporting API sends with a non-success status.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
}
