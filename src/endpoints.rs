//! The endpoint URIs served by the application.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The report fragment that htmx polls while a report is loading.
pub const DASHBOARD_REPORT: &str = "/dashboard/report";

/// The route for changing the selected district.
pub const DISTRICT_SELECTION: &str = "/api/selection/district";
/// The route for changing the selected reporting period.
pub const PERIOD_SELECTION: &str = "/api/selection/period";
