//! Dashboard module
//!
//! Provides the district report page: the area selectors, the headline KPI
//! cards and the charts, fed by the remote reporting API.

mod cards;
mod charts;
mod client;
mod fetch_cycle;
mod handlers;
mod payload;
mod selection;
mod session;
mod visitor;

pub use client::{DashboardClient, DashboardConfig};
pub use handlers::{
    get_dashboard_page, get_dashboard_report, post_district_selection, post_period_selection,
};
pub use visitor::VisitorSessions;

#[cfg(test)]
pub(crate) use {
    client::DASHBOARD_API_PATH, payload::DashboardData, visitor::COOKIE_VISITOR_ID,
};
