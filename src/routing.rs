//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{
        get_dashboard_page, get_dashboard_report, post_district_selection, post_period_selection,
    },
    endpoints,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_REPORT, get(get_dashboard_report))
        .route(endpoints::DISTRICT_SELECTION, post(post_district_selection))
        .route(endpoints::PERIOD_SELECTION, post(post_period_selection))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
