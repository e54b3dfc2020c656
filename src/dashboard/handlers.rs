//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and changing the selection
//! - HTML view functions for the page and the report fragment
//! - The state used by the handlers
//!
//! Selection changes return immediately with the loading view. The fetch runs
//! in the background and the loading view polls [endpoints::DASHBOARD_REPORT]
//! until the fetch cycle settles.

use std::time::Duration;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRequest;
use maud::{Markup, html};

use crate::{
    AppState,
    alert::error_alert,
    dashboard::{
        cards::kpi_cards_view,
        charts::{build_dashboard_charts, charts_script, charts_view},
        client::DashboardClient,
        fetch_cycle::spawn_fetch_cycle,
        selection::{DistrictForm, PeriodForm, Selection},
        session::{DashboardSession, DashboardView, FetchTicket, LoadState},
        visitor::VisitorSessions,
    },
    district::{District, Period, STATE_NAME},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, ECHARTS_CDN, FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
};

/// How long a report request waits for a loading report to settle before
/// answering with the loading view again.
const REPORT_SETTLE_WAIT: Duration = Duration::from_secs(2);

/// The state needed for the dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The view state of each visitor.
    pub sessions: VisitorSessions,
    /// The client used to fetch reports.
    pub client: DashboardClient,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            client: state.client.clone(),
        }
    }
}

impl DashboardState {
    fn start(&self, session: &DashboardSession, ticket: FetchTicket) {
        spawn_fetch_cycle(session.clone(), self.client.clone(), ticket);
    }

    fn start_if_idle(&self, session: &DashboardSession) {
        if let Some(ticket) = session.start_if_idle() {
            self.start(session, ticket);
        }
    }
}

/// Display the dashboard page.
///
/// The first view of the page starts the fetch cycle for the visitor's
/// default selection.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
) -> Response {
    let (jar, session) = state.sessions.session_for(jar);
    state.start_if_idle(&session);

    (jar, dashboard_view(&session.snapshot())).into_response()
}

/// Render the report area for htmx.
///
/// If the report is still loading, waits up to [REPORT_SETTLE_WAIT] for it to
/// settle. Requests that do not come from htmx are redirected to the full
/// page.
pub async fn get_dashboard_report(
    HxRequest(is_htmx_request): HxRequest,
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
) -> Response {
    if !is_htmx_request {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let (jar, session) = state.sessions.session_for(jar);
    state.start_if_idle(&session);

    let view = tokio::time::timeout(REPORT_SETTLE_WAIT, session.settled())
        .await
        .unwrap_or_else(|_| session.snapshot());

    (jar, report_view(&view)).into_response()
}

/// Change the visitor's district and start fetching its report.
pub async fn post_district_selection(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Form(form): Form<DistrictForm>,
) -> Response {
    let (jar, session) = state.sessions.session_for(jar);
    let ticket = session.set_district(form.district);
    state.start(&session, ticket);

    (jar, report_view(&session.snapshot())).into_response()
}

/// Change the visitor's period and start fetching its report.
pub async fn post_period_selection(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    Form(form): Form<PeriodForm>,
) -> Response {
    let (jar, session) = state.sessions.session_for(jar);
    let ticket = session.set_period(form.period);
    state.start(&session, ticket);

    (jar, report_view(&session.snapshot())).into_response()
}

fn dashboard_view(view: &DashboardView) -> Markup {
    let content = html!(
        (header_view())

        main class=(PAGE_CONTAINER_STYLE)
        {
            (selection_view(&view.selection))
            (report_view(view))
        }
    );

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_CDN)],
        &content,
    )
}

fn header_view() -> Markup {
    html!(
        header class="bg-indigo-700 text-white shadow-md"
        {
            div class="max-w-7xl mx-auto px-4 py-5"
            {
                h1 class="text-2xl font-bold" { "MGNREGA " (STATE_NAME) " Report" }
                p class="text-sm text-indigo-100" { "Monthly Performance Dashboard" }
            }
        }
    )
}

fn selection_view(selection: &Selection) -> Markup {
    html!(
        section
            id="selection"
            class="bg-white dark:bg-gray-800 p-5 rounded-xl shadow-lg border
                border-gray-200 dark:border-gray-700"
        {
            h2 class="text-lg font-semibold mb-4" { "Select Your Area" }

            div class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end"
            {
                div
                {
                    label for="state" class=(FORM_LABEL_STYLE) { "State" }
                    select id="state" name="state" disabled class=(FORM_SELECT_STYLE)
                    {
                        option value=(STATE_NAME) selected { (STATE_NAME) }
                    }
                }

                div
                {
                    label for="district" class=(FORM_LABEL_STYLE) { "District" }
                    select
                        id="district"
                        name="district"
                        class=(FORM_SELECT_STYLE)
                        hx-post=(endpoints::DISTRICT_SELECTION)
                        hx-trigger="change"
                        hx-target="#report"
                        hx-swap="outerHTML"
                    {
                        @for district in District::all() {
                            option
                                value=(district.as_str())
                                selected[district == selection.district]
                            {
                                (district.as_str())
                            }
                        }
                    }
                }

                div
                {
                    label for="period" class=(FORM_LABEL_STYLE) { "Period" }
                    select
                        id="period"
                        name="period"
                        class=(FORM_SELECT_STYLE)
                        hx-post=(endpoints::PERIOD_SELECTION)
                        hx-trigger="change"
                        hx-target="#report"
                        hx-swap="outerHTML"
                    {
                        @for period in Period::ALL {
                            option
                                value=(period.as_query_value())
                                selected[period == selection.period]
                            {
                                (period.label())
                            }
                        }
                    }
                }

                // Location lookup is not available, the button is shown for layout only.
                button id="detect-location" type="button" class=(BUTTON_SECONDARY_STYLE)
                {
                    "Detect My Location"
                }
            }
        }
    )
}

/// The report area for the current view state.
///
/// Every variant renders a single element with the ID `report` so that htmx
/// can swap it in place.
pub(super) fn report_view(view: &DashboardView) -> Markup {
    match &view.load_state {
        LoadState::Idle | LoadState::Loading => html!(
            section
                id="report"
                hx-get=(endpoints::DASHBOARD_REPORT)
                hx-trigger="load delay:500ms"
                hx-swap="outerHTML"
                class="flex flex-col items-center justify-center gap-3 py-16"
                aria-busy="true"
            {
                (loading_spinner())
                p class="text-gray-600 dark:text-gray-400" { "Loading Data..." }
            }
        ),
        LoadState::Error(message) => html!(
            section id="report"
            {
                (error_alert(message))
            }
        ),
        LoadState::Ready(data) => {
            let charts = build_dashboard_charts(data);

            html!(
                section id="report" class="flex flex-col gap-6"
                {
                    h2 class="text-xl font-semibold"
                    {
                        "Report for: " (view.selection.district.as_str()) ", " (STATE_NAME)
                    }

                    (kpi_cards_view(&data.kpi_data))
                    (charts_view(&charts))
                    (charts_script(&charts))
                }
            )
        }
    }
}
