//! The dashboard's view state: the current selection and what is known about
//! the report for it.
//!
//! Every selection change starts a new fetch cycle identified by a
//! [FetchTicket]. Only the completion carrying the latest ticket is applied;
//! completions for earlier tickets are dropped, so a slow response for an old
//! selection can never overwrite the report for the current one.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    dashboard::{client::FetchError, payload::DashboardData, selection::Selection},
    district::{District, Period},
};

/// What the report area should display.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No fetch cycle has started yet.
    Idle,
    /// A request for the current selection is in flight.
    Loading,
    /// The latest request failed with this user-facing message.
    Error(String),
    /// The latest request succeeded.
    Ready(Arc<DashboardData>),
}

impl LoadState {
    /// Whether the report is still waiting on a request.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Idle | LoadState::Loading)
    }
}

/// A snapshot of the dashboard view state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Selection,
    pub load_state: LoadState,
    /// The sequence number of the latest fetch cycle, zero before the first.
    pub sequence: u64,
}

/// Identifies one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub sequence: u64,
    pub selection: Selection,
}

/// Shared handle to the dashboard view state.
///
/// Cloning the session gives another handle to the same state.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    view: Arc<watch::Sender<DashboardView>>,
}

impl DashboardSession {
    pub fn new(selection: Selection) -> Self {
        let (sender, _) = watch::channel(DashboardView {
            selection,
            load_state: LoadState::Idle,
            sequence: 0,
        });

        Self {
            view: Arc::new(sender),
        }
    }

    /// A copy of the current view state.
    pub fn snapshot(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Change the district and start a new fetch cycle for the result.
    pub fn set_district(&self, district: District) -> FetchTicket {
        self.change_selection(|selection| selection.set_district(district))
    }

    /// Change the period and start a new fetch cycle for the result.
    pub fn set_period(&self, period: Period) -> FetchTicket {
        self.change_selection(|selection| selection.set_period(period))
    }

    /// Start the first fetch cycle if none has been started yet.
    pub fn start_if_idle(&self) -> Option<FetchTicket> {
        let mut ticket = None;

        self.view.send_if_modified(|view| {
            if view.load_state != LoadState::Idle {
                return false;
            }

            ticket = Some(begin_cycle(view));
            true
        });

        ticket
    }

    fn change_selection(&self, change: impl FnOnce(&mut Selection)) -> FetchTicket {
        let mut ticket = FetchTicket {
            sequence: 0,
            selection: Selection::default(),
        };

        self.view.send_modify(|view| {
            change(&mut view.selection);
            ticket = begin_cycle(view);
        });

        tracing::info!(
            "selection changed to {}, starting fetch cycle {}",
            ticket.selection,
            ticket.sequence
        );

        ticket
    }

    /// Record the outcome of the fetch cycle identified by `ticket`.
    ///
    /// Returns `false` and leaves the state untouched if a newer cycle has
    /// started since `ticket` was issued.
    pub fn complete(
        &self,
        ticket: FetchTicket,
        outcome: Result<DashboardData, FetchError>,
    ) -> bool {
        self.view.send_if_modified(|view| {
            if view.sequence != ticket.sequence {
                tracing::debug!(
                    "discarding stale result of fetch cycle {} for {}, current cycle is {}",
                    ticket.sequence,
                    ticket.selection,
                    view.sequence
                );
                return false;
            }

            view.load_state = match outcome {
                Ok(data) => LoadState::Ready(Arc::new(data)),
                Err(error) => LoadState::Error(error.to_string()),
            };

            true
        })
    }

    /// Wait until the current fetch cycle has settled and return the view.
    pub async fn settled(&self) -> DashboardView {
        let mut receiver = self.view.subscribe();

        match receiver
            .wait_for(|view| !view.load_state.is_loading())
            .await
        {
            Ok(view) => view.clone(),
            // The sender lives as long as `self`, so the channel cannot close
            // while we wait on it.
            Err(_) => self.snapshot(),
        }
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

/// Discard the current report and issue the ticket for the next cycle.
fn begin_cycle(view: &mut DashboardView) -> FetchTicket {
    view.sequence += 1;
    view.load_state = LoadState::Loading;

    FetchTicket {
        sequence: view.sequence,
        selection: view.selection,
    }
}
