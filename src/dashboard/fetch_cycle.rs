//! Runs one fetch cycle: request the report for a ticket's selection and
//! record the outcome in the session.

use tokio::task::JoinHandle;

use crate::dashboard::{
    client::{DashboardClient, FetchError},
    payload::DashboardData,
    session::{DashboardSession, FetchTicket},
};

/// Settles a fetch cycle exactly once.
///
/// If the guard is dropped before [CycleGuard::settle] is called, e.g. because
/// the task was aborted or panicked, the cycle is settled as
/// [FetchError::Interrupted] so the view never stays in the loading state.
struct CycleGuard {
    session: DashboardSession,
    ticket: Option<FetchTicket>,
}

impl CycleGuard {
    fn new(session: DashboardSession, ticket: FetchTicket) -> Self {
        Self {
            session,
            ticket: Some(ticket),
        }
    }

    fn settle(mut self, outcome: Result<DashboardData, FetchError>) {
        if let Some(ticket) = self.ticket.take() {
            self.session.complete(ticket, outcome);
        }
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            tracing::warn!(
                "fetch cycle {} for {} ended without a result",
                ticket.sequence,
                ticket.selection
            );
            self.session.complete(ticket, Err(FetchError::Interrupted));
        }
    }
}

/// Fetch the report for `ticket` and record the outcome in `session`.
pub async fn run_fetch_cycle(
    session: DashboardSession,
    client: DashboardClient,
    ticket: FetchTicket,
) {
    let guard = CycleGuard::new(session, ticket);
    let outcome = client.fetch(&ticket.selection).await;

    match &outcome {
        Ok(_) => tracing::info!("fetch cycle {} succeeded", ticket.sequence),
        Err(error) => tracing::info!("fetch cycle {} failed: {error}", ticket.sequence),
    }

    guard.settle(outcome);
}

/// Run [run_fetch_cycle] in the background.
pub fn spawn_fetch_cycle(
    session: DashboardSession,
    client: DashboardClient,
    ticket: FetchTicket,
) -> JoinHandle<()> {
    tokio::spawn(run_fetch_cycle(session, client, ticket))
}
