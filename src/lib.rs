//! A monthly performance dashboard for the MGNREGA rural employment scheme.
//!
//! Visitors pick a district of Odisha and a reporting period, and the app
//! shows the headline figures and charts for that selection. Report data is
//! fetched from a separate reporting API.
//!
//! This library provides a web server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod district;
mod endpoints;
mod html;
mod logging;
mod not_found;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use dashboard::DashboardConfig;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur while setting up the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The reporting API URL is not an absolute `http` or `https` URL.
    ///
    /// Callers should pass in the URL that was rejected and the reason it was
    /// rejected.
    #[error("invalid backend URL \"{0}\": {1}")]
    InvalidBackendUrl(String, String),

    /// The HTTP client for the reporting API could not be created.
    #[error("could not create the HTTP client: {0}")]
    HttpClient(String),
}
