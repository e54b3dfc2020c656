//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{
    Error,
    dashboard::{DashboardClient, DashboardConfig, VisitorSessions},
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for encrypting the visitor cookie.
    ///
    /// The key is generated at startup. Sessions live in memory, so cookies
    /// from an earlier run refer to sessions that no longer exist anyway.
    pub cookie_key: Key,

    /// The dashboard view state of each visitor.
    pub sessions: VisitorSessions,

    /// The client for the reporting API.
    pub client: DashboardClient,
}

impl AppState {
    /// Create a new [AppState] that fetches reports as described by `config`.
    ///
    /// No request is made until the dashboard is first viewed.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &DashboardConfig) -> Result<Self, Error> {
        let client = DashboardClient::new(config)
            .inspect_err(|error| tracing::error!("could not create dashboard client: {error}"))?;

        tracing::info!("fetching dashboard data from {}", client.endpoint());

        Ok(Self {
            cookie_key: Key::generate(),
            sessions: VisitorSessions::default(),
            client,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};

    use crate::dashboard::DashboardConfig;

    use super::AppState;

    #[test]
    fn starts_with_no_sessions_and_configured_endpoint() {
        let config = DashboardConfig::new(
            "http://localhost:5000/",
            DashboardConfig::DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap();

        let state = AppState::new(&config).unwrap();

        assert_eq!(
            state.client.endpoint(),
            "http://localhost:5000/api/data/dashboard"
        );
        assert_eq!(state.sessions.len(), 0);
    }

    #[test]
    fn first_session_is_idle() {
        let config = DashboardConfig::new(
            "http://localhost:5000/",
            DashboardConfig::DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap();
        let state = AppState::new(&config).unwrap();

        let (_, session) = state
            .sessions
            .session_for(PrivateCookieJar::new(Key::generate()));

        assert_eq!(session.snapshot().sequence, 0);
        assert!(session.snapshot().load_state.is_loading());
    }
}
