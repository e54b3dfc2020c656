//! HTTP client for the reporting API's dashboard endpoint.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::{
    Error,
    dashboard::{
        payload::{DashboardData, ErrorBody},
        selection::Selection,
    },
};

/// The path of the dashboard endpoint, relative to the backend base URL.
pub const DASHBOARD_API_PATH: &str = "/api/data/dashboard";

/// Shown when a failure carries no description of its own.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch data. Please try again.";

/// Why a fetch cycle failed.
///
/// The `Display` output of each variant is the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The backend rejected the request and explained why.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the request without a usable explanation.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request never completed, e.g. connection refused or timed out.
    #[error("{}", transport_message(.0))]
    Transport(String),

    /// The backend answered with a success status but the body does not
    /// match [DashboardData].
    #[error("The server returned an unexpected response: {0}")]
    MalformedResponse(String),

    /// The fetch task ended before it could record an outcome.
    #[error("{}", GENERIC_FETCH_ERROR)]
    Interrupted,
}

fn transport_message(description: &str) -> &str {
    if description.is_empty() {
        GENERIC_FETCH_ERROR
    } else {
        description
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}

/// Where to find the reporting API and how long to wait for it.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// The base URL of the reporting API, e.g. `http://localhost:5000`.
    pub backend_url: Url,
    /// How long to wait for a response before failing the request.
    pub request_timeout: Duration,
}

impl DashboardConfig {
    /// Default time to wait for the backend before giving up on a request.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a config for the backend at `backend_url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidBackendUrl] if `backend_url` is not an absolute
    /// `http` or `https` URL.
    pub fn new(backend_url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let url = Url::parse(backend_url.trim()).map_err(|error| {
            Error::InvalidBackendUrl(backend_url.to_owned(), error.to_string())
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidBackendUrl(
                backend_url.to_owned(),
                format!("unsupported scheme \"{}\"", url.scheme()),
            ));
        }

        Ok(Self {
            backend_url: url,
            request_timeout,
        })
    }
}

/// Fetches dashboard reports from the reporting API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    endpoint: String,
    http: reqwest::Client,
}

impl DashboardClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// Returns [Error::HttpClient] if the underlying HTTP client cannot be
    /// initialised (e.g. the TLS backend failed to load).
    pub fn new(config: &DashboardConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mgnrega-report/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        let base = config.backend_url.as_str().trim_end_matches('/');

        Ok(Self {
            endpoint: format!("{base}{DASHBOARD_API_PATH}"),
            http,
        })
    }

    /// The full URL requests are sent to, without the query string.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request the report for `selection`.
    ///
    /// # Errors
    /// See [FetchError] for the ways a request can fail.
    pub async fn fetch(&self, selection: &Selection) -> Result<DashboardData, FetchError> {
        tracing::debug!("requesting dashboard data for {selection}");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("district", selection.district.as_str()),
                ("period", selection.period.as_query_value()),
            ])
            .send()
            .await
            .inspect_err(|error| tracing::error!("dashboard request failed: {error}"))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .inspect_err(|error| tracing::error!("could not read dashboard response: {error}"))?;

        if !status.is_success() {
            let error = error_from_body(status.as_u16(), &body);
            tracing::error!("backend returned {status} for {selection}: {error}");
            return Err(error);
        }

        serde_json::from_slice(&body)
            .inspect_err(|error| tracing::error!("malformed dashboard payload: {error}"))
            .map_err(|error| FetchError::MalformedResponse(error.to_string()))
    }
}

/// Turn the body of a non-success response into a [FetchError], preferring
/// the backend's own `message` over the bare status code.
fn error_from_body(status: u16, body: &[u8]) -> FetchError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => FetchError::Api { status, message },
        _ => FetchError::Status(status),
    }
}
