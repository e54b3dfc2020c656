//! A stand-in for the reporting API, served over real HTTP on a local port.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::dashboard::{DASHBOARD_API_PATH, DashboardData};

/// The status and JSON body the stub sends for one request.
pub(crate) type Reply = (StatusCode, Value);

type RequestLog = Arc<Mutex<Vec<(String, String)>>>;
type HeldReplies = Arc<Mutex<HashMap<(String, String), oneshot::Receiver<Reply>>>>;

#[derive(Deserialize)]
struct DashboardQuery {
    district: String,
    period: String,
}

pub(crate) struct StubBackend {
    address: SocketAddr,
    requests: RequestLog,
}

impl StubBackend {
    /// Serve `app`, recording the `district` and `period` of every request.
    pub(crate) async fn serve(app: Router) -> Self {
        let requests = RequestLog::default();
        let app = app.layer(middleware::from_fn_with_state(
            requests.clone(),
            record_request,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind stub backend");
        let address = listener
            .local_addr()
            .expect("Could not get stub backend address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub backend stopped unexpectedly");
        });

        Self { address, requests }
    }

    /// Answer every dashboard request with `status` and `body`.
    pub(crate) async fn respond_with(status: StatusCode, body: Value) -> Self {
        let app = Router::new().route(
            DASHBOARD_API_PATH,
            get(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );

        Self::serve(app).await
    }

    /// Hold each request for a `(district, period)` in `keys` until the test
    /// sends its reply through the matching sender.
    ///
    /// Senders are returned in the same order as `keys`.
    pub(crate) async fn held(keys: &[(&str, &str)]) -> (Self, Vec<oneshot::Sender<Reply>>) {
        let mut senders = Vec::with_capacity(keys.len());
        let mut receivers = HashMap::with_capacity(keys.len());

        for (district, period) in keys {
            let (sender, receiver) = oneshot::channel();
            senders.push(sender);
            receivers.insert(((*district).to_owned(), (*period).to_owned()), receiver);
        }

        let app = Router::new()
            .route(DASHBOARD_API_PATH, get(held_reply))
            .with_state(HeldReplies::new(Mutex::new(receivers)));

        (Self::serve(app).await, senders)
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// The `(district, period)` of each request received so far, in arrival
    /// order.
    pub(crate) fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Wait until at least `count` requests have arrived.
    pub(crate) async fn wait_for_requests(&self, count: usize) {
        let waiting = async {
            while self.requests.lock().expect("request log poisoned").len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };

        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .unwrap_or_else(|_| panic!("Stub backend did not receive {count} request(s)"));
    }
}

async fn record_request(
    State(requests): State<RequestLog>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let district = query.get("district").cloned().unwrap_or_default();
    let period = query.get("period").cloned().unwrap_or_default();
    requests
        .lock()
        .expect("request log poisoned")
        .push((district, period));

    next.run(request).await
}

async fn held_reply(
    State(replies): State<HeldReplies>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let receiver = replies
        .lock()
        .expect("held replies poisoned")
        .remove(&(query.district, query.period));

    let Some(receiver) = receiver else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "unexpected request"})),
        )
            .into_response();
    };

    match receiver.await {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// The example payload: KPIs only, every series empty.
pub(crate) fn sample_payload() -> Value {
    json!({
        "kpiData": {
            "households": 120,
            "workDays": 4500,
            "funds": "₹12L",
            "completed": 30,
            "averageWage": 220,
            "completionRate": 75
        },
        "monthlyData": [],
        "comparisonData": [],
        "fundData": []
    })
}

pub(crate) fn sample_data() -> DashboardData {
    serde_json::from_value(sample_payload()).expect("sample payload should be valid")
}

/// A payload with a KPI change and data for every chart.
pub(crate) fn full_payload() -> Value {
    json!({
        "kpiData": {
            "households": 1520,
            "workDays": "3.2L",
            "funds": "₹45.6Cr",
            "completed": 212,
            "averageWage": 254.5,
            "completionRate": 68,
            "change": "+4.2"
        },
        "monthlyData": [
            {"name": "Jul", "Work Days (in Lakhs)": 2.1},
            {"name": "Aug", "Work Days (in Lakhs)": 2.6},
            {"name": "Sep", "Work Days (in Lakhs)": 3.2}
        ],
        "comparisonData": [
            {"name": "Ganjam", "Expenditure (Cr)": 98.4},
            {"name": "Mayurbhanj", "Expenditure (Cr)": 87.1}
        ],
        "fundData": [
            {"name": "Wages", "value": 62},
            {"name": "Materials", "value": 28},
            {"name": "Administrative", "value": 6},
            {"name": "Other", "value": 4}
        ]
    })
}

pub(crate) fn full_data() -> DashboardData {
    serde_json::from_value(full_payload()).expect("full payload should be valid")
}
