use std::io::Cursor;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::infra::AppState;
use leadflow::workflows::import::CsvLeadImporter;
use leadflow::workflows::intake::{
    intake_router, Clock, LeadIntakeService, LeadRepository, LeadStatusView, NotificationSink,
    RosterStore,
};

pub(crate) fn with_intake_routes<S, R, N, C>(
    service: Arc<LeadIntakeService<S, R, N, C>>,
) -> axum::Router
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    let import_routes = axum::Router::new()
        .route(
            "/api/v1/intake/import",
            axum::routing::post(import_endpoint::<S, R, N, C>),
        )
        .with_state(service.clone());

    intake_router(service)
        .merge(import_routes)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) received: usize,
    pub(crate) leads: Vec<LeadStatusView>,
    pub(crate) failures: Vec<String>,
}

/// Batch intake from a CSV lead export posted as the request body. Each row
/// is processed independently; failures are reported per row.
pub(crate) async fn import_endpoint<S, R, N, C>(
    State(service): State<Arc<LeadIntakeService<S, R, N, C>>>,
    body: String,
) -> axum::response::Response
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    let submissions = match CsvLeadImporter::from_reader(Cursor::new(body.into_bytes())) {
        Ok(submissions) => submissions,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let received = submissions.len();
    let mut leads = Vec::new();
    let mut failures = Vec::new();
    for result in service.intake_batch(submissions) {
        match result {
            Ok(record) => leads.push(record.status_view()),
            Err(err) => failures.push(err.to_string()),
        }
    }

    (
        StatusCode::OK,
        Json(ImportResponse {
            received,
            leads,
            failures,
        }),
    )
        .into_response()
}
