use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::clock::Clock;
use super::domain::LeadSubmission;
use super::repository::{LeadId, LeadRepository, NotificationSink, RepositoryError};
use super::roster::{RosterError, RosterStore};
use super::routing::RoutingError;
use super::service::{IntakeServiceError, LeadIntakeService};

/// Router builder exposing HTTP endpoints for lead intake and status.
pub fn intake_router<S, R, N, C>(service: Arc<LeadIntakeService<S, R, N, C>>) -> Router
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/intake/leads", post(submit_handler::<S, R, N, C>))
        .route(
            "/api/v1/intake/leads/:lead_id",
            get(status_handler::<S, R, N, C>),
        )
        .route(
            "/api/v1/intake/leads/:lead_id/cancel",
            post(cancel_handler::<S, R, N, C>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S, R, N, C>(
    State(service): State<Arc<LeadIntakeService<S, R, N, C>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    match service.intake(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(IntakeServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "lead already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<S, R, N, C>(
    State(service): State<Arc<LeadIntakeService<S, R, N, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    let id = LeadId(lead_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "lead_id": id.0,
                "status": "received",
                "routing_reason": "pending routing",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn cancel_handler<S, R, N, C>(
    State(service): State<Arc<LeadIntakeService<S, R, N, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: RosterStore + 'static,
    R: LeadRepository + 'static,
    N: NotificationSink + 'static,
    C: Clock + 'static,
{
    let id = LeadId(lead_id);
    match service.cancel(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// An unreachable store maps to 503 so the intake pipeline queues the lead
/// for retry instead of dropping it; everything else is a plain 500.
fn error_response(err: IntakeServiceError) -> Response {
    let status = match &err {
        IntakeServiceError::Routing(RoutingError::Roster(RosterError::Unavailable(_)))
        | IntakeServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
