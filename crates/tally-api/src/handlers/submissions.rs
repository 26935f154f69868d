//! Submission ingestion and read-back handlers.
//!
//! The body contract is JSON status objects: `{"status":"ok"}`,
//! `{"status":"duplicate"}`, `{"status":"unknown action"}` or
//! `{"status":"error","message":...}`. The front-end keys off the `status`
//! field; HTTP codes are conventional on top of that.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tally_core::{CoreError, IngestStatus, SubmissionPayload, ACTION_GET_ALL};
use tracing::{instrument, warn};

use crate::AppState;

/// Query parameters of the read endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Requested action; defaults to `getAll` when absent.
    pub action: Option<String>,
}

/// Ingests one survey submission.
///
/// The body is parsed here rather than through a typed extractor so a
/// malformed payload becomes a `{"status":"error"}` body instead of a
/// framework rejection.
#[instrument(name = "ingest_submission", skip(state, body))]
pub async fn ingest_submission(State(state): State<AppState>, body: String) -> Response {
    let payload = match SubmissionPayload::parse(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "rejected unparseable submission body");
            return error_response(&err);
        },
    };

    match tally_core::ingest(state.store.as_ref(), state.clock.as_ref(), &state.table, &payload)
        .await
    {
        Ok(IngestStatus::Accepted) => {
            (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
        },
        Ok(IngestStatus::Duplicate) => {
            (StatusCode::OK, Json(json!({"status": "duplicate"}))).into_response()
        },
        Err(err) => {
            warn!(error = %err, "submission ingest failed");
            error_response(&err)
        },
    }
}

/// Lists all stored submissions as a JSON array.
#[instrument(name = "list_submissions", skip(state, params))]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let action = params.action.as_deref().unwrap_or(ACTION_GET_ALL);

    match tally_core::retrieve(state.store.as_ref(), &state.table, action).await {
        Ok(submissions) => (StatusCode::OK, Json(submissions)).into_response(),
        Err(CoreError::UnknownAction(requested)) => {
            warn!(action = %requested, "unknown retrieve action");
            (StatusCode::BAD_REQUEST, Json(json!({"status": "unknown action"}))).into_response()
        },
        Err(err) => {
            warn!(error = %err, "submission retrieve failed");
            error_response(&err)
        },
    }
}

/// Renders a core error as a `{"status":"error"}` body with a conventional
/// HTTP code.
fn error_response(err: &CoreError) -> Response {
    let status = match err {
        CoreError::Payload(_) | CoreError::UnknownAction(_) => StatusCode::BAD_REQUEST,
        CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({"status": "error", "message": err.to_string()}))).into_response()
}
