//! Run control API handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use jobhound_core::{render_text, OrchestratorError, RunProgress, RunReport};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

/// Run accepted or cancelled
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub run_id: String,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct RunErrorResponse {
    pub error: String,
}

fn error_response(
    status: StatusCode,
    error: impl ToString,
) -> (StatusCode, Json<RunErrorResponse>) {
    (
        status,
        Json(RunErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn no_report() -> (StatusCode, Json<RunErrorResponse>) {
    error_response(StatusCode::NOT_FOUND, "No finished run yet")
}

// ============================================================================
// Handlers
// ============================================================================

/// Start a run in the background
pub async fn start_run(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<RunResponse>), impl IntoResponse> {
    match state.controller().start().await {
        Ok(run_id) => Ok((
            StatusCode::ACCEPTED,
            Json(RunResponse {
                run_id,
                message: "Run started".to_string(),
            }),
        )),
        Err(e @ OrchestratorError::AlreadyRunning(_)) => {
            Err(error_response(StatusCode::CONFLICT, e))
        }
        Err(e) => Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e)),
    }
}

/// Request cancellation of the active run
pub async fn cancel_run(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunResponse>, impl IntoResponse> {
    match state.controller().cancel().await {
        Ok(run_id) => Ok(Json(RunResponse {
            run_id,
            message: "Cancellation requested".to_string(),
        })),
        Err(e @ OrchestratorError::NotRunning) => Err(error_response(StatusCode::CONFLICT, e)),
        Err(e) => Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e)),
    }
}

/// Progress of the current or last run
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<RunProgress> {
    Json(state.controller().status())
}

/// JSON record of the last finished run
pub async fn get_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunReport>, impl IntoResponse> {
    state
        .controller()
        .last_report()
        .await
        .map(Json)
        .ok_or_else(no_report)
}

/// Text rendering of the last finished run
pub async fn get_report_text(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match state.controller().last_report().await {
        Some(report) => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_text(&report),
        )),
        None => Err(no_report()),
    }
}
