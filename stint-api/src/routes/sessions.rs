use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use gh_client::IssueRef;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{auth::AuthUser, domain::NewWorkSession, domain::WorkSession, AppState};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions))
        .route("/", post(start_session))
        .route("/active", get(get_active_session))
        .route("/summary", get(get_summary))
        .route("/:id/pause", post(pause_session))
        .route("/:id/resume", post(resume_session))
        .route("/:id/complete", post(complete_session))
        .route("/:id/labels", post(add_labels))
        .route("/:id/labels", get(get_labels))
        .route("/:id/notes", put(update_notes))
}

#[instrument(name = "GET /sessions", skip(app_state, user))]
async fn list_sessions(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<WorkSession>>, ApiError> {
    let sessions = app_state.session_repo.list(user.id).await?;

    Ok(Json(sessions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionBody {
    issue_url: String,
    issue_title: Option<String>,
    notes: Option<String>,
    #[serde(default)]
    participants: Vec<String>,
}

#[instrument(name = "POST /sessions", skip(app_state, user, body))]
async fn start_session(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(body): Json<StartSessionBody>,
) -> Result<Json<WorkSession>, ApiError> {
    let issue = IssueRef::from_url(&body.issue_url)
        .map_err(|e| ApiError::bad_request(format!("Unrecognized issue URL: {}", e)))?;

    // One running session per user.
    if let Some(active) = app_state.session_repo.active_session(user.id).await? {
        return Err(ApiError::conflict(format!(
            "Session {} is already {}",
            active.id, active.status
        )));
    }

    let new_session = NewWorkSession {
        user_id: user.id,
        issue_owner: issue.owner,
        issue_repo: issue.repo,
        issue_number: issue.number as i64,
        issue_title: body.issue_title,
        issue_url: body.issue_url,
        notes: body.notes,
        participants: body.participants,
    };

    let session = app_state.session_repo.create(&new_session).await?;

    Ok(Json(session))
}

#[instrument(name = "GET /sessions/active", skip(app_state, user))]
async fn get_active_session(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<Option<WorkSession>>, ApiError> {
    let session = app_state.session_repo.active_session(user.id).await?;

    Ok(Json(session))
}

#[instrument(name = "POST /sessions/:id/pause", skip(app_state, user))]
async fn pause_session(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WorkSession>, ApiError> {
    let session = app_state.session_repo.pause(id, user.id).await?;

    Ok(Json(session))
}

#[instrument(name = "POST /sessions/:id/resume", skip(app_state, user))]
async fn resume_session(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WorkSession>, ApiError> {
    let session = app_state.session_repo.resume(id, user.id).await?;

    Ok(Json(session))
}

#[instrument(name = "POST /sessions/:id/complete", skip(app_state, user))]
async fn complete_session(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WorkSession>, ApiError> {
    let session = app_state.session_repo.complete(id, user.id).await?;

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
struct AddLabelsBody {
    labels: Vec<String>,
}

#[instrument(name = "POST /sessions/:id/labels", skip(app_state, user, body))]
async fn add_labels(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<AddLabelsBody>,
) -> Result<Json<()>, ApiError> {
    app_state
        .session_repo
        .add_labels(id, user.id, &body.labels)
        .await?;

    Ok(Json(()))
}

#[instrument(name = "GET /sessions/:id/labels", skip(app_state, user))]
async fn get_labels(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<String>>, ApiError> {
    let labels = app_state.session_repo.labels(id, user.id).await?;

    Ok(Json(labels))
}

#[derive(Debug, Deserialize)]
struct UpdateNotesBody {
    notes: String,
}

#[instrument(name = "PUT /sessions/:id/notes", skip(app_state, user, body))]
async fn update_notes(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateNotesBody>,
) -> Result<Json<()>, ApiError> {
    app_state
        .session_repo
        .update_notes(id, user.id, &body.notes)
        .await?;

    Ok(Json(()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    total_seconds: i64,
}

#[instrument(name = "GET /sessions/summary", skip(app_state, user))]
async fn get_summary(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let total_seconds = app_state.session_repo.total_duration(user.id).await?;

    Ok(Json(SummaryResponse { total_seconds }))
}
