//! Request handlers for the log API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use raceapp_tasks::TaskStatus;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::AppState;

/// `?date=dd.MM.yyyy`. A missing parameter reads as empty.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: String,
}

/// Body of `POST /api/logs/generate`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub task_id: String,
}

/// Body of `GET /api/logs/status/{taskId}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: TaskStatus,
}

fn attachment(file_name: &str, body: Bytes) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}

/// Extract the logs for a date synchronously.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let source = Arc::clone(&state.source);
    let date = query.date;

    let artifact = tokio::task::spawn_blocking(move || source.fetch(&date))
        .await
        .map_err(|e| ApiError::Internal(format!("Unexpected error: {e}")))??;

    Ok(attachment(&artifact.file_name(), artifact.content().clone()))
}

/// Start a background extraction and return its task id.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Json<GenerateResponse> {
    let task_id = state.tasks.start_generation(&query.date);
    Json(GenerateResponse {
        task_id: task_id.into_inner(),
    })
}

/// Report a task's status. Unknown ids answer `NOT_FOUND` with 200.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: state.tasks.status(&task_id),
    })
}

/// Download the extract produced by a finished task.
pub async fn result(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let artifact = state.tasks.result(&task_id)?;
    let file_name = format!(
        "logs_{}.log",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    Ok(attachment(&file_name, artifact.content().clone()))
}
