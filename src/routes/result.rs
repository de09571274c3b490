use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::queries;
use crate::models::job::{JobStatus, StoredResult};

/// Callback body posted by the generation engine when a job finishes.
/// Either `result` (raw text) or `result_data` (structured JSON) carries
/// the payload; both may be present.
#[derive(Debug, Deserialize)]
pub struct ResultNotification {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub result_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ResultAck {
    pub success: bool,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

/// POST /api/result — engine callback. The result is written to both
/// stores under the job id, last write wins. A write is acknowledged as
/// long as at least one store took it; only a double failure is a 500.
pub async fn receive_result(
    State(state): State<AppState>,
    Json(notification): Json<ResultNotification>,
) -> (StatusCode, Json<ResultAck>) {
    let job_id = notification.job_id;
    let stored = StoredResult {
        status: notification.status,
        result: notification.result,
        result_data: notification.result_data,
        received_at: Utc::now(),
    };

    let hot_write = state.store.put(job_id, &stored).await;
    if let Err(e) = &hot_write {
        tracing::warn!(%job_id, error = %e, "hot store write failed, relying on database");
    }

    let db_write = queries::upsert_result(&state.db, job_id, &stored).await;
    if let Err(e) = &db_write {
        tracing::error!(%job_id, error = %e, "database result write failed");
    }

    if hot_write.is_err() && db_write.is_err() {
        metrics::counter!("engine_results_received_total", "outcome" => "error").increment(1);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResultAck {
                success: false,
                message: "failed to store result".to_string(),
                received_at: stored.received_at,
            }),
        );
    }

    metrics::counter!(
        "engine_results_received_total",
        "outcome" => "stored",
        "status" => stored.status.to_string()
    )
    .increment(1);
    tracing::info!(%job_id, status = %stored.status, "result stored");

    (
        StatusCode::OK,
        Json(ResultAck {
            success: true,
            message: format!("result for {job_id} stored"),
            received_at: stored.received_at,
        }),
    )
}

/// GET /api/result/{job_id} — read back a stored result, hot store first,
/// database fallback.
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<StoredResult>, StatusCode> {
    match state.store.get(job_id).await {
        Ok(Some(stored)) => return Ok(Json(stored)),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(%job_id, error = %e, "hot store read failed, falling back to database");
        }
    }

    let stored = queries::get_result(&state.db, job_id)
        .await
        .map_err(|e| {
            tracing::error!(%job_id, error = %e, "database result read failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    stored.map(Json).ok_or(StatusCode::NOT_FOUND)
}
