use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::monitoring_log::LOG_STATUSES;
use crate::database::models::MonitoringLog;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::ensure_owned;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AppendLogRequest {
    pub status: Option<String>,
    pub response_time: Option<i32>,
    pub error_message: Option<String>,
    pub metadata: Option<Value>,
}

/// GET /api/services/:id/logs - monitoring logs, newest first
pub async fn list_logs(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<MonitoringLog>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    let limit = query.limit.unwrap_or(50).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let logs = sqlx::query_as::<_, MonitoringLog>(
        "SELECT * FROM monitoring_logs
         WHERE service_id = $1
         ORDER BY timestamp DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;

    Ok(Json(logs))
}

/// POST /api/services/:id/logs - append an immutable monitoring entry
pub async fn append_log(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AppendLogRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let status = body
        .status
        .as_deref()
        .filter(|s| LOG_STATUSES.contains(s))
        .ok_or_else(|| {
            ApiError::bad_request("Log status must be one of: success, failed, timeout, error")
        })?;

    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    let log = sqlx::query_as::<_, MonitoringLog>(
        "INSERT INTO monitoring_logs
            (service_id, timestamp, status, response_time, error_message, metadata)
         VALUES ($1, now(), $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(id)
    .bind(status)
    .bind(body.response_time)
    .bind(&body.error_message)
    .bind(body.metadata.unwrap_or_else(|| json!({})))
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Monitoring log created successfully",
            "log": log,
        })),
    ))
}
