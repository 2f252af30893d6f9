use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::models::Notification;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::ensure_owned;
use crate::handlers::services;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub service_id: Option<Uuid>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub priority: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub metadata: Option<Value>,
}

/// GET /api/notifications - paginated, filterable by status/priority/service
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let limit = query.limit.unwrap_or(50).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut builder: QueryBuilder<sqlx::Postgres> =
        QueryBuilder::new("SELECT * FROM notifications WHERE user_id = ");
    builder.push_bind(user.user_id);

    if let Some(status) = query.status.filter(|v| !v.is_empty()) {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    if let Some(priority) = query.priority.filter(|v| !v.is_empty()) {
        builder.push(" AND priority = ");
        builder.push_bind(priority);
    }

    if let Some(service_id) = query.service_id {
        builder.push(" AND service_id = ");
        builder.push_bind(service_id);
    }

    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    let notifications = builder
        .build_query_as::<Notification>()
        .fetch_all(&pool)
        .await?;

    Ok(Json(notifications))
}

/// GET /api/notifications/:id
pub async fn get_by_id(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let notification = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    Ok(Json(notification))
}

/// POST /api/notifications - manual notification, starts out pending
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (service_id, title, message) = match (body.service_id, &body.title, &body.message) {
        (Some(s), Some(t), Some(m)) if !t.is_empty() && !m.is_empty() => (s, t.clone(), m.clone()),
        _ => {
            return Err(ApiError::bad_request(
                "Service ID, title, and message are required",
            ))
        }
    };

    let pool = DatabaseManager::pool().await?;
    let service = services::find_owned(&pool, service_id, user.user_id)
        .await
        .map_err(|_| ApiError::not_found("Service not found or access denied"))?;

    let priority = body.priority.unwrap_or_else(|| "medium".to_string());

    let mut metadata = body.metadata.unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut metadata {
        map.insert("service_name".to_string(), json!(service.name));
        map.insert("service_type".to_string(), json!(service.r#type));
        map.insert("timestamp".to_string(), json!(Utc::now()));
    }

    let notification = sqlx::query_as::<_, Notification>(
        "INSERT INTO notifications
            (user_id, service_id, title, message, priority, provider, status, metadata, created_at)
         VALUES ($1, $2, $3, $4, $5, 'manual', 'pending', $6, now())
         RETURNING *",
    )
    .bind(user.user_id)
    .bind(service_id)
    .bind(&title)
    .bind(&message)
    .bind(&priority)
    .bind(metadata)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notification created successfully",
            "notification": notification,
        })),
    ))
}

/// PUT /api/notifications/:id - partial merge; only provided fields overwrite
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNotificationRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    let notification = sqlx::query_as::<_, Notification>(
        "UPDATE notifications SET
            title = COALESCE($3, title),
            message = COALESCE($4, message),
            priority = COALESCE($5, priority),
            status = COALESCE($6, status),
            metadata = COALESCE($7, metadata),
            updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(user.user_id)
    .bind(&body.title)
    .bind(&body.message)
    .bind(&body.priority)
    .bind(&body.status)
    .bind(&body.metadata)
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({
        "message": "Notification updated successfully",
        "notification": notification,
    })))
}

/// DELETE /api/notifications/:id
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Notification deleted successfully" })))
}
