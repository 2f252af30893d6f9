use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Service;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::ensure_owned;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub r#type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub config: Option<Value>,
    pub metadata: Option<Value>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub r#type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub config: Option<Value>,
    pub metadata: Option<Value>,
    pub tags: Option<Vec<String>>,
}

/// GET /api/services - all services owned by the caller, newest first
pub async fn list(Extension(user): Extension<AuthUser>) -> Result<Json<Vec<Service>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let services = sqlx::query_as::<_, Service>(
        "SELECT * FROM services WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(services))
}

/// GET /api/services/:id
pub async fn get_by_id(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let service = super::find_owned(&pool, id, user.user_id).await?;
    Ok(Json(service))
}

/// POST /api/services
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = body
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Service name is required"))?;

    let pool = DatabaseManager::pool().await?;

    let service = sqlx::query_as::<_, Service>(
        "INSERT INTO services
            (user_id, name, description, type, status, priority, config, metadata, tags, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now())
         RETURNING *",
    )
    .bind(user.user_id)
    .bind(name)
    .bind(&body.description)
    .bind(body.r#type.as_deref().unwrap_or("general"))
    .bind(body.status.as_deref().unwrap_or("active"))
    .bind(body.priority.as_deref().unwrap_or("medium"))
    .bind(body.config.unwrap_or_else(|| json!({})))
    .bind(body.metadata.unwrap_or_else(|| json!({})))
    .bind(body.tags.unwrap_or_default())
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Service created successfully",
            "service": service,
        })),
    ))
}

/// PUT /api/services/:id - partial merge; only provided fields overwrite
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateServiceRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    let service = sqlx::query_as::<_, Service>(
        "UPDATE services SET
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            type = COALESCE($5, type),
            status = COALESCE($6, status),
            priority = COALESCE($7, priority),
            config = COALESCE($8, config),
            metadata = COALESCE($9, metadata),
            tags = COALESCE($10, tags),
            updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(user.user_id)
    .bind(&body.name)
    .bind(&body.description)
    .bind(&body.r#type)
    .bind(&body.status)
    .bind(&body.priority)
    .bind(&body.config)
    .bind(&body.metadata)
    .bind(&body.tags)
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({
        "message": "Service updated successfully",
        "service": service,
    })))
}

/// DELETE /api/services/:id
pub async fn remove(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Service deleted successfully" })))
}
