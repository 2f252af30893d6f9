use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::ensure_owned;

/// PUT /api/notifications/:id/read - unread -> read, stamps read_at
pub async fn mark_read(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    ensure_owned(&pool, id, user.user_id).await?;

    sqlx::query("UPDATE notifications SET status = 'read', read_at = now() WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "Notification marked as read successfully"
    })))
}

/// PUT /api/notifications/read-all - bulk unread -> read for the caller
pub async fn mark_all_read(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    sqlx::query(
        "UPDATE notifications SET status = 'read', read_at = now()
         WHERE user_id = $1 AND status = 'unread'",
    )
    .bind(user.user_id)
    .execute(&pool)
    .await?;

    Ok(Json(json!({
        "message": "All notifications marked as read successfully"
    })))
}
