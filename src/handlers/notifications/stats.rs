use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total: i64,
    pub unread: i64,
    pub read: i64,
    pub pending: i64,
    pub sent: i64,
    pub failed: i64,
    pub high_priority: i64,
    pub medium_priority: i64,
    pub low_priority: i64,
    pub by_service: HashMap<String, i64>,
}

/// GET /api/notifications/stats - aggregate counts by status, priority and
/// originating service (keyed on service name, "unknown" when unresolvable).
pub async fn stats(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NotificationStats>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;

    let by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM notifications WHERE user_id = $1 GROUP BY status",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    let by_priority: Vec<(String, i64)> = sqlx::query_as(
        "SELECT priority, COUNT(*) FROM notifications WHERE user_id = $1 GROUP BY priority",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    let by_service: Vec<(String, i64)> = sqlx::query_as(
        "SELECT COALESCE(s.name, 'unknown'), COUNT(*)
         FROM notifications n
         LEFT JOIN services s ON s.id = n.service_id
         WHERE n.user_id = $1
         GROUP BY 1",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    let status_count = |key: &str| {
        by_status
            .iter()
            .find(|(status, _)| status == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };
    let priority_count = |key: &str| {
        by_priority
            .iter()
            .find(|(priority, _)| priority == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    let stats = NotificationStats {
        total,
        unread: status_count("unread"),
        read: status_count("read"),
        pending: status_count("pending"),
        sent: status_count("sent"),
        failed: status_count("failed"),
        high_priority: priority_count("high"),
        medium_priority: priority_count("medium"),
        low_priority: priority_count("low"),
        by_service: by_service.into_iter().collect(),
    };

    Ok(Json(stats))
}
