use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub completed: i64,
    pub high_priority: i64,
    pub medium_priority: i64,
    pub low_priority: i64,
    pub by_type: HashMap<String, i64>,
}

/// GET /api/services/stats - aggregate counts by status, priority and type.
/// Everything is delegated to the database as GROUP BY queries.
pub async fn stats(Extension(user): Extension<AuthUser>) -> Result<Json<ServiceStats>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&pool)
        .await?;

    let by_status: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM services WHERE user_id = $1 GROUP BY status",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    let by_priority: Vec<(String, i64)> = sqlx::query_as(
        "SELECT priority, COUNT(*) FROM services WHERE user_id = $1 GROUP BY priority",
    )
    .bind(user.user_id)
    .fetch_all(&pool)
    .await?;

    let by_type: Vec<(String, i64)> = sqlx::query_as(
        "SELECT type, COUNT(*) FROM services WHERE user_id = $1 GROUP BY type",
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

    let stats = ServiceStats {
        total,
        active: status_count("active"),
        inactive: status_count("inactive"),
        completed: status_count("completed"),
        high_priority: priority_count("high"),
        medium_priority: priority_count("medium"),
        low_priority: priority_count("low"),
        by_type: by_type.into_iter().collect(),
    };

    Ok(Json(stats))
}
