use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::QueryBuilder;

use crate::database::models::Service;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub r#type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Comma-separated tag list; matches services containing all of them.
    pub tags: Option<String>,
}

/// GET /api/services/search - substring match on name/description plus
/// optional equality and tag-containment filters. With no query and no
/// filters this is the plain newest-first listing.
pub async fn search(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let mut builder: QueryBuilder<sqlx::Postgres> =
        QueryBuilder::new("SELECT * FROM services WHERE user_id = ");
    builder.push_bind(user.user_id);

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(service_type) = query.r#type.filter(|v| !v.is_empty()) {
        builder.push(" AND type = ");
        builder.push_bind(service_type);
    }

    if let Some(status) = query.status.filter(|v| !v.is_empty()) {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    if let Some(priority) = query.priority.filter(|v| !v.is_empty()) {
        builder.push(" AND priority = ");
        builder.push_bind(priority);
    }

    if let Some(tags) = query.tags.filter(|v| !v.is_empty()) {
        let tag_list: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();
        builder.push(" AND tags @> ");
        builder.push_bind(tag_list);
    }

    builder.push(" ORDER BY created_at DESC");

    let services = builder
        .build_query_as::<Service>()
        .fetch_all(&pool)
        .await?;

    Ok(Json(services))
}
