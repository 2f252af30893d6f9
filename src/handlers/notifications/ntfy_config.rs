use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{NtfyConfig, NtfySettings};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct UpdateNtfyConfigRequest {
    pub config: Option<Value>,
}

/// GET /api/ntfy-config - the caller's relay configuration row. 404 until a
/// row exists (one is seeded on the first notification send).
pub async fn get_ntfy_config(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NtfyConfig>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let config = sqlx::query_as::<_, NtfyConfig>("SELECT * FROM ntfy_configs WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Ntfy config not found"))?;

    Ok(Json(config))
}

/// PUT /api/ntfy-config - merge the provided keys over the existing settings
/// (or over process defaults when no row exists yet) and upsert.
pub async fn update_ntfy_config(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateNtfyConfigRequest>,
) -> Result<Json<Value>, ApiError> {
    let patch = match body.config {
        Some(Value::Object(map)) => map,
        _ => return Err(ApiError::bad_request("Config object is required")),
    };

    let pool = DatabaseManager::pool().await?;

    let existing = sqlx::query_as::<_, NtfyConfig>("SELECT * FROM ntfy_configs WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_optional(&pool)
        .await?;

    let base = match existing {
        Some(row) => serde_json::to_value(&row.config.0)
            .map_err(|e| ApiError::internal_with("Failed to read stored config", e.to_string()))?,
        None => serde_json::to_value(NtfySettings::from_defaults("medium"))
            .map_err(|e| ApiError::internal_with("Failed to build default config", e.to_string()))?,
    };

    let mut merged = base;
    if let Value::Object(target) = &mut merged {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }

    let settings: NtfySettings = serde_json::from_value(merged)
        .map_err(|_| ApiError::bad_request("Invalid ntfy config"))?;

    let row = sqlx::query_as::<_, NtfyConfig>(
        "INSERT INTO ntfy_configs (user_id, config, created_at, updated_at)
         VALUES ($1, $2, now(), now())
         ON CONFLICT (user_id)
         DO UPDATE SET config = EXCLUDED.config, updated_at = now()
         RETURNING *",
    )
    .bind(user.user_id)
    .bind(sqlx::types::Json(&settings))
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({
        "message": "Ntfy config updated successfully",
        "config": row,
    })))
}
