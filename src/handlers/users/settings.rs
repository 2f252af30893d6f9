use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::UserSettings;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub theme: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub ntfy_topic: Option<String>,
}

/// GET /api/users/settings - lazily creates a defaults row on first read.
/// A second call returns the persisted row; the unique user_id constraint
/// keeps concurrent first reads from creating duplicates.
pub async fn get_settings(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let existing = sqlx::query_as::<_, UserSettings>(
        "SELECT * FROM user_settings WHERE user_id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&pool)
    .await?;

    if let Some(settings) = existing {
        return Ok(Json(settings));
    }

    let inserted = sqlx::query_as::<_, UserSettings>(
        "INSERT INTO user_settings
            (user_id, notifications_enabled, email_notifications, push_notifications,
             theme, language, timezone, created_at, updated_at)
         VALUES ($1, true, false, true, 'light', 'zh-TW', 'Asia/Taipei', now(), now())
         ON CONFLICT (user_id) DO NOTHING
         RETURNING *",
    )
    .bind(user.user_id)
    .fetch_optional(&pool)
    .await?;

    // Lost the insert race: another request created the row in between
    let settings = match inserted {
        Some(settings) => settings,
        None => {
            sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = $1")
                .bind(user.user_id)
                .fetch_one(&pool)
                .await?
        }
    };

    Ok(Json(settings))
}

/// PUT /api/users/settings - partial merge; only provided fields overwrite
pub async fn update_settings(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let settings = sqlx::query_as::<_, UserSettings>(
        "UPDATE user_settings SET
            notifications_enabled = COALESCE($2, notifications_enabled),
            email_notifications = COALESCE($3, email_notifications),
            push_notifications = COALESCE($4, push_notifications),
            theme = COALESCE($5, theme),
            language = COALESCE($6, language),
            timezone = COALESCE($7, timezone),
            ntfy_topic = COALESCE($8, ntfy_topic),
            updated_at = now()
         WHERE user_id = $1
         RETURNING *",
    )
    .bind(user.user_id)
    .bind(body.notifications_enabled)
    .bind(body.email_notifications)
    .bind(body.push_notifications)
    .bind(&body.theme)
    .bind(&body.language)
    .bind(&body.timezone)
    .bind(&body.ntfy_topic)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Settings not found"))?;

    Ok(Json(json!({
        "message": "Settings updated successfully",
        "settings": settings,
    })))
}
