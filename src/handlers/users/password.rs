use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, verify_password};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// PUT /api/users/password - requires the current password before accepting a
/// new hash
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let (current, new) = match (&body.current_password, &body.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c.clone(), n.clone()),
        _ => {
            return Err(ApiError::bad_request(
                "Current password and new password are required",
            ))
        }
    };

    let pool = DatabaseManager::pool().await?;

    let row: Option<(String,)> =
        sqlx::query_as("SELECT password_hash FROM profiles WHERE id = $1")
            .bind(user.user_id)
            .fetch_optional(&pool)
            .await?;
    let (password_hash,) = row.ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&current, &password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let new_hash = hash_password(&new);
    sqlx::query("UPDATE profiles SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(user.user_id)
        .bind(&new_hash)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
