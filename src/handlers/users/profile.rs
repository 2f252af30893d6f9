use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::Profile;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /api/users/profile - never includes the password hash
pub async fn get_profile(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, email, name, created_at, updated_at FROM profiles WHERE id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(profile))
}

/// PUT /api/users/profile - name/email partial merge
pub async fn update_profile(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            updated_at = now()
         WHERE id = $1
         RETURNING id, email, name, created_at, updated_at",
    )
    .bind(user.user_id)
    .bind(&body.name)
    .bind(&body.email)
    .fetch_optional(&pool)
    .await;

    let profile = match result {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(ApiError::not_found("User not found")),
        Err(e) => {
            // Unique violation on email reads as a validation problem
            if let Some(db_err) = e.as_database_error() {
                if db_err.code().as_deref() == Some("23505") {
                    return Err(ApiError::bad_request("Email already in use"));
                }
            }
            return Err(e.into());
        }
    };

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}
