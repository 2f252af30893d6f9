use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::verify_password;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

/// DELETE /api/users/account - password re-verification required; dependent
/// rows go with the profile via cascade.
pub async fn delete_account(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<Json<Value>, ApiError> {
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required to delete account"))?;

    let pool = DatabaseManager::pool().await?;

    let row: Option<(String,)> =
        sqlx::query_as("SELECT password_hash FROM profiles WHERE id = $1")
            .bind(user.user_id)
            .fetch_optional(&pool)
            .await?;
    let (password_hash,) = row.ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&password, &password_hash) {
        return Err(ApiError::unauthorized("Password is incorrect"));
    }

    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(user.user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "User account deleted successfully" })))
}
