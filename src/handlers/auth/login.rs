use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::verify_password;
use crate::auth::{generate_jwt, Claims};
use crate::database::models::Profile;
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - verify credentials and hand back a token
pub async fn login(Json(body): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let (email, password) = match (&body.email, &body.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e.clone(), p.clone()),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let pool = DatabaseManager::pool().await?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    // Same response whether the email is unknown or the password is wrong
    let profile = profile.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;
    if !verify_password(&password, &profile.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = generate_jwt(Claims::new(profile.id, profile.email.clone()))
        .map_err(|e| ApiError::internal_with("Failed to generate token", e.to_string()))?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": {
            "id": profile.id,
            "email": profile.email,
            "name": profile.name,
        },
        "token": token,
    })))
}
