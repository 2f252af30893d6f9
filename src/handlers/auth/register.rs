use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::hash_password;
use crate::auth::{generate_jwt, Claims};
use crate::database::models::Profile;
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// POST /api/auth/register - create a profile and hand back a token
pub async fn register(
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (email, password, name) = match (&body.email, &body.password, &body.name) {
        (Some(e), Some(p), Some(n)) if !e.is_empty() && !p.is_empty() && !n.is_empty() => {
            (e.clone(), p.clone(), n.clone())
        }
        _ => return Err(ApiError::bad_request("Email, password, and name are required")),
    };

    let pool = DatabaseManager::pool().await?;

    let existing: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT id FROM profiles WHERE email = $1")
            .bind(&email)
            .fetch_optional(&pool)
            .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&password);

    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (email, name, password_hash, created_at, updated_at)
         VALUES ($1, $2, $3, now(), now())
         RETURNING *",
    )
    .bind(&email)
    .bind(&name)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    let token = generate_jwt(Claims::new(profile.id, profile.email.clone()))
        .map_err(|e| ApiError::internal_with("Failed to generate token", e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": {
                "id": profile.id,
                "email": profile.email,
                "name": profile.name,
            },
            "token": token,
        })),
    ))
}
