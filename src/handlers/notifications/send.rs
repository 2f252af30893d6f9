use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Notification, NtfyConfig, NtfySettings};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::services;
use crate::middleware::AuthUser;
use crate::notify::{NtfyClient, NtfyPayload};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendNotificationRequest {
    pub service_id: Option<Uuid>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub priority: Option<String>,
    /// Per-send overrides; `config.priority` takes precedence over the
    /// stored default when dispatching.
    #[serde(default)]
    pub config: Value,
}

/// POST /api/notifications/send - dispatch via the ntfy relay and persist the
/// outcome. Relay failure degrades to a stored "failed" row; the request
/// itself still succeeds.
pub async fn send(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SendNotificationRequest>,
) -> Result<Json<Value>, ApiError> {
    let (service_id, title, message) = match (body.service_id, &body.title, &body.message) {
        (Some(s), Some(t), Some(m)) if !t.is_empty() && !m.is_empty() => (s, t.clone(), m.clone()),
        _ => {
            return Err(ApiError::bad_request(
                "Service ID, title, and message are required",
            ))
        }
    };
    let priority = body.priority.unwrap_or_else(|| "medium".to_string());

    let pool = DatabaseManager::pool().await?;
    let service = services::find_owned(&pool, service_id, user.user_id)
        .await
        .map_err(|_| ApiError::not_found("Service not found or access denied"))?;

    let settings = resolve_settings(&pool, user.user_id, &priority).await?;

    // A per-send priority override beats the stored default
    let dispatch_priority = body
        .config
        .get("priority")
        .and_then(Value::as_str)
        .unwrap_or(&settings.default_priority)
        .to_string();

    let metadata = json!({
        "service_id": service_id,
        "service_name": service.name,
        "service_type": service.r#type,
        "user_id": user.user_id,
        "timestamp": Utc::now(),
        "config": body.config,
    });

    let payload = NtfyPayload::for_service(&title, &message, &dispatch_priority, service.id);

    let (status, response_data, error_message) =
        match NtfyClient::new().send(&settings, &payload).await {
            Ok(response) => ("sent", Some(response), None),
            Err(e) => {
                tracing::error!("Ntfy dispatch failed: {}", e);
                ("failed", None, Some(e.to_string()))
            }
        };

    let notification = sqlx::query_as::<_, Notification>(
        "INSERT INTO notifications
            (user_id, service_id, title, message, priority, provider, status,
             response_data, error_message, metadata, created_at)
         VALUES ($1, $2, $3, $4, $5, 'ntfy.sh', $6, $7, $8, $9, now())
         RETURNING *",
    )
    .bind(user.user_id)
    .bind(service_id)
    .bind(&title)
    .bind(&message)
    .bind(&priority)
    .bind(status)
    .bind(&response_data)
    .bind(&error_message)
    .bind(&metadata)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to store notification: {}", e);
        ApiError::internal("Failed to store notification")
    })?;

    // Status-change messages opportunistically refresh the service's
    // last_notification stamp; a failure here is logged, not surfaced.
    if message.contains("status changed") || message.contains("service is now") {
        let update = sqlx::query(
            "UPDATE services SET last_notification = now() WHERE id = $1 AND user_id = $2",
        )
        .bind(service_id)
        .bind(user.user_id)
        .execute(&pool)
        .await;

        if let Err(e) = update {
            tracing::warn!("Failed to update service last notification time: {}", e);
        }
    }

    Ok(Json(json!({
        "message": "Notification sent successfully",
        "notification": {
            "id": notification.id,
            "title": title,
            "message": message,
            "priority": priority,
            "status": notification.status,
            "provider": notification.provider,
        },
    })))
}

/// Read the caller's relay settings, seeding a row from process-wide defaults
/// the first time.
async fn resolve_settings(
    pool: &PgPool,
    user_id: Uuid,
    priority: &str,
) -> Result<NtfySettings, ApiError> {
    let configure_error = |e: sqlx::Error| {
        tracing::error!("Failed to get/create ntfy config: {}", e);
        ApiError::internal("Failed to configure notification service")
    };

    let existing = sqlx::query_as::<_, NtfyConfig>("SELECT * FROM ntfy_configs WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(configure_error)?;

    if let Some(row) = existing {
        return Ok(row.config.0);
    }

    let defaults = NtfySettings::from_defaults(priority);
    sqlx::query(
        "INSERT INTO ntfy_configs (user_id, config, created_at, updated_at)
         VALUES ($1, $2, now(), now())",
    )
    .bind(user_id)
    .bind(sqlx::types::Json(&defaults))
    .execute(pool)
    .await
    .map_err(configure_error)?;

    Ok(defaults)
}
