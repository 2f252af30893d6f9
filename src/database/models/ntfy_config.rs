use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user relay configuration row. The settings blob uses camelCase wire
/// keys (`defaultPriority`, `rateLimit`) to match what clients store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NtfyConfig {
    pub id: Uuid,
    pub user_id: Uuid,
    pub config: Json<NtfySettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfySettings {
    pub url: String,
    pub topic: String,
    #[serde(rename = "defaultPriority")]
    pub default_priority: String,
    #[serde(rename = "rateLimit")]
    pub rate_limit: u32,
    /// Dispatch timeout in milliseconds.
    pub timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NtfySettings {
    /// Seed settings from process-wide defaults for users without a row yet.
    pub fn from_defaults(default_priority: &str) -> Self {
        let defaults = &crate::config::config().ntfy;
        Self {
            url: defaults.url.clone(),
            topic: defaults.topic.clone(),
            default_priority: default_priority.to_string(),
            rate_limit: defaults.rate_limit_per_minute,
            timeout: defaults.timeout_ms,
            username: None,
            password: None,
        }
    }
}
