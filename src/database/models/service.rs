use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked service. Status, type and priority are stored as plain strings
/// and validated at the handler level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub r#type: String,
    pub status: String,
    pub priority: String,
    pub config: Value,
    pub metadata: Value,
    pub tags: Vec<String>,
    pub last_notification: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const SERVICE_STATUSES: &[&str] = &["active", "inactive", "completed", "error"];
pub const SERVICE_PRIORITIES: &[&str] = &["low", "medium", "high"];
