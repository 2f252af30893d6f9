use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    pub message: String,
    pub priority: String,
    /// Dispatch channel: "ntfy.sh" for relayed sends, "manual" otherwise.
    pub provider: String,
    pub status: String,
    pub response_data: Option<Value>,
    pub error_message: Option<String>,
    pub metadata: Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const NOTIFICATION_STATUSES: &[&str] = &["unread", "read", "pending", "sent", "failed"];
