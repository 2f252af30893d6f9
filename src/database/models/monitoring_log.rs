use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only monitoring entry for a service. Rows are immutable once
/// written; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonitoringLog {
    pub id: Uuid,
    pub service_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub response_time: Option<i32>,
    pub error_message: Option<String>,
    pub metadata: Value,
}

pub const LOG_STATUSES: &[&str] = &["success", "failed", "timeout", "error"];
