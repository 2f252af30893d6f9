pub mod crud;
pub mod ntfy_config;
pub mod read;
pub mod send;
pub mod stats;

// Re-export handler functions for use in routing
pub use crud::{create, get_by_id, list, remove, update};
pub use crud::CreateNotificationRequest;
pub use ntfy_config::{get_ntfy_config, update_ntfy_config};
pub use read::{mark_all_read, mark_read};
pub use send::{send, SendNotificationRequest};
pub use stats::{stats, NotificationStats};

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

pub(crate) async fn ensure_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.map(|_| ())
        .ok_or_else(|| ApiError::not_found("Notification not found"))
}
