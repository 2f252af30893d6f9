pub mod crud;
pub mod logs;
pub mod search;
pub mod stats;

// Re-export handler functions for use in routing
pub use crud::{create, get_by_id, list, remove, update};
pub use crud::{CreateServiceRequest, UpdateServiceRequest};
pub use logs::{append_log, list_logs};
pub use search::search;
pub use stats::{stats, ServiceStats};

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Service;
use crate::error::ApiError;

/// Re-verify that a service exists and belongs to the caller before touching
/// it. Missing and not-owned are indistinguishable to the client (404).
pub(crate) async fn find_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Service, ApiError> {
    sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

pub(crate) async fn ensure_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM services WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.map(|_| ())
        .ok_or_else(|| ApiError::not_found("Service not found"))
}
