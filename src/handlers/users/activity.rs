use axum::extract::Query;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub r#type: String,
    pub action: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}

type ServiceRow = (String, String, String, DateTime<Utc>, DateTime<Utc>);
type NotificationRow = (String, String, String, DateTime<Utc>);

/// GET /api/users/activity - recent services and notifications merged into
/// one timestamp-sorted feed
pub async fn activity(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(20).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let pool = DatabaseManager::pool().await?;

    let services = sqlx::query_as::<_, ServiceRow>(
        "SELECT name, type, status, created_at, updated_at
         FROM services WHERE user_id = $1
         ORDER BY updated_at DESC LIMIT $2",
    )
    .bind(user.user_id)
    .bind(limit);

    let notifications = sqlx::query_as::<_, NotificationRow>(
        "SELECT title, message, status, created_at
         FROM notifications WHERE user_id = $1
         ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user.user_id)
    .bind(limit);

    let (services, notifications) = tokio::try_join!(
        services.fetch_all(&pool),
        notifications.fetch_all(&pool),
    )?;

    let activity = merge_activity(services, notifications, limit as usize, offset as usize);

    Ok(Json(json!({
        "total": activity.len(),
        "activity": activity,
        "limit": limit,
        "offset": offset,
    })))
}

/// Merge service and notification rows into one descending timeline, then
/// apply offset/limit to the merged result.
fn merge_activity(
    services: Vec<ServiceRow>,
    notifications: Vec<NotificationRow>,
    limit: usize,
    offset: usize,
) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = services
        .into_iter()
        .map(|(name, _type, status, _created_at, updated_at)| ActivityItem {
            r#type: "service".to_string(),
            action: status.clone(),
            title: name,
            timestamp: updated_at,
            details: format!("Service {}", status.to_lowercase()),
        })
        .chain(notifications.into_iter().map(
            |(title, message, status, created_at)| ActivityItem {
                r#type: "notification".to_string(),
                action: status,
                title,
                timestamp: created_at,
                details: message,
            },
        ))
        .collect();

    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn merged_feed_is_sorted_newest_first() {
        let services = vec![
            ("api".to_string(), "http".to_string(), "Active".to_string(), at(0), at(100)),
        ];
        let notifications = vec![
            ("Down".to_string(), "it broke".to_string(), "sent".to_string(), at(200)),
            ("Up".to_string(), "recovered".to_string(), "sent".to_string(), at(50)),
        ];

        let feed = merge_activity(services, notifications, 20, 0);
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].title, "Down");
        assert_eq!(feed[1].title, "api");
        assert_eq!(feed[2].title, "Up");
        assert_eq!(feed[1].details, "Service active");
    }

    #[test]
    fn offset_and_limit_slice_the_merged_feed() {
        let notifications: Vec<NotificationRow> = (0..5)
            .map(|i| (format!("n{}", i), "m".to_string(), "unread".to_string(), at(i)))
            .collect();

        let feed = merge_activity(vec![], notifications, 2, 1);
        assert_eq!(feed.len(), 2);
        // Newest first is n4; offset 1 starts at n3
        assert_eq!(feed[0].title, "n3");
        assert_eq!(feed[1].title, "n2");
    }

    #[test]
    fn notification_details_carry_the_message() {
        let notifications = vec![
            ("t".to_string(), "service is now inactive".to_string(), "sent".to_string(), at(1)),
        ];
        let feed = merge_activity(vec![], notifications, 20, 0);
        assert_eq!(feed[0].details, "service is now inactive");
        assert_eq!(feed[0].r#type, "notification");
    }
}
