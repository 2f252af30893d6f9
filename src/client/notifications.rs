use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Notification, NtfySettings};
use crate::handlers::notifications::{
    CreateNotificationRequest, NotificationStats, SendNotificationRequest,
};

use super::{ApiClient, ClientError};

/// Server-side list filters for [`NotificationsStore::fetch_notifications`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub service_id: Option<Uuid>,
}

impl ListOptions {
    fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(offset) = self.offset {
            params.push(format!("offset={}", offset));
        }
        if let Some(status) = &self.status {
            params.push(format!("status={}", status));
        }
        if let Some(priority) = &self.priority {
            params.push(format!("priority={}", priority));
        }
        if let Some(service_id) = self.service_id {
            params.push(format!("service_id={}", service_id));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Local filters applied by [`NotificationsStore::filter`].
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub service_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Client-side cache of the caller's notifications.
///
/// As with the services store, stats are recomputed from the cached list
/// after every local mutation; `fetch_stats` swaps in the server's numbers.
pub struct NotificationsStore {
    client: ApiClient,
    pub notifications: Vec<Notification>,
    pub stats: NotificationStats,
    pub ntfy_config: Option<NtfySettings>,
    pub loading: bool,
    pub error: Option<String>,
}

impl NotificationsStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            notifications: Vec::new(),
            stats: NotificationStats::default(),
            ntfy_config: None,
            loading: false,
            error: None,
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn settle<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        self.loading = false;
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    /// GET /notifications with optional filters, then refresh stats.
    pub async fn fetch_notifications(&mut self, options: &ListOptions) -> Result<(), ClientError> {
        self.begin();
        let path = format!("/notifications{}", options.to_query_string());
        let result = self.client.get(&path).await.and_then(|value| {
            let notifications: Vec<Notification> = serde_json::from_value(value)?;
            Ok(notifications)
        });

        match self.settle(result) {
            Ok(notifications) => {
                self.notifications = notifications;
                if let Err(e) = self.fetch_stats().await {
                    tracing::warn!("Failed to fetch notification stats: {}", e);
                    self.stats = self.derived_stats();
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// GET /notifications/stats - authoritative aggregates.
    pub async fn fetch_stats(&mut self) -> Result<(), ClientError> {
        let value = self.client.get("/notifications/stats").await?;
        self.stats = serde_json::from_value(value)?;
        Ok(())
    }

    /// GET /ntfy-config; absence is normal before the first send.
    pub async fn fetch_ntfy_config(&mut self) -> Result<(), ClientError> {
        match self.client.get("/ntfy-config").await {
            Ok(value) => {
                self.ntfy_config = serde_json::from_value(value["config"].clone()).ok();
                Ok(())
            }
            Err(ClientError::Api { status: 404, .. }) => {
                self.ntfy_config = None;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// PUT /ntfy-config with a partial settings object.
    pub async fn update_ntfy_config(&mut self, patch: Value) -> Result<(), ClientError> {
        self.begin();
        let result = self
            .client
            .put("/ntfy-config", json!({ "config": patch }))
            .await;

        let value = self.settle(result)?;
        self.ntfy_config = serde_json::from_value(value["config"]["config"].clone()).ok();
        Ok(())
    }

    /// POST /notifications - manual notification, lands on top of the cache.
    pub async fn create_notification(
        &mut self,
        payload: &CreateNotificationRequest,
    ) -> Result<Notification, ClientError> {
        self.begin();
        let result = self
            .client
            .post("/notifications", json!(payload))
            .await
            .and_then(|value| {
                let notification: Notification =
                    serde_json::from_value(value["notification"].clone())?;
                Ok(notification)
            });

        let notification = self.settle(result)?;
        self.notifications.insert(0, notification.clone());
        self.stats = self.derived_stats();
        Ok(notification)
    }

    /// POST /notifications/send. The response carries only a summary of the
    /// stored row, so the cache is refreshed from the server afterwards.
    pub async fn send_notification(
        &mut self,
        payload: &SendNotificationRequest,
    ) -> Result<Value, ClientError> {
        self.begin();
        let result = self.client.post("/notifications/send", json!(payload)).await;
        let value = self.settle(result)?;

        if let Err(e) = self.fetch_notifications(&ListOptions::default()).await {
            tracing::warn!("Failed to refresh notifications after send: {}", e);
        }
        Ok(value)
    }

    /// PUT /notifications/:id - partial update; replaces the cached entity.
    pub async fn update_notification(
        &mut self,
        notification_id: Uuid,
        payload: Value,
    ) -> Result<Notification, ClientError> {
        self.begin();
        let path = format!("/notifications/{}", notification_id);
        let result = self.client.put(&path, payload).await.and_then(|value| {
            let notification: Notification =
                serde_json::from_value(value["notification"].clone())?;
            Ok(notification)
        });

        let notification = self.settle(result)?;
        if let Some(cached) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            *cached = notification.clone();
        }
        self.stats = self.derived_stats();
        Ok(notification)
    }

    /// DELETE /notifications/:id; drops the cached entity.
    pub async fn delete_notification(&mut self, notification_id: Uuid) -> Result<(), ClientError> {
        self.begin();
        let path = format!("/notifications/{}", notification_id);
        let result = self.client.delete(&path).await.map(|_| ());

        self.settle(result)?;
        self.notifications.retain(|n| n.id != notification_id);
        self.stats = self.derived_stats();
        Ok(())
    }

    /// PUT /notifications/:id/read
    pub async fn mark_as_read(&mut self, notification_id: Uuid) -> Result<(), ClientError> {
        let path = format!("/notifications/{}/read", notification_id);
        self.client.put_empty(&path).await?;

        if let Some(cached) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            cached.status = "read".to_string();
            cached.read_at = Some(Utc::now());
        }
        self.stats = self.derived_stats();
        Ok(())
    }

    /// PUT /notifications/read-all
    pub async fn mark_all_as_read(&mut self) -> Result<(), ClientError> {
        self.client.put_empty("/notifications/read-all").await?;

        let now = Utc::now();
        for notification in &mut self.notifications {
            if notification.status == "unread" {
                notification.status = "read".to_string();
                notification.read_at = Some(now);
            }
        }
        self.stats = self.derived_stats();
        Ok(())
    }

    // Derived views over the cache

    pub fn unread(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| n.status == "unread").collect()
    }

    pub fn recent(&self) -> Vec<&Notification> {
        self.notifications.iter().take(10).collect()
    }

    pub fn failed(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| n.status == "failed").collect()
    }

    pub fn has_unread(&self) -> bool {
        self.notifications.iter().any(|n| n.status == "unread")
    }

    pub fn has_failed(&self) -> bool {
        self.notifications.iter().any(|n| n.status == "failed")
    }

    /// Local filtering over the cached list.
    pub fn filter(&self, options: &FilterOptions) -> Vec<&Notification> {
        let needle = options
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.notifications
            .iter()
            .filter(|notification| {
                let matches_status = options
                    .status
                    .as_deref()
                    .map(|s| notification.status == s)
                    .unwrap_or(true);
                let matches_priority = options
                    .priority
                    .as_deref()
                    .map(|p| notification.priority == p)
                    .unwrap_or(true);
                let matches_service = options
                    .service_id
                    .map(|id| notification.service_id == id)
                    .unwrap_or(true);
                let matches_search = needle
                    .as_deref()
                    .map(|q| {
                        notification.title.to_lowercase().contains(q)
                            || notification.message.to_lowercase().contains(q)
                    })
                    .unwrap_or(true);

                matches_status && matches_priority && matches_service && matches_search
            })
            .collect()
    }

    /// Stats computed from the cached list; by_service falls back to the
    /// service name recorded in notification metadata.
    pub fn derived_stats(&self) -> NotificationStats {
        let mut stats = NotificationStats {
            total: self.notifications.len() as i64,
            ..Default::default()
        };

        for notification in &self.notifications {
            match notification.status.as_str() {
                "unread" => stats.unread += 1,
                "read" => stats.read += 1,
                "pending" => stats.pending += 1,
                "sent" => stats.sent += 1,
                "failed" => stats.failed += 1,
                _ => {}
            }
            match notification.priority.as_str() {
                "high" => stats.high_priority += 1,
                "medium" => stats.medium_priority += 1,
                "low" => stats.low_priority += 1,
                _ => {}
            }

            let service_name = notification
                .metadata
                .get("service_name")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            *stats.by_service.entry(service_name.to_string()).or_insert(0) += 1;
        }

        stats
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(status: &str, priority: &str, service_name: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            title: "title".to_string(),
            message: "message".to_string(),
            priority: priority.to_string(),
            provider: "manual".to_string(),
            status: status.to_string(),
            response_data: None,
            error_message: None,
            metadata: json!({ "service_name": service_name }),
            read_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn store_with(notifications: Vec<Notification>) -> NotificationsStore {
        let mut store = NotificationsStore::new(ApiClient::new("http://localhost:3001/api"));
        store.notifications = notifications;
        store
    }

    #[test]
    fn derived_stats_count_status_priority_and_service() {
        let store = store_with(vec![
            notification("unread", "high", "api"),
            notification("unread", "medium", "api"),
            notification("sent", "low", "cron"),
            notification("failed", "high", "cron"),
        ]);

        let stats = store.derived_stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.unread, 2);
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.high_priority, 2);
        assert_eq!(stats.by_service.get("api"), Some(&2));
        assert_eq!(stats.by_service.get("cron"), Some(&2));
    }

    #[test]
    fn filter_composes_all_criteria() {
        let mut n1 = notification("unread", "high", "api");
        n1.title = "Service down".to_string();
        let n2 = notification("read", "high", "api");
        let store = store_with(vec![n1, n2]);

        let options = FilterOptions {
            status: Some("unread".to_string()),
            search: Some("down".to_string()),
            ..Default::default()
        };
        let hits = store.filter(&options);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Service down");

        // Empty options match everything
        assert_eq!(store.filter(&FilterOptions::default()).len(), 2);
    }

    #[test]
    fn unread_and_failed_views() {
        let store = store_with(vec![
            notification("unread", "high", "api"),
            notification("failed", "low", "api"),
            notification("read", "low", "api"),
        ]);

        assert_eq!(store.unread().len(), 1);
        assert_eq!(store.failed().len(), 1);
        assert!(store.has_unread());
        assert!(store.has_failed());
    }

    #[test]
    fn list_options_render_as_query_string() {
        let options = ListOptions {
            limit: Some(10),
            status: Some("unread".to_string()),
            ..Default::default()
        };
        assert_eq!(options.to_query_string(), "?limit=10&status=unread");
        assert_eq!(ListOptions::default().to_query_string(), "");
    }
}
