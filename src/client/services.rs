use serde_json::json;
use uuid::Uuid;

use crate::database::models::Service;
use crate::handlers::services::{CreateServiceRequest, ServiceStats, UpdateServiceRequest};

use super::{ApiClient, ClientError};

/// Local filters applied by [`ServicesStore::search`]. A service matches when
/// it carries any of the listed tags.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub r#type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl SearchFilters {
    fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.tags.is_empty()
    }
}

/// Client-side cache of the caller's services.
///
/// Stats are derived from the cached list after every mutation rather than
/// patched incrementally, so they cannot drift from the entities actually
/// held; `fetch_stats` replaces them with the server's aggregates.
pub struct ServicesStore {
    client: ApiClient,
    pub services: Vec<Service>,
    pub stats: ServiceStats,
    pub loading: bool,
    pub error: Option<String>,
}

impl ServicesStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            services: Vec::new(),
            stats: ServiceStats::default(),
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

    /// GET /services, then refresh stats from the server.
    pub async fn fetch_services(&mut self) -> Result<(), ClientError> {
        self.begin();
        let result = self.client.get("/services").await.and_then(|value| {
            let services: Vec<Service> = serde_json::from_value(value)?;
            Ok(services)
        });

        match self.settle(result) {
            Ok(services) => {
                self.services = services;
                if let Err(e) = self.fetch_stats().await {
                    tracing::warn!("Failed to fetch service stats: {}", e);
                    self.stats = self.derived_stats();
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// GET /services/stats - authoritative aggregates.
    pub async fn fetch_stats(&mut self) -> Result<(), ClientError> {
        let value = self.client.get("/services/stats").await?;
        self.stats = serde_json::from_value(value)?;
        Ok(())
    }

    /// POST /services; the new entity goes to the top of the list.
    pub async fn create_service(
        &mut self,
        payload: &CreateServiceRequest,
    ) -> Result<Service, ClientError> {
        self.begin();
        let result = self.client.post("/services", json!(payload)).await.and_then(|value| {
            let service: Service = serde_json::from_value(value["service"].clone())?;
            Ok(service)
        });

        let service = self.settle(result)?;
        self.services.insert(0, service.clone());
        self.stats = self.derived_stats();
        Ok(service)
    }

    /// PUT /services/:id; replaces the cached entity.
    pub async fn update_service(
        &mut self,
        service_id: Uuid,
        payload: &UpdateServiceRequest,
    ) -> Result<Service, ClientError> {
        self.begin();
        let path = format!("/services/{}", service_id);
        let result = self.client.put(&path, json!(payload)).await.and_then(|value| {
            let service: Service = serde_json::from_value(value["service"].clone())?;
            Ok(service)
        });

        let service = self.settle(result)?;
        if let Some(cached) = self.services.iter_mut().find(|s| s.id == service_id) {
            *cached = service.clone();
        }
        self.stats = self.derived_stats();
        Ok(service)
    }

    /// DELETE /services/:id; drops the cached entity.
    pub async fn delete_service(&mut self, service_id: Uuid) -> Result<(), ClientError> {
        self.begin();
        let path = format!("/services/{}", service_id);
        let result = self.client.delete(&path).await.map(|_| ());

        self.settle(result)?;
        self.services.retain(|s| s.id != service_id);
        self.stats = self.derived_stats();
        Ok(())
    }

    /// POST /services/:id/logs - append a monitoring entry.
    pub async fn add_monitoring_log(
        &self,
        service_id: Uuid,
        status: &str,
        response_time: Option<i32>,
        error_message: Option<&str>,
    ) -> Result<serde_json::Value, ClientError> {
        let path = format!("/services/{}/logs", service_id);
        self.client
            .post(
                &path,
                json!({
                    "status": status,
                    "response_time": response_time,
                    "error_message": error_message,
                }),
            )
            .await
    }

    /// Local search over the cached list: substring match on name and
    /// description plus equality filters. With no query and no filters this
    /// returns the whole cache.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<&Service> {
        let query = query.trim();
        if query.is_empty() && filters.is_empty() {
            return self.services.iter().collect();
        }

        let needle = query.to_lowercase();
        self.services
            .iter()
            .filter(|service| {
                let matches_search = needle.is_empty()
                    || service.name.to_lowercase().contains(&needle)
                    || service
                        .description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(&needle))
                        .unwrap_or(false);

                let matches_type = filters
                    .r#type
                    .as_deref()
                    .map(|t| service.r#type == t)
                    .unwrap_or(true);
                let matches_status = filters
                    .status
                    .as_deref()
                    .map(|s| service.status == s)
                    .unwrap_or(true);
                let matches_priority = filters
                    .priority
                    .as_deref()
                    .map(|p| service.priority == p)
                    .unwrap_or(true);
                let matches_tags = filters.tags.is_empty()
                    || filters.tags.iter().any(|tag| service.tags.contains(tag));

                matches_search && matches_type && matches_status && matches_priority && matches_tags
            })
            .collect()
    }

    /// Stats computed from the cached list.
    pub fn derived_stats(&self) -> ServiceStats {
        let mut stats = ServiceStats {
            total: self.services.len() as i64,
            ..Default::default()
        };

        for service in &self.services {
            match service.status.as_str() {
                "active" => stats.active += 1,
                "inactive" => stats.inactive += 1,
                "completed" => stats.completed += 1,
                _ => {}
            }
            match service.priority.as_str() {
                "high" => stats.high_priority += 1,
                "medium" => stats.medium_priority += 1,
                "low" => stats.low_priority += 1,
                _ => {}
            }
            *stats.by_type.entry(service.r#type.clone()).or_insert(0) += 1;
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
    use chrono::Utc;
    use serde_json::json;

    fn service(name: &str, status: &str, priority: &str, tags: &[&str]) -> Service {
        Service {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(format!("{} watcher", name)),
            r#type: "http".to_string(),
            status: status.to_string(),
            priority: priority.to_string(),
            config: json!({}),
            metadata: json!({}),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            last_notification: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store_with(services: Vec<Service>) -> ServicesStore {
        let mut store = ServicesStore::new(ApiClient::new("http://localhost:3001/api"));
        store.services = services;
        store
    }

    #[test]
    fn search_with_no_query_and_no_filters_is_identity() {
        let store = store_with(vec![
            service("api", "active", "high", &[]),
            service("backup", "inactive", "low", &[]),
        ]);
        assert_eq!(store.search("", &SearchFilters::default()).len(), 2);
        assert_eq!(store.search("  ", &SearchFilters::default()).len(), 2);
    }

    #[test]
    fn search_matches_name_and_description_substrings() {
        let store = store_with(vec![
            service("api-gateway", "active", "high", &[]),
            service("backup", "active", "low", &[]),
        ]);

        let hits = store.search("gateway", &SearchFilters::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "api-gateway");

        // "watcher" only appears in descriptions
        assert_eq!(store.search("watcher", &SearchFilters::default()).len(), 2);
    }

    #[test]
    fn search_filters_compose() {
        let store = store_with(vec![
            service("api", "active", "high", &["prod"]),
            service("api-2", "inactive", "high", &["prod"]),
            service("cron", "active", "low", &["batch"]),
        ]);

        let filters = SearchFilters {
            status: Some("active".to_string()),
            tags: vec!["prod".to_string()],
            ..Default::default()
        };
        let hits = store.search("", &filters);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "api");
    }

    #[test]
    fn derived_stats_count_from_the_list() {
        let store = store_with(vec![
            service("a", "active", "high", &[]),
            service("b", "active", "medium", &[]),
            service("c", "inactive", "low", &[]),
            service("d", "error", "medium", &[]),
        ]);

        let stats = store.derived_stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.high_priority, 1);
        assert_eq!(stats.medium_priority, 2);
        assert_eq!(stats.by_type.get("http"), Some(&4));
    }
}
