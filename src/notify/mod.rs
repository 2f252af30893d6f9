//! Outbound push dispatch to an ntfy.sh-compatible relay.
//!
//! Dispatch is fire-once: no retries, no queueing. Failures are returned as
//! structured results so callers can persist the outcome instead of failing
//! the surrounding request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::database::models::NtfySettings;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The relay answered, but with a non-2xx status.
    #[error("relay rejected notification: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// The relay could not be reached at all (connect error, timeout, DNS).
    #[error("relay unreachable: {0}")]
    Unreachable(String),

    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
}

/// Payload POSTed to `{url}/{topic}` as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfyPayload {
    pub title: String,
    pub message: String,
    pub priority: u8,
    pub tags: String,
    pub click: String,
}

impl NtfyPayload {
    /// Build the payload for a service notification: numeric priority, tags
    /// encoding the service id and priority label, and a click-through link
    /// into the frontend service page.
    pub fn for_service(
        title: &str,
        message: &str,
        priority_label: &str,
        service_id: uuid::Uuid,
    ) -> Self {
        let frontend_url = &crate::config::config().server.frontend_url;
        Self {
            title: title.to_string(),
            message: message.to_string(),
            priority: priority_level(priority_label),
            tags: format!("service-{},priority-{}", service_id, priority_label),
            click: format!("{}/services/{}", frontend_url, service_id),
        }
    }
}

/// Map a priority label to the relay's 1-5 numeric scale.
pub fn priority_level(label: &str) -> u8 {
    match label {
        "high" => 5,
        "medium" => 3,
        _ => 1,
    }
}

pub struct NtfyClient {
    http: reqwest::Client,
}

impl NtfyClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// POST the payload to `{settings.url}/{settings.topic}` with the
    /// configured timeout and optional basic auth. Returns the relay's JSON
    /// response body on success.
    pub async fn send(
        &self,
        settings: &NtfySettings,
        payload: &NtfyPayload,
    ) -> Result<Value, DispatchError> {
        let topic_url = build_topic_url(&settings.url, &settings.topic)?;

        let mut request = self
            .http
            .post(topic_url)
            .timeout(Duration::from_millis(settings.timeout))
            .json(payload);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(|e| {
            DispatchError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // ntfy answers publishes with a JSON receipt; fall back to raw text
        // for relays that reply with something else.
        let body = response
            .text()
            .await
            .map_err(|e| DispatchError::Unreachable(e.to_string()))?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

impl Default for NtfyClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_topic_url(base: &str, topic: &str) -> Result<Url, DispatchError> {
    let base = Url::parse(base).map_err(|e| DispatchError::InvalidUrl(e.to_string()))?;
    // Treat the base as a directory so configured paths survive the join.
    let joined = if base.path().ends_with('/') {
        base.join(topic)
    } else {
        Url::parse(&format!("{}/{}", base, topic))
    };
    joined.map_err(|e| DispatchError::InvalidUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn priority_labels_map_to_relay_levels() {
        assert_eq!(priority_level("high"), 5);
        assert_eq!(priority_level("medium"), 3);
        assert_eq!(priority_level("low"), 1);
        // Unknown labels degrade to the lowest level
        assert_eq!(priority_level("urgent"), 1);
    }

    #[test]
    fn payload_encodes_service_and_priority() {
        let id = Uuid::new_v4();
        let payload = NtfyPayload::for_service("Down", "service is now inactive", "high", id);
        assert_eq!(payload.priority, 5);
        assert_eq!(payload.tags, format!("service-{},priority-high", id));
        assert!(payload.click.ends_with(&format!("/services/{}", id)));
    }

    #[test]
    fn topic_url_joins_base_and_topic() {
        let url = build_topic_url("https://ntfy.sh", "my-topic").unwrap();
        assert_eq!(url.as_str(), "https://ntfy.sh/my-topic");

        let url = build_topic_url("https://push.example.com/relay", "t").unwrap();
        assert_eq!(url.as_str(), "https://push.example.com/relay/t");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(
            build_topic_url("not a url", "topic"),
            Err(DispatchError::InvalidUrl(_))
        ));
    }
}
