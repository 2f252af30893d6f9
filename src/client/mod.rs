//! Typed client for the ServicePulse REST API.
//!
//! `ApiClient` wraps the HTTP surface; the resource stores
//! ([`services::ServicesStore`], [`notifications::NotificationsStore`])
//! mirror REST resources into local caches with derived views, the way the
//! web frontend consumes them.

pub mod notifications;
pub mod services;

use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no authentication token")]
    MissingToken,

    /// The server answered with an error body.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// POST /auth/login; keeps the returned token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Value, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self.execute(Method::POST, "/auth/login", Some(body), false).await?;
        if let Some(token) = value.get("token").and_then(Value::as_str) {
            self.token = Some(token.to_string());
        }
        Ok(value)
    }

    /// POST /auth/register; keeps the returned token for subsequent calls.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Value, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password, "name": name });
        let value = self.execute(Method::POST, "/auth/register", Some(body), false).await?;
        if let Some(token) = value.get("token").and_then(Value::as_str) {
            self.token = Some(token.to_string());
        }
        Ok(value)
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::GET, path, None, true).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.execute(Method::POST, path, Some(body), true).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.execute(Method::PUT, path, Some(body), true).await
    }

    pub async fn put_empty(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::PUT, path, None, true).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::DELETE, path, None, true).await
    }

    /// GET /health against the server root (the health endpoint lives under
    /// the same /api prefix but needs no token).
    pub async fn health(&self) -> Result<Value, ClientError> {
        self.execute(Method::GET, "/health", None, false).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .timeout(Duration::from_secs(30));

        if authenticated {
            let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Request failed")
                .to_string();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/api/");
        assert_eq!(client.base_url, "http://localhost:3001/api");
    }

    #[test]
    fn token_accessors() {
        let mut client = ApiClient::new("http://localhost:3001/api");
        assert!(client.token().is_none());
        client.set_token("abc");
        assert_eq!(client.token(), Some("abc"));
    }
}
