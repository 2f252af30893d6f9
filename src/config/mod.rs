use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub ntfy: NtfyDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origin: String,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: u32,
    /// Base URL used to build click-through links in push notifications.
    pub frontend_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

/// Process-wide relay defaults, used to seed a per-user ntfy config row the
/// first time a user sends a notification without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NtfyDefaults {
    pub url: String,
    pub topic: String,
    pub rate_limit_per_minute: u32,
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGIN") {
            self.server.cors_origin = v;
        }
        if let Ok(v) = env::var("RATE_LIMIT_WINDOW_MS") {
            self.server.rate_limit_window_ms = v.parse().unwrap_or(self.server.rate_limit_window_ms);
        }
        if let Ok(v) = env::var("RATE_LIMIT_MAX_REQUESTS") {
            self.server.rate_limit_max_requests = v.parse().unwrap_or(self.server.rate_limit_max_requests);
        }
        if let Ok(v) = env::var("FRONTEND_URL") {
            self.server.frontend_url = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Ntfy relay overrides
        if let Ok(v) = env::var("NTFY_URL") {
            self.ntfy.url = v;
        }
        if let Ok(v) = env::var("NTFY_TOPIC") {
            self.ntfy.topic = v;
        }
        if let Ok(v) = env::var("NTFY_TIMEOUT_MS") {
            self.ntfy.timeout_ms = v.parse().unwrap_or(self.ntfy.timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3001,
                cors_origin: "http://localhost:3000".to_string(),
                rate_limit_window_ms: 15 * 60 * 1000, // 15 minutes
                rate_limit_max_requests: 1000,
                frontend_url: "http://localhost:5174".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
            ntfy: NtfyDefaults::builtin(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3001,
                cors_origin: "https://staging.example.com".to_string(),
                rate_limit_window_ms: 15 * 60 * 1000,
                rate_limit_max_requests: 200,
                frontend_url: "https://staging.example.com".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            ntfy: NtfyDefaults::builtin(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3001,
                cors_origin: "https://app.example.com".to_string(),
                rate_limit_window_ms: 15 * 60 * 1000,
                rate_limit_max_requests: 100,
                frontend_url: "https://app.example.com".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            ntfy: NtfyDefaults::builtin(),
        }
    }
}

impl NtfyDefaults {
    fn builtin() -> Self {
        Self {
            url: "https://ntfy.sh".to_string(),
            topic: "personal-service-manager".to_string(),
            rate_limit_per_minute: 60,
            timeout_ms: 30_000,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.rate_limit_max_requests, 1000);
        assert_eq!(config.ntfy.url, "https://ntfy.sh");
        assert_eq!(config.ntfy.topic, "personal-service-manager");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.server.rate_limit_max_requests, 100);
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert_eq!(config.ntfy.timeout_ms, 30_000);
    }
}
