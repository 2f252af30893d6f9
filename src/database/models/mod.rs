pub mod monitoring_log;
pub mod notification;
pub mod ntfy_config;
pub mod profile;
pub mod service;
pub mod settings;

pub use monitoring_log::MonitoringLog;
pub use notification::Notification;
pub use ntfy_config::{NtfyConfig, NtfySettings};
pub use profile::Profile;
pub use service::Service;
pub use settings::UserSettings;
