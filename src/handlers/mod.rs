pub mod auth;
pub mod notifications;
pub mod services;
pub mod users;
