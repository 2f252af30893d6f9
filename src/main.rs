use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use servicepulse::config;
use servicepulse::database::DatabaseManager;
use servicepulse::handlers;
use servicepulse::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting ServicePulse backend in {:?} mode", config.environment);

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 ServicePulse backend listening on http://{}", bind_addr);
    println!("📊 Health check: http://localhost:{}/api/health", config.server.port);
    println!("🗄️  Database test: http://localhost:{}/api/test-db", config.server.port);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/api/health", get(health))
        .route("/api/test-db", get(test_db))
        .merge(auth_routes())
        // Protected resources
        .merge(service_routes())
        .merge(notification_routes())
        .merge(user_routes())
        .fallback(not_found)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn service_routes() -> Router {
    use handlers::services;

    Router::new()
        .route("/api/services", get(services::list).post(services::create))
        // Static segments before the :id capture
        .route("/api/services/search", get(services::search))
        .route("/api/services/stats", get(services::stats))
        .route(
            "/api/services/:id",
            get(services::get_by_id)
                .put(services::update)
                .delete(services::remove),
        )
        .route(
            "/api/services/:id/logs",
            get(services::list_logs).post(services::append_log),
        )
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn notification_routes() -> Router {
    use axum::routing::{post, put};
    use handlers::notifications;

    Router::new()
        .route(
            "/api/notifications",
            get(notifications::list).post(notifications::create),
        )
        .route("/api/notifications/send", post(notifications::send))
        .route("/api/notifications/stats", get(notifications::stats))
        .route("/api/notifications/read-all", put(notifications::mark_all_read))
        .route(
            "/api/notifications/:id",
            get(notifications::get_by_id)
                .put(notifications::update)
                .delete(notifications::remove),
        )
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/api/ntfy-config",
            get(notifications::get_ntfy_config).put(notifications::update_ntfy_config),
        )
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router {
    use axum::routing::{delete, put};
    use handlers::users;

    Router::new()
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users/password", put(users::change_password))
        .route(
            "/api/users/settings",
            get(users::get_settings).put(users::update_settings),
        )
        .route("/api/users/account", delete(users::delete_account))
        .route("/api/users/activity", get(users::activity))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let config = config::config();

    match config.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!("Invalid CORS origin, falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "service": "servicepulse-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn test_db() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "connected",
                "message": "Database connection successful",
                "timestamp": now,
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Database connection failed",
                "error": e.to_string(),
                "timestamp": now,
            })),
        ),
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}
