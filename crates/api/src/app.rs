use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::{method_not_allowed_fallback, not_found_fallback};
use crate::middleware::{
    metrics_handler, metrics_middleware, require_secret, security_headers_middleware, trace_id,
};
use crate::routes::{devices, health, meta, query, status};
use persistence::repositories::{DeviceRepository, StatusListRepository, StatusRepository};
use persistence::Documents;
use shared::id::generator_for;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub statuses: StatusRepository,
    pub devices: DeviceRepository,
    pub status_list: StatusListRepository,
}

impl AppState {
    pub fn new(config: Arc<Config>, documents: Documents) -> Self {
        let serialize_writes = config.storage.serialize_writes;
        let ids = generator_for(config.devices.id_format, config.devices.short_id_length);

        Self {
            statuses: StatusRepository::new(documents.status, serialize_writes),
            devices: DeviceRepository::new(documents.devices, Arc::from(ids), serialize_writes),
            status_list: StatusListRepository::new(documents.status_list),
            config,
        }
    }
}

pub fn create_app(config: Config, documents: Documents) -> Router {
    let config = Arc::new(config);
    let state = AppState::new(config.clone(), documents);

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Mutating routes, shared secret required
    let protected_routes = Router::new()
        .route("/api/set", get(status::set_status).post(status::set_status))
        .route(
            "/api/device/add",
            get(devices::add_device).post(devices::add_device),
        )
        .route(
            "/api/device/set",
            get(devices::set_device).post(devices::set_device),
        )
        .route(
            "/api/device/remove",
            get(devices::remove_device).post(devices::remove_device),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_secret));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(meta::root))
        .route("/errors", get(meta::error_preview))
        .route("/api/meta", get(meta::site_meta).post(meta::site_meta))
        .route("/api/query/status", get(query::status_overview))
        .route("/api/status", get(query::status_overview))
        .route("/api/query/status/list", get(query::status_list))
        .route("/api/device/list", get(devices::list_devices))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found_fallback)
        .method_not_allowed_fallback(method_not_allowed_fallback)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
