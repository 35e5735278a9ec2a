pub mod api;
pub mod config;
pub mod error;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use directory_core::RecordStore;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub fn get_server_version() -> String {
    match option_env!("DIRECTORY_BUILD_ID") {
        Some(build_id) if !build_id.is_empty() => {
            format!("{}+{}", built_info::PKG_VERSION, build_id)
        }
        _ => built_info::PKG_VERSION.to_string(),
    }
}

/// Shared, read-only application state.
pub struct AppState {
    pub store: RecordStore,
    pub version: String,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            version: get_server_version(),
        }
    }
}

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health_check))
        .nest("/api", api::api_router())
        .merge(api::api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::panic_response))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
