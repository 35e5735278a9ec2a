//! HTTP handlers for the directory API.
//!
//! The handlers are thin: each one runs a pure core function against the
//! shared, immutable record store and wraps the result in the JSON envelope.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use directory_core::{
    compute_stats, evaluate, extract_facets, CompaniesResponse, DataResponse, Facets,
    HealthResponse, QueryDescriptor, RawCompanyQuery, Stats,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Data endpoints, mounted both under `/api` and at the root.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(list_companies))
        .route("/filters", get(get_filters))
        .route("/stats", get(get_stats))
}

/// Handler: GET /companies
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let Query(pairs) = query.map_err(|e| {
        warn!("Rejected query string: {}", e);
        ApiError::bad_request(e.body_text())
    })?;
    let raw = RawCompanyQuery::from_pairs(pairs);

    let descriptor = QueryDescriptor::from_raw(&raw).map_err(|e| {
        warn!("Rejected company query: {}", e);
        ApiError::from(e)
    })?;

    let page = evaluate(&state.store, &descriptor);
    debug!(
        "Company query page={} limit={} sort={}:{} matched={} returned={}",
        descriptor.page,
        descriptor.limit,
        descriptor.sort_by,
        descriptor.sort_order,
        page.pagination.total_companies,
        page.data.len()
    );

    Ok(Json(page.into()))
}

/// Handler: GET /filters
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<DataResponse<Facets>> {
    Json(DataResponse::ok(extract_facets(&state.store)))
}

/// Handler: GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<DataResponse<Stats>> {
    Json(DataResponse::ok(compute_stats(&state.store)))
}

/// Handler: GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        version: Some(state.version.clone()),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    })
}
