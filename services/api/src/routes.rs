use crate::infra::AppState;
use crate::views::SearchResponse;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use escola_finder::error::AppError;
use escola_finder::remote::{SchoolSource, SearchQuery};
use escola_finder::search::{assemble, FilterCriteria};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) fn with_search_routes<S>(source: Arc<S>) -> Router
where
    S: SchoolSource + 'static,
{
    Router::new()
        .route("/api/v1/schools/search", post(search_endpoint::<S>))
        .with_state(source)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// One full fetch cycle: server-scoped request, then local filtering and ranking.
pub(crate) async fn search_endpoint<S>(
    State(source): State<Arc<S>>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<SearchResponse>, AppError>
where
    S: SchoolSource + 'static,
{
    let criteria = criteria.normalized();
    let query = SearchQuery::from_criteria(&criteria);
    let records = source.fetch(&query).await?;
    let results = assemble(&records, &criteria);
    info!(
        fetched = records.len(),
        shown = results.count,
        "school search served"
    );

    Ok(Json(SearchResponse::from(&results)))
}
