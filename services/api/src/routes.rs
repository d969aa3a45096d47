use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Extension, Json, Router};
use kalyani_estate::auth::TokenService;
use kalyani_estate::client::{HomeFeed, HomePage};
use kalyani_estate::listings::{listing_router, ListingRepository, ListingService};
use serde_json::json;
use std::sync::Arc;

/// Listing API plus the landing page and operational endpoints.
pub(crate) fn with_listing_routes<R>(
    service: Arc<ListingService<R>>,
    tokens: Arc<TokenService>,
) -> Router
where
    R: ListingRepository + 'static,
{
    let landing = Router::new()
        .route("/", get(landing_page::<R>))
        .with_state(Arc::clone(&service));

    listing_router(service, tokens)
        .merge(landing)
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

/// Server-rendered home page built from the same three reads the browser
/// client performs.
pub(crate) async fn landing_page<R>(State(service): State<Arc<ListingService<R>>>) -> Html<String>
where
    R: ListingRepository + 'static,
{
    let feed = HomeFeed::load(service.as_ref()).await;
    Html(HomePage::from_feed(&feed).render_html().into_string())
}
