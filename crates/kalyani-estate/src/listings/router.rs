use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::domain::{ListingId, NewListing, UserId};
use super::query::ListingQuery;
use super::repository::{ListingRepository, RepositoryError};
use super::service::{ListingService, ListingServiceError};
use crate::auth::{AuthUser, TokenService};

/// Shared state for the listing routes.
pub struct ListingState<R> {
    pub service: Arc<ListingService<R>>,
    pub tokens: Arc<TokenService>,
}

impl<R> Clone for ListingState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R> FromRef<ListingState<R>> for Arc<TokenService> {
    fn from_ref(state: &ListingState<R>) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Error payload shared by every listing endpoint.
pub fn failure_body(status: StatusCode, message: &str) -> Json<Value> {
    Json(json!({
        "success": false,
        "statusCode": status.as_u16(),
        "message": message,
    }))
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, failure_body(status, message)).into_response()
}

/// Router builder exposing the listing create/read endpoints.
pub fn listing_router<R>(service: Arc<ListingService<R>>, tokens: Arc<TokenService>) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route("/api/listing/create", post(create_handler::<R>))
        .route("/api/listing/get", get(search_handler::<R>))
        .route("/api/listing/get/:listing_id", get(get_handler::<R>))
        .route("/api/user/listings/:user_id", get(owner_handler::<R>))
        .with_state(ListingState { service, tokens })
}

pub(crate) async fn create_handler<R>(
    State(state): State<ListingState<R>>,
    user: AuthUser,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(rejection.status(), &rejection.body_text()),
    };

    match state.service.create(&user, submission) {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(err) => service_failure(err),
    }
}

pub(crate) async fn search_handler<R>(
    State(state): State<ListingState<R>>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Response
where
    R: ListingRepository + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    match state.service.search(&query) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => service_failure(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(state): State<ListingState<R>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match state.service.get(&ListingId(listing_id)) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => service_failure(err),
    }
}

pub(crate) async fn owner_handler<R>(
    State(state): State<ListingState<R>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match state.service.owned_by(&user, &UserId(user_id)) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => service_failure(err),
    }
}

fn service_failure(err: ListingServiceError) -> Response {
    match err {
        ListingServiceError::Forbidden(message) => failure(StatusCode::FORBIDDEN, message),
        ListingServiceError::Validation(violation) => {
            failure(StatusCode::UNPROCESSABLE_ENTITY, &violation.to_string())
        }
        ListingServiceError::Repository(RepositoryError::NotFound) => {
            failure(StatusCode::NOT_FOUND, "Listing not found!")
        }
        ListingServiceError::Repository(RepositoryError::Conflict) => {
            failure(StatusCode::CONFLICT, "Listing already exists")
        }
        ListingServiceError::Repository(other) => {
            error!(error = %other, "listing repository failure");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string())
        }
    }
}
