#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use kalyani_estate::auth::TokenService;
use kalyani_estate::client::ListingApiClient;
use kalyani_estate::listings::{
    listing_router, InMemoryListingRepository, ListingService, UserId,
};
use kalyani_estate::storage::FirebaseStorage;

pub const OWNER: &str = "owner-42";
pub const BUCKET: &str = "kalyani-test.appspot.com";

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

pub struct ListingApi {
    pub addr: SocketAddr,
    pub repository: InMemoryListingRepository,
    pub tokens: Arc<TokenService>,
}

impl ListingApi {
    pub async fn start() -> Self {
        let repository = InMemoryListingRepository::default();
        let tokens = Arc::new(TokenService::new("integration-secret", "kalyani-it"));
        let service = Arc::new(ListingService::new(Arc::new(repository.clone())));
        let addr = serve(listing_router(service, Arc::clone(&tokens))).await;
        Self {
            addr,
            repository,
            tokens,
        }
    }

    pub fn client_for(&self, user: &str) -> ListingApiClient {
        let token = self
            .tokens
            .issue(&UserId(user.to_string()))
            .expect("issue token");
        self.anonymous_client().with_token(token)
    }

    pub fn anonymous_client(&self) -> ListingApiClient {
        ListingApiClient::new(reqwest::Client::new(), format!("http://{}", self.addr))
    }
}

/// An object uploaded to the fake storage bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Clone, Default)]
struct StorageState {
    objects: Arc<Mutex<Vec<StoredObject>>>,
    reject_names_containing: Option<String>,
}

/// Minimal stand-in for the Firebase Storage upload endpoint.
pub struct FakeStorage {
    pub addr: SocketAddr,
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl FakeStorage {
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    pub async fn rejecting(fragment: &str) -> Self {
        Self::start_with(Some(fragment.to_string())).await
    }

    async fn start_with(reject_names_containing: Option<String>) -> Self {
        let state = StorageState {
            reject_names_containing,
            ..StorageState::default()
        };
        let objects = Arc::clone(&state.objects);
        let router = Router::new()
            .route("/v0/b/:bucket/o", post(upload_object))
            .with_state(state);
        let addr = serve(router).await;
        Self { addr, objects }
    }

    pub fn storage(&self) -> FirebaseStorage {
        FirebaseStorage::new(reqwest::Client::new(), format!("http://{}", self.addr), BUCKET)
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().expect("storage mutex poisoned").clone()
    }
}

async fn upload_object(
    State(state): State<StorageState>,
    Path(bucket): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(name) = params.get("name").cloned() else {
        return (StatusCode::BAD_REQUEST, "missing object name").into_response();
    };
    if bucket != BUCKET {
        return (StatusCode::NOT_FOUND, "unknown bucket").into_response();
    }
    if let Some(fragment) = &state.reject_names_containing {
        if name.contains(fragment.as_str()) {
            return (StatusCode::FORBIDDEN, "rejected").into_response();
        }
    }

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state
        .objects
        .lock()
        .expect("storage mutex poisoned")
        .push(StoredObject {
            name: name.clone(),
            content_type: content_type.clone(),
            size: body.len(),
        });

    Json(json!({
        "name": name,
        "bucket": bucket,
        "contentType": content_type,
        "downloadTokens": format!("token-{}", body.len()),
    }))
    .into_response()
}
