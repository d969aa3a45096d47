use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::auth::{AuthUser, TokenService};
use crate::listings::domain::{Listing, ListingId, ListingType, NewListing, UserId};
use crate::listings::query::ListingQuery;
use crate::listings::repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
use crate::listings::{listing_router, ListingService};

pub(super) const OWNER: &str = "user-kalyani";

pub(super) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn insert(&self, _listing: Listing) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn fetch(&self, _id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn search(&self, _query: &ListingQuery) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn by_owner(&self, _owner: &UserId) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn owner() -> AuthUser {
    AuthUser {
        id: UserId(OWNER.to_string()),
    }
}

pub(super) fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new("routing-secret", "kalyani-test"))
}

pub(super) fn submission() -> NewListing {
    NewListing {
        name: "Riverside family home".to_string(),
        description: "Three bedrooms with a garden facing the river".to_string(),
        address: "7 Lake Town, Kalyani".to_string(),
        listing_type: ListingType::Sale,
        bedrooms: 3,
        bathrooms: 2,
        regular_price: 250_000,
        discount_price: 0,
        offer: false,
        parking: true,
        furnished: false,
        image_urls: vec![
            "https://cdn.example/cover.jpg".to_string(),
            "https://cdn.example/kitchen.jpg".to_string(),
        ],
        user_ref: UserId(OWNER.to_string()),
    }
}

/// A persisted listing created `minutes_ago` before a fixed reference time.
pub(super) fn stored(name: &str, listing_type: ListingType, offer: bool, minutes_ago: i64) -> Listing {
    let reference = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut new = submission();
    new.name = name.to_string();
    new.listing_type = listing_type;
    new.offer = offer;
    if offer {
        new.discount_price = new.regular_price - 10_000;
    }
    Listing::from_new(
        ListingId::generate(),
        new,
        reference - Duration::minutes(minutes_ago),
    )
}

pub(super) fn router_with(repository: InMemoryListingRepository) -> (axum::Router, Arc<TokenService>) {
    let tokens = tokens();
    let service = Arc::new(ListingService::new(Arc::new(repository)));
    (listing_router(service, Arc::clone(&tokens)), tokens)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
