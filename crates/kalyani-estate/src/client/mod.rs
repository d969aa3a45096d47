//! Client-side workflows: the listing-creation form and the home page feed.

pub mod api;
pub mod form;
pub mod home;

use async_trait::async_trait;

pub use api::{ClientError, ListingApiClient};
pub use form::{
    redirect_path, FieldError, FormError, FormEvent, InputKind, ListingDraft, ListingForm,
};
pub use home::{HomeFeed, HomePage, ListingCard, Section, Slide};

use crate::listings::{Listing, ListingQuery, ListingRepository, ListingService, ListingServiceError};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Service(#[from] ListingServiceError),
}

/// Source of listing search results for the home page.
#[async_trait]
pub trait ListingFeed: Send + Sync {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, FeedError>;
}

#[async_trait]
impl ListingFeed for ListingApiClient {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, FeedError> {
        Ok(ListingApiClient::search(self, query).await?)
    }
}

#[async_trait]
impl<R> ListingFeed for ListingService<R>
where
    R: ListingRepository + 'static,
{
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, FeedError> {
        Ok(ListingService::search(self, query)?)
    }
}
