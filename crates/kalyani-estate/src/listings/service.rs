use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Listing, ListingId, NewListing, UserId};
use super::query::ListingQuery;
use super::repository::{ListingRepository, RepositoryError};
use super::validation::{self, ValidationError};
use crate::auth::AuthUser;

/// Service composing validation, ownership checks, and the repository.
pub struct ListingService<R> {
    repository: Arc<R>,
}

impl<R> ListingService<R>
where
    R: ListingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Persist a new listing on behalf of the authenticated user.
    pub fn create(
        &self,
        user: &AuthUser,
        submission: NewListing,
    ) -> Result<Listing, ListingServiceError> {
        if submission.user_ref != user.id {
            warn!(
                user = %user.id,
                user_ref = %submission.user_ref,
                "listing creation for another account refused"
            );
            return Err(ListingServiceError::Forbidden(
                "You can only create listings for your own account",
            ));
        }

        validation::validate(&submission)?;

        let listing = Listing::from_new(ListingId::generate(), submission, Utc::now());
        let stored = self.repository.insert(listing)?;
        info!(
            listing = %stored.id,
            owner = %stored.user_ref,
            images = stored.image_urls.len(),
            "listing created"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &ListingId) -> Result<Listing, ListingServiceError> {
        let listing = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(listing)
    }

    pub fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(self.repository.search(query)?)
    }

    /// Only the owner may enumerate their own listings.
    pub fn owned_by(
        &self,
        user: &AuthUser,
        owner: &UserId,
    ) -> Result<Vec<Listing>, ListingServiceError> {
        if &user.id != owner {
            return Err(ListingServiceError::Forbidden(
                "You can only view your own listings",
            ));
        }
        Ok(self.repository.by_owner(owner)?)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
