use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Listing, ListingId, UserId};
use super::query::ListingQuery;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, RepositoryError>;
    fn by_owner(&self, owner: &UserId) -> Result<Vec<Listing>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository backing the service binary and the tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<ListingId, Listing>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut records = self.records()?;
        if records.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        records.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, RepositoryError> {
        Ok(query.apply(self.records()?.values()))
    }

    /// Newest first.
    fn by_owner(&self, owner: &UserId) -> Result<Vec<Listing>, RepositoryError> {
        let mut owned: Vec<Listing> = self
            .records()?
            .values()
            .filter(|listing| &listing.user_ref == owner)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(owned)
    }
}
