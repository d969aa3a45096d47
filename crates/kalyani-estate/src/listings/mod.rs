//! Listing records: domain model, validation rules, search queries, the
//! repository seam, the service, and the HTTP routes.

pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Listing, ListingId, ListingType, NewListing, UserId};
pub use query::{ListingQuery, SortField, SortOrder, TypeFilter};
pub use repository::{InMemoryListingRepository, ListingRepository, RepositoryError};
pub use router::{failure_body, listing_router, ListingState};
pub use service::{ListingService, ListingServiceError};
pub use validation::{validate, ValidationError, MAX_IMAGES};
