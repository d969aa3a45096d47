use super::common::*;
use crate::listings::domain::{ListingType, UserId};
use crate::listings::repository::{InMemoryListingRepository, ListingRepository, RepositoryError};

#[test]
fn insert_rejects_duplicate_ids() {
    let repository = InMemoryListingRepository::default();
    let listing = stored("Duplicate riverside home", ListingType::Sale, false, 5);

    repository.insert(listing.clone()).expect("first insert");

    assert!(matches!(
        repository.insert(listing),
        Err(RepositoryError::Conflict)
    ));
    assert_eq!(repository.len(), 1);
}

#[test]
fn by_owner_lists_newest_first_and_skips_other_accounts() {
    let repository = InMemoryListingRepository::default();
    let oldest = stored("Oldest garden cottage", ListingType::Rent, false, 90);
    let newest = stored("Newest terrace apartment", ListingType::Sale, true, 1);
    let middle = stored("Middle lane townhouse", ListingType::Rent, false, 30);
    let mut foreign = stored("Someone else's bungalow", ListingType::Sale, false, 0);
    foreign.user_ref = UserId("another-owner".to_string());

    for listing in [oldest.clone(), foreign, newest.clone(), middle.clone()] {
        repository.insert(listing).expect("insert");
    }

    let owned = repository
        .by_owner(&UserId(OWNER.to_string()))
        .expect("owned listings");

    let ids: Vec<_> = owned.iter().map(|listing| listing.id.clone()).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
}

#[test]
fn fetch_returns_none_for_unknown_ids() {
    let repository = InMemoryListingRepository::default();
    let missing = stored("Never stored villa", ListingType::Sale, false, 0);

    assert!(repository.fetch(&missing.id).expect("fetch").is_none());
    assert!(repository.is_empty());
}
