//! Field rules shared by the creation form and the listing service, so a
//! draft the form accepts is never rejected by the backend for a different
//! reason.

use std::ops::RangeInclusive;

use super::domain::NewListing;

pub const NAME_LENGTH: RangeInclusive<usize> = 10..=62;
pub const ROOM_RANGE: RangeInclusive<u32> = 1..=10;
pub const REGULAR_PRICE_RANGE: RangeInclusive<u64> = 50..=10_000_000;
pub const DISCOUNT_PRICE_RANGE: RangeInclusive<u64> = 0..=10_000_000;
pub const MAX_IMAGES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
    },
    #[error("You must upload at least one image")]
    NoImages,
    #[error("You can only upload 6 images per listing")]
    TooManyImages,
    #[error("Discount price must be lower than regular price")]
    DiscountNotLower,
}

/// Check a listing payload, reporting the first violated rule.
pub fn validate(listing: &NewListing) -> Result<(), ValidationError> {
    let name_length = listing.name.trim().chars().count();
    if !NAME_LENGTH.contains(&name_length) {
        return Err(ValidationError::NameLength {
            min: *NAME_LENGTH.start(),
            max: *NAME_LENGTH.end(),
        });
    }
    if listing.description.trim().is_empty() {
        return Err(ValidationError::MissingField("Description"));
    }
    if listing.address.trim().is_empty() {
        return Err(ValidationError::MissingField("Address"));
    }

    check_rooms("Bedrooms", listing.bedrooms)?;
    check_rooms("Bathrooms", listing.bathrooms)?;
    check_price("Regular price", listing.regular_price, &REGULAR_PRICE_RANGE)?;
    check_price(
        "Discount price",
        listing.discount_price,
        &DISCOUNT_PRICE_RANGE,
    )?;

    if listing.image_urls.is_empty() {
        return Err(ValidationError::NoImages);
    }
    if listing.image_urls.len() > MAX_IMAGES {
        return Err(ValidationError::TooManyImages);
    }

    if listing.offer && listing.discount_price >= listing.regular_price {
        return Err(ValidationError::DiscountNotLower);
    }

    Ok(())
}

fn check_rooms(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if ROOM_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: u64::from(*ROOM_RANGE.start()),
            max: u64::from(*ROOM_RANGE.end()),
        })
    }
}

fn check_price(
    field: &'static str,
    value: u64,
    range: &RangeInclusive<u64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
