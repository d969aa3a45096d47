use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a persisted listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the account that owns a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    #[default]
    Rent,
}

impl ListingType {
    pub const fn label(self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
        }
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sale" => Ok(Self::Sale),
            "rent" => Ok(Self::Rent),
            other => Err(format!("unknown listing type '{other}'")),
        }
    }
}

/// Payload accepted by `POST /api/listing/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: u64,
    pub discount_price: u64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<String>,
    pub user_ref: UserId,
}

/// A persisted property record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ListingId,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: u64,
    pub discount_price: u64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<String>,
    pub user_ref: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn from_new(id: ListingId, listing: NewListing, now: DateTime<Utc>) -> Self {
        let NewListing {
            name,
            description,
            address,
            listing_type,
            bedrooms,
            bathrooms,
            regular_price,
            discount_price,
            offer,
            parking,
            furnished,
            image_urls,
            user_ref,
        } = listing;

        Self {
            id,
            name,
            description,
            address,
            listing_type,
            bedrooms,
            bathrooms,
            regular_price,
            discount_price,
            offer,
            parking,
            furnished,
            image_urls,
            user_ref,
            created_at: now,
            updated_at: now,
        }
    }

    /// The first image doubles as the cover.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Price shown to visitors: the discount applies only to offers.
    pub fn effective_price(&self) -> u64 {
        if self.offer {
            self.discount_price
        } else {
            self.regular_price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NewListing {
        NewListing {
            name: "Sunny loft near the river".to_string(),
            description: "Two floors, open kitchen".to_string(),
            address: "12 Ganga Road".to_string(),
            listing_type: ListingType::Rent,
            bedrooms: 2,
            bathrooms: 1,
            regular_price: 1200,
            discount_price: 1000,
            offer: true,
            parking: false,
            furnished: true,
            image_urls: vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()],
            user_ref: UserId("user-1".to_string()),
        }
    }

    #[test]
    fn new_listing_uses_camel_case_wire_names() {
        let value = serde_json::to_value(sample()).expect("serializes");
        assert_eq!(value["type"], json!("rent"));
        assert_eq!(value["regularPrice"], json!(1200));
        assert_eq!(value["imageUrls"][0], json!("https://img/1.jpg"));
        assert_eq!(value["userRef"], json!("user-1"));
    }

    #[test]
    fn listing_exposes_id_as_underscore_id() {
        let now = Utc::now();
        let listing = Listing::from_new(ListingId("abc".to_string()), sample(), now);
        let value = serde_json::to_value(&listing).expect("serializes");
        assert_eq!(value["_id"], json!("abc"));
        assert!(value.get("createdAt").is_some());
        assert_eq!(listing.cover_image(), Some("https://img/1.jpg"));
        assert_eq!(listing.effective_price(), 1000);
    }

    #[test]
    fn effective_price_ignores_discount_without_offer() {
        let mut new = sample();
        new.offer = false;
        let listing = Listing::from_new(ListingId::generate(), new, Utc::now());
        assert_eq!(listing.effective_price(), 1200);
    }

    #[test]
    fn listing_type_parses_case_insensitively() {
        assert_eq!("SALE".parse::<ListingType>(), Ok(ListingType::Sale));
        assert!("lease".parse::<ListingType>().is_err());
        assert_eq!(ListingType::default(), ListingType::Rent);
    }
}
