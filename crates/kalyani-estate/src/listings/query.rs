use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{Listing, ListingType};

pub const DEFAULT_LIMIT: usize = 9;

/// Category filter; `all` and an absent `type` both match every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Sale,
    Rent,
}

impl TypeFilter {
    fn matches(self, listing_type: ListingType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Sale => listing_type == ListingType::Sale,
            TypeFilter::Rent => listing_type == ListingType::Rent,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Sale => "sale",
            TypeFilter::Rent => "rent",
        }
    }
}

impl From<ListingType> for TypeFilter {
    fn from(value: ListingType) -> Self {
        match value {
            ListingType::Sale => TypeFilter::Sale,
            ListingType::Rent => TypeFilter::Rent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "regularPrice")]
    RegularPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Search parameters for `GET /api/listing/get`.
///
/// The boolean amenity flags only ever narrow the result: `false` and an
/// absent flag both mean "either".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: usize,
    pub start_index: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            offer: false,
            parking: false,
            furnished: false,
            type_filter: TypeFilter::All,
            sort: SortField::CreatedAt,
            order: SortOrder::Desc,
            limit: DEFAULT_LIMIT,
            start_index: 0,
        }
    }
}

impl ListingQuery {
    pub fn recent_offers(limit: usize) -> Self {
        Self {
            offer: true,
            limit,
            ..Self::default()
        }
    }

    pub fn recent_of_type(listing_type: ListingType, limit: usize) -> Self {
        Self {
            type_filter: listing_type.into(),
            limit,
            ..Self::default()
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if self.offer && !listing.offer {
            return false;
        }
        if self.parking && !listing.parking {
            return false;
        }
        if self.furnished && !listing.furnished {
            return false;
        }
        if !self.type_filter.matches(listing.listing_type) {
            return false;
        }
        match self.search_term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => listing
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }

    pub fn compare(&self, left: &Listing, right: &Listing) -> Ordering {
        let ordering = match self.sort {
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
            SortField::RegularPrice => left.regular_price.cmp(&right.regular_price),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter, sort, and page an in-memory collection.
    pub fn apply<'a, I>(&self, listings: I) -> Vec<Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let mut matched: Vec<&Listing> = listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .collect();
        matched.sort_by(|left, right| self.compare(left, right));
        matched
            .into_iter()
            .skip(self.start_index)
            .take(self.limit)
            .cloned()
            .collect()
    }

    /// Query-string pairs understood by the listing API. Defaults are omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let defaults = Self::default();
        let mut pairs = Vec::new();

        if let Some(term) = self.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
            pairs.push(("searchTerm", term.to_string()));
        }
        if self.offer {
            pairs.push(("offer", "true".to_string()));
        }
        if self.parking {
            pairs.push(("parking", "true".to_string()));
        }
        if self.furnished {
            pairs.push(("furnished", "true".to_string()));
        }
        if self.type_filter != TypeFilter::All {
            pairs.push(("type", self.type_filter.as_str().to_string()));
        }
        if self.sort != defaults.sort {
            pairs.push(("sort", "regularPrice".to_string()));
        }
        if self.order != defaults.order {
            pairs.push(("order", "asc".to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        if self.start_index != 0 {
            pairs.push(("startIndex", self.start_index.to_string()));
        }
        pairs
    }
}
