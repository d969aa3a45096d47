//! Home page: three sequential listing fetches and the view built from them.

use maud::{html, Markup, DOCTYPE};
use tracing::{debug, warn};

use super::ListingFeed;
use crate::listings::{Listing, ListingQuery, ListingType};

/// Listings fetched per home page section.
pub const SECTION_LIMIT: usize = 6;

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

pub const HERO_TITLE: &str = "Find your next perfect place with ease";
pub const HERO_TAGLINE: &str = "Kalyani Estate is the best place to find your next perfect place to live. We have a wide range of properties for you to choose from.";

/// Results of the home page fetch chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeFeed {
    pub offers: Vec<Listing>,
    pub rent: Vec<Listing>,
    pub sale: Vec<Listing>,
}

impl HomeFeed {
    /// Fetch offers, then rentals, then sales. Each request starts only after
    /// the previous one succeeded; a failure is logged and ends the chain,
    /// leaving the later sections empty.
    pub async fn load<F>(feed: &F) -> Self
    where
        F: ListingFeed + ?Sized,
    {
        let mut home = Self::default();

        match feed.search(&ListingQuery::recent_offers(SECTION_LIMIT)).await {
            Ok(listings) => home.offers = listings,
            Err(err) => {
                warn!(error = %err, section = "offers", "home feed fetch failed");
                return home;
            }
        }

        match feed
            .search(&ListingQuery::recent_of_type(ListingType::Rent, SECTION_LIMIT))
            .await
        {
            Ok(listings) => home.rent = listings,
            Err(err) => {
                warn!(error = %err, section = "rent", "home feed fetch failed");
                return home;
            }
        }

        match feed
            .search(&ListingQuery::recent_of_type(ListingType::Sale, SECTION_LIMIT))
            .await
        {
            Ok(listings) => home.sale = listings,
            Err(err) => warn!(error = %err, section = "sale", "home feed fetch failed"),
        }

        debug!(
            offers = home.offers.len(),
            rent = home.rent.len(),
            sale = home.sale.len(),
            "home feed loaded"
        );
        home
    }
}

/// One carousel slide: the cover image of an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub listing_id: String,
    pub image_url: String,
}

/// Summary card for a listing in a home page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub href: String,
    pub cover: Option<String>,
    pub name: String,
    pub address: String,
    pub description: String,
    pub price: String,
    pub bedrooms: String,
    pub bathrooms: String,
}

impl ListingCard {
    pub fn from_listing(listing: &Listing) -> Self {
        let mut price = format!("${}", group_thousands(listing.effective_price()));
        if listing.listing_type == ListingType::Rent {
            price.push_str(" / month");
        }

        Self {
            href: format!("/listing/{}", listing.id),
            cover: listing.cover_image().map(str::to_string),
            name: listing.name.clone(),
            address: listing.address.clone(),
            description: preview(&listing.description),
            price,
            bedrooms: count_label(listing.bedrooms, "bed"),
            bathrooms: count_label(listing.bathrooms, "bath"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub more_href: &'static str,
    pub more_label: &'static str,
    pub cards: Vec<ListingCard>,
}

/// Everything the home page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomePage {
    pub slides: Vec<Slide>,
    pub sections: Vec<Section>,
}

impl HomePage {
    /// Sections with no listings are left out.
    pub fn from_feed(feed: &HomeFeed) -> Self {
        let slides = feed
            .offers
            .iter()
            .filter_map(|listing| {
                listing.cover_image().map(|url| Slide {
                    listing_id: listing.id.to_string(),
                    image_url: url.to_string(),
                })
            })
            .collect();

        let sections = [
            (
                "Recent offers",
                "/search?offer=true",
                "Show more offers",
                &feed.offers,
            ),
            (
                "Recent places for rent",
                "/search?type=rent",
                "Show more places for rent",
                &feed.rent,
            ),
            (
                "Recent places for sale",
                "/search?type=sale",
                "Show more places for sale",
                &feed.sale,
            ),
        ]
        .into_iter()
        .filter(|(_, _, _, listings)| !listings.is_empty())
        .map(|(title, more_href, more_label, listings)| Section {
            title,
            more_href,
            more_label,
            cards: listings.iter().map(ListingCard::from_listing).collect(),
        })
        .collect();

        Self { slides, sections }
    }

    pub fn render_html(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { "Kalyani Estate" }
                }
                body {
                    header class="hero" {
                        h1 { (HERO_TITLE) }
                        p { (HERO_TAGLINE) }
                        a href="/search" { "Let's get started..." }
                    }
                    @if !self.slides.is_empty() {
                        div class="carousel" {
                            @for slide in &self.slides {
                                a class="slide" href={ "/listing/" (slide.listing_id) } {
                                    img src=(slide.image_url) alt="offer";
                                }
                            }
                        }
                    }
                    @for section in &self.sections {
                        section {
                            h2 { (section.title) }
                            a class="more" href=(section.more_href) { (section.more_label) }
                            div class="cards" {
                                @for card in &section.cards {
                                    a class="card" href=(card.href) {
                                        @if let Some(cover) = &card.cover {
                                            img src=(cover) alt="listing cover";
                                        }
                                        h3 { (card.name) }
                                        p class="address" { (card.address) }
                                        p class="description" { (card.description) }
                                        p class="price" { (card.price) }
                                        p class="rooms" { (card.bedrooms) " " (card.bathrooms) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = format!("{HERO_TITLE}\n{HERO_TAGLINE}\n");
        if !self.slides.is_empty() {
            out.push_str(&format!("\nFeatured offers: {}\n", self.slides.len()));
            for slide in &self.slides {
                out.push_str(&format!("  {}\n", slide.image_url));
            }
        }
        for section in &self.sections {
            out.push_str(&format!("\n{} ({})\n", section.title, section.more_href));
            for card in &section.cards {
                out.push_str(&format!(
                    "  - {} | {} | {} | {}, {}\n",
                    card.name, card.address, card.price, card.bedrooms, card.bathrooms
                ));
            }
        }
        out
    }
}

fn count_label(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn preview(description: &str) -> String {
    let mut chars = description.chars();
    let head: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::client::FeedError;
    use crate::listings::{ListingId, ListingServiceError, NewListing, RepositoryError, UserId};

    /// Feed that records each query and fails on a chosen call.
    struct ScriptedFeed {
        calls: Mutex<Vec<Vec<(&'static str, String)>>>,
        fail_at: Option<usize>,
        listings: Vec<Listing>,
    }

    impl ScriptedFeed {
        fn new(listings: Vec<Listing>, fail_at: Option<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at,
                listings,
            }
        }

        fn calls(&self) -> Vec<Vec<(&'static str, String)>> {
            self.calls.lock().expect("calls mutex").clone()
        }
    }

    #[async_trait]
    impl ListingFeed for ScriptedFeed {
        async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, FeedError> {
            let index = {
                let mut calls = self.calls.lock().expect("calls mutex");
                calls.push(query.to_pairs());
                calls.len() - 1
            };
            if self.fail_at == Some(index) {
                return Err(FeedError::Service(ListingServiceError::Repository(
                    RepositoryError::Unavailable("offline".to_string()),
                )));
            }
            Ok(query.apply(&self.listings))
        }
    }

    fn listing(name: &str, listing_type: ListingType, offer: bool) -> Listing {
        Listing::from_new(
            ListingId::generate(),
            NewListing {
                name: name.to_string(),
                description: "Bright rooms and a quiet street".to_string(),
                address: "12 B Block, Kalyani".to_string(),
                listing_type,
                bedrooms: 2,
                bathrooms: 1,
                regular_price: 1_250_000,
                discount_price: if offer { 1_100_000 } else { 0 },
                offer,
                parking: false,
                furnished: false,
                image_urls: vec![format!("https://cdn.test/{name}.jpg")],
                user_ref: UserId("owner".to_string()),
            },
            Utc::now(),
        )
    }

    fn pairs(items: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
        items.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[tokio::test]
    async fn fetches_sections_in_order() {
        let feed = ScriptedFeed::new(
            vec![
                listing("offer-flat", ListingType::Rent, true),
                listing("plain-flat", ListingType::Rent, false),
                listing("villa", ListingType::Sale, false),
            ],
            None,
        );

        let home = HomeFeed::load(&feed).await;

        assert_eq!(
            feed.calls(),
            vec![
                pairs(&[("offer", "true"), ("limit", "6")]),
                pairs(&[("type", "rent"), ("limit", "6")]),
                pairs(&[("type", "sale"), ("limit", "6")]),
            ]
        );
        assert_eq!(home.offers.len(), 1);
        assert_eq!(home.rent.len(), 2);
        assert_eq!(home.sale.len(), 1);
    }

    #[tokio::test]
    async fn failure_stops_the_chain() {
        let feed = ScriptedFeed::new(vec![listing("offer-flat", ListingType::Rent, true)], Some(1));

        let home = HomeFeed::load(&feed).await;

        assert_eq!(feed.calls().len(), 2);
        assert_eq!(home.offers.len(), 1);
        assert!(home.rent.is_empty());
        assert!(home.sale.is_empty());
    }

    #[tokio::test]
    async fn first_failure_skips_everything() {
        let feed = ScriptedFeed::new(vec![listing("villa", ListingType::Sale, false)], Some(0));
        let home = HomeFeed::load(&feed).await;
        assert_eq!(feed.calls().len(), 1);
        assert_eq!(home, HomeFeed::default());
    }

    #[test]
    fn page_builds_slides_and_non_empty_sections() {
        let offer = listing("offer-flat", ListingType::Rent, true);
        let feed = HomeFeed {
            offers: vec![offer.clone()],
            rent: vec![offer.clone()],
            sale: Vec::new(),
        };

        let page = HomePage::from_feed(&feed);

        assert_eq!(
            page.slides,
            vec![Slide {
                listing_id: offer.id.to_string(),
                image_url: "https://cdn.test/offer-flat.jpg".to_string(),
            }]
        );
        let titles: Vec<_> = page.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Recent offers", "Recent places for rent"]);
        assert_eq!(page.sections[0].more_href, "/search?offer=true");
        assert_eq!(page.sections[1].more_label, "Show more places for rent");
    }

    #[test]
    fn card_formats_price_and_rooms() {
        let rental = ListingCard::from_listing(&listing("offer-flat", ListingType::Rent, true));
        assert_eq!(rental.price, "$1,100,000 / month");
        assert_eq!(rental.bedrooms, "2 beds");
        assert_eq!(rental.bathrooms, "1 bath");

        let sale = ListingCard::from_listing(&listing("villa", ListingType::Sale, false));
        assert_eq!(sale.price, "$1,250,000");
        assert!(sale.href.starts_with("/listing/"));
    }

    #[test]
    fn long_descriptions_are_shortened() {
        let long = "a".repeat(150);
        let short = preview(&long);
        assert_eq!(short.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(preview("cosy"), "cosy");
    }

    #[test]
    fn html_contains_hero_and_sections() {
        let feed = HomeFeed {
            offers: Vec::new(),
            rent: Vec::new(),
            sale: vec![listing("villa", ListingType::Sale, false)],
        };
        let markup = HomePage::from_feed(&feed).render_html().into_string();

        assert!(markup.contains(HERO_TITLE));
        assert!(markup.contains("Let&#39;s get started...") || markup.contains("Let's get started..."));
        assert!(markup.contains("Recent places for sale"));
        assert!(!markup.contains("Recent offers"));
        assert!(!markup.contains("class=\"carousel\""));
    }

    #[test]
    fn text_lists_every_card() {
        let feed = HomeFeed {
            offers: vec![listing("offer-flat", ListingType::Rent, true)],
            rent: Vec::new(),
            sale: vec![listing("villa", ListingType::Sale, false)],
        };
        let text = HomePage::from_feed(&feed).render_text();
        assert!(text.starts_with(HERO_TITLE));
        assert!(text.contains("Featured offers: 1"));
        assert!(text.contains("- villa | 12 B Block, Kalyani | $1,250,000 | 2 beds, 1 bath"));
    }
}
