//! Search, city filter and sort over the catalog.
//!
//! The browser script applies the same rules to the embedded catalog. The
//! server uses them for the no-script grid and for `/events.json`.

use gotham_derive::{StateData, StaticResponseExtender};
use serde_derive::{Deserialize, Serialize};

use crate::catalog::{Catalog, Event};
use crate::money::price_label;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum SortKey {
    DateAsc,
    DateDesc,
    PriceAsc,
    PriceDesc,
    /// Keeps catalog order.
    #[default]
    Unsorted,
}

impl SortKey {
    pub const CHOICES: [(SortKey, &'static str); 4] = [
        (SortKey::DateAsc, "Date ↑"),
        (SortKey::DateDesc, "Date ↓"),
        (SortKey::PriceAsc, "Price ↑"),
        (SortKey::PriceDesc, "Price ↓"),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::DateAsc => "date_asc",
            SortKey::DateDesc => "date_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::Unsorted => "",
        }
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> SortKey {
        match value {
            "date_asc" => SortKey::DateAsc,
            "date_desc" => SortKey::DateDesc,
            "price_asc" => SortKey::PriceAsc,
            "price_desc" => SortKey::PriceDesc,
            _ => SortKey::Unsorted,
        }
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> SortKey {
        SortKey::from(value.as_str())
    }
}

#[derive(Debug, Default, Deserialize, StateData, StaticResponseExtender)]
pub struct ListingQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub city: String,
    pub sort: Option<SortKey>,
}

pub fn matches(event: &Event, search: &str, city: &str) -> bool {
    let needle = search.trim().to_lowercase();
    let matches_search = [&event.title, &event.venue, &event.city]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle));
    let matches_city = city.is_empty() || event.city == city;
    matches_search && matches_city
}

pub fn select<'a>(catalog: &'a Catalog, search: &str, city: &str, sort: SortKey) -> Vec<&'a Event> {
    let mut events: Vec<&Event> = catalog
        .events()
        .iter()
        .filter(|event| matches(event, search, city))
        .collect();
    match sort {
        SortKey::DateAsc => events.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::DateDesc => events.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::PriceAsc => events.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => events.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Unsorted => {}
    }
    events
}

/// One grid card, ready for display.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub id: u32,
    pub title: String,
    pub date: String,
    pub venue: String,
    pub city: String,
    pub price: u64,
    pub price_label: String,
    pub image: String,
}

impl EventCard {
    pub fn new(event: &Event, currency: &str) -> EventCard {
        EventCard {
            id: event.id,
            title: event.title.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            venue: event.venue.clone(),
            city: event.city.clone(),
            price: event.price,
            price_label: price_label(currency, event.price),
            image: event.image.clone(),
        }
    }
}

pub fn cards(
    catalog: &Catalog,
    query: &ListingQuery,
    sort: SortKey,
    currency: &str,
) -> Vec<EventCard> {
    select(catalog, &query.q, &query.city, sort)
        .into_iter()
        .map(|event| EventCard::new(event, currency))
        .collect()
}
