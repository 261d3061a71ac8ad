use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};

use crate::Error;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: u32,
    pub title: String,
    pub date: NaiveDate,
    pub venue: String,
    pub city: String,
    pub price: u64,
    pub image: String,
}

/// The events on sale. Built once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new(events: Vec<Event>) -> Result<Catalog, Error> {
        for (index, event) in events.iter().enumerate() {
            if event.id == 0 {
                return Err(Error::Catalog(format!(
                    "event '{}' has id 0, ids must be positive",
                    event.title
                )));
            }
            if events[..index].iter().any(|earlier| earlier.id == event.id) {
                return Err(Error::Catalog(format!("duplicate event id {}", event.id)));
            }
        }
        Ok(Catalog { events })
    }

    pub fn demo() -> Catalog {
        Catalog {
            events: vec![
                demo_event(
                    1,
                    "Summer Beats Festival",
                    (2025, 9, 5),
                    "Grand Park Arena",
                    "Lagos",
                    4500,
                    "https://images.unsplash.com/photo-1518600506278-4e8ef466b810?w=800&q=60",
                ),
                demo_event(
                    2,
                    "Symphony Nights",
                    (2025, 10, 12),
                    "Royal Hall",
                    "Ibadan",
                    8000,
                    "https://images.unsplash.com/photo-1508973372525-110c5f2077b0?w=800&q=60",
                ),
                demo_event(
                    3,
                    "Indie Live",
                    (2025, 9, 28),
                    "Warehouse 9",
                    "Lagos",
                    3000,
                    "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?w=800&q=60",
                ),
                demo_event(
                    4,
                    "Comedy Central Night",
                    (2025, 11, 1),
                    "Laugh House",
                    "Abuja",
                    2500,
                    "https://images.unsplash.com/photo-1541542684-8d3f427f0f50?w=800&q=60",
                ),
            ],
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|event| u64::from(event.id) == id)
    }

    /// Distinct cities, in the order they first appear.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = Vec::new();
        for event in &self.events {
            if !cities.contains(&event.city.as_str()) {
                cities.push(&event.city);
            }
        }
        cities
    }
}

fn demo_event(
    id: u32,
    title: &str,
    (year, month, day): (i32, u32, u32),
    venue: &str,
    city: &str,
    price: u64,
    image: &str,
) -> Event {
    Event {
        id,
        title: title.to_owned(),
        date: NaiveDate::from_ymd_opt(year, month, day).expect("demo event date is a valid date"),
        venue: venue.to_owned(),
        city: city.to_owned(),
        price,
        image: image.to_owned(),
    }
}

#[cfg(test)]
pub(crate) fn event(id: u32, title: &str, date: &str, city: &str, price: u64) -> Event {
    Event {
        id,
        title: title.to_owned(),
        date: date.parse().unwrap(),
        venue: format!("{} Hall", title),
        city: city.to_owned(),
        price,
        image: format!("https://example.com/{}.jpg", id),
    }
}
