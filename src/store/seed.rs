//! Seed data: a JSON trip file, or a built-in demo trip.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Destination, EventId, EventType, Offer, OfferCatalog, OfferGroup, Picture, TripEvent};

/// Everything the model is initialized with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripData {
    pub events: Vec<TripEvent>,
    #[serde(default)]
    pub offers: OfferCatalog,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

pub async fn load_from_path(path: &Path) -> anyhow::Result<TripData> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read trip file {}", path.display()))?;
    let data: TripData = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse trip file {}", path.display()))?;
    info!("Read {} events from {}", data.events.len(), path.display());
    Ok(data)
}

/// Loads the configured trip file, falling back to the demo trip when none
/// is configured.
pub async fn load(config: Config) -> AppResult<TripData> {
    match config.data_path {
        Some(path) => Ok(load_from_path(&path).await?),
        None => {
            info!("No trip file configured, using demo data");
            Ok(demo_data(Utc::now()))
        }
    }
}

fn offer(id: &str, title: &str, price: u32) -> Offer {
    Offer {
        id: id.to_string(),
        title: title.to_string(),
        price,
    }
}

fn destination(id: &str, name: &str, description: &str, pictures: usize) -> Destination {
    Destination {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        pictures: (1..=pictures)
            .map(|n| Picture {
                src: format!("img/photos/{}-{}.jpg", id, n),
                description: format!("{} view {}", name, n),
            })
            .collect(),
    }
}

/// Demo trip laid out around `now`: one past, one ongoing and two upcoming
/// events.
pub fn demo_data(now: DateTime<Utc>) -> TripData {
    let offers = OfferCatalog::from(vec![
        OfferGroup {
            event_type: EventType::Taxi,
            offers: vec![offer("taxi-uber", "Order Uber", 20), offer("taxi-comfort", "Switch to comfort", 80)],
        },
        OfferGroup {
            event_type: EventType::Flight,
            offers: vec![
                offer("flight-luggage", "Add luggage", 50),
                offer("flight-meal", "Add meal", 15),
                offer("flight-seats", "Choose seats", 5),
            ],
        },
        OfferGroup {
            event_type: EventType::CheckIn,
            offers: vec![offer("check-in-breakfast", "Add breakfast", 50)],
        },
        OfferGroup {
            event_type: EventType::Sightseeing,
            offers: vec![offer("sightseeing-tickets", "Book tickets", 40), offer("sightseeing-lunch", "Lunch in city", 30)],
        },
    ]);

    let destinations = vec![
        destination("ams", "Amsterdam", "Amsterdam, a city of canals and bicycles.", 2),
        destination("gva", "Geneva", "Geneva, a city in Switzerland at the foot of the Alps.", 1),
        destination("chx", "Chamonix", "Chamonix, a resort under Mont Blanc.", 3),
        destination("zrh", "Zurich", "", 0),
    ];

    let event = |id: &str, event_type, start: DateTime<Utc>, hours, price, destination: &str, offers: &[&str]| TripEvent {
        id: EventId::from(id),
        event_type,
        base_price: price,
        date_from: start,
        date_to: start + Duration::hours(hours),
        destination: Some(destination.to_string()),
        offers: offers.iter().map(|id| id.to_string()).collect(),
        is_favorite: false,
    };

    let events = vec![
        event("demo-1", EventType::Flight, now - Duration::days(2), 2, 320, "ams", &["flight-meal"]),
        event("demo-2", EventType::CheckIn, now - Duration::hours(1), 26, 600, "gva", &["check-in-breakfast"]),
        event("demo-3", EventType::Taxi, now + Duration::days(2), 1, 40, "chx", &[]),
        event(
            "demo-4",
            EventType::Sightseeing,
            now + Duration::days(3),
            5,
            110,
            "chx",
            &["sightseeing-tickets", "sightseeing-lunch"],
        ),
    ];

    TripData {
        events,
        offers,
        destinations,
    }
}
