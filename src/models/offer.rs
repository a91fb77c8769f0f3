use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::event::{EventType, TripEvent};

pub type OfferId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

/// Offers of one event type, as they appear in seed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub offers: Vec<Offer>,
}

/// An offer as shown for one particular event.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferChoice {
    pub offer: Offer,
    pub is_checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<OfferGroup>", into = "Vec<OfferGroup>")]
pub struct OfferCatalog {
    by_type: BTreeMap<EventType, Vec<Offer>>,
}

impl OfferCatalog {
    pub fn for_type(&self, event_type: EventType) -> &[Offer] {
        self.by_type
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Offers available for the event's type, flagged with the event's selection.
    pub fn choices_for(&self, event: &TripEvent) -> Vec<OfferChoice> {
        self.for_type(event.event_type)
            .iter()
            .map(|offer| OfferChoice {
                offer: offer.clone(),
                is_checked: event.has_offer(&offer.id),
            })
            .collect()
    }

    /// Offers the event has selected.
    pub fn selected_for(&self, event: &TripEvent) -> Vec<Offer> {
        self.for_type(event.event_type)
            .iter()
            .filter(|offer| event.has_offer(&offer.id))
            .cloned()
            .collect()
    }
}

impl From<Vec<OfferGroup>> for OfferCatalog {
    fn from(groups: Vec<OfferGroup>) -> Self {
        let mut by_type: BTreeMap<EventType, Vec<Offer>> = BTreeMap::new();
        for group in groups {
            by_type.entry(group.event_type).or_default().extend(group.offers);
        }
        Self { by_type }
    }
}

impl From<OfferCatalog> for Vec<OfferGroup> {
    fn from(catalog: OfferCatalog) -> Self {
        catalog
            .by_type
            .into_iter()
            .map(|(event_type, offers)| OfferGroup { event_type, offers })
            .collect()
    }
}
