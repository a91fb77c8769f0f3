use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::destination::DestinationId;
use super::offer::OfferId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::Taxi,
        EventType::Bus,
        EventType::Train,
        EventType::Ship,
        EventType::Drive,
        EventType::Flight,
        EventType::CheckIn,
        EventType::Sightseeing,
        EventType::Restaurant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Taxi => "taxi",
            EventType::Bus => "bus",
            EventType::Train => "train",
            EventType::Ship => "ship",
            EventType::Drive => "drive",
            EventType::Flight => "flight",
            EventType::CheckIn => "check-in",
            EventType::Sightseeing => "sightseeing",
            EventType::Restaurant => "restaurant",
        }
    }

    /// Human label, e.g. "Check-in".
    pub fn label(&self) -> String {
        crate::utils::capitalize(self.as_str())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event type '{}'", s))
    }
}

/// One leg of a trip. Never mutated in place: edits produce a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Option<DestinationId>,
    #[serde(default)]
    pub offers: Vec<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl TripEvent {
    pub fn duration(&self) -> chrono::Duration {
        self.date_to - self.date_from
    }

    pub fn has_offer(&self, offer_id: &str) -> bool {
        self.offers.iter().any(|id| id == offer_id)
    }

    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.date_from > now
    }

    pub fn is_present(&self, now: DateTime<Utc>) -> bool {
        self.date_from <= now && now <= self.date_to
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date_to < now
    }

    /// Copy of this event with the favorite flag flipped.
    pub fn toggled_favorite(&self) -> Self {
        Self {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_event() -> TripEvent {
        let start = Utc.with_ymd_and_hms(2026, 7, 10, 10, 0, 0).unwrap();
        TripEvent {
            id: EventId::from("e-1"),
            event_type: EventType::CheckIn,
            base_price: 120,
            date_from: start,
            date_to: start + Duration::hours(2),
            destination: Some("amsterdam".to_string()),
            offers: vec!["o-1".to_string()],
            is_favorite: false,
        }
    }

    #[test]
    fn test_event_type_parses_kebab_names() {
        assert_eq!("check-in".parse::<EventType>(), Ok(EventType::CheckIn));
        assert_eq!("taxi".parse::<EventType>(), Ok(EventType::Taxi));
        assert!("teleport".parse::<EventType>().is_err());
        assert_eq!(EventType::CheckIn.label(), "Check-in");
    }

    #[test]
    fn test_toggled_favorite_keeps_other_fields() {
        let event = sample_event();
        let toggled = event.toggled_favorite();

        assert!(toggled.is_favorite);
        assert_eq!(toggled, TripEvent { is_favorite: true, ..event });
    }

    #[test]
    fn test_time_classification() {
        let event = sample_event();
        let before = event.date_from - Duration::minutes(1);
        let during = event.date_from + Duration::minutes(30);
        let after = event.date_to + Duration::minutes(1);

        assert!(event.is_future(before));
        assert!(event.is_present(during));
        assert!(event.is_past(after));
        assert!(!event.is_present(after));
    }

    #[test]
    fn test_event_json_uses_camel_case() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["type"], "check-in");
        assert_eq!(json["basePrice"], 120);
        assert_eq!(json["isFavorite"], false);
    }
}
