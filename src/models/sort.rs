use std::fmt;
use std::str::FromStr;

use super::event::TripEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKind {
    #[default]
    Day,
    Event,
    Time,
    Price,
    Offers,
}

impl SortKind {
    pub const ALL: [SortKind; 5] = [
        SortKind::Day,
        SortKind::Event,
        SortKind::Time,
        SortKind::Price,
        SortKind::Offers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKind::Day => "day",
            SortKind::Event => "event",
            SortKind::Time => "time",
            SortKind::Price => "price",
            SortKind::Offers => "offers",
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// One entry of the sort bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortItem {
    pub kind: SortKind,
    pub is_disabled: bool,
}

pub fn sort_events(events: &[TripEvent], kind: SortKind) -> Vec<TripEvent> {
    let mut sorted = events.to_vec();
    match kind {
        SortKind::Day => sorted.sort_by_key(|event| event.date_from),
        SortKind::Event => sorted.sort_by(|a, b| {
            a.event_type
                .as_str()
                .cmp(b.event_type.as_str())
                .then(a.date_from.cmp(&b.date_from))
        }),
        SortKind::Time => sorted.sort_by(|a, b| b.duration().cmp(&a.duration())),
        SortKind::Price => sorted.sort_by(|a, b| b.base_price.cmp(&a.base_price)),
        SortKind::Offers => sorted.sort_by(|a, b| b.offers.len().cmp(&a.offers.len())),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, EventType};
    use chrono::{Duration, TimeZone, Utc};

    fn event(id: &str, event_type: EventType, day: u32, hours: i64, price: u32, offers: usize) -> TripEvent {
        let start = Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap();
        TripEvent {
            id: EventId::from(id),
            event_type,
            base_price: price,
            date_from: start,
            date_to: start + Duration::hours(hours),
            destination: None,
            offers: (0..offers).map(|i| format!("{}-{}", id, i)).collect(),
            is_favorite: false,
        }
    }

    fn ids(events: &[TripEvent]) -> Vec<&str> {
        events.iter().map(|event| event.id.as_str()).collect()
    }

    fn trip() -> Vec<TripEvent> {
        vec![
            event("b", EventType::Train, 12, 1, 300, 0),
            event("a", EventType::Taxi, 10, 5, 100, 2),
            event("c", EventType::Bus, 14, 3, 200, 1),
        ]
    }

    #[test]
    fn test_day_sort_is_chronological() {
        assert_eq!(ids(&sort_events(&trip(), SortKind::Day)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descending_sorts() {
        assert_eq!(ids(&sort_events(&trip(), SortKind::Time)), vec!["a", "c", "b"]);
        assert_eq!(ids(&sort_events(&trip(), SortKind::Price)), vec!["b", "c", "a"]);
        assert_eq!(ids(&sort_events(&trip(), SortKind::Offers)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_event_sort_uses_type_name() {
        assert_eq!(ids(&sort_events(&trip(), SortKind::Event)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_ignores_unknown_kinds() {
        assert_eq!("price".parse::<SortKind>(), Ok(SortKind::Price));
        assert!("sort-price".parse::<SortKind>().is_err());
    }

    #[test]
    fn test_board_starts_sorted_by_day() {
        assert_eq!(SortKind::default(), SortKind::Day);
    }
}
