use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::event::TripEvent;

/// Placeholder text while the initial data set is loading.
pub const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Everything,
        FilterKind::Future,
        FilterKind::Present,
        FilterKind::Past,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Everything => "everything",
            FilterKind::Future => "future",
            FilterKind::Present => "present",
            FilterKind::Past => "past",
        }
    }

    /// Placeholder shown when the filter leaves nothing to list.
    pub fn empty_message(&self) -> &'static str {
        match self {
            FilterKind::Everything => "Click New Event to create your first point",
            FilterKind::Future => "There are no future events now",
            FilterKind::Present => "There are no present events now",
            FilterKind::Past => "There are no past events now",
        }
    }

    pub fn accepts(&self, event: &TripEvent, now: DateTime<Utc>) -> bool {
        match self {
            FilterKind::Everything => true,
            FilterKind::Future => event.is_future(now),
            FilterKind::Present => event.is_present(now),
            FilterKind::Past => event.is_past(now),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

pub fn filter_events(events: &[TripEvent], kind: FilterKind) -> Vec<TripEvent> {
    filter_events_at(events, kind, Utc::now())
}

pub fn filter_events_at(events: &[TripEvent], kind: FilterKind, now: DateTime<Utc>) -> Vec<TripEvent> {
    events
        .iter()
        .filter(|event| kind.accepts(event, now))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, EventType};
    use chrono::Duration;

    fn event(id: &str, from_hours: i64, to_hours: i64, now: DateTime<Utc>) -> TripEvent {
        TripEvent {
            id: EventId::from(id),
            event_type: EventType::Flight,
            base_price: 0,
            date_from: now + Duration::hours(from_hours),
            date_to: now + Duration::hours(to_hours),
            destination: None,
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    #[test]
    fn test_filters_split_by_now() {
        let now = Utc::now();
        let events = vec![
            event("past", -5, -3, now),
            event("present", -1, 1, now),
            event("future", 2, 4, now),
        ];

        let pick = |kind| -> Vec<String> {
            filter_events_at(&events, kind, now)
                .into_iter()
                .map(|event| event.id.0)
                .collect()
        };

        assert_eq!(pick(FilterKind::Everything).len(), 3);
        assert_eq!(pick(FilterKind::Past), vec!["past"]);
        assert_eq!(pick(FilterKind::Present), vec!["present"]);
        assert_eq!(pick(FilterKind::Future), vec!["future"]);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            FilterKind::Everything.empty_message(),
            "Click New Event to create your first point"
        );
        assert_eq!(FilterKind::Past.empty_message(), "There are no past events now");
    }
}
