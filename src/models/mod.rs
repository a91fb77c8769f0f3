// Declare modules
pub mod destination;
pub mod event;
pub mod filter;
pub mod offer;
pub mod sort;
pub mod update;

// Re-export the data types so callers can `use crate::models::TripEvent`.
pub use destination::{Destination, DestinationId, Picture};
pub use event::{EventId, EventType, TripEvent};
pub use filter::{filter_events, filter_events_at, FilterKind};
pub use offer::{Offer, OfferCatalog, OfferChoice, OfferGroup, OfferId};
pub use sort::{sort_events, SortItem, SortKind};
pub use update::{UpdateType, UserAction, ViewAction};
