//! Observable in-memory trip store.

use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::error::{AppError, AppResult};
use crate::models::{
    Destination, EventId, EventType, FilterKind, OfferCatalog, SortItem, SortKind, TripEvent, UpdateType,
};

pub mod seed;

pub use seed::{demo_data, load_from_path, TripData};

/// One state change, as seen by observers.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub update: UpdateType,
    /// The event the change is about; `None` for init and filter changes.
    pub event: Option<TripEvent>,
}

pub struct TripModel {
    events: Vec<TripEvent>,
    offers: Rc<OfferCatalog>,
    destinations: Rc<Vec<Destination>>,
    filter: FilterKind,
    default_type: EventType,
    observers: Vec<UnboundedSender<Notification>>,
}

impl TripModel {
    pub fn new(default_type: EventType) -> Self {
        Self {
            events: Vec::new(),
            offers: Rc::default(),
            destinations: Rc::default(),
            filter: FilterKind::default(),
            default_type,
            observers: Vec::new(),
        }
    }

    /// Replaces the whole data set.
    pub fn init(&mut self, data: TripData) {
        info!(
            "Trip loaded: {} events, {} destinations",
            data.events.len(),
            data.destinations.len()
        );
        self.events = data.events;
        self.offers = Rc::new(data.offers);
        self.destinations = Rc::new(data.destinations);
        self.notify(UpdateType::Init, None);
    }

    pub fn events(&self) -> &[TripEvent] {
        &self.events
    }

    pub fn offers(&self) -> Rc<OfferCatalog> {
        Rc::clone(&self.offers)
    }

    pub fn destinations(&self) -> Rc<Vec<Destination>> {
        Rc::clone(&self.destinations)
    }

    pub fn filter_type(&self) -> FilterKind {
        self.filter
    }

    pub fn sort_items(&self) -> Vec<SortItem> {
        SortKind::ALL
            .iter()
            .map(|kind| SortItem {
                kind: *kind,
                is_disabled: matches!(kind, SortKind::Event | SortKind::Offers),
            })
            .collect()
    }

    /// Blank event the creation form starts from.
    pub fn get_default_event(&self) -> TripEvent {
        let now = Utc::now();
        TripEvent {
            id: EventId::generate(),
            event_type: self.default_type,
            base_price: 0,
            date_from: now,
            date_to: now,
            destination: None,
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    pub fn update_event(&mut self, update: UpdateType, event: TripEvent) -> AppResult<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|existing| existing.id == event.id)
            .ok_or_else(|| AppError::not_found(format!("event {}", event.id)))?;
        *slot = event.clone();
        debug!("Updated event {}", event.id);
        self.notify(update, Some(event));
        Ok(())
    }

    pub fn create_event(&mut self, update: UpdateType, event: TripEvent) -> AppResult<()> {
        if self.events.iter().any(|existing| existing.id == event.id) {
            return Err(AppError::invalid_input(format!("event {} already exists", event.id)));
        }
        self.events.push(event.clone());
        debug!("Created event {}", event.id);
        self.notify(update, Some(event));
        Ok(())
    }

    pub fn delete_event(&mut self, update: UpdateType, event: TripEvent) -> AppResult<()> {
        let index = self
            .events
            .iter()
            .position(|existing| existing.id == event.id)
            .ok_or_else(|| AppError::not_found(format!("event {}", event.id)))?;
        self.events.remove(index);
        debug!("Deleted event {}", event.id);
        self.notify(update, Some(event));
        Ok(())
    }

    pub fn update_filter_type(&mut self, update: UpdateType, filter: FilterKind) {
        self.filter = filter;
        debug!("Filter set to {}", filter);
        self.notify(update, None);
    }

    /// Subscribes to every future change.
    pub fn add_observer(&mut self) -> UnboundedReceiver<Notification> {
        let (tx, rx) = unbounded_channel();
        self.observers.push(tx);
        rx
    }

    fn notify(&mut self, update: UpdateType, event: Option<TripEvent>) {
        let notification = Notification { update, event };
        self.observers
            .retain(|observer| observer.send(notification.clone()).is_ok());
    }
}
