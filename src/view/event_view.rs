use crate::dom::{el, EventKind, ListenerOptions, Markup};
use crate::error::ViewError;
use crate::messages::Message;
use crate::models::destination::find_by_id;
use crate::models::{Destination, EventId, Offer, OfferCatalog, TripEvent};
use crate::utils::{format_duration, EVENT_DATE_FORMAT, EVENT_TIME_FORMAT};

use super::{Dom, Target, View, ViewBase};

pub const FAVORITE_BUTTON: &str = ".event__favorite-btn";

/// Read-only row for one trip event.
pub struct EventView {
    base: ViewBase,
    event: TripEvent,
    destination: Option<Destination>,
    offers: Vec<Offer>,
}

impl EventView {
    pub fn new(event: &TripEvent, offers: &OfferCatalog, destinations: &[Destination]) -> Self {
        let destination = event
            .destination
            .as_deref()
            .and_then(|id| find_by_id(destinations, id))
            .cloned();
        Self {
            base: ViewBase::default(),
            event: event.clone(),
            destination,
            offers: offers.selected_for(event),
        }
    }

    pub fn event_id(&self) -> &EventId {
        &self.event.id
    }

    pub fn set_on_favorite_click_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let event_id = self.event.id.clone();
        self.create_event_listener(
            doc,
            Target::Selector(FAVORITE_BUTTON),
            EventKind::Click,
            move |_, _| Some(Message::FavoriteToggled(event_id.clone())),
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    fn title(&self) -> String {
        match &self.destination {
            Some(destination) => format!("{} {}", self.event.event_type.label(), destination.name),
            None => self.event.event_type.label(),
        }
    }

    fn offers_template(&self) -> Markup {
        el("ul")
            .class("event__selected-offers")
            .children(self.offers.iter().map(|offer| {
                el("li")
                    .class("event__offer")
                    .child(el("span").class("event__offer-title").text(offer.title.as_str()))
                    .text(" +€ ")
                    .child(el("span").class("event__offer-price").text(offer.price.to_string()))
            }))
    }
}

impl View for EventView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        let event = &self.event;
        let event_type = event.event_type.as_str();

        el("li").class("trip-events__item").child(
            el("div")
                .class("event")
                .data("event-id", event.id.as_str())
                .child(
                    el("time")
                        .class("event__date")
                        .text(event.date_from.format(EVENT_DATE_FORMAT).to_string()),
                )
                .child(
                    el("div").class("event__type").child(
                        el("img")
                            .class("event__type-icon")
                            .attr("src", format!("img/icons/{}.png", event_type))
                            .attr("alt", "Event type icon"),
                    ),
                )
                .child(el("h3").class("event__title").text(self.title()))
                .child(
                    el("div").class("event__schedule").child(
                        el("p")
                            .class("event__time")
                            .child(
                                el("time")
                                    .class("event__start-time")
                                    .text(event.date_from.format(EVENT_TIME_FORMAT).to_string()),
                            )
                            .text(" — ")
                            .child(
                                el("time")
                                    .class("event__end-time")
                                    .text(event.date_to.format(EVENT_TIME_FORMAT).to_string()),
                            ),
                    ),
                )
                .child(
                    el("p")
                        .class("event__duration")
                        .text(format_duration(event.duration())),
                )
                .child(
                    el("p")
                        .class("event__price")
                        .text("€ ")
                        .child(el("span").class("event__price-value").text(event.base_price.to_string())),
                )
                .child(el("h4").class("visually-hidden").text("Offers:"))
                .child(self.offers_template())
                .child(
                    el("button")
                        .class("event__favorite-btn")
                        .class_if(event.is_favorite, "event__favorite-btn--active")
                        .attr("type", "button")
                        .text("★"),
                )
                .child(
                    el("button")
                        .class("event__rollup-btn")
                        .attr("type", "button")
                        .text("Open event"),
                ),
        )
    }
}
