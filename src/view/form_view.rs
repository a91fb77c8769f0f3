use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::dom::{el, EventKind, ListenerOptions, Markup, NodeId, RenderPosition};
use crate::error::{FormError, ViewError};
use crate::messages::Message;
use crate::models::destination::{find_by_id, find_by_name};
use crate::models::{Destination, EventId, EventType, OfferCatalog, TripEvent};
use crate::utils::{format_form_date, parse_form_date, parse_price};

use super::{Dom, Target, View, ViewBase};

pub const TYPE_INPUT: &str = ".event__type-input";
pub const DESTINATION_INPUT: &str = ".event__input--destination";
pub const START_INPUT: &str = ".event__input--start";
pub const END_INPUT: &str = ".event__input--end";
pub const PRICE_INPUT: &str = ".event__input--price";
pub const OFFER_CHECKBOX: &str = ".event__offer-checkbox";
pub const SAVE_BUTTON: &str = ".event__save-btn";
pub const RESET_BUTTON: &str = ".event__reset-btn";
pub const TYPE_OUTPUT: &str = ".event__type-output";
pub const TYPE_ICON: &str = ".event__type-icon";
pub const OFFERS_SECTION: &str = ".event__section--offers";
pub const DESTINATION_SECTION: &str = ".event__section--destination";
const TYPE_GROUP: &str = ".event__type-group";
const DETAILS: &str = ".event__details";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Editing an existing event: reset deletes it.
    Edit,
    /// Drafting a new event: reset cancels the draft.
    Create,
}

/// Edit/create form for one trip event.
///
/// The form keeps the snapshot it was built from. User edits live in the
/// document until `read` turns them into a new event value.
pub struct FormView {
    base: ViewBase,
    event: TripEvent,
    offers: Rc<OfferCatalog>,
    destinations: Rc<Vec<Destination>>,
    mode: FormMode,
}

impl FormView {
    pub fn new(
        event: &TripEvent,
        offers: Rc<OfferCatalog>,
        destinations: Rc<Vec<Destination>>,
        mode: FormMode,
    ) -> Self {
        Self {
            base: ViewBase::default(),
            event: event.clone(),
            offers,
            destinations,
            mode,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn event_id(&self) -> &EventId {
        &self.event.id
    }

    pub fn set_on_form_submit_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let event_id = self.event.id.clone();
        self.create_event_listener(
            doc,
            Target::Selector("form"),
            EventKind::Submit,
            move |_, _| Some(Message::FormSubmitted(event_id.clone())),
            ListenerOptions::prevent_default(),
        )?;
        Ok(self)
    }

    pub fn set_on_form_delete_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let event_id = self.event.id.clone();
        self.create_event_listener(
            doc,
            Target::Selector(RESET_BUTTON),
            EventKind::Click,
            move |_, _| Some(Message::FormDismissed(event_id.clone())),
            ListenerOptions::prevent_default(),
        )?;
        Ok(self)
    }

    /// Picking a type radio reports the new type.
    pub fn set_on_type_change_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let event_id = self.event.id.clone();
        self.create_event_listener(
            doc,
            Target::Selector(TYPE_GROUP),
            EventKind::Click,
            move |doc, event| {
                if !doc.matches(event.target, TYPE_INPUT) {
                    return None;
                }
                let event_type = doc.value(event.target)?.parse::<EventType>().ok()?;
                Some(Message::EventTypeChanged(event_id.clone(), event_type))
            },
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    pub fn set_on_destination_input_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let event_id = self.event.id.clone();
        self.create_event_listener(
            doc,
            Target::Selector(DESTINATION_INPUT),
            EventKind::Input,
            move |_, _| Some(Message::DestinationEdited(event_id.clone())),
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    /// Shows `event_type` in the header and lists its offers, none picked.
    pub fn change_type(&mut self, doc: &mut Dom, event_type: EventType) {
        let root = self.element(doc);
        show_type(doc, root, event_type);
        let draft = TripEvent {
            event_type,
            offers: Vec::new(),
            ..self.event.clone()
        };
        let offers = self.offers_template(&draft);
        replace_section(doc, root, OFFERS_SECTION, offers, RenderPosition::AfterBegin);
    }

    /// Shows the details of the destination currently typed in, if any.
    pub fn change_destination(&mut self, doc: &mut Dom) {
        let root = self.element(doc);
        let name = doc
            .query_selector(root, DESTINATION_INPUT)
            .and_then(|node| doc.value(node))
            .unwrap_or_default()
            .to_string();
        let section = find_by_name(&self.destinations, &name).and_then(destination_template);
        replace_section(doc, root, DESTINATION_SECTION, section, RenderPosition::BeforeEnd);
    }

    /// Builds the event the user entered. Id and favorite flag come from
    /// the snapshot.
    pub fn read(&mut self, doc: &mut Dom) -> Result<TripEvent, FormError> {
        let root = self.element(doc);
        let field = |selector: &str| {
            doc.query_selector(root, selector)
                .and_then(|node| doc.value(node))
                .unwrap_or_default()
                .to_string()
        };

        let event_type = doc
            .query_selector_all(root, TYPE_INPUT)
            .into_iter()
            .find(|node| doc.is_checked(*node))
            .and_then(|node| doc.value(node))
            .and_then(|value| value.parse::<EventType>().ok())
            .ok_or(FormError::MissingType)?;

        let destination_name = field(DESTINATION_INPUT);
        let destination = find_by_name(&self.destinations, &destination_name)
            .ok_or_else(|| FormError::UnknownDestination(destination_name.trim().to_string()))?;

        let date_from = read_date(field(START_INPUT), self.event.date_from)?;
        let date_to = read_date(field(END_INPUT), self.event.date_to)?;
        if date_to < date_from {
            return Err(FormError::DateOrder);
        }

        let price = field(PRICE_INPUT);
        let base_price = parse_price(&price).ok_or(FormError::InvalidPrice(price))?;

        let available = self.offers.for_type(event_type);
        let offers = doc
            .query_selector_all(root, OFFER_CHECKBOX)
            .into_iter()
            .filter(|node| doc.is_checked(*node))
            .filter_map(|node| doc.data(node, "offer-id"))
            .filter(|id| available.iter().any(|offer| offer.id == *id))
            .map(str::to_string)
            .collect();

        Ok(TripEvent {
            id: self.event.id.clone(),
            event_type,
            base_price,
            date_from,
            date_to,
            destination: Some(destination.id.clone()),
            offers,
            is_favorite: self.event.is_favorite,
        })
    }

    /// Writes `event` back into every field and makes it the new snapshot.
    pub fn reset(&mut self, doc: &mut Dom, event: &TripEvent) {
        self.event = event.clone();
        let root = self.element(doc);

        show_type(doc, root, event.event_type);
        let fields = [
            (DESTINATION_INPUT, self.destination_name()),
            (START_INPUT, format_form_date(event.date_from)),
            (END_INPUT, format_form_date(event.date_to)),
            (PRICE_INPUT, event.base_price.to_string()),
        ];
        for (selector, value) in fields {
            if let Some(node) = doc.query_selector(root, selector) {
                doc.set_value(node, value);
            }
        }
        let offers = self.offers_template(event);
        replace_section(doc, root, OFFERS_SECTION, offers, RenderPosition::AfterBegin);
        let destination = self.destination().and_then(destination_template);
        replace_section(doc, root, DESTINATION_SECTION, destination, RenderPosition::BeforeEnd);
    }

    fn destination(&self) -> Option<&Destination> {
        self.event
            .destination
            .as_deref()
            .and_then(|id| find_by_id(&self.destinations, id))
    }

    fn destination_name(&self) -> String {
        self.destination()
            .map(|destination| destination.name.clone())
            .unwrap_or_default()
    }

    fn type_list_template(&self) -> Markup {
        let id = self.event.id.as_str();
        el("div").class("event__type-list").child(
            el("fieldset")
                .class("event__type-group")
                .child(el("legend").class("visually-hidden").text("Event type"))
                .children(EventType::ALL.iter().map(|event_type| {
                    el("div")
                        .class("event__type-item")
                        .child(
                            el("input")
                                .class("event__type-input visually-hidden")
                                .attr("id", format!("event-type-{}-{}", event_type.as_str(), id))
                                .attr("type", "radio")
                                .attr("name", "event-type")
                                .value(event_type.as_str())
                                .checked(*event_type == self.event.event_type),
                        )
                        .child(
                            el("label")
                                .class(&format!("event__type-label event__type-label--{}", event_type.as_str()))
                                .attr("for", format!("event-type-{}-{}", event_type.as_str(), id))
                                .text(event_type.label()),
                        )
                })),
        )
    }

    fn header_template(&self) -> Markup {
        let event = &self.event;
        let list_id = format!("destination-list-{}", event.id);
        let reset_label = match self.mode {
            FormMode::Edit => "Delete",
            FormMode::Create => "Cancel",
        };

        el("header")
            .class("event__header")
            .child(
                el("div")
                    .class("event__type-wrapper")
                    .child(
                        el("label").class("event__type event__type-btn").child(
                            el("img")
                                .class("event__type-icon")
                                .attr("src", type_icon(event.event_type))
                                .attr("alt", "Event type icon"),
                        ),
                    )
                    .child(self.type_list_template()),
            )
            .child(
                el("div")
                    .class("event__field-group event__field-group--destination")
                    .child(el("label").class("event__label event__type-output").text(event.event_type.label()))
                    .child(
                        el("input")
                            .class("event__input event__input--destination")
                            .attr("type", "text")
                            .attr("name", "event-destination")
                            .attr("list", list_id.as_str())
                            .value(self.destination_name()),
                    )
                    .child(
                        el("datalist")
                            .attr("id", list_id.as_str())
                            .children(self.destinations.iter().map(|destination| {
                                el("option").value(destination.name.as_str())
                            })),
                    ),
            )
            .child(
                el("div")
                    .class("event__field-group event__field-group--time")
                    .child(
                        el("input")
                            .class("event__input event__input--time event__input--start")
                            .attr("type", "text")
                            .attr("name", "event-start-time")
                            .value(format_form_date(event.date_from)),
                    )
                    .text("—")
                    .child(
                        el("input")
                            .class("event__input event__input--time event__input--end")
                            .attr("type", "text")
                            .attr("name", "event-end-time")
                            .value(format_form_date(event.date_to)),
                    ),
            )
            .child(
                el("div")
                    .class("event__field-group event__field-group--price")
                    .child(
                        el("label")
                            .class("event__label")
                            .child(el("span").class("visually-hidden").text("Price"))
                            .text("€"),
                    )
                    .child(
                        el("input")
                            .class("event__input event__input--price")
                            .attr("type", "text")
                            .attr("name", "event-price")
                            .value(event.base_price.to_string()),
                    ),
            )
            .child(
                el("button")
                    .class("event__save-btn btn btn--blue")
                    .attr("type", "submit")
                    .text("Save"),
            )
            .child(
                el("button")
                    .class("event__reset-btn")
                    .attr("type", "reset")
                    .text(reset_label),
            )
            .child_if((self.mode == FormMode::Edit).then(|| {
                el("button")
                    .class("event__rollup-btn")
                    .attr("type", "button")
                    .child(el("span").class("visually-hidden").text("Close event"))
            }))
    }

    fn offers_template(&self, event: &TripEvent) -> Option<Markup> {
        let choices = self.offers.choices_for(event);
        if choices.is_empty() {
            return None;
        }
        Some(
            el("section")
                .class("event__section event__section--offers")
                .child(el("h3").class("event__section-title event__section-title--offers").text("Offers"))
                .child(el("div").class("event__available-offers").children(
                    choices.into_iter().map(|choice| {
                        el("div")
                            .class("event__offer-selector")
                            .child(
                                el("input")
                                    .class("event__offer-checkbox visually-hidden")
                                    .attr("type", "checkbox")
                                    .attr("name", format!("event-offer-{}", choice.offer.id))
                                    .data("offer-id", choice.offer.id.as_str())
                                    .checked(choice.is_checked),
                            )
                            .child(
                                el("label")
                                    .class("event__offer-label")
                                    .child(el("span").class("event__offer-title").text(choice.offer.title.as_str()))
                                    .text(" +€ ")
                                    .child(el("span").class("event__offer-price").text(choice.offer.price.to_string())),
                            )
                    }),
                )),
        )
    }
}

impl View for FormView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        el("li").class("trip-events__item").child(
            el("form")
                .class("event event--edit")
                .data("event-id", self.event.id.as_str())
                .attr("action", "#")
                .attr("method", "post")
                .child(self.header_template())
                .child(
                    el("section")
                        .class("event__details")
                        .child_if(self.offers_template(&self.event))
                        .child_if(self.destination().and_then(destination_template)),
                ),
        )
    }
}

fn show_type(doc: &mut Dom, root: NodeId, event_type: EventType) {
    for node in doc.query_selector_all(root, TYPE_INPUT) {
        let checked = doc.value(node) == Some(event_type.as_str());
        doc.set_checked(node, checked);
    }
    if let Some(node) = doc.query_selector(root, TYPE_OUTPUT) {
        doc.set_text(node, event_type.label());
    }
    if let Some(node) = doc.query_selector(root, TYPE_ICON) {
        doc.set_attr(node, "src", type_icon(event_type));
    }
}

fn type_icon(event_type: EventType) -> String {
    format!("img/icons/{}.png", event_type.as_str())
}

/// Swaps one section of the details block for freshly built markup.
fn replace_section(doc: &mut Dom, root: NodeId, selector: &str, section: Option<Markup>, position: RenderPosition) {
    if let Some(old) = doc.query_selector(root, selector) {
        doc.destroy(old);
    }
    let (Some(section), Some(details)) = (section, doc.query_selector(root, DETAILS)) else {
        return;
    };
    let node = doc.create(&section);
    doc.insert(details, node, position);
}

/// An untouched field keeps the snapshot's exact time, which the minute
/// precision of the text format would otherwise truncate.
fn read_date(text: String, snapshot: DateTime<Utc>) -> Result<DateTime<Utc>, FormError> {
    if text.trim() == format_form_date(snapshot) {
        return Ok(snapshot);
    }
    parse_form_date(&text).ok_or(FormError::InvalidDate(text))
}

fn destination_template(destination: &Destination) -> Option<Markup> {
    if !destination.has_details() {
        return None;
    }
    Some(
        el("section")
            .class("event__section event__section--destination")
            .child(el("h3").class("event__section-title event__section-title--destination").text("Destination"))
            .child(el("p").class("event__destination-description").text(destination.description.as_str()))
            .child(el("div").class("event__photos-container").child(
                el("div").class("event__photos-tape").children(destination.pictures.iter().map(|picture| {
                    el("img")
                        .class("event__photo")
                        .attr("src", picture.src.as_str())
                        .attr("alt", picture.description.as_str())
                })),
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Offer, OfferGroup, Picture};
    use chrono::{Duration, TimeZone, Utc};

    fn fixture() -> (TripEvent, Rc<OfferCatalog>, Rc<Vec<Destination>>) {
        let start = Utc.with_ymd_and_hms(2026, 3, 18, 10, 30, 0).unwrap();
        let event = TripEvent {
            id: EventId::from("e-1"),
            event_type: EventType::Taxi,
            base_price: 20,
            date_from: start,
            date_to: start + Duration::hours(1),
            destination: Some("ams".into()),
            offers: vec!["o-1".into()],
            is_favorite: true,
        };
        let offers = OfferCatalog::from(vec![OfferGroup {
            event_type: EventType::Taxi,
            offers: vec![
                Offer { id: "o-1".into(), title: "Order Uber".into(), price: 20 },
                Offer { id: "o-2".into(), title: "Add luggage".into(), price: 50 },
            ],
        }]);
        let destinations = vec![
            Destination {
                id: "ams".into(),
                name: "Amsterdam".into(),
                description: "Canals.".into(),
                pictures: vec![Picture { src: "img/1.jpg".into(), description: "Canal".into() }],
            },
            Destination {
                id: "gva".into(),
                name: "Geneva".into(),
                description: String::new(),
                pictures: Vec::new(),
            },
        ];
        (event, Rc::new(offers), Rc::new(destinations))
    }

    fn edit_form() -> (Dom, FormView, TripEvent) {
        let (event, offers, destinations) = fixture();
        let mut doc = Dom::new();
        let mut form = FormView::new(&event, offers, destinations, FormMode::Edit);
        form.element(&mut doc);
        (doc, form, event)
    }

    fn set_field(doc: &mut Dom, form: &mut FormView, selector: &str, value: &str) {
        let root = form.element(doc);
        let node = doc.query_selector(root, selector).unwrap();
        doc.set_value(node, value);
    }

    #[test]
    fn test_untouched_form_reads_back_snapshot() {
        let (mut doc, mut form, event) = edit_form();
        assert_eq!(form.read(&mut doc), Ok(event));
    }

    #[test]
    fn test_untouched_dates_keep_sub_minute_precision() {
        let (mut event, offers, destinations) = fixture();
        event.date_from = Utc.with_ymd_and_hms(2030, 5, 2, 8, 0, 42).unwrap() + Duration::milliseconds(250);
        event.date_to = event.date_from + Duration::seconds(5400);
        let mut doc = Dom::new();
        let mut form = FormView::new(&event, offers, destinations, FormMode::Edit);

        let read = form.read(&mut doc).unwrap();
        assert_eq!(read.date_from, event.date_from);
        assert_eq!(read.date_to, event.date_to);

        set_field(&mut doc, &mut form, END_INPUT, "30/05/02 11:00");
        let read = form.read(&mut doc).unwrap();
        assert_eq!(read.date_from, event.date_from);
        assert_eq!(read.date_to, Utc.with_ymd_and_hms(2030, 5, 2, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_type_change_follows_through_header_and_offers() {
        let (mut doc, mut form, event) = edit_form();
        form.set_on_type_change_handler(&mut doc).unwrap();
        let root = form.element(&mut doc);
        let radio = |doc: &Dom, value: &str| {
            doc.query_selector_all(root, TYPE_INPUT)
                .into_iter()
                .find(|node| doc.value(*node) == Some(value))
                .unwrap()
        };

        let bus = radio(&doc, "bus");
        let clicked = doc.click(bus);
        assert_eq!(
            clicked.messages,
            vec![Message::EventTypeChanged(event.id.clone(), EventType::Bus)]
        );

        form.change_type(&mut doc, EventType::Bus);
        let label = doc.query_selector(root, TYPE_OUTPUT).unwrap();
        let icon = doc.query_selector(root, TYPE_ICON).unwrap();
        assert_eq!(doc.text_content(label), "Bus");
        assert_eq!(doc.attr(icon, "src"), Some("img/icons/bus.png"));
        assert!(doc.query_selector(root, OFFERS_SECTION).is_none());
        assert!(form.read(&mut doc).unwrap().offers.is_empty());

        let taxi = radio(&doc, "taxi");
        doc.click(taxi);
        form.change_type(&mut doc, EventType::Taxi);
        let boxes = doc.query_selector_all(root, OFFER_CHECKBOX);
        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().all(|node| !doc.is_checked(*node)));

        // The details block keeps offers ahead of the destination.
        let details = doc.query_selector(root, DETAILS).unwrap();
        let sections = doc.element_children(details);
        assert!(doc.matches(sections[0], OFFERS_SECTION));
        assert!(doc.matches(sections[1], DESTINATION_SECTION));

        form.reset(&mut doc, &event);
        assert_eq!(doc.text_content(label), "Taxi");
        assert_eq!(form.read(&mut doc), Ok(event));
    }

    #[test]
    fn test_destination_edit_swaps_details() {
        let (mut doc, mut form, event) = edit_form();
        form.set_on_destination_input_handler(&mut doc).unwrap();
        let root = form.element(&mut doc);
        let input = doc.query_selector(root, DESTINATION_INPUT).unwrap();

        doc.set_value(input, "Geneva");
        let edited = doc.dispatch(input, EventKind::Input, None);
        assert_eq!(edited.messages, vec![Message::DestinationEdited(event.id.clone())]);
        form.change_destination(&mut doc);
        assert!(doc.query_selector(root, DESTINATION_SECTION).is_none());

        doc.set_value(input, "Amsterdam");
        form.change_destination(&mut doc);
        let section = doc.query_selector(root, DESTINATION_SECTION).unwrap();
        assert!(doc.text_content(section).contains("Canals."));
    }

    #[test]
    fn test_read_collects_user_edits() {
        let (mut doc, mut form, _) = edit_form();
        set_field(&mut doc, &mut form, DESTINATION_INPUT, " Geneva ");
        set_field(&mut doc, &mut form, PRICE_INPUT, "75");
        let root = form.element(&mut doc);
        let extra = doc.query_selector_all(root, OFFER_CHECKBOX)[1];
        doc.click(extra);

        let read = form.read(&mut doc).unwrap();
        assert_eq!(read.destination.as_deref(), Some("gva"));
        assert_eq!(read.base_price, 75);
        assert_eq!(read.offers, vec!["o-1".to_string(), "o-2".to_string()]);
        assert!(read.is_favorite);
    }

    #[test]
    fn test_read_rejects_bad_input() {
        let (mut doc, mut form, _) = edit_form();
        set_field(&mut doc, &mut form, DESTINATION_INPUT, "Atlantis");
        assert_eq!(
            form.read(&mut doc),
            Err(FormError::UnknownDestination("Atlantis".into()))
        );

        set_field(&mut doc, &mut form, DESTINATION_INPUT, "Amsterdam");
        set_field(&mut doc, &mut form, PRICE_INPUT, "-5");
        assert_eq!(form.read(&mut doc), Err(FormError::InvalidPrice("-5".into())));

        set_field(&mut doc, &mut form, PRICE_INPUT, "5");
        set_field(&mut doc, &mut form, END_INPUT, "26/03/17 10:00");
        assert_eq!(form.read(&mut doc), Err(FormError::DateOrder));

        set_field(&mut doc, &mut form, START_INPUT, "tomorrow");
        assert_eq!(form.read(&mut doc), Err(FormError::InvalidDate("tomorrow".into())));
    }

    #[test]
    fn test_reset_restores_snapshot() {
        let (mut doc, mut form, event) = edit_form();
        set_field(&mut doc, &mut form, PRICE_INPUT, "999");
        let root = form.element(&mut doc);
        let bus = doc
            .query_selector_all(root, TYPE_INPUT)
            .into_iter()
            .find(|node| doc.value(*node) == Some("bus"))
            .unwrap();
        doc.click(bus);

        form.reset(&mut doc, &event);
        assert_eq!(form.read(&mut doc), Ok(event));
    }

    #[test]
    fn test_mode_decides_reset_label_and_rollup() {
        let (event, offers, destinations) = fixture();
        let mut doc = Dom::new();
        let mut create = FormView::new(&event, offers, destinations, FormMode::Create);
        let root = create.element(&mut doc);

        let reset = doc.query_selector(root, RESET_BUTTON).unwrap();
        assert_eq!(doc.text_content(reset), "Cancel");
        assert!(doc.query_selector(root, ".event__rollup-btn").is_none());
        assert!(doc.query_selector(root, ".event__photo").is_some());
    }

    #[test]
    fn test_save_and_reset_buttons_emit_messages() {
        let (mut doc, mut form, _) = edit_form();
        form.set_on_form_submit_handler(&mut doc).unwrap();
        form.set_on_form_delete_handler(&mut doc).unwrap();
        let root = form.element(&mut doc);
        let id = EventId::from("e-1");

        let save = doc.query_selector(root, SAVE_BUTTON).unwrap();
        let submitted = doc.click(save);
        assert_eq!(submitted.messages, vec![Message::FormSubmitted(id.clone())]);
        assert!(submitted.default_prevented);

        let reset = doc.query_selector(root, RESET_BUTTON).unwrap();
        assert_eq!(doc.click(reset).messages, vec![Message::FormDismissed(id)]);
    }
}
