use std::rc::Rc;

use log::{debug, warn};

use crate::dom::{NodeId, RenderPosition};
use crate::error::ViewError;
use crate::messages::Message;
use crate::models::{Destination, EventType, OfferCatalog, TripEvent, UpdateType, UserAction, ViewAction};
use crate::view::form_view::FormMode;
use crate::view::{self, Dom, EventView, FormView, View};

use super::{EventMode, ViewActionHandler};

/// Remaining number of events on the board, read when deciding how big a
/// deletion is.
pub type EventCount = Rc<dyn Fn() -> usize>;

/// Coordinates the row and form views of one trip event.
///
/// Exactly one of the two is mounted in the container at a time. Both are
/// rebuilt from scratch on every `init`.
pub struct EventPresenter {
    container: NodeId,
    event_count: EventCount,
    event: Option<TripEvent>,
    offers: Rc<OfferCatalog>,
    destinations: Rc<Vec<Destination>>,
    mode: FormMode,
    event_view: Option<EventView>,
    form_view: Option<FormView>,
    action_handler: Option<Box<dyn ViewActionHandler>>,
}

impl EventPresenter {
    pub fn new(container: NodeId, event_count: EventCount) -> Self {
        Self {
            container,
            event_count,
            event: None,
            offers: Rc::default(),
            destinations: Rc::default(),
            mode: FormMode::Edit,
            event_view: None,
            form_view: None,
            action_handler: None,
        }
    }

    pub fn init(
        &mut self,
        doc: &mut Dom,
        event: &TripEvent,
        offers: Rc<OfferCatalog>,
        destinations: Rc<Vec<Destination>>,
        mode: FormMode,
    ) -> Result<&mut Self, ViewError> {
        self.event = Some(event.clone());
        self.offers = offers;
        self.destinations = destinations;
        self.mode = mode;

        let mut event_view = EventView::new(event, &self.offers, &self.destinations);
        event_view.set_on_favorite_click_handler(doc)?;
        let mut form_view = FormView::new(
            event,
            Rc::clone(&self.offers),
            Rc::clone(&self.destinations),
            mode,
        );
        form_view
            .set_on_form_submit_handler(doc)?
            .set_on_form_delete_handler(doc)?
            .set_on_type_change_handler(doc)?
            .set_on_destination_input_handler(doc)?;

        let previous = self.event_view.take().zip(self.form_view.take());
        let Some((mut prev_event_view, mut prev_form_view)) = previous else {
            match mode {
                FormMode::Create => view::render(doc, self.container, &mut form_view, RenderPosition::AfterBegin),
                FormMode::Edit => view::render(doc, self.container, &mut event_view, RenderPosition::BeforeEnd),
            }
            self.event_view = Some(event_view);
            self.form_view = Some(form_view);
            return Ok(self);
        };

        // Only the counterpart that is actually mounted gets swapped in.
        if prev_event_view.is_mounted_in(doc, self.container) {
            view::replace(doc, &mut prev_event_view, &mut event_view)?;
        }
        if prev_form_view.is_mounted_in(doc, self.container) {
            view::replace(doc, &mut prev_form_view, &mut form_view)?;
        }
        view::remove(doc, &mut prev_event_view);
        view::remove(doc, &mut prev_form_view);

        self.event_view = Some(event_view);
        self.form_view = Some(form_view);
        Ok(self)
    }

    /// Rebuilds the pair from a new snapshot, keeping offers, destinations
    /// and mode.
    pub fn refresh(&mut self, doc: &mut Dom, event: &TripEvent) -> Result<&mut Self, ViewError> {
        let offers = Rc::clone(&self.offers);
        let destinations = Rc::clone(&self.destinations);
        let mode = self.mode;
        self.init(doc, event, offers, destinations, mode)
    }

    pub fn set_view_action_handler(&mut self, handler: Box<dyn ViewActionHandler>) -> &mut Self {
        self.action_handler = Some(handler);
        self
    }

    pub fn toggle_view(&mut self, doc: &mut Dom, direction: EventMode) -> Result<&mut Self, ViewError> {
        let (Some(event), Some(event_view), Some(form_view)) =
            (self.event.as_ref(), self.event_view.as_mut(), self.form_view.as_mut())
        else {
            return Err(ViewError::NotInitialized);
        };

        match direction {
            EventMode::Default => {
                form_view.reset(doc, event);
                view::replace(doc, form_view, event_view)?;
            }
            EventMode::Form => view::replace(doc, event_view, form_view)?,
        }
        Ok(self)
    }

    pub fn destroy(&mut self, doc: &mut Dom) {
        if let Some(event_view) = self.event_view.as_mut() {
            view::remove(doc, event_view);
        }
        if let Some(form_view) = self.form_view.as_mut() {
            view::remove(doc, form_view);
        }
    }

    pub fn on_form_submit(&mut self, doc: &mut Dom) {
        let Some(form_view) = self.form_view.as_mut() else {
            return;
        };
        match form_view.read(doc) {
            Ok(event) => {
                let request = match self.mode {
                    FormMode::Create => ViewAction::new(UserAction::CreateEvent, UpdateType::Major, event),
                    FormMode::Edit => ViewAction::new(UserAction::UpdateEvent, UpdateType::Minor, event),
                };
                self.forward(request);
            }
            Err(e) => {
                debug!("Rejected form for {}: {}", form_view.event_id(), e);
                let settled = Message::FormSettled(form_view.event_id().clone());
                form_view.shake(doc, Some(settled));
            }
        }
    }

    pub fn on_form_delete(&mut self) {
        let Some(event) = self.event.clone() else {
            return;
        };
        let request = match self.mode {
            FormMode::Create => ViewAction::new(UserAction::CancelEvent, UpdateType::Minor, event),
            FormMode::Edit => {
                let remaining = (self.event_count)().saturating_sub(1);
                let update = if remaining == 0 {
                    UpdateType::Major
                } else {
                    UpdateType::Minor
                };
                ViewAction::new(UserAction::DeleteEvent, update, event)
            }
        };
        self.forward(request);
    }

    pub fn on_type_change(&mut self, doc: &mut Dom, event_type: EventType) {
        if let Some(form_view) = self.form_view.as_mut() {
            form_view.change_type(doc, event_type);
        }
    }

    pub fn on_destination_edit(&mut self, doc: &mut Dom) {
        if let Some(form_view) = self.form_view.as_mut() {
            form_view.change_destination(doc);
        }
    }

    pub fn on_favorite_click(&mut self) {
        if let Some(event) = self.event.as_ref() {
            let request = ViewAction::new(UserAction::UpdateEvent, UpdateType::Patch, event.toggled_favorite());
            self.forward(request);
        }
    }

    fn forward(&mut self, request: ViewAction) {
        match self.action_handler.as_mut() {
            Some(handler) => handler.handle(request),
            None => warn!("No action handler for {:?} on {}", request.action, request.event.id),
        }
    }

    pub fn event(&self) -> Option<&TripEvent> {
        self.event.as_ref()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn event_view(&self) -> Option<&EventView> {
        self.event_view.as_ref()
    }

    pub fn form_view(&self) -> Option<&FormView> {
        self.form_view.as_ref()
    }

    /// Which view is currently in the container, if any.
    pub fn mounted(&self, doc: &Dom) -> Option<EventMode> {
        let in_container = |view: Option<&dyn View>| view.is_some_and(|view| view.is_mounted_in(doc, self.container));
        if in_container(self.form_view.as_ref().map(|view| view as &dyn View)) {
            Some(EventMode::Form)
        } else if in_container(self.event_view.as_ref().map(|view| view as &dyn View)) {
            Some(EventMode::Default)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, EventType, Offer, OfferGroup};
    use crate::presenter::MockViewActionHandler;
    use crate::view::form_view::PRICE_INPUT;
    use crate::view::SHAKE_CLASS_NAME;
    use chrono::{Duration, TimeZone, Utc};
    use mockall::predicate::eq;

    fn sample_event(id: &str) -> TripEvent {
        let start = Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap();
        TripEvent {
            id: EventId::from(id),
            event_type: EventType::Flight,
            base_price: 300,
            date_from: start,
            date_to: start + Duration::hours(3),
            destination: Some("ams".into()),
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    fn catalog() -> Rc<OfferCatalog> {
        Rc::new(OfferCatalog::from(vec![OfferGroup {
            event_type: EventType::Flight,
            offers: vec![Offer { id: "meal".into(), title: "Add meal".into(), price: 15 }],
        }]))
    }

    fn destinations() -> Rc<Vec<Destination>> {
        Rc::new(vec![Destination {
            id: "ams".into(),
            name: "Amsterdam".into(),
            description: String::new(),
            pictures: Vec::new(),
        }])
    }

    fn setup(count: usize) -> (Dom, NodeId, EventPresenter) {
        let mut doc = Dom::new();
        let list = doc.create(&crate::dom::el("ul").class("trip-events__list"));
        let body = doc.body();
        doc.insert(body, list, RenderPosition::BeforeEnd);
        let presenter = EventPresenter::new(list, Rc::new(move || count));
        (doc, list, presenter)
    }

    fn init(doc: &mut Dom, presenter: &mut EventPresenter, event: &TripEvent, mode: FormMode) {
        presenter
            .init(doc, event, catalog(), destinations(), mode)
            .unwrap();
    }

    #[test]
    fn test_first_init_mounts_row_at_end() {
        let (mut doc, list, mut presenter) = setup(1);
        let existing = doc.create(&crate::dom::el("li").class("existing"));
        doc.insert(list, existing, RenderPosition::BeforeEnd);

        init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);

        assert_eq!(presenter.mounted(&doc), Some(EventMode::Default));
        let row = presenter.event_view().unwrap().existing_element().unwrap();
        assert_eq!(doc.children(list), &[existing, row]);
    }

    #[test]
    fn test_first_init_in_create_mode_prepends_form() {
        let (mut doc, list, mut presenter) = setup(1);
        let existing = doc.create(&crate::dom::el("li").class("existing"));
        doc.insert(list, existing, RenderPosition::BeforeEnd);

        init(&mut doc, &mut presenter, &sample_event("new"), FormMode::Create);

        assert_eq!(presenter.mounted(&doc), Some(EventMode::Form));
        let form = presenter.form_view().unwrap().existing_element().unwrap();
        assert_eq!(doc.children(list)[0], form);
    }

    #[test]
    fn test_reinit_replaces_only_the_mounted_view() {
        let (mut doc, list, mut presenter) = setup(1);
        init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);
        presenter.toggle_view(&mut doc, EventMode::Form).unwrap();
        let old_form = presenter.form_view().unwrap().existing_element().unwrap();

        let mut changed = sample_event("a");
        changed.base_price = 42;
        presenter.refresh(&mut doc, &changed).unwrap();

        assert_eq!(presenter.mounted(&doc), Some(EventMode::Form));
        assert!(!doc.is_alive(old_form));
        assert_eq!(doc.element_children(list).len(), 1);
        assert_eq!(presenter.event().unwrap().base_price, 42);
    }

    #[test]
    fn test_toggle_keeps_position() {
        let (mut doc, list, mut presenter) = setup(3);
        let before = doc.create(&crate::dom::el("li").class("before"));
        doc.insert(list, before, RenderPosition::BeforeEnd);
        init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);
        let after = doc.create(&crate::dom::el("li").class("after"));
        doc.insert(list, after, RenderPosition::BeforeEnd);

        presenter.toggle_view(&mut doc, EventMode::Form).unwrap();
        let form = presenter.form_view().unwrap().existing_element().unwrap();
        assert_eq!(doc.children(list), &[before, form, after]);

        presenter.toggle_view(&mut doc, EventMode::Default).unwrap();
        let row = presenter.event_view().unwrap().existing_element().unwrap();
        assert_eq!(doc.children(list), &[before, row, after]);
    }

    #[test]
    fn test_toggle_to_default_discards_unsaved_edits() {
        let (mut doc, _, mut presenter) = setup(1);
        let event = sample_event("a");
        init(&mut doc, &mut presenter, &event, FormMode::Edit);
        presenter.toggle_view(&mut doc, EventMode::Form).unwrap();

        let form = presenter.form_view().unwrap().existing_element().unwrap();
        let price = doc.query_selector(form, PRICE_INPUT).unwrap();
        doc.set_value(price, "1");
        presenter.toggle_view(&mut doc, EventMode::Default).unwrap();

        assert_eq!(doc.value(price), Some("300"));
    }

    #[test]
    fn test_toggle_before_init_fails() {
        let (mut doc, _, mut presenter) = setup(1);
        assert!(matches!(
            presenter.toggle_view(&mut doc, EventMode::Form),
            Err(ViewError::NotInitialized)
        ));
    }

    #[test]
    fn test_destroy_removes_both_views() {
        let (mut doc, list, mut presenter) = setup(1);
        init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);
        presenter.destroy(&mut doc);

        assert!(doc.children(list).is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_favorite_forwards_patch_with_flag_inverted() {
        let (mut doc, _, mut presenter) = setup(1);
        let event = sample_event("a");
        init(&mut doc, &mut presenter, &event, FormMode::Edit);

        let mut expected = event.clone();
        expected.is_favorite = true;
        let mut handler = MockViewActionHandler::new();
        handler
            .expect_handle()
            .with(eq(ViewAction::new(UserAction::UpdateEvent, UpdateType::Patch, expected)))
            .times(1)
            .return_const(());
        presenter.set_view_action_handler(Box::new(handler));

        presenter.on_favorite_click();
    }

    #[test]
    fn test_submit_action_depends_on_mode() {
        let (mut doc, _, mut edit) = setup(1);
        let event = sample_event("a");
        init(&mut doc, &mut edit, &event, FormMode::Edit);
        let mut handler = MockViewActionHandler::new();
        handler
            .expect_handle()
            .withf(|request| request.action == UserAction::UpdateEvent && request.update == UpdateType::Minor)
            .times(1)
            .return_const(());
        edit.set_view_action_handler(Box::new(handler));
        edit.on_form_submit(&mut doc);

        let (mut doc, _, mut create) = setup(1);
        init(&mut doc, &mut create, &sample_event("new"), FormMode::Create);
        let mut handler = MockViewActionHandler::new();
        handler
            .expect_handle()
            .withf(|request| request.action == UserAction::CreateEvent && request.update == UpdateType::Major)
            .times(1)
            .return_const(());
        create.set_view_action_handler(Box::new(handler));
        create.on_form_submit(&mut doc);
    }

    #[test]
    fn test_invalid_submit_shakes_instead_of_forwarding() {
        let (mut doc, _, mut presenter) = setup(1);
        init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);
        presenter.toggle_view(&mut doc, EventMode::Form).unwrap();
        let form = presenter.form_view().unwrap().existing_element().unwrap();
        let price = doc.query_selector(form, PRICE_INPUT).unwrap();
        doc.set_value(price, "lots");

        let mut handler = MockViewActionHandler::new();
        handler.expect_handle().never();
        presenter.set_view_action_handler(Box::new(handler));
        presenter.on_form_submit(&mut doc);

        assert!(doc.has_class(form, SHAKE_CLASS_NAME));
        assert_eq!(
            doc.advance(crate::view::SHAKE_ANIMATION_TIMEOUT),
            vec![Message::FormSettled(EventId::from("a"))]
        );
    }

    #[test]
    fn test_delete_severity_follows_remaining_count() {
        for (count, update) in [(1, UpdateType::Major), (2, UpdateType::Minor)] {
            let (mut doc, _, mut presenter) = setup(count);
            init(&mut doc, &mut presenter, &sample_event("a"), FormMode::Edit);
            let mut handler = MockViewActionHandler::new();
            handler
                .expect_handle()
                .withf(move |request| request.action == UserAction::DeleteEvent && request.update == update)
                .times(1)
                .return_const(());
            presenter.set_view_action_handler(Box::new(handler));
            presenter.on_form_delete();
        }
    }

    #[test]
    fn test_reset_in_create_mode_cancels() {
        let (mut doc, _, mut presenter) = setup(0);
        init(&mut doc, &mut presenter, &sample_event("new"), FormMode::Create);
        let mut handler = MockViewActionHandler::new();
        handler
            .expect_handle()
            .withf(|request| request.action == UserAction::CancelEvent && request.update == UpdateType::Minor)
            .times(1)
            .return_const(());
        presenter.set_view_action_handler(Box::new(handler));
        presenter.on_form_delete();
    }
}
