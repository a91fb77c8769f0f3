use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::dom::{NodeId, RenderPosition};
use crate::error::{AppResult, ViewError};
use crate::messages::Message;
use crate::models::filter::LOADING_MESSAGE;
use crate::models::{filter_events, sort_events, EventId, FilterKind, SortKind, TripEvent, UpdateType, UserAction};
use crate::store::{Notification, TripModel};
use crate::view::form_view::FormMode;
use crate::view::{self, Dom, EventListView, NewEventButtonView, NoEventsView, SortView, View};

use super::{ActionQueue, EventMode, EventPresenter};

/// Owns every event presenter, the sort/list/placeholder chrome and the
/// "one open form" rule.
///
/// All state changes funnel through [`BoardPresenter::update`] (user input)
/// and [`BoardPresenter::sync`] (model notifications).
pub struct BoardPresenter {
    board_container: NodeId,
    new_event_button_container: NodeId,

    event_list: Option<EventListView>,
    new_event_button: NewEventButtonView,
    sort: Option<SortView>,
    no_events: Option<NoEventsView>,

    events: Vec<TripEvent>,
    event_count: Rc<Cell<usize>>,

    active_sort: SortKind,
    presenters: HashMap<EventId, EventPresenter>,
    active_event_id: Option<EventId>,
    new_event_presenter: Option<EventPresenter>,
    is_loading: bool,

    notifications: UnboundedReceiver<Notification>,
    actions: ActionQueue,
}

impl BoardPresenter {
    pub fn new(board_container: NodeId, new_event_button_container: NodeId, model: &mut TripModel) -> Self {
        Self {
            board_container,
            new_event_button_container,
            event_list: None,
            new_event_button: NewEventButtonView::new(),
            sort: None,
            no_events: None,
            events: Vec::new(),
            event_count: Rc::new(Cell::new(0)),
            active_sort: SortKind::default(),
            presenters: HashMap::new(),
            active_event_id: None,
            new_event_presenter: None,
            is_loading: true,
            notifications: model.add_observer(),
            actions: ActionQueue::default(),
        }
    }

    pub fn init(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        self.new_event_button.set_on_click_handler(doc)?;
        view::render(
            doc,
            self.new_event_button_container,
            &mut self.new_event_button,
            RenderPosition::BeforeEnd,
        );
        self.render_board(doc, model)
    }

    /// Handles one message produced by the document.
    pub fn update(&mut self, message: Message, doc: &mut Dom, model: &mut TripModel) -> AppResult<()> {
        match message {
            Message::NewEventRequested => self.on_new_event(doc, model)?,
            Message::SortRequested(kind) => self.on_sort_change(doc, model, &kind)?,
            Message::EventToggled(event_id) => self.toggle_event_mode(doc, event_id)?,
            Message::EscapePressed => {
                if self.active_event_id.is_some() || self.new_event_presenter.is_some() {
                    self.toggle_event_mode(doc, None)?;
                }
            }
            Message::FavoriteToggled(event_id) => {
                if let Some(presenter) = self.presenter_mut(&event_id) {
                    presenter.on_favorite_click();
                }
            }
            Message::FormSubmitted(event_id) => {
                if let Some(presenter) = self.presenter_mut(&event_id) {
                    presenter.on_form_submit(doc);
                }
            }
            Message::FormDismissed(event_id) => {
                if let Some(presenter) = self.presenter_mut(&event_id) {
                    presenter.on_form_delete();
                }
            }
            Message::EventTypeChanged(event_id, event_type) => {
                if let Some(presenter) = self.presenter_mut(&event_id) {
                    presenter.on_type_change(doc, event_type);
                }
            }
            Message::DestinationEdited(event_id) => {
                if let Some(presenter) = self.presenter_mut(&event_id) {
                    presenter.on_destination_edit(doc);
                }
            }
            Message::FormSettled(event_id) => debug!("Form {} settled", event_id),
        }
        self.process_actions(doc, model)
    }

    /// Processes every pending model notification.
    pub fn sync(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        while let Ok(notification) = self.notifications.try_recv() {
            self.on_model_change(doc, model, notification)?;
        }
        Ok(())
    }

    fn process_actions(&mut self, doc: &mut Dom, model: &mut TripModel) -> AppResult<()> {
        while let Some(request) = self.actions.pop() {
            debug!("{:?} ({:?}) for {}", request.action, request.update, request.event.id);
            let result = match request.action {
                UserAction::UpdateEvent => model.update_event(request.update, request.event),
                UserAction::CreateEvent => model.create_event(request.update, request.event),
                UserAction::DeleteEvent => model.delete_event(request.update, request.event),
                UserAction::CancelEvent => {
                    self.destroy_new_event_presenter(doc);
                    if self.events.is_empty() {
                        self.render_no_events(doc, model);
                    }
                    Ok(())
                }
            };
            if let Err(e) = result {
                error!("Failed to apply {:?}: {}", request.action, e);
                return Err(e);
            }
            self.sync(doc, model)?;
        }
        Ok(())
    }

    fn on_model_change(&mut self, doc: &mut Dom, model: &TripModel, notification: Notification) -> Result<(), ViewError> {
        self.events = filter_events(model.events(), model.filter_type());
        self.event_count.set(self.events.len());

        match notification.update {
            UpdateType::Patch => {
                let Some(event) = notification.event else {
                    return Ok(());
                };
                match self.presenters.get_mut(&event.id) {
                    Some(presenter) => {
                        presenter.refresh(doc, &event)?;
                    }
                    None => warn!("Patch for event {} that is not on the board", event.id),
                }
            }
            UpdateType::Minor => {
                if self.event_list.is_some() {
                    self.update_event_list(doc, model)?;
                } else {
                    self.update_board(doc, model)?;
                }
            }
            UpdateType::Major => self.update_board(doc, model)?,
            UpdateType::Filter => {
                self.active_sort = SortKind::default();
                self.update_board(doc, model)?;
            }
            UpdateType::Init => {
                info!("Board loaded with {} events", self.events.len());
                self.is_loading = false;
                self.remove_no_events(doc);
                self.new_event_button.enable(doc);
                self.render_board(doc, model)?;
            }
        }
        Ok(())
    }

    fn render_board(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        if self.events.is_empty() || self.is_loading {
            self.render_no_events(doc, model);
            return Ok(());
        }
        self.render_sort(doc, model)?;
        self.render_event_list(doc)?;
        self.render_events(doc, model)
    }

    fn render_no_events(&mut self, doc: &mut Dom, model: &TripModel) {
        let message = if self.is_loading {
            LOADING_MESSAGE
        } else {
            model.filter_type().empty_message()
        };
        self.remove_no_events(doc);
        let mut placeholder = NoEventsView::new(message);
        view::render(doc, self.board_container, &mut placeholder, RenderPosition::BeforeEnd);
        self.no_events = Some(placeholder);
    }

    fn render_sort(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        let mut sort = SortView::new(model.sort_items(), self.active_sort);
        sort.set_sort_type_change_handler(doc)?;
        view::render(doc, self.board_container, &mut sort, RenderPosition::BeforeEnd);
        self.sort = Some(sort);
        Ok(())
    }

    fn render_event_list(&mut self, doc: &mut Dom) -> Result<(), ViewError> {
        let mut list = EventListView::new();
        list.set_event_toggle_handler(doc)?
            .set_esc_keydown_handler(doc)?;
        view::render(doc, self.board_container, &mut list, RenderPosition::BeforeEnd);
        self.event_list = Some(list);
        Ok(())
    }

    fn create_event_presenter(
        &mut self,
        doc: &mut Dom,
        model: &TripModel,
        event: &TripEvent,
        mode: FormMode,
    ) -> Result<EventPresenter, ViewError> {
        let container = self
            .event_list
            .as_ref()
            .and_then(|list| list.existing_element())
            .ok_or(ViewError::NotMounted)?;
        let count = Rc::clone(&self.event_count);
        let mut presenter = EventPresenter::new(container, Rc::new(move || count.get()));
        presenter
            .init(doc, event, model.offers(), model.destinations(), mode)?
            .set_view_action_handler(Box::new(self.actions.clone()));
        Ok(presenter)
    }

    fn render_events(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        for event in sort_events(&self.events, self.active_sort) {
            let presenter = self.create_event_presenter(doc, model, &event, FormMode::Edit)?;
            self.presenters.insert(event.id.clone(), presenter);
        }
        debug!("Rendered {} rows sorted by {}", self.presenters.len(), self.active_sort);
        Ok(())
    }

    fn on_new_event(&mut self, doc: &mut Dom, model: &mut TripModel) -> Result<(), ViewError> {
        self.toggle_event_mode(doc, None)?;
        self.active_sort = SortKind::Day;
        model.update_filter_type(UpdateType::Major, FilterKind::Everything);
        self.sync(doc, model)?;
        self.new_event_button.disable(doc);

        if self.events.is_empty() {
            // The placeholder-only board has no list to mount the form into.
            self.remove_no_events(doc);
            self.render_event_list(doc)?;
        }

        let draft = model.get_default_event();
        let presenter = self.create_event_presenter(doc, model, &draft, FormMode::Create)?;
        info!("Creating event {}", draft.id);
        self.new_event_presenter = Some(presenter);
        Ok(())
    }

    fn on_sort_change(&mut self, doc: &mut Dom, model: &TripModel, kind: &str) -> Result<(), ViewError> {
        let Ok(kind) = kind.parse::<SortKind>() else {
            warn!("Ignoring unknown sort '{}'", kind);
            return Ok(());
        };
        if kind == self.active_sort {
            return Ok(());
        }
        self.active_sort = kind;
        self.update_event_list(doc, model)
    }

    fn update_event_list(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        self.destroy_event_presenters(doc);
        self.render_events(doc, model)
    }

    fn update_board(&mut self, doc: &mut Dom, model: &TripModel) -> Result<(), ViewError> {
        self.destroy_board(doc);
        self.render_board(doc, model)
    }

    fn destroy_event_presenters(&mut self, doc: &mut Dom) {
        self.destroy_new_event_presenter(doc);
        for presenter in self.presenters.values_mut() {
            presenter.destroy(doc);
        }
        self.presenters.clear();
        self.active_event_id = None;
    }

    fn destroy_board(&mut self, doc: &mut Dom) {
        if let Some(mut sort) = self.sort.take() {
            view::remove(doc, &mut sort);
        }
        if let Some(mut list) = self.event_list.take() {
            view::remove(doc, &mut list);
        }
        self.remove_no_events(doc);
        self.destroy_event_presenters(doc);
    }

    fn remove_no_events(&mut self, doc: &mut Dom) {
        if let Some(mut placeholder) = self.no_events.take() {
            view::remove(doc, &mut placeholder);
        }
    }

    fn destroy_new_event_presenter(&mut self, doc: &mut Dom) {
        if let Some(mut presenter) = self.new_event_presenter.take() {
            self.new_event_button.enable(doc);
            presenter.destroy(doc);
        }
    }

    /// Closes whatever is open, then opens `event_id` unless it was the one
    /// just closed.
    fn toggle_event_mode(&mut self, doc: &mut Dom, event_id: Option<EventId>) -> Result<(), ViewError> {
        self.destroy_new_event_presenter(doc);

        let previous = self.active_event_id.take();
        if let Some(presenter) = previous.as_ref().and_then(|id| self.presenters.get_mut(id)) {
            presenter.toggle_view(doc, EventMode::Default)?;
        }

        let Some(event_id) = event_id else {
            return Ok(());
        };
        if previous.as_ref() == Some(&event_id) {
            return Ok(());
        }
        match self.presenters.get_mut(&event_id) {
            Some(presenter) => {
                presenter.toggle_view(doc, EventMode::Form)?;
                self.active_event_id = Some(event_id);
            }
            None => warn!("No presenter for event {}", event_id),
        }
        Ok(())
    }

    fn presenter_mut(&mut self, event_id: &EventId) -> Option<&mut EventPresenter> {
        let is_draft = self
            .new_event_presenter
            .as_ref()
            .and_then(EventPresenter::event)
            .is_some_and(|event| &event.id == event_id);
        if is_draft {
            self.new_event_presenter.as_mut()
        } else {
            self.presenters.get_mut(event_id)
        }
    }

    pub fn active_event_id(&self) -> Option<&EventId> {
        self.active_event_id.as_ref()
    }

    pub fn active_sort(&self) -> SortKind {
        self.active_sort
    }

    pub fn is_creating(&self) -> bool {
        self.new_event_presenter.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn presenter(&self, event_id: &EventId) -> Option<&EventPresenter> {
        self.presenters.get(event_id)
    }

    pub fn new_event_presenter(&self) -> Option<&EventPresenter> {
        self.new_event_presenter.as_ref()
    }

    pub fn new_event_button(&self) -> &NewEventButtonView {
        &self.new_event_button
    }

    pub fn event_list(&self) -> Option<&EventListView> {
        self.event_list.as_ref()
    }

    pub fn sort_view(&self) -> Option<&SortView> {
        self.sort.as_ref()
    }

    /// Message of the placeholder, when that is what the board shows.
    pub fn placeholder_message(&self) -> Option<&str> {
        self.no_events.as_ref().map(NoEventsView::message)
    }
}
