use crate::dom::{el, EventKind, ListenerOptions, Markup};
use crate::error::ViewError;
use crate::messages::Message;
use crate::models::EventId;

use super::{Dom, Target, View, ViewBase};

pub const ROLL_UP_BUTTON: &str = ".event__rollup-btn";
pub const EVENT_ITEM: &str = ".event";
pub const ESCAPE_KEY: &str = "Escape";

/// The `<ul>` every event row is rendered into.
#[derive(Default)]
pub struct EventListView {
    base: ViewBase,
}

impl EventListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegated roll-up clicks: resolves the clicked row back to its event id.
    pub fn set_event_toggle_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        self.create_event_listener(
            doc,
            Target::Root,
            EventKind::Click,
            |doc, event| {
                if !doc.matches(event.target, ROLL_UP_BUTTON) {
                    return None;
                }
                let event_id = doc
                    .closest(event.target, EVENT_ITEM)
                    .and_then(|item| doc.data(item, "event-id"))
                    .map(EventId::from);
                Some(Message::EventToggled(event_id))
            },
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    /// Escape anywhere in the document, for as long as this list lives.
    pub fn set_esc_keydown_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        let body = doc.body();
        self.create_event_listener(
            doc,
            Target::Node(body),
            EventKind::Keydown,
            |_, event| (event.key.as_deref() == Some(ESCAPE_KEY)).then_some(Message::EscapePressed),
            ListenerOptions::default(),
        )?;
        Ok(self)
    }
}

impl View for EventListView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        el("ul").class("trip-events__list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::RenderPosition;
    use crate::view::render;

    fn mounted_list(doc: &mut Dom) -> EventListView {
        let body = doc.body();
        let mut list = EventListView::new();
        list.set_event_toggle_handler(doc).unwrap();
        list.set_esc_keydown_handler(doc).unwrap();
        render(doc, body, &mut list, RenderPosition::BeforeEnd);
        list
    }

    #[test]
    fn test_rollup_click_resolves_event_id() {
        let mut doc = Dom::new();
        let mut list = mounted_list(&mut doc);
        let node = list.element(&mut doc);
        let row = doc.create(
            &el("li").child(
                el("div")
                    .class("event")
                    .data("event-id", "e-7")
                    .child(el("button").class("event__rollup-btn"))
                    .child(el("button").class("event__favorite-btn")),
            ),
        );
        doc.insert(node, row, RenderPosition::BeforeEnd);
        let rollup = doc.query_selector(row, ".event__rollup-btn").unwrap();
        let favorite = doc.query_selector(row, ".event__favorite-btn").unwrap();

        assert_eq!(
            doc.click(rollup).messages,
            vec![Message::EventToggled(Some(EventId::from("e-7")))]
        );
        assert!(doc.click(favorite).messages.is_empty());
    }

    #[test]
    fn test_escape_only() {
        let mut doc = Dom::new();
        let _list = mounted_list(&mut doc);
        let body = doc.body();

        assert_eq!(
            doc.dispatch(body, EventKind::Keydown, Some("Escape")).messages,
            vec![Message::EscapePressed]
        );
        assert!(doc.dispatch(body, EventKind::Keydown, Some("Enter")).messages.is_empty());
    }
}
