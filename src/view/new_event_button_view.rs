use crate::dom::{el, EventKind, ListenerOptions, Markup};
use crate::error::ViewError;
use crate::messages::Message;

use super::{Dom, Target, View, ViewBase};

/// Trigger for the creation form. Starts disabled until data is loaded.
#[derive(Default)]
pub struct NewEventButtonView {
    base: ViewBase,
}

impl NewEventButtonView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_click_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        self.create_event_listener(
            doc,
            Target::Root,
            EventKind::Click,
            |_, _| Some(Message::NewEventRequested),
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    pub fn disable(&mut self, doc: &mut Dom) {
        let node = self.element(doc);
        doc.set_disabled(node, true);
    }

    pub fn enable(&mut self, doc: &mut Dom) {
        let node = self.element(doc);
        doc.set_disabled(node, false);
    }

    pub fn is_disabled(&self, doc: &Dom) -> bool {
        self.existing_element()
            .is_some_and(|node| doc.is_disabled(node))
    }
}

impl View for NewEventButtonView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        el("button")
            .class("trip-main__event-add-btn  btn  btn--big  btn--yellow")
            .attr("type", "button")
            .disabled(true)
            .text("New event")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::RenderPosition;
    use crate::view::render;

    #[test]
    fn test_clicks_only_count_when_enabled() {
        let mut doc = Dom::new();
        let body = doc.body();
        let mut button = NewEventButtonView::new();
        button.set_on_click_handler(&mut doc).unwrap();
        render(&mut doc, body, &mut button, RenderPosition::BeforeEnd);
        let node = button.existing_element().unwrap();

        assert!(button.is_disabled(&doc));
        assert!(doc.click(node).messages.is_empty());

        button.enable(&mut doc);
        assert_eq!(doc.click(node).messages, vec![Message::NewEventRequested]);
    }
}
