use crate::dom::{el, Markup};

use super::{View, ViewBase};

/// Placeholder paragraph shown instead of the list.
pub struct NoEventsView {
    base: ViewBase,
    message: String,
}

impl NoEventsView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            base: ViewBase::default(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl View for NoEventsView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        el("p").class("trip-events__msg").text(self.message.as_str())
    }
}
