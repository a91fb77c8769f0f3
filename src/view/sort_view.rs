use crate::dom::{el, EventKind, ListenerOptions, Markup};
use crate::error::ViewError;
use crate::messages::Message;
use crate::models::{SortItem, SortKind};

use super::{Dom, Target, View, ViewBase};

pub const SORT_INPUT: &str = "input.trip-sort__input";

/// Sort bar. Rebuilt whenever the active sort changes.
pub struct SortView {
    base: ViewBase,
    items: Vec<SortItem>,
    active: SortKind,
}

impl SortView {
    pub fn new(items: Vec<SortItem>, active: SortKind) -> Self {
        Self {
            base: ViewBase::default(),
            items,
            active,
        }
    }

    pub fn active(&self) -> SortKind {
        self.active
    }

    pub fn set_sort_type_change_handler(&mut self, doc: &mut Dom) -> Result<&mut Self, ViewError> {
        self.create_event_listener(
            doc,
            Target::Root,
            EventKind::Click,
            |doc, event| {
                if !doc.matches(event.target, SORT_INPUT) {
                    return None;
                }
                doc.data(event.target, "sort-type")
                    .map(|kind| Message::SortRequested(kind.to_string()))
            },
            ListenerOptions::default(),
        )?;
        Ok(self)
    }

    fn item_template(&self, item: &SortItem) -> Markup {
        let kind = item.kind.as_str();
        let id = format!("sort-{}", kind);
        el("div")
            .class(&format!("trip-sort__item trip-sort__item--{}", kind))
            .child(
                el("input")
                    .class("trip-sort__input visually-hidden")
                    .attr("id", id.as_str())
                    .attr("type", "radio")
                    .attr("name", "trip-sort")
                    .value(id.as_str())
                    .data("sort-type", kind)
                    .checked(item.kind == self.active)
                    .disabled(item.is_disabled),
            )
            .child(
                el("label")
                    .class("trip-sort__btn")
                    .attr("for", id.as_str())
                    .text(crate::utils::capitalize(kind)),
            )
    }
}

impl View for SortView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn template(&self) -> Markup {
        el("form")
            .class("trip-events__trip-sort trip-sort")
            .attr("action", "#")
            .attr("method", "get")
            .children(self.items.iter().map(|item| self.item_template(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<SortItem> {
        SortKind::ALL
            .iter()
            .map(|kind| SortItem {
                kind: *kind,
                is_disabled: matches!(kind, SortKind::Event | SortKind::Offers),
            })
            .collect()
    }

    fn input(doc: &Dom, root: crate::dom::NodeId, kind: &str) -> crate::dom::NodeId {
        doc.query_selector_all(root, SORT_INPUT)
            .into_iter()
            .find(|node| doc.data(*node, "sort-type") == Some(kind))
            .unwrap()
    }

    #[test]
    fn test_active_item_is_checked() {
        let mut doc = Dom::new();
        let mut view = SortView::new(items(), SortKind::Price);
        let root = view.element(&mut doc);

        assert!(doc.is_checked(input(&doc, root, "price")));
        assert!(!doc.is_checked(input(&doc, root, "day")));
        assert!(doc.is_disabled(input(&doc, root, "offers")));
    }

    #[test]
    fn test_click_reports_sort_key() {
        let mut doc = Dom::new();
        let mut view = SortView::new(items(), SortKind::Day);
        view.set_sort_type_change_handler(&mut doc).unwrap();
        let root = view.element(&mut doc);

        let time = input(&doc, root, "time");
        assert_eq!(
            doc.click(time).messages,
            vec![Message::SortRequested("time".to_string())]
        );

        let label = doc.query_selector(root, ".trip-sort__btn").unwrap();
        assert!(doc.click(label).messages.is_empty());

        let disabled = input(&doc, root, "event");
        assert!(doc.click(disabled).messages.is_empty());
    }
}
