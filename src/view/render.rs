//! Render adapter: the only place views get attached to or detached from
//! the document.

use crate::dom::{NodeId, RenderPosition};
use crate::error::ViewError;

use super::{Dom, View};

pub fn render(doc: &mut Dom, container: NodeId, component: &mut dyn View, position: RenderPosition) {
    let node = component.element(doc);
    doc.insert(container, node, position);
}

/// Swaps `new` into the exact place `old` occupies.
pub fn replace(doc: &mut Dom, old: &mut dyn View, new: &mut dyn View) -> Result<(), ViewError> {
    let old_node = old.existing_element().ok_or(ViewError::NotMounted)?;
    let new_node = new.element(doc);
    doc.replace_child(old_node, new_node)
}

/// Destroys the component's node and disposes its listeners.
pub fn remove(doc: &mut Dom, component: &mut dyn View) {
    if let Some(node) = component.existing_element() {
        doc.destroy(node);
    }
    component.remove_element();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NoEventsView;

    #[test]
    fn test_replace_and_remove() {
        let mut doc = Dom::new();
        let body = doc.body();
        let mut first = NoEventsView::new("first");
        let mut second = NoEventsView::new("second");

        render(&mut doc, body, &mut first, RenderPosition::BeforeEnd);
        let first_node = first.existing_element().unwrap();
        replace(&mut doc, &mut first, &mut second).unwrap();

        let second_node = second.existing_element().unwrap();
        assert_eq!(doc.children(body), &[second_node]);
        assert_eq!(doc.text_content(body), "second");
        assert!(doc.parent(first_node).is_none());

        remove(&mut doc, &mut second);
        assert!(doc.children(body).is_empty());
        assert!(second.existing_element().is_none());
    }

    #[test]
    fn test_replace_unmounted_fails() {
        let mut doc = Dom::new();
        let mut first = NoEventsView::new("first");
        let mut second = NoEventsView::new("second");

        assert_eq!(replace(&mut doc, &mut first, &mut second), Err(ViewError::NotMounted));
    }
}
