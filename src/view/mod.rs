//! Views: one lazily materialized root node each, plus the listeners
//! registered against it.

use std::rc::Rc;
use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::dom::{Document, DomEvent, EventKind, ListenerOptions, Markup, NodeId};
use crate::error::ViewError;
use crate::messages::Message;

pub mod event_list_view;
pub mod event_view;
pub mod form_view;
pub mod new_event_button_view;
pub mod no_events_view;
pub mod render;
pub mod sort_view;

pub use event_list_view::EventListView;
pub use event_view::EventView;
pub use form_view::FormView;
pub use new_event_button_view::NewEventButtonView;
pub use no_events_view::NoEventsView;
pub use render::{remove, render, replace};
pub use sort_view::SortView;

/// The document every view renders into.
pub type Dom = Document<Message>;

/// Class that plays the "head shake" effect.
pub const SHAKE_CLASS_NAME: &str = "shake";

/// How long the shake class stays on the element.
pub const SHAKE_ANIMATION_TIMEOUT: Duration = Duration::from_millis(600);

/// Where a listener attaches.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// The view's own root element.
    Root,
    /// First descendant of the root matching the selector.
    Selector(&'a str),
    /// Any live element, e.g. the document body.
    Node(NodeId),
}

/// Disposable handle over every listener a view registered during one
/// element lifetime.
#[derive(Debug, Default)]
pub struct ListenerScope {
    token: CancellationToken,
    registrations: usize,
}

impl ListenerScope {
    fn register(&mut self) -> CancellationToken {
        self.registrations += 1;
        self.token.clone()
    }

    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// Cancels all registrations at once.
    pub fn dispose(self) {
        self.token.cancel();
    }
}

#[derive(Debug, Default)]
pub struct ViewBase {
    element: Option<NodeId>,
    scope: Option<ListenerScope>,
}

impl ViewBase {
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn attach(&mut self, node: NodeId) {
        self.element = Some(node);
        self.scope.get_or_insert_with(ListenerScope::default);
    }

    fn listener_token(&mut self) -> CancellationToken {
        self.scope
            .get_or_insert_with(ListenerScope::default)
            .register()
    }

    pub fn registrations(&self) -> usize {
        self.scope.as_ref().map_or(0, ListenerScope::registrations)
    }

    /// Cancels the current listener scope and forgets the root node.
    pub fn release(&mut self) {
        if let Some(scope) = self.scope.take() {
            scope.dispose();
        }
        self.element = None;
    }
}

pub trait View {
    fn base(&self) -> &ViewBase;

    fn base_mut(&mut self) -> &mut ViewBase;

    /// Markup the root element is built from.
    fn template(&self) -> Markup;

    /// Root element, built on first access.
    fn element(&mut self, doc: &mut Dom) -> NodeId {
        if let Some(node) = self.base().element() {
            if doc.is_alive(node) {
                return node;
            }
        }
        let node = doc.create(&self.template());
        self.base_mut().attach(node);
        node
    }

    fn existing_element(&self) -> Option<NodeId> {
        self.base().element()
    }

    fn is_mounted_in(&self, doc: &Dom, container: NodeId) -> bool {
        self.existing_element()
            .is_some_and(|node| node != container && doc.contains(container, node))
    }

    fn create_event_listener<F>(
        &mut self,
        doc: &mut Dom,
        target: Target<'_>,
        kind: EventKind,
        handler: F,
        options: ListenerOptions,
    ) -> Result<(), ViewError>
    where
        Self: Sized,
        F: Fn(&Dom, &DomEvent) -> Option<Message> + 'static,
    {
        let root = self.element(doc);
        let node = match target {
            Target::Root => root,
            Target::Node(node) if doc.is_element(node) => node,
            Target::Node(node) => return Err(ViewError::InvalidTarget(format!("{:?}", node))),
            Target::Selector(selector) => doc
                .query_selector(root, selector)
                .ok_or_else(|| ViewError::InvalidTarget(selector.to_string()))?,
        };
        let token = self.base_mut().listener_token();
        doc.add_listener(node, kind, Rc::new(handler), options, token);
        Ok(())
    }

    /// Drops every listener and the root node; the next access rebuilds.
    fn remove_element(&mut self) {
        self.base_mut().release();
    }

    /// Marks the element invalid for a moment. `callback` is delivered once
    /// the effect is over.
    fn shake(&mut self, doc: &mut Dom, callback: Option<Message>) {
        let node = self.element(doc);
        doc.add_class(node, SHAKE_CLASS_NAME);
        doc.schedule_class_removal(node, SHAKE_CLASS_NAME, SHAKE_ANIMATION_TIMEOUT, callback);
        debug!("shaking {:?}", node);
    }
}
