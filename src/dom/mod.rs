//! In-memory element tree the views render into.
//!
//! The document plays the part a browser DOM plays for a web client: element
//! and text nodes, simple selector queries, bubbling event dispatch with
//! listener options, and a timer queue driven by the caller's clock. Nodes
//! live in a generational arena: freed slots are reused, and an id held by a
//! disposed view can only ever point at a dead node.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use generational_arena::{Arena, Index};
use log::trace;
use tokio_util::sync::CancellationToken;

use crate::error::ViewError;

pub mod events;
pub mod markup;
pub mod selector;

pub use events::{Dispatched, DomEvent, EventKind, Handler, ListenerOptions};
pub use markup::{el, Markup, MarkupChild};
pub use selector::Selector;

use events::{Listener, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    /// Append as the last child.
    BeforeEnd,
    /// Insert as the first child.
    AfterBegin,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub dataset: BTreeMap<String, String>,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

pub struct Document<M> {
    nodes: Arena<Node>,
    body: NodeId,
    listeners: Vec<Listener<M>>,
    next_listener: u64,
    timers: Vec<Timer<M>>,
    clock: Duration,
}

impl<M> Default for Document<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Document<M> {
    pub fn new() -> Self {
        let body = Node {
            kind: NodeKind::Element(ElementData {
                tag: "body".to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        let mut nodes = Arena::new();
        let body = NodeId(nodes.insert(body));
        Self {
            nodes,
            body,
            listeners: Vec::new(),
            next_listener: 0,
            timers: Vec::new(),
            clock: Duration::ZERO,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // --- Node access ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Live nodes, body included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Slots the arena has allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node(id).map(|node| &node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    // --- Tree construction ---

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        NodeId(self.nodes.insert(Node {
            kind,
            parent: None,
            children: Vec::new(),
        }))
    }

    /// Builds a detached subtree from markup and returns its root.
    pub fn create(&mut self, markup: &Markup) -> NodeId {
        let element = ElementData {
            tag: markup.tag.to_ascii_lowercase(),
            classes: markup.classes.clone(),
            attrs: markup.attrs.iter().cloned().collect(),
            dataset: markup.dataset.iter().cloned().collect(),
            value: markup.value.clone().unwrap_or_default(),
            checked: markup.checked,
            disabled: markup.disabled,
        };
        let root = self.alloc(NodeKind::Element(element));
        for child in &markup.children {
            let child_id = match child {
                MarkupChild::Element(child) => self.create(child),
                MarkupChild::Text(text) => self.alloc(NodeKind::Text(text.clone())),
            };
            self.insert(root, child_id, RenderPosition::BeforeEnd);
        }
        root
    }

    pub fn insert(&mut self, container: NodeId, node: NodeId, position: RenderPosition) {
        if !self.is_alive(container) || !self.is_alive(node) || self.contains(node, container) {
            return;
        }
        self.detach(node);
        if let Some(parent) = self.node_mut(container) {
            match position {
                RenderPosition::BeforeEnd => parent.children.push(node),
                RenderPosition::AfterBegin => parent.children.insert(0, node),
            }
        }
        if let Some(child) = self.node_mut(node) {
            child.parent = Some(container);
        }
    }

    /// Puts `new` exactly where `old` is and detaches `old`.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> Result<(), ViewError> {
        let parent = self.parent(old).ok_or(ViewError::NotMounted)?;
        if !self.is_alive(new) {
            return Err(ViewError::NotMounted);
        }
        if old == new {
            return Ok(());
        }
        self.detach(new);
        if let Some(parent_node) = self.node_mut(parent) {
            if let Some(slot) = parent_node.children.iter_mut().find(|child| **child == old) {
                *slot = new;
            }
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
        }
        Ok(())
    }

    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|child| *child != node);
        }
        if let Some(node) = self.node_mut(node) {
            node.parent = None;
        }
    }

    /// Detaches and frees a subtree. Dead ids are ignored.
    pub fn destroy(&mut self, node: NodeId) {
        if !self.is_alive(node) || node == self.body {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(id.0) {
                stack.extend(removed.children);
            }
        }
        trace!("destroyed subtree rooted at {:?}", node);
    }

    // --- Queries ---

    /// Inclusive: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// The node followed by its ancestors up to the detached root or body.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = if self.is_alive(node) { Some(node) } else { None };
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }
        path
    }

    /// Descendants in document order, root excluded.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            found.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    pub fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.descendants(root)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|element| selector.matches(element)))
    }

    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|element| selector.matches(element)))
            .collect()
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        match (Selector::parse(selector), self.element(node)) {
            (Some(selector), Some(element)) => selector.matches(element),
            _ => false,
        }
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.ancestors(node)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|element| selector.matches(element)))
    }

    // --- Element state ---

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.classes.iter().any(|own| own == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.classes.iter().any(|own| own == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|own| own != class);
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.dataset.get(key))
            .map(String::as_str)
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.value.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.into();
        }
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.checked)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(node) {
            element.checked = checked;
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.disabled)
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node) {
            element.disabled = disabled;
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        if let Some(NodeKind::Text(own)) = self.kind(node) {
            text.push_str(own);
        }
        for id in self.descendants(node) {
            if let Some(NodeKind::Text(part)) = self.kind(id) {
                text.push_str(part);
            }
        }
        text
    }

    /// Replaces the children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if !self.is_element(node) {
            return;
        }
        for child in self.children(node).to_vec() {
            self.destroy(child);
        }
        let text = self.alloc(NodeKind::Text(text.into()));
        self.insert(node, text, RenderPosition::BeforeEnd);
    }

    fn root_of(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().copied().unwrap_or(self.body)
    }

    // --- Listeners ---

    pub fn add_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: Handler<M>,
        options: ListenerOptions,
        token: CancellationToken,
    ) {
        self.next_listener += 1;
        self.listeners.push(Listener {
            id: self.next_listener,
            node,
            kind,
            handler,
            options,
            token,
        });
    }

    /// Listeners that can still fire.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|listener| !listener.token.is_cancelled() && self.is_alive(listener.node))
            .count()
    }

    fn prune_listeners(&mut self) {
        let nodes = &self.nodes;
        self.listeners.retain(|listener| {
            !listener.token.is_cancelled()
                && nodes.contains(listener.node.0)
        });
    }

    /// Bubbles an event from `target` up through its ancestors.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind, key: Option<&str>) -> Dispatched<M> {
        let mut outcome = Dispatched::default();
        if !self.is_alive(target) {
            return outcome;
        }
        self.prune_listeners();

        for node in self.ancestors(target) {
            let matching: Vec<(u64, Handler<M>, ListenerOptions)> = self
                .listeners
                .iter()
                .filter(|listener| listener.node == node && listener.kind == kind)
                .map(|listener| (listener.id, Rc::clone(&listener.handler), listener.options))
                .collect();
            if matching.is_empty() {
                continue;
            }

            let event = DomEvent {
                kind,
                target,
                current_target: node,
                key: key.map(str::to_string),
            };
            let mut stopped = false;
            for (id, handler, options) in matching {
                outcome.default_prevented |= options.prevent_default;
                stopped |= options.stop_propagation;
                if let Some(message) = handler(&*self, &event) {
                    outcome.messages.push(message);
                }
                if options.once {
                    self.listeners.retain(|listener| listener.id != id);
                }
            }
            if stopped {
                break;
            }
        }
        outcome
    }

    /// Click with the browser's default actions: checkbox/radio state
    /// changes and form submission from submit buttons.
    pub fn click(&mut self, node: NodeId) -> Dispatched<M> {
        let Some(element) = self.element(node) else {
            return Dispatched::default();
        };
        if element.disabled {
            return Dispatched::default();
        }
        let tag = element.tag.clone();
        let input_type = element.attrs.get("type").cloned();
        let was_checked = element.checked;

        let is_checkbox = tag == "input" && input_type.as_deref() == Some("checkbox");
        let is_radio = tag == "input" && input_type.as_deref() == Some("radio");
        if is_checkbox {
            self.set_checked(node, !was_checked);
        } else if is_radio {
            self.check_radio(node);
        }

        let mut outcome = self.dispatch(node, EventKind::Click, None);
        if outcome.default_prevented {
            if is_checkbox {
                self.set_checked(node, was_checked);
            }
            return outcome;
        }

        if tag == "button" && input_type.as_deref() == Some("submit") {
            if let Some(form) = self.closest(node, "form") {
                let submitted = self.dispatch(form, EventKind::Submit, None);
                outcome.merge(submitted);
            }
        }
        outcome
    }

    fn check_radio(&mut self, node: NodeId) {
        if let Some(name) = self.attr(node, "name").map(str::to_string) {
            let scope = self
                .closest(node, "form")
                .unwrap_or_else(|| self.root_of(node));
            for other in self.query_selector_all(scope, "input") {
                if self.attr(other, "type") == Some("radio") && self.attr(other, "name") == Some(name.as_str()) {
                    self.set_checked(other, false);
                }
            }
        }
        self.set_checked(node, true);
    }

    // --- Timers ---

    pub fn schedule_class_removal(&mut self, node: NodeId, class: &str, delay: Duration, message: Option<M>) {
        self.timers.push(Timer {
            due: self.clock + delay,
            node,
            class: class.to_string(),
            message,
        });
    }

    /// Moves the clock forward and fires every timer that became due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<M> {
        self.clock += elapsed;
        let clock = self.clock;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= clock);
        self.timers = pending;
        due.sort_by_key(|timer| timer.due);

        let mut messages = Vec::new();
        for timer in due {
            self.remove_class(timer.node, &timer.class);
            if let Some(message) = timer.message {
                messages.push(message);
            }
        }
        messages
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
