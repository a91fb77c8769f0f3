use std::rc::Rc;

use tokio_util::sync::CancellationToken;

use super::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Keydown,
    Input,
}

/// Event as seen by a handler while it bubbles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub once: bool,
}

impl ListenerOptions {
    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
            ..Self::default()
        }
    }
}

/// Handlers translate a document event into an application message.
pub type Handler<M> = Rc<dyn Fn(&Document<M>, &DomEvent) -> Option<M>>;

pub(crate) struct Listener<M> {
    pub id: u64,
    pub node: NodeId,
    pub kind: EventKind,
    pub handler: Handler<M>,
    pub options: ListenerOptions,
    pub token: CancellationToken,
}

/// Outcome of dispatching one event.
#[derive(Debug)]
pub struct Dispatched<M> {
    pub messages: Vec<M>,
    pub default_prevented: bool,
}

impl<M> Default for Dispatched<M> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            default_prevented: false,
        }
    }
}

impl<M> Dispatched<M> {
    pub(crate) fn merge(&mut self, other: Dispatched<M>) {
        self.messages.extend(other.messages);
        self.default_prevented |= other.default_prevented;
    }
}

pub(crate) struct Timer<M> {
    pub due: std::time::Duration,
    pub node: NodeId,
    pub class: String,
    pub message: Option<M>,
}
