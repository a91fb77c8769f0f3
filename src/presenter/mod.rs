//! Presenters: the event presenter swaps one event's row and form, the
//! board presenter owns all of them plus the sort/filter chrome.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::models::ViewAction;

pub mod board_presenter;
pub mod event_presenter;

pub use board_presenter::BoardPresenter;
pub use event_presenter::EventPresenter;

/// Which of an event presenter's two views is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMode {
    Default,
    Form,
}

/// Receives the actions a presenter asks for. Presenters never touch the
/// model themselves.
#[cfg_attr(test, mockall::automock)]
pub trait ViewActionHandler {
    fn handle(&mut self, action: ViewAction);
}

/// Shared FIFO of requested actions, drained by the board once the
/// presenter that queued them has returned.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue(Rc<RefCell<VecDeque<ViewAction>>>);

impl ActionQueue {
    pub fn pop(&self) -> Option<ViewAction> {
        self.0.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl ViewActionHandler for ActionQueue {
    fn handle(&mut self, action: ViewAction) {
        self.0.borrow_mut().push_back(action);
    }
}
