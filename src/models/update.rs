use super::event::TripEvent;

/// How much of the board a model change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    /// A single field of one event changed (favorite toggle).
    Patch,
    /// Contents changed but membership did not (edit save).
    Minor,
    /// Membership changed (create/delete).
    Major,
    /// The active filter changed.
    Filter,
    /// Initial data finished loading.
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    UpdateEvent,
    CreateEvent,
    DeleteEvent,
    CancelEvent,
}

/// What a view asked for, before anything touches the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAction {
    pub action: UserAction,
    pub update: UpdateType,
    pub event: TripEvent,
}

impl ViewAction {
    pub fn new(action: UserAction, update: UpdateType, event: TripEvent) -> Self {
        Self { action, update, event }
    }
}
