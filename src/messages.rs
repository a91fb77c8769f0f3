use crate::models::{EventId, EventType};

/// Messages the views emit from document events.
///
/// Handlers registered by views translate raw document events into these;
/// the board presenter is the only consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ===== Board chrome =====
    /// "New event" button pressed
    NewEventRequested,
    /// Sort bar input clicked; carries the raw sort key
    SortRequested(String),
    /// Roll-up button clicked on a row or form (`None` closes whatever is open)
    EventToggled(Option<EventId>),
    /// Escape pressed anywhere in the document
    EscapePressed,

    // ===== Row / form actions =====
    /// Favorite star clicked on a row
    FavoriteToggled(EventId),
    /// Form submitted
    FormSubmitted(EventId),
    /// Another event type picked in a form
    EventTypeChanged(EventId, EventType),
    /// Destination field edited in a form
    DestinationEdited(EventId),
    /// Form reset button clicked (delete in edit mode, cancel in create mode)
    FormDismissed(EventId),
    /// A rejected form finished shaking
    FormSettled(EventId),
}
