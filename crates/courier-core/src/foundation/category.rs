//! Category roots: [`Command`] and [`Event`].
//!
//! Both carry only the message identifier today. Fields shared by every
//! command (or every event) belong here; concrete messages reach them
//! through `Deref`.

use crate::foundation::message::MessageId;

/// Root of every command, a request for action.
///
/// A bare `Command` is itself a routable message, but it only matches a rule
/// registered for `Command` specifically, never one registered for a
/// concrete command type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, crate::Message)]
#[root_message(kind = "command")]
pub struct Command {
    #[message(id)]
    message_id: MessageId,
}

impl Command {
    /// Creates a command root with a fresh identifier.
    pub fn new() -> Self {
        Self::with_id(MessageId::new())
    }

    /// Creates a command root with the given identifier.
    pub fn with_id(message_id: MessageId) -> Self {
        Self { message_id }
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}

/// Root of every event, a fact that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, crate::Message)]
#[root_message(kind = "event")]
pub struct Event {
    #[message(id)]
    message_id: MessageId,
}

impl Event {
    /// Creates an event root with a fresh identifier.
    pub fn new() -> Self {
        Self::with_id(MessageId::new())
    }

    /// Creates an event root with the given identifier.
    pub fn with_id(message_id: MessageId) -> Self {
        Self { message_id }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}
