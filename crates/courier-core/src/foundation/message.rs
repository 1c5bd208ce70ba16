//! Message system for the Courier toolkit.
//!
//! This module provides the core message infrastructure:
//!
//! - [`Message`] - Base trait for all routable messages
//! - [`MessageKind`] - Category classification (command or event)
//! - [`MessageId`] - Unique identity carried by every message
//!
//! # Parent-in-Child Messages
//!
//! Concrete messages embed their category root as a parent field and deref to
//! it, so shared fields are reachable from every message in the category:
//!
//! ```rust,ignore
//! use courier_core::{Command, Message};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Message)]
//! struct CreateUser {
//!     #[message(parent)]
//!     command: Command,
//!     name: String,
//! }
//!
//! let msg = CreateUser { command: Command::new(), name: "Mark".into() };
//! println!("{} {}", msg.message_id(), msg.name);
//! ```

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

// ============================================================================
// Message Identity
// ============================================================================

/// A 128-bit universally unique message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MessageId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ============================================================================
// Message Classification
// ============================================================================

/// Classification of messages.
///
/// The kind groups messages for documentation and logging. It never takes
/// part in routing: a rule matches one exact message type only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A request for action.
    Command,
    /// A fact that occurred.
    Event,
}

impl MessageKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Event => "event",
        }
    }
}

impl FromStr for MessageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "event" => Ok(Self::Event),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Core Message Trait
// ============================================================================

/// The base trait for all messages.
///
/// Messages are immutable values. They are passed to routers as
/// `&dyn Message` and downcast back to their concrete type through
/// [`as_any`](Message::as_any).
///
/// # Derive Macro
///
/// Use `#[derive(Message)]` rather than implementing this by hand:
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Message)]
/// #[root_message(kind = "command")]
/// pub struct Command {
///     #[message(id)]
///     message_id: MessageId,
/// }
/// ```
pub trait Message: Any + fmt::Debug + Send + Sync + 'static {
    /// Returns the unique identifier of this message.
    fn message_id(&self) -> MessageId;

    /// Returns the category this message belongs to.
    fn kind(&self) -> MessageKind;

    /// Returns the human-readable name of this message type.
    fn message_name(&self) -> &'static str;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Message {
    /// Returns `true` if the message's exact runtime type is `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Attempts to downcast to the concrete message type `T`.
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    #[test]
    fn id_round_trips_through_display() {
        let id = MessageId::new();
        let parsed: MessageId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("Command".parse::<MessageKind>(), Ok(MessageKind::Command));
        assert_eq!("event".parse::<MessageKind>(), Ok(MessageKind::Event));
        assert!("notice".parse::<MessageKind>().is_err());
    }
}
