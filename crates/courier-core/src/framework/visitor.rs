//! Visitor-style double dispatch.
//!
//! Here no table is involved: each message type knows which method of a
//! multi-method visitor serves it. The application defines the visitor trait
//! with one method per message, and each message implements [`Visit`] for
//! it:
//!
//! ```rust,ignore
//! trait UserVisitor {
//!     fn create_user(&self, message: &CreateUser) -> HandlerResult;
//!     fn user_added(&self, message: &UserAdded) -> HandlerResult;
//! }
//!
//! impl Visit<dyn UserVisitor> for CreateUser {
//!     fn accept(&self, visitor: &dyn UserVisitor) -> HandlerResult {
//!         visitor.create_user(self)
//!     }
//! }
//! ```
//!
//! Adding a message means adding a method to the visitor, so every visitor
//! implementation is forced to handle it.

use tracing::trace;

use crate::error::HandlerResult;
use crate::foundation::Message;

/// A message that dispatches itself to the matching method of visitor `V`.
pub trait Visit<V: ?Sized>: Message {
    /// Calls the method of `visitor` that serves this message type.
    fn accept(&self, visitor: &V) -> HandlerResult;
}

/// Dispatches each message to `visitor`, in order.
///
/// Stops at the first error, leaving the remaining messages unvisited.
pub fn accept_all<'a, V, I>(messages: I, visitor: &V) -> HandlerResult
where
    V: ?Sized + 'static,
    I: IntoIterator<Item = &'a dyn Visit<V>>,
{
    for message in messages {
        trace!(
            message_type = message.message_name(),
            message_id = %message.message_id(),
            "Visiting message"
        );
        message.accept(visitor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::foundation::{Command, Event};
    use parking_lot::Mutex;

    trait RootVisitor {
        fn command(&self, message: &Command) -> HandlerResult;
        fn event(&self, message: &Event) -> HandlerResult;
    }

    impl Visit<dyn RootVisitor> for Command {
        fn accept(&self, visitor: &dyn RootVisitor) -> HandlerResult {
            visitor.command(self)
        }
    }

    impl Visit<dyn RootVisitor> for Event {
        fn accept(&self, visitor: &dyn RootVisitor) -> HandlerResult {
            visitor.event(self)
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
        fail_on_event: bool,
    }

    impl RootVisitor for Recorder {
        fn command(&self, _message: &Command) -> HandlerResult {
            self.seen.lock().push("command");
            Ok(())
        }

        fn event(&self, _message: &Event) -> HandlerResult {
            self.seen.lock().push("event");
            if self.fail_on_event {
                return Err(HandlerError::failed("event rejected"));
            }
            Ok(())
        }
    }

    #[test]
    fn message_picks_visitor_method() {
        let recorder = Recorder::default();
        Visit::<dyn RootVisitor>::accept(&Event::new(), &recorder).unwrap();
        Visit::<dyn RootVisitor>::accept(&Command::new(), &recorder).unwrap();
        assert_eq!(*recorder.seen.lock(), ["event", "command"]);
    }

    #[test]
    fn accept_all_stops_at_first_error() {
        let recorder = Recorder {
            fail_on_event: true,
            ..Default::default()
        };
        let command = Command::new();
        let event = Event::new();
        let messages: [&dyn Visit<dyn RootVisitor>; 3] = [&command, &event, &command];

        let result = accept_all::<dyn RootVisitor, _>(messages, &recorder);
        assert!(result.is_err());
        assert_eq!(*recorder.seen.lock(), ["command", "event"]);
    }
}
