//! In-memory trace of handler invocations.
//!
//! [`TraceHandler`] records every message it receives into a shared
//! [`TraceBuffer`]. Several handlers can share one buffer, so the buffer
//! ends up holding the global invocation order across a whole dispatch.
//!
//! ```rust,ignore
//! let trace = TraceBuffer::new();
//! let router = MessageRouter::new([Rule::<CreateUser>::new()
//!     .handler(trace.handler("H1"))
//!     .handler(trace.handler("H2"))]);
//!
//! router.route(&create_user)?;
//! assert_eq!(trace.handlers(), ["H1", "H2"]);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::HandlerResult;
use crate::foundation::Message;
use crate::framework::Handler;

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Label of the handler that ran.
    pub handler: String,
    /// `Debug` rendering of the message it received.
    pub message: String,
}

/// A shared, append-only log of handler invocations.
///
/// Cloning the buffer yields another handle to the same log.
#[derive(Clone, Default)]
pub struct TraceBuffer {
    entries: Arc<Mutex<Vec<TraceEntry>>>,
}

impl TraceBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handler that records into this buffer under `label`.
    pub fn handler(&self, label: impl Into<String>) -> TraceHandler {
        TraceHandler {
            label: label.into(),
            buffer: self.clone(),
        }
    }

    /// Records that `handler` received `message`.
    pub fn record(&self, handler: &str, message: &dyn Message) {
        self.push(handler, format!("{message:?}"));
    }

    /// Records an entry with an already rendered message.
    pub fn push(&self, handler: impl Into<String>, message: impl Into<String>) {
        self.entries.lock().push(TraceEntry {
            handler: handler.into(),
            message: message.into(),
        });
    }

    /// Returns a snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.lock().clone()
    }

    /// Returns the handler labels in invocation order.
    pub fn handlers(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.handler.clone())
            .collect()
    }

    /// Returns the number of recorded invocations.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops every recorded entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl fmt::Debug for TraceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.lock().iter()).finish()
    }
}

/// A handler that only records what it receives.
///
/// Serves any message type.
#[derive(Clone, Debug)]
pub struct TraceHandler {
    label: String,
    buffer: TraceBuffer,
}

impl TraceHandler {
    /// The label this handler records under.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<M: Message> Handler<M> for TraceHandler {
    fn handle(&self, message: &M) -> HandlerResult {
        self.buffer.record(&self.label, message);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Command, Event};

    #[test]
    fn shared_buffer_keeps_global_order() {
        let trace = TraceBuffer::new();
        let a = trace.handler("a");
        let b = trace.handler("b");

        Handler::<Command>::handle(&a, &Command::new()).unwrap();
        Handler::<Event>::handle(&b, &Event::new()).unwrap();
        Handler::<Command>::handle(&a, &Command::new()).unwrap();

        assert_eq!(trace.handlers(), ["a", "b", "a"]);
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn records_debug_rendering() {
        let trace = TraceBuffer::new();
        let command = Command::new();
        trace.record("h", &command);

        let entries = trace.entries();
        assert_eq!(entries[0].handler, "h");
        assert_eq!(entries[0].message, format!("{command:?}"));
    }

    #[test]
    fn clear_empties_buffer() {
        let trace = TraceBuffer::new();
        trace.push("h", "m");
        assert!(!trace.is_empty());
        trace.clear();
        assert!(trace.is_empty());
    }
}
