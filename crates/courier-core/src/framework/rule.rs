//! Rules bind one message type to an ordered list of handlers.
//!
//! A [`Rule<M>`] is typed: every handler it holds implements
//! [`Handler<M>`]. Before a rule goes into a router it is erased into a
//! [`BoxedRule`], which remembers the message's [`TypeId`] and wraps each
//! handler in a downcasting closure.
//!
//! ```rust,ignore
//! let rule = Rule::<CreateUser>::new()
//!     .handler(PrintCreateUser)            // runs first
//!     .handler(PrintCreateUserWithText::new("Some random text"));
//!
//! let router = MessageRouter::new([rule.boxed()]);
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{RouteError, RouteResult};
use crate::foundation::Message;
use crate::framework::handler::Handler;

// ============================================================================
// Rule - typed handler list
// ============================================================================

/// Declares that every handler in the list processes messages of type `M`.
///
/// Handler order is preserved and is the dispatch order.
pub struct Rule<M: Message> {
    handlers: Vec<Arc<dyn Handler<M>>>,
}

impl<M: Message> Default for Rule<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message> Clone for Rule<M> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<M: Message> Rule<M> {
    /// Creates a rule with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Creates a rule from an ordered list of shared handlers.
    pub fn from_handlers(handlers: Vec<Arc<dyn Handler<M>>>) -> Self {
        Self { handlers }
    }

    /// Appends a handler.
    ///
    /// Handlers are executed in the order they are added.
    pub fn handler<H: Handler<M>>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends a handler that is shared with other rules or owners.
    pub fn shared(mut self, handler: Arc<dyn Handler<M>>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Returns the number of handlers in this rule.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Erases the message type so the rule can sit in a router.
    pub fn boxed(self) -> BoxedRule {
        BoxedRule {
            type_id: TypeId::of::<M>(),
            type_name: short_type_name::<M>(),
            handlers: self.handlers.into_iter().map(BoxedHandler::new).collect(),
        }
    }
}

impl<M: Message> fmt::Debug for Rule<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &short_type_name::<M>())
            .field("handlers", &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// BoxedHandler - type-erased handler
// ============================================================================

type ErasedCall = dyn Fn(&dyn Message) -> RouteResult + Send + Sync;

/// A type-erased handler stored in a [`BoxedRule`].
///
/// Calling it with a message of any type other than the one it was built
/// for yields [`RouteError::TypeMismatch`].
#[derive(Clone)]
pub struct BoxedHandler {
    name: Arc<str>,
    call: Arc<ErasedCall>,
}

impl BoxedHandler {
    /// Erases a typed handler.
    pub fn new<M: Message>(handler: Arc<dyn Handler<M>>) -> Self {
        let name: Arc<str> = Arc::from(handler.name());
        let call: Arc<ErasedCall> = Arc::new(move |message: &dyn Message| {
            let Some(message) = message.downcast_ref::<M>() else {
                return Err(RouteError::TypeMismatch {
                    expected: short_type_name::<M>(),
                    got: message.message_name(),
                });
            };
            handler.handle(message).map_err(RouteError::from)
        });
        Self { name, call }
    }

    /// Returns the handler's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the handler.
    pub fn call(&self, message: &dyn Message) -> RouteResult {
        (self.call)(message)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedHandler").field(&self.name).finish()
    }
}

// ============================================================================
// BoxedRule - type-erased rule
// ============================================================================

/// A [`Rule`] with its message type erased to a [`TypeId`].
#[derive(Clone, Debug)]
pub struct BoxedRule {
    type_id: TypeId,
    type_name: &'static str,
    handlers: Vec<BoxedHandler>,
}

impl BoxedRule {
    /// The exact message type this rule serves.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short name of the message type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The handlers in dispatch order.
    pub fn handlers(&self) -> &[BoxedHandler] {
        &self.handlers
    }
}

impl<M: Message> From<Rule<M>> for BoxedRule {
    fn from(rule: Rule<M>) -> Self {
        rule.boxed()
    }
}

/// `type_name` without the module path, e.g. `CreateUser`.
///
/// Generic and compound types keep their full name, since their paths are
/// nested inside it.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    if full.contains(['<', '(', '[', '&', '*', ' ']) {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}
