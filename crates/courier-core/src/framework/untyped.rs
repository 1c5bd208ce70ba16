//! Untyped dispatch.
//!
//! [`UntypedHandler`]s accept any value. An [`UntypedRule`] binds a type to
//! a list of them by convention only: nothing checks that the handlers can
//! actually process that type. A handler that receives a value it cannot
//! use finds out at runtime and reports [`HandlerError::UnexpectedMessage`]
//! (or quietly does nothing, if it never looks).
//!
//! Routing semantics otherwise match [`MessageRouter`](crate::MessageRouter):
//! exact-type lookup, registration order, first error aborts, later rules
//! replace earlier ones.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{Level, debug, span, warn};

use crate::error::{HandlerError, HandlerResult, RouteError, RouteResult};
use crate::framework::rule::short_type_name;

/// A handler that accepts any value.
pub trait UntypedHandler: Send + Sync + 'static {
    /// Handles one value of unknown type.
    fn handle(&self, message: &dyn Any) -> HandlerResult;

    /// Name used in logs and traces.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

impl<F> UntypedHandler for F
where
    F: Fn(&dyn Any) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, message: &dyn Any) -> HandlerResult {
        self(message)
    }
}

/// Downcasts an untyped message or reports what was expected.
///
/// Convenience for untyped handlers that do want to check.
pub fn expect_message<T: Any>(message: &dyn Any) -> Result<&T, HandlerError> {
    message
        .downcast_ref::<T>()
        .ok_or(HandlerError::UnexpectedMessage {
            expected: short_type_name::<T>(),
            got: "a value of another type",
        })
}

// ============================================================================
// UntypedRule
// ============================================================================

/// Binds one type to an ordered list of untyped handlers.
#[derive(Clone)]
pub struct UntypedRule {
    type_id: TypeId,
    type_name: &'static str,
    handlers: Vec<Arc<dyn UntypedHandler>>,
}

impl UntypedRule {
    /// Creates an empty rule for type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            handlers: Vec::new(),
        }
    }

    /// Appends a handler. No check is made that it understands the type.
    pub fn handler<H: UntypedHandler>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Appends a shared handler.
    pub fn shared(mut self, handler: Arc<dyn UntypedHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Returns the number of handlers in this rule.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for UntypedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedRule")
            .field("type", &self.type_name)
            .field("handlers", &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// UntypedRouter
// ============================================================================

/// Reported for an erased value whose type has no rule.
const UNKNOWN_TYPE: &str = "<unknown type>";

/// Routes arbitrary values to untyped handlers by exact type.
#[derive(Default, Clone)]
pub struct UntypedRouter {
    rules: HashMap<TypeId, UntypedRule>,
}

impl UntypedRouter {
    /// Builds a router from rules; later rules replace earlier ones.
    pub fn new(rules: impl IntoIterator<Item = UntypedRule>) -> Self {
        let mut table = HashMap::new();
        for rule in rules {
            let type_name = rule.type_name;
            if table.insert(rule.type_id, rule).is_some() {
                warn!(
                    message_type = type_name,
                    "Untyped rule replaces an earlier rule for the same type"
                );
            }
        }
        Self { rules: table }
    }

    /// Dispatches a value of a statically known type.
    ///
    /// The rule is still found by the value's runtime type, so this is the
    /// same as [`route_dyn`](Self::route_dyn) except that an unmapped error
    /// can name `T`. Pass the erased value itself (`&*boxed`), not a
    /// reference to its box, when the type is not known.
    pub fn route<T: Any>(&self, message: &T) -> RouteResult {
        self.dispatch(message, short_type_name::<T>())
    }

    /// Dispatches a type-erased value to every handler bound to its runtime
    /// type.
    pub fn route_dyn(&self, message: &dyn Any) -> RouteResult {
        self.dispatch(message, UNKNOWN_TYPE)
    }

    fn dispatch(&self, message: &dyn Any, unmapped_name: &'static str) -> RouteResult {
        let rule = self.rules.get(&message.type_id());
        let type_name = rule.map_or(unmapped_name, |rule| rule.type_name);

        let span = span!(Level::DEBUG, "route_untyped", message_type = type_name);
        let _enter = span.enter();

        let rule = rule.ok_or(RouteError::UnmappedMessageType { message: type_name })?;
        for handler in &rule.handlers {
            debug!(handler = handler.name(), "Routing value to untyped handler");
            handler.handle(message)?;
        }

        Ok(())
    }

    /// Returns the number of types with a rule.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for UntypedRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedRouter")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Command, Event};
    use parking_lot::Mutex;

    #[test]
    fn routes_by_exact_type() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let router = UntypedRouter::new([UntypedRule::of::<Command>().handler(
            move |message: &dyn Any| {
                let command = expect_message::<Command>(message)?;
                s.lock().push(command.to_owned());
                Ok(())
            },
        )]);

        let command = Command::new();
        router.route(&command).unwrap();
        assert_eq!(*seen.lock(), [command]);
        assert!(router.route(&Event::new()).unwrap_err().is_unmapped());
    }

    #[test]
    fn mismatched_handler_fails_at_runtime() {
        // Wired to Command, but the handler expects an Event.
        let router = UntypedRouter::new([UntypedRule::of::<Command>().handler(
            |message: &dyn Any| expect_message::<Event>(message).map(|_| ()),
        )]);

        let err = router.route(&Command::new()).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Handler(HandlerError::UnexpectedMessage {
                expected: "Event",
                ..
            })
        ));
    }

    fn recording(
        seen: &Arc<Mutex<Vec<&'static str>>>,
        label: &'static str,
    ) -> impl UntypedHandler {
        let seen = Arc::clone(seen);
        move |_: &dyn Any| {
            seen.lock().push(label);
            Ok(())
        }
    }

    #[test]
    fn erased_values_route_by_runtime_type() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router =
            UntypedRouter::new([UntypedRule::of::<Command>().handler(recording(&seen, "command"))]);

        let boxed: Box<dyn Any + Send + Sync> = Box::new(Command::new());
        router.route_dyn(&*boxed).unwrap();

        let command = Command::new();
        let message: &dyn crate::foundation::Message = &command;
        router.route_dyn(message.as_any()).unwrap();

        assert_eq!(*seen.lock(), ["command", "command"]);
    }

    #[test]
    fn erased_unmapped_value_is_reported() {
        let router = UntypedRouter::new([UntypedRule::of::<Command>()]);
        let boxed: Box<dyn Any> = Box::new(Event::new());

        let err = router.route_dyn(&*boxed).unwrap_err();
        assert!(matches!(
            err,
            RouteError::UnmappedMessageType { message: UNKNOWN_TYPE }
        ));
        assert!(matches!(
            router.route(&Event::new()).unwrap_err(),
            RouteError::UnmappedMessageType { message: "Event" }
        ));
    }

    #[test]
    fn later_rule_replaces_earlier_one() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = UntypedRouter::new([
            UntypedRule::of::<Command>().handler(recording(&seen, "old")),
            UntypedRule::of::<Command>().handler(recording(&seen, "new")),
        ]);

        router.route(&Command::new()).unwrap();
        assert_eq!(router.rule_count(), 1);
        assert_eq!(*seen.lock(), ["new"]);
    }

    #[test]
    fn failing_handler_aborts_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = UntypedRouter::new([UntypedRule::of::<Command>()
            .handler(recording(&seen, "first"))
            .handler(|_: &dyn Any| -> HandlerResult { Err(HandlerError::failed("boom")) })
            .handler(recording(&seen, "third"))]);

        let err = router.route(&Command::new()).unwrap_err();
        assert!(matches!(
            err.handler_error(),
            Some(HandlerError::Failed(reason)) if reason == "boom"
        ));
        assert_eq!(*seen.lock(), ["first"]);
    }

    #[test]
    fn any_value_can_be_routed() {
        let router = UntypedRouter::new([UntypedRule::of::<String>().handler(
            |message: &dyn Any| {
                assert!(message.is::<String>());
                Ok(())
            },
        )]);
        router.route(&"plain".to_string()).unwrap();
        assert_eq!(router.rule_count(), 1);
    }
}
