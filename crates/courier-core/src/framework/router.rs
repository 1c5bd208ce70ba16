//! Message router for the Courier toolkit.
//!
//! This module provides the [`MessageRouter`], which folds a sequence of
//! [`BoxedRule`]s into a table keyed by message type and dispatches each
//! incoming message to the handlers of its rule.
//!
//! # Dispatch
//!
//! When a message is routed:
//!
//! 1. The rule is looked up by the message's **exact** runtime type; a rule
//!    registered for `Command` never serves a `CreateUser`, and vice versa
//! 2. Every handler of the rule runs in registration order on the calling thread
//! 3. The first handler error stops dispatch and is returned to the caller
//!
//! ```rust,ignore
//! use courier_core::{MessageRouter, Rule};
//!
//! let router = MessageRouter::builder()
//!     .rule(Rule::<CreateUser>::new().handler(print_create_user).handler(audit))
//!     .rule(Rule::<UserAdded>::new().handler(print_user_added))
//!     .build();
//!
//! router.route(&create_user)?;
//! ```
//!
//! # Duplicate Rules
//!
//! [`MessageRouter::new`] keeps the last rule registered for a type and logs a
//! warning for the one it replaces. [`MessageRouter::try_new`] rejects the
//! duplicate instead.

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use tracing::{Level, debug, span, warn};

use crate::error::{RouteError, RouteResult};
use crate::foundation::Message;
use crate::framework::rule::BoxedRule;

/// Routes messages to handlers by exact message type.
///
/// The table is built once and is read-only afterwards, so a router can be
/// shared freely.
#[derive(Default, Clone)]
pub struct MessageRouter {
    rules: HashMap<TypeId, BoxedRule>,
}

impl MessageRouter {
    /// Builds a router from rules, in order.
    ///
    /// If two rules declare the same message type, the later one replaces
    /// the earlier one.
    pub fn new<I, R>(rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<BoxedRule>,
    {
        let mut table = HashMap::new();
        for rule in rules {
            let rule = rule.into();
            let type_name = rule.type_name();
            if let Some(replaced) = table.insert(rule.type_id(), rule) {
                warn!(
                    message_type = type_name,
                    replaced_handlers = replaced.handlers().len(),
                    "Rule replaces an earlier rule for the same message type"
                );
            }
        }
        Self { rules: table }
    }

    /// Builds a router from rules, rejecting duplicate message types.
    pub fn try_new<I, R>(rules: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = R>,
        R: Into<BoxedRule>,
    {
        let mut table = HashMap::new();
        for rule in rules {
            let rule = rule.into();
            match table.entry(rule.type_id()) {
                Entry::Occupied(_) => {
                    return Err(RouteError::DuplicateRule {
                        message: rule.type_name(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(rule);
                }
            }
        }
        Ok(Self { rules: table })
    }

    /// Starts a [`RouterBuilder`].
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Dispatches a message to every handler bound to its exact type.
    ///
    /// # Errors
    ///
    /// - [`RouteError::UnmappedMessageType`] if no rule serves the message's
    ///   type; no handler is invoked.
    /// - [`RouteError::Handler`] with the first handler's error; handlers
    ///   after it are not invoked.
    pub fn route(&self, message: &dyn Message) -> RouteResult {
        let span = span!(
            Level::DEBUG,
            "route",
            message_type = message.message_name(),
            message_id = %message.message_id()
        );
        let _enter = span.enter();

        let rule = self
            .rules
            .get(&message.as_any().type_id())
            .ok_or(RouteError::UnmappedMessageType {
                message: message.message_name(),
            })?;

        for handler in rule.handlers() {
            debug!(handler = handler.name(), "Routing message to handler");
            handler.call(message)?;
        }

        Ok(())
    }

    /// Returns the router as a plain callable, an alias for [`route`](Self::route).
    pub fn as_fn(&self) -> impl Fn(&dyn Message) -> RouteResult + '_ {
        move |message: &dyn Message| self.route(message)
    }

    /// Returns the number of message types with a rule.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if a rule serves message type `M`.
    pub fn is_mapped<M: Message>(&self) -> bool {
        self.rules.contains_key(&TypeId::of::<M>())
    }

    /// Returns the number of handlers bound to message type `M`.
    pub fn handler_count<M: Message>(&self) -> usize {
        self.rules
            .get(&TypeId::of::<M>())
            .map_or(0, |rule| rule.handlers().len())
    }
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

// =============================================================================
// RouterBuilder
// =============================================================================

/// Collects rules and builds a [`MessageRouter`].
#[derive(Default)]
pub struct RouterBuilder {
    rules: Vec<BoxedRule>,
}

impl RouterBuilder {
    /// Adds a rule (builder pattern).
    pub fn rule(mut self, rule: impl Into<BoxedRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Builds the router; later rules replace earlier ones for the same type.
    pub fn build(self) -> MessageRouter {
        MessageRouter::new(self.rules)
    }

    /// Builds the router, rejecting duplicate message types.
    pub fn build_strict(self) -> Result<MessageRouter, RouteError> {
        MessageRouter::try_new(self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{Command, Event};
    use crate::framework::handler::handler_fn;
    use crate::framework::rule::Rule;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_rule(counter: &Arc<AtomicUsize>, step: usize) -> Rule<Command> {
        let c = Arc::clone(counter);
        Rule::new().handler(handler_fn(move |_: &Command| {
            c.fetch_add(step, Ordering::SeqCst);
            Ok(())
        }))
    }

    #[test]
    fn test_route_no_rules() {
        let router = MessageRouter::default();
        let err = router.route(&Command::new()).unwrap_err();
        assert!(err.is_unmapped());
    }

    #[test]
    fn test_route_with_rule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = MessageRouter::new([counting_rule(&counter, 1)]);

        router.route(&Command::new()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_category_roots_are_distinct_types() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = MessageRouter::new([counting_rule(&counter, 1)]);

        assert!(router.route(&Event::new()).unwrap_err().is_unmapped());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_last_rule_wins() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = MessageRouter::new([counting_rule(&counter, 1), counting_rule(&counter, 10)]);

        router.route(&Command::new()).unwrap();
        assert_eq!(router.rule_count(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let counter = Arc::new(AtomicUsize::new(0));
        let result = MessageRouter::builder()
            .rule(counting_rule(&counter, 1))
            .rule(counting_rule(&counter, 10))
            .build_strict();

        assert!(matches!(
            result,
            Err(RouteError::DuplicateRule { message: "Command" })
        ));
    }

    #[test]
    fn test_as_fn_routes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = MessageRouter::builder()
            .rule(counting_rule(&counter, 1))
            .build();

        let route = router.as_fn();
        route(&Command::new()).unwrap();
        route(&Command::new()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_introspection() {
        let counter = Arc::new(AtomicUsize::new(0));
        let router = MessageRouter::new([counting_rule(&counter, 1)]);

        assert!(router.is_mapped::<Command>());
        assert!(!router.is_mapped::<Event>());
        assert_eq!(router.handler_count::<Command>(), 1);
        assert_eq!(router.handler_count::<Event>(), 0);
    }
}
