//! Handler system for the Courier toolkit.
//!
//! A [`Handler<M>`] serves exactly one message type `M`. The type parameter
//! is what makes the capability contravariant-safe: a `Rule<CreateUser>`
//! only accepts `Handler<CreateUser>` values, so wiring a handler to the
//! wrong message is a compile error instead of a runtime surprise.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_core::{Handler, HandlerResult, handler_fn};
//!
//! struct PrintCreateUser;
//!
//! impl Handler<CreateUser> for PrintCreateUser {
//!     fn handle(&self, message: &CreateUser) -> HandlerResult {
//!         println!("CREATING USER {message:?}");
//!         Ok(())
//!     }
//! }
//!
//! // Closures work through `handler_fn`
//! let audit = handler_fn(|message: &CreateUser| {
//!     tracing::info!(name = %message.name, "audit");
//!     Ok(())
//! })
//! .named("audit");
//! ```

use std::any::type_name;

use crate::error::HandlerResult;
use crate::foundation::Message;

// ============================================================================
// Handler Trait
// ============================================================================

/// The capability of handling one message type.
///
/// `handle` performs a side effect and returns nothing on success. Errors
/// are propagated by the router to its caller unchanged.
pub trait Handler<M: Message>: Send + Sync + 'static {
    /// Handles one message.
    fn handle(&self, message: &M) -> HandlerResult;

    /// Name used in logs and traces.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

// ============================================================================
// HandlerFn - closure adapter
// ============================================================================

/// A [`Handler`] backed by a closure.
///
/// Created with [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
    name: Option<String>,
}

/// Wraps a closure `Fn(&M) -> HandlerResult` as a [`Handler<M>`].
///
/// The message type is usually inferred from the closure's argument
/// annotation.
pub fn handler_fn<M, F>(f: F) -> HandlerFn<F>
where
    M: Message,
    F: Fn(&M) -> HandlerResult + Send + Sync + 'static,
{
    HandlerFn { f, name: None }
}

impl<F> HandlerFn<F> {
    /// Sets the name reported in logs and traces.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<M, F> Handler<M> for HandlerFn<F>
where
    M: Message,
    F: Fn(&M) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, message: &M) -> HandlerResult {
        (self.f)(message)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("handler_fn")
    }
}
