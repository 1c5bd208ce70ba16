//! # Courier Core
//!
//! The core of the Courier dispatch toolkit.
//!
//! This crate provides the building blocks for routing immutable messages to
//! the handlers that serve them.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Message identity and classification:
//! - **Message Trait**: Object-safe messages with runtime downcasting ([`Message`])
//! - **Identity**: 128-bit unique identifiers ([`MessageId`])
//! - **Categories**: [`Command`] and [`Event`] roots with their [`MessageKind`]
//!
//! ### Framework Layer
//!
//! Dispatch strategies:
//! - **Typed Handlers**: [`Handler<M>`] bound to exactly one message type
//! - **Rules**: [`Rule<M>`] binds a message type to an ordered handler list
//! - **Router**: [`MessageRouter`] looks up rules by exact runtime type
//! - **Visitor**: [`Visit`] lets a message pick its own handler method
//! - **Untyped**: [`UntypedRouter`] accepts any value and checks nothing up front
//!
//! ## Routing Flow
//!
//! ```text
//! ┌───────────┐     ┌───────────────┐     ┌───────────┐
//! │  Message  │────▶│ MessageRouter │────▶│ Handler 1 │
//! │ (by ref)  │     │ (TypeId → Rule│────▶│ Handler 2 │
//! └───────────┘     └───────────────┘     └───────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_core::{Command, Handler, HandlerResult, Message, MessageRouter, Rule};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Message)]
//! struct CreateUser {
//!     #[message(parent)]
//!     command: Command,
//!     name: String,
//! }
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
//! let router = MessageRouter::new([Rule::new().handler(PrintCreateUser).boxed()]);
//! router.route(&CreateUser { command: Command::new(), name: "Mark".into() })?;
//! ```

// Lets `#[derive(Message)]` refer to `::courier_core` from inside this crate.
extern crate self as courier_core;

pub mod error;
pub mod foundation;
pub mod framework;
pub mod trace;

pub use error::{HandlerError, HandlerResult, RouteError, RouteResult};
pub use foundation::{Command, Event, Message, MessageId, MessageKind};
pub use framework::{
    BoxedHandler, BoxedRule, Handler, HandlerFn, MessageRouter, RouterBuilder, Rule,
    UntypedHandler, UntypedRouter, UntypedRule, Visit, accept_all, expect_message, handler_fn,
};
pub use trace::{TraceBuffer, TraceEntry, TraceHandler};

pub use courier_macros::Message;

/// Prelude for common imports.
pub mod prelude {
    pub use super::error::*;
    pub use super::foundation::*;
    pub use super::framework::{
        BoxedRule, Handler, MessageRouter, Rule, UntypedHandler, UntypedRouter, UntypedRule,
        Visit, expect_message, handler_fn,
    };
    pub use courier_macros::Message;
}
