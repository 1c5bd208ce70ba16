//! # Courier
//!
//! Message dispatch building blocks and a settings-driven model factory.
//!
//! ## Overview
//!
//! Courier routes immutable messages ([`Command`](core::Command)s and
//! [`Event`](core::Event)s) to the handlers that serve them. The same
//! dispatch can be expressed three ways:
//!
//! - **Typed**: `Handler<M>` values collected into `Rule<M>`s and routed by a
//!   [`MessageRouter`](core::MessageRouter) keyed on the exact message type
//! - **Visitor**: each message calls the right method of a visitor trait
//!   (`Visit`), no table involved
//! - **Untyped**: handlers take `&dyn Any`; the binding is by convention
//!
//! The runtime half loads layered settings, sets up logging and builds the
//! prediction model the settings select.
//!
//! ## Quick Start
//!
//! `#[derive(Message)]` expands to `::courier_core` paths, so crates that
//! derive messages depend on `courier-core` directly as well.
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Message)]
//! struct CreateUser {
//!     #[message(parent)]
//!     command: Command,
//!     name: String,
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     LoggingBuilder::new().init();
//!
//!     let router = MessageRouter::new([Rule::new().handler(handler_fn(
//!         |message: &CreateUser| {
//!             info!(name = %message.name, "creating user");
//!             Ok(())
//!         },
//!     ))]);
//!
//!     router.route(&CreateUser { command: Command::new(), name: "Mark".into() })?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML settings files (default)
//! - `yaml-config`: YAML settings files
//! - `json-log`: JSON log output

pub use courier_core as core;
pub use courier_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    // Messages
    pub use courier_core::{Command, Event, Message, MessageId, MessageKind};

    // Typed routing
    pub use courier_core::{Handler, MessageRouter, Rule, handler_fn};

    // Alternative strategies
    pub use courier_core::{UntypedHandler, UntypedRouter, UntypedRule, Visit, expect_message};

    // Errors
    pub use courier_core::{HandlerError, HandlerResult, RouteError, RouteResult};

    // Settings, logging and models
    pub use courier_runtime::logging::{LoggingBuilder, SpanEvents};
    pub use courier_runtime::{
        AppSettings, ConfigLoader, MlModel, ModelSettings, build_model, build_model_unchecked,
    };

    // Logging macros
    pub use courier_runtime::prelude::*;
}
