//! Framework layer - dispatch strategies.
//!
//! This module contains the three ways of getting a message to its handler:
//! - Typed handlers, rules and the table-driven [`MessageRouter`]
//! - Visitor-style double dispatch ([`Visit`]), which needs no table at all
//! - Untyped handlers and the [`UntypedRouter`], which check nothing up front

pub mod handler;
pub mod router;
pub mod rule;
pub mod untyped;
pub mod visitor;

pub use handler::{Handler, HandlerFn, handler_fn};
pub use router::{MessageRouter, RouterBuilder};
pub use rule::{BoxedHandler, BoxedRule, Rule};
pub use untyped::{UntypedHandler, UntypedRouter, UntypedRule, expect_message};
pub use visitor::{Visit, accept_all};
