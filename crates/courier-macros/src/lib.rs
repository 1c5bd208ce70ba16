//! Procedural macros for the Courier dispatch toolkit.
//!
//! This crate provides:
//!
//! - `#[derive(Message)]` - Generates the `Message` implementation and parent `Deref`
//!
//! # Message Derive Macro
//!
//! Category roots carry the identifier; concrete messages embed a root:
//!
//! ```rust,ignore
//! use courier_core::{Message, MessageId};
//!
//! #[derive(Debug, Clone, Message)]
//! #[root_message(kind = "command")]
//! pub struct Command {
//!     #[message(id)]
//!     message_id: MessageId,
//! }
//!
//! #[derive(Debug, Clone, Message)]
//! pub struct CreateUser {
//!     #[message(parent)]
//!     command: Command,
//!     pub name: String,
//! }
//! ```

mod message;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `courier_core::Message` for structs.
///
/// # Attributes
///
/// - `#[root_message(kind = "...")]` - Marks a category root; `kind` is
///   `"command"` or `"event"`. Requires a field marked `#[message(id)]`.
/// - `#[message(name = "...")]` - Overrides the name of a child message
///   (default: the struct name). Roots use `#[root_message(name = "...")]`.
/// - `#[message(parent)]` (field) - The embedded parent message. Required on
///   every non-root message; the identifier and kind are delegated to it and
///   `Deref<Target = Parent>` is generated.
/// - `#[message(id)]` (field) - The `MessageId` field of a root.
#[proc_macro_derive(Message, attributes(root_message, message))]
pub fn derive_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match message::derive_message(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
