//! Foundation layer - message identity and classification.
//!
//! This module contains the data side of the toolkit:
//! - The object-safe [`Message`] trait with runtime downcasting
//! - [`MessageId`], a 128-bit unique identifier
//! - The [`Command`] and [`Event`] category roots

pub mod category;
pub mod message;

pub use category::{Command, Event};
pub use message::{Message, MessageId, MessageKind};
