//! The two user messages every strategy dispatches.

use courier::prelude::*;

/// Asks for a user to be created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Message)]
#[message(name = "user.create")]
pub struct CreateUser {
    #[message(parent)]
    command: Command,
    pub name: String,
}

impl CreateUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            command: Command::new(),
            name: name.into(),
        }
    }
}

/// Reports that a user was added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Message)]
#[message(name = "user.added")]
pub struct UserAdded {
    #[message(parent)]
    event: Event,
    pub name: String,
    pub message: String,
}

impl UserAdded {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event: Event::new(),
            name: name.into(),
            message: message.into(),
        }
    }
}
