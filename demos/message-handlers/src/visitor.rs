//! Visitor dispatch: each message picks its own method on the handler.

use courier::prelude::*;

use crate::messages::{CreateUser, UserAdded};

/// One method per message type.
pub trait MessageVisitor {
    fn create_user(&self, message: &CreateUser) -> HandlerResult;
    fn user_added(&self, message: &UserAdded) -> HandlerResult;
}

impl Visit<dyn MessageVisitor> for CreateUser {
    fn accept(&self, visitor: &dyn MessageVisitor) -> HandlerResult {
        visitor.create_user(self)
    }
}

impl Visit<dyn MessageVisitor> for UserAdded {
    fn accept(&self, visitor: &dyn MessageVisitor) -> HandlerResult {
        visitor.user_added(self)
    }
}

fn print_create_user(message: &CreateUser) -> HandlerResult {
    println!("ADD USER {message:?}");
    Ok(())
}

fn print_user_added(message: &UserAdded) -> HandlerResult {
    println!("NOTIFY USER {} MESSAGE {}", message.name, message.message);
    Ok(())
}

/// Delegates each visitor method to a plain function.
pub struct ConcreteMessageHandler<C, U> {
    create_user_handler: C,
    user_added_handler: U,
}

impl<C, U> ConcreteMessageHandler<C, U>
where
    C: Fn(&CreateUser) -> HandlerResult,
    U: Fn(&UserAdded) -> HandlerResult,
{
    pub fn new(create_user_handler: C, user_added_handler: U) -> Self {
        Self {
            create_user_handler,
            user_added_handler,
        }
    }
}

impl<C, U> MessageVisitor for ConcreteMessageHandler<C, U>
where
    C: Fn(&CreateUser) -> HandlerResult,
    U: Fn(&UserAdded) -> HandlerResult,
{
    fn create_user(&self, message: &CreateUser) -> HandlerResult {
        (self.create_user_handler)(message)
    }

    fn user_added(&self, message: &UserAdded) -> HandlerResult {
        (self.user_added_handler)(message)
    }
}

pub fn run(create_user: &CreateUser, user_added: &UserAdded) -> anyhow::Result<()> {
    let handler = ConcreteMessageHandler::new(print_create_user, print_user_added);
    let messages: [&dyn Visit<dyn MessageVisitor>; 2] = [create_user, user_added];
    courier::core::accept_all::<dyn MessageVisitor, _>(messages, &handler)?;
    Ok(())
}
