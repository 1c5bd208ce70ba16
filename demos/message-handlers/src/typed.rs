//! Typed handlers: each handler names the one message type it serves.

use courier::prelude::*;

use crate::messages::{CreateUser, UserAdded};

pub struct PrintCreateUser;

impl Handler<CreateUser> for PrintCreateUser {
    fn handle(&self, message: &CreateUser) -> HandlerResult {
        println!("CREATING USER {message:?}");
        Ok(())
    }

    fn name(&self) -> &str {
        "PrintCreateUser"
    }
}

/// Prints the message after a fixed prefix.
pub struct PrintCreateUserWithText {
    text: String,
}

impl PrintCreateUserWithText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Handler<CreateUser> for PrintCreateUserWithText {
    fn handle(&self, message: &CreateUser) -> HandlerResult {
        println!("{} {message:?}", self.text);
        Ok(())
    }

    fn name(&self) -> &str {
        "PrintCreateUserWithText"
    }
}

pub struct PrintUserAdded;

impl Handler<UserAdded> for PrintUserAdded {
    fn handle(&self, message: &UserAdded) -> HandlerResult {
        println!("ADDED USER {message:?} MESSAGE {}", message.message);
        Ok(())
    }

    fn name(&self) -> &str {
        "PrintUserAdded"
    }
}

pub fn run(create_user: &CreateUser, user_added: &UserAdded) -> anyhow::Result<()> {
    println!("---- check handlers ----");
    let print_create_user = PrintCreateUser;
    let print_with_text = PrintCreateUserWithText::new("Some random text");
    let print_user_added = PrintUserAdded;

    print_create_user.handle(create_user)?;
    print_with_text.handle(create_user)?;
    print_user_added.handle(user_added)?;

    // `Rule::<CreateUser>::new().handler(PrintUserAdded)` does not compile.

    println!("----- check rules ------");
    let router = MessageRouter::builder()
        .rule(
            Rule::<CreateUser>::new()
                .handler(print_create_user)
                .handler(print_with_text),
        )
        .rule(Rule::<UserAdded>::new().handler(print_user_added))
        .build_strict()?;

    let route = router.as_fn();
    route(create_user)?;
    route(user_added)?;

    // Only concrete types have rules; the category root is not a fallback.
    if let Err(err) = router.route(&Command::new()) {
        println!("{err}");
    }

    Ok(())
}
