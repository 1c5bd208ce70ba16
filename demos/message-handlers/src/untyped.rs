//! Untyped dispatch: handlers accept anything and trust the rule.

use std::any::Any;

use courier::prelude::*;

use crate::messages::{CreateUser, UserAdded};

fn print_create_user(message: &dyn Any) -> HandlerResult {
    let message = expect_message::<CreateUser>(message)?;
    println!("CREATING USER {message:?}");
    Ok(())
}

fn print_user_added(message: &dyn Any) -> HandlerResult {
    let message = expect_message::<UserAdded>(message)?;
    println!("ADDED USER {message:?} MESSAGE {}", message.message);
    Ok(())
}

pub fn run(create_user: &CreateUser, user_added: &UserAdded) -> anyhow::Result<()> {
    let router = UntypedRouter::new([
        UntypedRule::of::<CreateUser>().handler(print_create_user),
        UntypedRule::of::<UserAdded>().handler(print_user_added),
    ]);
    router.route(create_user)?;
    router.route(user_added)?;

    // Values whose type is only known at runtime take the same path.
    let erased: [Box<dyn Any + Send + Sync>; 2] =
        [Box::new(create_user.clone()), Box::new(user_added.clone())];
    for message in &erased {
        router.route_dyn(&**message)?;
    }

    // Nothing stops a rule from pairing a type with the wrong handler.
    let sneaky = UntypedRouter::new([UntypedRule::of::<CreateUser>().handler(print_user_added)]);
    if let Err(err) = sneaky.route(create_user) {
        println!("sneaky rule: {err}");
    }

    Ok(())
}
