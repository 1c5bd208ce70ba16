//! Message Handlers Example
//!
//! Routes a `CreateUser` command and a `UserAdded` event through each of the
//! three dispatch strategies. The printed output is the same shape for all of
//! them; what differs is where a mismatched handler gets caught:
//!
//! - `typed`: at compile time, `Rule<CreateUser>` only takes `Handler<CreateUser>`
//! - `visitor`: at compile time, every visitor must implement every method
//! - `untyped`: at runtime, if the handler checks at all
//!
//! # Usage
//!
//! ```bash
//! cargo run --package message-handlers -- --strategy typed
//! RUST_LOG=courier_core=debug cargo run --package message-handlers
//! ```

mod messages;
mod typed;
mod untyped;
mod visitor;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use courier::prelude::*;
use tracing::info;

use crate::messages::{CreateUser, UserAdded};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Typed,
    Visitor,
    Untyped,
    All,
}

#[derive(Debug, Parser)]
#[command(version, about = "Dispatch the same messages three ways")]
struct Cli {
    /// Which dispatch strategy to run.
    #[arg(short, long, value_enum, default_value_t = Strategy::All)]
    strategy: Strategy,

    /// Log span open/close around every routed message.
    #[arg(long)]
    spans: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let span_events = if cli.spans {
        SpanEvents::LIFECYCLE
    } else {
        SpanEvents::NONE
    };
    LoggingBuilder::new()
        .with_level(Level::WARN)
        .span_events(span_events)
        .init();

    let create_user = CreateUser::new("Mark");
    let user_added = UserAdded::new("Steve", "Hello!");
    info!(
        create_user = %create_user.message_id(),
        user_added = %user_added.message_id(),
        "Messages created"
    );

    let run_typed = matches!(cli.strategy, Strategy::Typed | Strategy::All);
    let run_visitor = matches!(cli.strategy, Strategy::Visitor | Strategy::All);
    let run_untyped = matches!(cli.strategy, Strategy::Untyped | Strategy::All);

    if run_typed {
        println!("==== typed ====");
        typed::run(&create_user, &user_added)?;
    }
    if run_visitor {
        println!("==== visitor ====");
        visitor::run(&create_user, &user_added)?;
    }
    if run_untyped {
        println!("==== untyped ====");
        untyped::run(&create_user, &user_added)?;
    }

    Ok(())
}
