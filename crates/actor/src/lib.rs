//! A lightweight actor runtime.
//!
//! An actor owns a piece of state and handles messages for it one at a
//! time on a tokio task. This gives the widget a single event context:
//! user events, host calls and finished answers all become messages, and
//! no state is ever touched from two places at once.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::{Message, Request, State};
