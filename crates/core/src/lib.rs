//! Core logic of the chat widget: the submission state machine, the
//! conversation history, configuration, and the answer pipeline.
//!
//! A [`ChatWidget`] draws on a host-provided
//! [`Surface`](no_brainer_chat_interface::Surface) and gets its answers from
//! a [`Responder`](no_brainer_chat_interface::Responder). Both contracts
//! live in the `no-brainer-chat-interface` crate, re-exported here as
//! [`interface`].

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod answer_client;
pub mod config;
mod error;
mod history;
mod presentation;
mod submission;
mod widget;

pub use answer_client::AnswerClient;
pub use error::{Error, ErrorKind};
pub use no_brainer_chat_interface as interface;
pub use submission::{KeyPress, SubmitOutcome, Trigger};
pub use widget::{ChatWidget, ChatWidgetBuilder};
