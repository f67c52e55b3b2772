//! An out-of-the-box chat widget for the terminal.
//!
//! The crate includes a CLI tool that runs the widget with an echo
//! responder. You can also use it as a library to draw the widget in your
//! own line-based host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod responders;
pub mod terminal;

pub use terminal::{TerminalEvent, TerminalInput, TerminalSurface};

/// Re-exports of [`no_brainer_chat_core`] crate.
pub mod core {
    pub use no_brainer_chat_core::*;
}
