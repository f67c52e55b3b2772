//! Contracts between the chat widget and its host.
//!
//! The widget never touches a real document. It draws on a [`Surface`],
//! hands answer requests to a [`Responder`], and lets the responder write
//! into a [`Bubble`]. This crate defines those seams and the plain data
//! that flows across them.
//!
//! Types in this crate don't define any widget behavior. Hosts implement
//! [`Surface`] and [`BubbleNode`] for whatever they render to, and callers
//! implement [`Responder`] for whatever produces the answers.

#![deny(missing_docs)]

mod answer;
mod bubble;
mod history;
mod surface;
mod theme;

pub use answer::*;
pub use bubble::*;
pub use history::*;
pub use surface::*;
pub use theme::*;
