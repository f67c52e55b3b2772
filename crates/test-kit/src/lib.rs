//! Local fakes of the widget's collaborators for testing purpose.

mod preset;
mod responder;
mod surface;

pub use preset::*;
pub use responder::{Error, Gate, RecordedCall, ScriptedResponder};
pub use surface::{TestBubbleNode, TestDom, TestSurface};
