//! Built-in responders for trying the widget out.

mod echo;

pub use echo::EchoResponder;
