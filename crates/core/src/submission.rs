//! What starts a submission and how it ends.

/// A key pressed in the input field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// The key name, as in `KeyboardEvent.key`.
    pub key: String,
    /// Whether shift was held.
    pub shift: bool,
}

impl KeyPress {
    /// Creates a key press without modifiers.
    #[inline]
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self {
            key: key.into(),
            shift: false,
        }
    }

    /// Holds shift during the key press.
    #[inline]
    pub fn with_shift(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }
}

/// The input event a submission is run for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The submit control was activated.
    Submit,
    /// A key was pressed in the input field.
    Key(KeyPress),
}

impl Trigger {
    /// A key press without modifiers.
    #[inline]
    pub fn key<S: Into<String>>(key: S) -> Self {
        Self::Key(KeyPress::new(key))
    }

    /// A plain Enter key press.
    #[inline]
    pub fn enter() -> Self {
        Self::key("Enter")
    }

    /// Whether the event asks to send the message. Only Enter without
    /// shift does; shift+Enter inserts a line break instead.
    pub(crate) fn requests_submit(&self) -> bool {
        match self {
            Self::Submit => true,
            Self::Key(KeyPress { key, shift }) => key == "Enter" && !shift,
        }
    }
}

impl From<KeyPress> for Trigger {
    #[inline]
    fn from(key: KeyPress) -> Self {
        Self::Key(key)
    }
}

/// How a submission ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input check returned warnings. Nothing was sent.
    Warned(Vec<String>),
    /// The event does not submit, e.g. a key other than Enter.
    Ignored,
    /// Validation failed. The input text has been restored.
    Rejected(Vec<String>),
    /// The message was sent and an answer is pending.
    Accepted,
    /// The message waits for the pending answer to resolve.
    Queued,
}

impl SubmitOutcome {
    /// Whether the host should suppress the native behavior of the event.
    #[inline]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Accepted | Self::Queued)
    }

    /// Whether the message made it into the conversation or its queue.
    #[inline]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Accepted | Self::Queued)
    }
}
