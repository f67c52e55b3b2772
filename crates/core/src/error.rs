use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

use no_brainer_chat_actor::ActorDeadError;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The widget has been destroyed.
    Destroyed,
    /// A message with no content was about to be rendered.
    ///
    /// This is a caller contract violation: either a validator let blank
    /// input through, or an answer resolved with nothing while never
    /// having written into its bubble.
    EmptyMessage,
    /// The responder failed to produce an answer.
    AnswerFailed,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Destroyed => write!(f, "Widget destroyed"),
            ErrorKind::EmptyMessage => write!(f, "Message cannot be empty"),
            ErrorKind::AnswerFailed => write!(f, "Answer failed"),
        }
    }
}

/// Describes a widget error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `Destroyed` kind.
    #[inline]
    pub fn destroyed() -> Self {
        Self {
            kind: ErrorKind::Destroyed,
            reason: None,
        }
    }

    /// Creates a new error with the `EmptyMessage` kind.
    #[inline]
    pub fn empty_message() -> Self {
        Self {
            kind: ErrorKind::EmptyMessage,
            reason: None,
        }
    }

    /// Creates a new error with the `AnswerFailed` kind.
    #[inline]
    pub fn answer_failed() -> Self {
        Self {
            kind: ErrorKind::AnswerFailed,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {reason}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}

impl From<ActorDeadError> for Error {
    #[inline]
    fn from(_: ActorDeadError) -> Self {
        Self::destroyed()
    }
}
