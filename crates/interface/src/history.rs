use serde::{Deserialize, Serialize};

/// The role of messages typed by the user.
pub const USER_ROLE: &str = "user";

/// The role of system messages.
pub const SYSTEM_ROLE: &str = "system";

/// The conventional role of agent messages.
pub const ASSISTANT_ROLE: &str = "assistant";

/// A message in the conversation history.
///
/// `role` is one of [`USER_ROLE`], [`SYSTEM_ROLE`], [`ASSISTANT_ROLE`] or
/// the configured agent name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The text of the message.
    pub content: String,
    /// Who sent the message.
    pub role: String,
}

impl HistoryEntry {
    /// Creates a new entry.
    #[inline]
    pub fn new<C: Into<String>, R: Into<String>>(content: C, role: R) -> Self {
        Self {
            content: content.into(),
            role: role.into(),
        }
    }

    /// Returns `true` if the user sent this message.
    #[inline]
    pub fn is_user(&self) -> bool {
        self.role == USER_ROLE
    }
}
