use crate::bubble::{Bubble, BubbleKind};

/// The parts of the widget the controller toggles state on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    /// The collapsed control that expands the panel.
    Opener,
    /// The expanded message panel.
    Panel,
    /// The loading indicator.
    Loader,
    /// The area showing warnings and errors about the input.
    Feedback,
}

/// State flags the controller sets on an [`Element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Class {
    /// The element is visible.
    Show,
    /// An agent message arrived while the panel was collapsed.
    HasNewMessage,
    /// The feedback holds warnings.
    Warning,
    /// The feedback holds errors.
    Error,
}

impl Class {
    /// Returns the CSS class name of this flag.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::HasNewMessage => "has-new-message",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Whatever the widget is drawn on.
///
/// A surface owns its nodes: the opener, the panel, the input field, the
/// feedback area and the message list. The controller only reads and
/// writes text, flips [`Class`] flags, and asks for new bubbles. It holds
/// no node other than the [`Bubble`] handles it gets back.
///
/// All calls happen on the widget's event context, one at a time.
pub trait Surface: Send + 'static {
    /// Returns the current text of the input field.
    fn input_text(&self) -> String;

    /// Replaces the text of the input field.
    fn set_input_text(&mut self, text: &str);

    /// Moves focus to the input field.
    fn focus_input(&mut self);

    /// Shows the given lines in the feedback area. An empty slice clears it.
    fn set_feedback(&mut self, lines: &[String]);

    /// Adds or removes a flag on an element.
    fn set_class(&mut self, element: Element, class: Class, on: bool);

    /// Returns whether an element bears a flag.
    fn has_class(&self, element: Element, class: Class) -> bool;

    /// Creates an empty bubble at the end of the message list.
    fn append_bubble(&mut self, kind: BubbleKind) -> Bubble;

    /// Scrolls the message list to its end.
    fn scroll_to_bottom(&mut self);

    /// Sets a theming variable on the widget root.
    fn set_theme_variable(&mut self, name: &str, value: &str);

    /// Sets the avatar image shown in the header.
    fn set_avatar_url(&mut self, url: &str);

    /// Sets the agent name shown in the header.
    fn set_agent_name(&mut self, name: &str);

    /// Detaches the widget from its host. No other call follows.
    fn remove(&mut self);
}
