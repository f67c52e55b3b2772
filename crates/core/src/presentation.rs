//! Visual state of the widget on top of a host [`Surface`].

use no_brainer_chat_interface::{Bubble, BubbleKind, Class, Element, Surface};

use crate::config::WidgetConfig;

/// Drives a [`Surface`]: panel visibility, loading, feedback and bubbles.
///
/// Every bit of visual state lives on the surface itself. This type keeps
/// nothing but the display name of the agent.
pub(crate) struct Presentation {
    surface: Box<dyn Surface>,
    agent_name: String,
}

impl Presentation {
    /// Themes the surface and puts it into the closed state.
    pub fn mount(surface: Box<dyn Surface>, config: &WidgetConfig) -> Self {
        let mut view = Self {
            surface,
            agent_name: capitalize_first(&config.agent_name),
        };
        view.apply_theme(config);
        view.close();
        view
    }

    fn apply_theme(&mut self, config: &WidgetConfig) {
        for (name, value) in config.styles.variables() {
            self.surface.set_theme_variable(name, value);
        }
        self.surface.set_avatar_url(&config.agent_avatar_url);
        self.surface.set_agent_name(&self.agent_name);
    }

    /// The agent name as displayed, with its first character uppercased.
    #[inline]
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn open(&mut self) {
        self.surface
            .set_class(Element::Opener, Class::HasNewMessage, false);
        self.surface.set_class(Element::Opener, Class::Show, false);
        self.surface.set_class(Element::Panel, Class::Show, true);
        self.surface.focus_input();
    }

    pub fn close(&mut self) {
        self.surface.set_class(Element::Opener, Class::Show, true);
        self.surface.set_class(Element::Panel, Class::Show, false);
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.surface.has_class(Element::Panel, Class::Show)
    }

    #[inline]
    pub fn set_loading(&mut self, active: bool) {
        self.surface.set_class(Element::Loader, Class::Show, active);
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.surface.has_class(Element::Loader, Class::Show)
    }

    /// Marks the opener if the panel is collapsed.
    pub fn flag_new_message(&mut self) {
        if !self.is_open() {
            self.surface
                .set_class(Element::Opener, Class::HasNewMessage, true);
        }
    }

    pub fn show_warnings(&mut self, warnings: &[String]) {
        self.surface.set_feedback(warnings);
        self.surface.set_class(Element::Feedback, Class::Warning, true);
        self.surface.set_class(Element::Feedback, Class::Error, false);
        self.surface.scroll_to_bottom();
    }

    pub fn show_errors(&mut self, errors: &[String]) {
        self.surface.set_class(Element::Feedback, Class::Warning, false);
        self.surface.set_feedback(errors);
        self.surface.set_class(Element::Feedback, Class::Error, true);
        self.surface.scroll_to_bottom();
    }

    pub fn clear_feedback(&mut self) {
        self.surface.set_feedback(&[]);
        self.surface.set_class(Element::Feedback, Class::Error, false);
        self.surface.set_class(Element::Feedback, Class::Warning, false);
    }

    #[inline]
    pub fn input_text(&self) -> String {
        self.surface.input_text()
    }

    /// Reads and clears the input field.
    pub fn take_input(&mut self) -> String {
        let text = self.surface.input_text();
        self.surface.set_input_text("");
        text
    }

    #[inline]
    pub fn restore_input(&mut self, text: &str) {
        self.surface.set_input_text(text);
    }

    /// Appends an empty bubble for a message from `role`.
    pub fn next_message_element(&mut self, role: &str) -> Bubble {
        let kind = BubbleKind::for_role(role);
        trace!("new {kind:?} bubble for role {role:?}");
        self.surface.append_bubble(kind)
    }

    #[inline]
    pub fn scroll(&mut self) {
        self.surface.scroll_to_bottom();
    }

    #[inline]
    pub fn remove(&mut self) {
        self.surface.remove();
    }
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
