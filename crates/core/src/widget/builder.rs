use std::sync::Arc;

use no_brainer_chat_interface::{Responder, Surface};

use super::{ChatWidget, FaultFn, IdleFn};
use crate::answer_client::AnswerClient;
use crate::config::{StylesOverride, WidgetOptions};
use crate::error::Error;

/// [`ChatWidget`] builder.
///
/// Anything left unset falls back to the defaults of
/// [`WidgetConfig::defaults`](crate::config::WidgetConfig::defaults).
pub struct ChatWidgetBuilder {
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) options: WidgetOptions,
    pub(crate) on_idle: Option<IdleFn>,
    pub(crate) on_fault: Option<FaultFn>,
}

impl ChatWidgetBuilder {
    /// Creates a new builder that draws the widget on `surface`.
    #[inline]
    pub fn with_surface<S: Surface>(surface: S) -> Self {
        Self {
            surface: Box::new(surface),
            options: Default::default(),
            on_idle: None,
            on_fault: None,
        }
    }

    /// Replaces all options set so far.
    #[inline]
    pub fn with_options(mut self, options: WidgetOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the check run on submission. Returned strings are errors.
    #[inline]
    pub fn validate(
        mut self,
        validate: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.options.validate = Some(Arc::new(validate));
        self
    }

    /// Sets the check run on every input event. Returned strings are
    /// warnings.
    #[inline]
    pub fn on_input(
        mut self,
        on_input: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.options.on_input = Some(Arc::new(on_input));
        self
    }

    /// Sets what produces the answers.
    #[inline]
    pub fn answer<R: Responder>(mut self, responder: R) -> Self {
        self.options.answer = Some(AnswerClient::new(responder));
        self
    }

    /// Sets the agent name. Its first character is uppercased on display.
    #[inline]
    pub fn agent_name<S: Into<String>>(mut self, agent_name: S) -> Self {
        self.options.agent_name = Some(agent_name.into());
        self
    }

    /// Sets the avatar shown in the header.
    #[inline]
    pub fn agent_avatar_url<S: Into<String>>(mut self, url: S) -> Self {
        self.options.agent_avatar_url = Some(url.into());
        self
    }

    /// Overrides some of the default styles.
    #[inline]
    pub fn styles(mut self, styles: StylesOverride) -> Self {
        self.options.styles = Some(styles);
        self
    }

    /// Attaches a callback to be invoked when an answer has resolved and
    /// no submission is waiting.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Attaches a callback for faults that no caller can receive, such as
    /// a failed answer.
    #[inline]
    pub fn on_fault(
        mut self,
        on_fault: impl Fn(&Error) + Send + Sync + 'static,
    ) -> Self {
        self.on_fault = Some(Box::new(on_fault));
        self
    }

    /// Builds the widget.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[inline]
    pub fn build(self) -> ChatWidget {
        ChatWidget::spawn_from_builder(self)
    }
}

impl ChatWidget {
    /// Starts building a widget that draws on `surface`.
    #[inline]
    pub fn builder<S: Surface>(surface: S) -> ChatWidgetBuilder {
        ChatWidgetBuilder::with_surface(surface)
    }
}
