mod builder;
mod state;

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use no_brainer_chat_actor::{Actor, State};
use no_brainer_chat_interface::{Bubble, HistoryEntry};
use tokio::task::JoinHandle;

use crate::answer_client::AnswerClient;
use crate::config::{InputCheck, WidgetConfig};
use crate::error::Error;
use crate::history::History;
use crate::presentation::Presentation;
use crate::submission::{SubmitOutcome, Trigger};
pub use builder::ChatWidgetBuilder;
use state::{
    Close, GetHistory, IsLoading, IsOpen, NextMessageElement, Open,
    PushAgentMessage, SetLoading, Submit,
};

type IdleFn = Box<dyn Fn() + Send + Sync>;
type FaultFn = Box<dyn Fn(&Error) + Send + Sync>;

/// The state of a chat widget, owned by its actor.
///
/// Every event reaches the widget as a message: user input, calls from the
/// host, and answers resolving in the background. While an answer is
/// pending, new submissions are still checked right away, but they wait in
/// `pending` until the answer resolves.
pub(crate) struct WidgetState {
    view: Presentation,
    history: History,
    validate: InputCheck,
    on_input: InputCheck,
    answer_client: AnswerClient,
    answer_failure_text: String,
    in_flight: Option<u64>,
    pending: VecDeque<String>,
    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,

    on_idle: Option<IdleFn>,
    on_fault: Option<FaultFn>,
}

impl State for WidgetState {
    fn stopped(&mut self) {
        for (_, task) in self.running_tasks.drain() {
            task.abort();
        }
        self.view.remove();
    }
}

/// An embeddable chat widget.
///
/// The handle is cheap to clone. The widget lives until [`destroy`] is
/// called, or until every handle is dropped and no answer is pending.
///
/// [`destroy`]: ChatWidget::destroy
#[derive(Clone)]
pub struct ChatWidget {
    handle: Actor<WidgetState>,
}

impl fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget").finish_non_exhaustive()
    }
}

impl ChatWidget {
    /// Runs a submission for an input event.
    ///
    /// Warnings are checked on every event. Only a submit action or a
    /// plain Enter key press goes on to validate and send the message.
    ///
    /// # Errors
    ///
    /// Returns an [`EmptyMessage`] error if a blank message got past
    /// validation. The input text is restored in that case.
    ///
    /// [`EmptyMessage`]: crate::ErrorKind::EmptyMessage
    pub async fn submit(
        &self,
        trigger: Trigger,
    ) -> Result<SubmitOutcome, Error> {
        self.handle.ask(Submit(trigger)).await?
    }

    /// Shows a message from the agent outside of an answer, e.g. a
    /// greeting. Clears the loading indicator.
    ///
    /// # Errors
    ///
    /// Returns an [`EmptyMessage`] error if `message` is blank.
    ///
    /// [`EmptyMessage`]: crate::ErrorKind::EmptyMessage
    pub fn push_agent_message<S: Into<String>>(
        &self,
        message: S,
    ) -> Result<&Self, Error> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(Error::empty_message()
                .with_reason("an agent message cannot be blank"));
        }
        self.handle.send(PushAgentMessage(message))?;
        Ok(self)
    }

    /// Turns the loading indicator on or off. Idempotent.
    #[inline]
    pub fn set_loading(&self, active: bool) -> Result<&Self, Error> {
        self.handle.send(SetLoading(active))?;
        Ok(self)
    }

    /// Expands the panel and focuses the input.
    #[inline]
    pub fn open(&self) -> Result<&Self, Error> {
        self.handle.send(Open)?;
        Ok(self)
    }

    /// Collapses the panel.
    #[inline]
    pub fn close(&self) -> Result<&Self, Error> {
        self.handle.send(Close)?;
        Ok(self)
    }

    /// Returns whether the panel is expanded.
    #[inline]
    pub async fn is_open(&self) -> Result<bool, Error> {
        Ok(self.handle.ask(IsOpen).await?)
    }

    /// Returns whether the loading indicator is on.
    #[inline]
    pub async fn is_loading(&self) -> Result<bool, Error> {
        Ok(self.handle.ask(IsLoading).await?)
    }

    /// Returns the conversation so far.
    #[inline]
    pub async fn history(&self) -> Result<Arc<[HistoryEntry]>, Error> {
        Ok(self.handle.ask(GetHistory).await?)
    }

    /// Appends an empty bubble for a message from `role`.
    ///
    /// Only the exact role `"user"` gets an outbound bubble. Nothing is
    /// added to the history.
    #[inline]
    pub async fn next_message_element<S: Into<String>>(
        &self,
        role: S,
    ) -> Result<Bubble, Error> {
        Ok(self.handle.ask(NextMessageElement(role.into())).await?)
    }

    /// Removes the widget from its surface and drops pending answers.
    ///
    /// Every other handle fails with a [`Destroyed`] error from now on.
    ///
    /// [`Destroyed`]: crate::ErrorKind::Destroyed
    #[inline]
    pub fn destroy(self) {
        debug!("destroying the widget");
        self.handle.try_kill();
    }

    /// Returns whether the widget has been destroyed.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        !self.handle.is_alive()
    }
}

impl ChatWidget {
    fn spawn_from_builder(builder: ChatWidgetBuilder) -> Self {
        let ChatWidgetBuilder {
            surface,
            options,
            on_idle,
            on_fault,
        } = builder;

        let config = WidgetConfig::defaults().merge(options);
        debug!("mounting widget: {config:?}");
        let view = Presentation::mount(surface, &config);
        let WidgetConfig {
            answer_failure_text,
            validate,
            on_input,
            answer,
            ..
        } = config;

        let state = WidgetState {
            view,
            history: Default::default(),
            validate,
            on_input,
            answer_client: answer,
            answer_failure_text,
            in_flight: None,
            pending: Default::default(),
            running_tasks: Default::default(),
            next_task_id: 1,
            on_idle,
            on_fault,
        };
        Self {
            handle: Actor::spawn(state, Some("chat widget")),
        }
    }
}
