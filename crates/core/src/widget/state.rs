use std::fmt::{self, Debug};
use std::sync::Arc;

use no_brainer_chat_actor::{Actor, Message, Request};
use no_brainer_chat_interface::{
    AnswerRequest, Bubble, BubbleKind, HistoryEntry, LoadingSwitch, USER_ROLE,
};

use super::WidgetState;
use crate::answer_client::AnswerResult;
use crate::error::Error;
use crate::submission::{SubmitOutcome, Trigger};

impl WidgetState {
    fn submit(
        &mut self,
        trigger: Trigger,
        handle: &Actor<Self>,
    ) -> Result<SubmitOutcome, Error> {
        let text = self.view.input_text();
        let warnings = (self.on_input)(&text);
        if !warnings.is_empty() {
            debug!("input warned: {warnings:?}");
            self.view.show_warnings(&warnings);
            return Ok(SubmitOutcome::Warned(warnings));
        }

        if !trigger.requests_submit() {
            return Ok(SubmitOutcome::Ignored);
        }

        let was_loading = self.view.is_loading();
        self.view.set_loading(true);
        let message = self.view.take_input();

        let errors = (self.validate)(&message);
        if !errors.is_empty() {
            debug!("submission rejected: {errors:?}");
            self.settle_loading(was_loading);
            self.view.show_errors(&errors);
            self.view.restore_input(&message);
            return Ok(SubmitOutcome::Rejected(errors));
        }

        self.view.clear_feedback();
        if message.trim().is_empty() {
            // The validator let a blank message through.
            self.settle_loading(was_loading);
            self.view.restore_input(&message);
            return Err(Error::empty_message()
                .with_reason("a blank message passed validation"));
        }

        if self.in_flight.is_some() {
            // Answers are not allowed to overlap. The message is sent
            // when the pending answer resolves.
            debug!("submission queued: {message:?}");
            self.pending.push_back(message);
            return Ok(SubmitOutcome::Queued);
        }
        self.dispatch(message, handle)?;
        Ok(SubmitOutcome::Accepted)
    }

    /// Undoes the loading indicator of a submission that was not sent.
    ///
    /// It stays on only if an answer is still pending and nothing turned
    /// it off in the meantime.
    #[inline]
    fn settle_loading(&mut self, was_loading: bool) {
        self.view.set_loading(was_loading && self.in_flight.is_some());
    }

    /// Sends a checked message and starts answering it, assuming no other
    /// answer is in flight.
    fn dispatch(
        &mut self,
        message: String,
        handle: &Actor<Self>,
    ) -> Result<(), Error> {
        debug!("dispatching: {message:?}");
        self.view.set_loading(true);
        self.add_message(&message, USER_ROLE, None)?;

        let agent_name = self.view.agent_name().to_owned();
        let bubble = self.view.next_message_element(&agent_name);
        bubble.set_placeholder(true);

        // The responder is called right here, so it sees the history with
        // the message just added.
        let answer_fut = self.answer_client.answer(AnswerRequest {
            message,
            bubble: bubble.clone(),
            history: self.history.snapshot(),
            loading: Self::loading_switch(handle),
        });

        let handle_clone = handle.clone();
        let task_id = self.spawn_task(
            |task_id| async move {
                let result = answer_fut.await;
                handle_clone
                    .send(AnswerFinishedMessage {
                        task_id,
                        bubble,
                        result,
                    })
                    .ok();
            },
            handle,
        );
        self.in_flight = Some(task_id);
        Ok(())
    }

    fn loading_switch(handle: &Actor<Self>) -> LoadingSwitch {
        let handle = handle.clone();
        LoadingSwitch::new(move |active| {
            if handle.send(SetLoading(active)).is_err() {
                trace!("loading switched after the widget was destroyed");
            }
        })
    }

    /// Renders a message and appends it to the history.
    ///
    /// Without a `bubble`, a new one is created for `role`. With a
    /// `bubble`, a blank `message` keeps what the bubble already shows, and
    /// the role follows the kind of the bubble.
    fn add_message(
        &mut self,
        message: &str,
        role: &str,
        bubble: Option<&Bubble>,
    ) -> Result<(), Error> {
        let entry = match bubble {
            Some(bubble) => {
                let content = if message.trim().is_empty() {
                    bubble.content()
                } else {
                    message.to_owned()
                };
                if content.trim().is_empty() {
                    return Err(Error::empty_message()
                        .with_reason("the answer left its bubble empty"));
                }
                // The final text is written even when it is kept.
                bubble.set_content(&content);
                let role = match bubble.kind() {
                    BubbleKind::Outbound => USER_ROLE,
                    BubbleKind::Inbound => self.view.agent_name(),
                };
                HistoryEntry::new(content, role)
            }
            None => {
                if message.trim().is_empty() {
                    return Err(Error::empty_message());
                }
                let bubble = self.view.next_message_element(role);
                bubble.set_content(message);
                HistoryEntry::new(message, role)
            }
        };

        self.history.push(entry);
        self.view.scroll();
        Ok(())
    }

    fn push_agent_message(&mut self, message: String) {
        self.view.set_loading(false);
        self.view.flag_new_message();
        let agent_name = self.view.agent_name().to_owned();
        if let Err(err) = self.add_message(&message, &agent_name, None) {
            self.report_fault(err);
        }
    }

    fn finish_answer(
        &mut self,
        task_id: u64,
        bubble: Bubble,
        result: AnswerResult,
        handle: &Actor<Self>,
    ) {
        if self.in_flight != Some(task_id) {
            warn!("dropping the answer of a stale task {task_id}");
            return;
        }
        self.in_flight = None;
        bubble.set_placeholder(false);

        match result {
            Ok(reply) => {
                debug!("answer resolved: {reply:?}");
                let reply = reply.unwrap_or_default();
                let agent_name = self.view.agent_name().to_owned();
                if let Err(err) =
                    self.add_message(&reply, &agent_name, Some(&bubble))
                {
                    self.report_fault(err);
                }
            }
            Err(err) => {
                bubble.set_failed(true);
                bubble.set_content(&self.answer_failure_text);
                self.view.scroll();
                self.report_fault(
                    Error::answer_failed().with_reason(err.to_string()),
                );
            }
        }

        self.view.set_loading(false);
        self.view.flag_new_message();
        self.process_next_pending(handle);
    }

    fn process_next_pending(&mut self, handle: &Actor<Self>) {
        while let Some(message) = self.pending.pop_front() {
            match self.dispatch(message, handle) {
                Ok(()) => return,
                Err(err) => self.report_fault(err),
            }
        }
        // Nothing to process, so we can invoke the idle callback.
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn report_fault(&self, err: Error) {
        error!("widget fault: {err}");
        if let Some(on_fault) = &self.on_fault {
            on_fault(&err);
        }
    }

    fn spawn_task<F, Fut>(&mut self, f: F, handle: &Actor<Self>) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let handle = handle.clone();
        let fut = f(task_id);
        let task = tokio::spawn(async move {
            fut.await;
            handle.send(TaskEndedMessage(task_id)).ok();
        });
        self.running_tasks.insert(task_id, task);
        task_id
    }
}

#[derive(Debug)]
pub(crate) struct Submit(pub Trigger);

impl Request<WidgetState> for Submit {
    type Reply = Result<SubmitOutcome, Error>;

    #[inline]
    fn handle(
        self,
        state: &mut WidgetState,
        handle: &Actor<WidgetState>,
    ) -> Self::Reply {
        trace!("submit: {:?}", self.0);
        state.submit(self.0, handle)
    }
}

#[derive(Debug)]
pub(crate) struct PushAgentMessage(pub String);

impl Message<WidgetState> for PushAgentMessage {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.push_agent_message(self.0);
    }
}

#[derive(Debug)]
pub(crate) struct SetLoading(pub bool);

impl Message<WidgetState> for SetLoading {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.view.set_loading(self.0);
    }
}

#[derive(Debug)]
pub(crate) struct Open;

impl Message<WidgetState> for Open {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.view.open();
    }
}

#[derive(Debug)]
pub(crate) struct Close;

impl Message<WidgetState> for Close {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        state.view.close();
    }
}

#[derive(Debug)]
pub(crate) struct IsOpen;

impl Request<WidgetState> for IsOpen {
    type Reply = bool;

    #[inline]
    fn handle(self, state: &mut WidgetState, _: &Actor<WidgetState>) -> bool {
        state.view.is_open()
    }
}

#[derive(Debug)]
pub(crate) struct IsLoading;

impl Request<WidgetState> for IsLoading {
    type Reply = bool;

    #[inline]
    fn handle(self, state: &mut WidgetState, _: &Actor<WidgetState>) -> bool {
        state.view.is_loading()
    }
}

#[derive(Debug)]
pub(crate) struct GetHistory;

impl Request<WidgetState> for GetHistory {
    type Reply = Arc<[HistoryEntry]>;

    #[inline]
    fn handle(
        self,
        state: &mut WidgetState,
        _handle: &Actor<WidgetState>,
    ) -> Self::Reply {
        state.history.snapshot()
    }
}

#[derive(Debug)]
pub(crate) struct NextMessageElement(pub String);

impl Request<WidgetState> for NextMessageElement {
    type Reply = Bubble;

    #[inline]
    fn handle(
        self,
        state: &mut WidgetState,
        _handle: &Actor<WidgetState>,
    ) -> Bubble {
        state.view.next_message_element(&self.0)
    }
}

struct AnswerFinishedMessage {
    task_id: u64,
    bubble: Bubble,
    result: AnswerResult,
}

impl Debug for AnswerFinishedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerFinishedMessage")
            .field("task_id", &self.task_id)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl Message<WidgetState> for AnswerFinishedMessage {
    fn handle(self, state: &mut WidgetState, handle: &Actor<WidgetState>) {
        state.finish_answer(self.task_id, self.bubble, self.result, handle);
    }
}

#[derive(Debug)]
struct TaskEndedMessage(u64);

impl Message<WidgetState> for TaskEndedMessage {
    #[inline]
    fn handle(self, state: &mut WidgetState, _handle: &Actor<WidgetState>) {
        if state.running_tasks.remove(&self.0).is_none() {
            warn!("task {} ended but was never tracked", self.0);
        }
    }
}
