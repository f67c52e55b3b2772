use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use no_brainer_chat_interface::{AnswerRequest, HistoryEntry, Responder};
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::PresetAnswer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    message: String,
}

impl Error {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

/// What a [`ScriptedResponder`] was asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

/// Holds answers of a gated [`ScriptedResponder`] until released.
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    /// Lets `count` more answers resolve.
    #[inline]
    pub fn release(&self, count: usize) {
        self.0.add_permits(count);
    }
}

/// A local fake responder for testing purpose.
///
/// Answers are taken from the script in call order. If the script runs
/// out, the answer fails. Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct ScriptedResponder {
    script: Arc<Mutex<VecDeque<PresetAnswer>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedResponder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_answer(&self, preset: PresetAnswer) {
        self.script.lock().unwrap().push_back(preset);
    }

    /// Waits `delay` before each answer and between streamed deltas.
    #[inline]
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = Some(delay);
    }

    /// Makes every answer wait for a permit from the returned gate.
    #[inline]
    pub fn gated(&mut self) -> Gate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&semaphore));
        Gate(semaphore)
    }

    /// Returns every call received so far.
    #[inline]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Responder for ScriptedResponder {
    type Error = Error;

    fn answer(
        &self,
        request: AnswerRequest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        self.calls.lock().unwrap().push(RecordedCall {
            message: request.message.clone(),
            history: request.history.to_vec(),
        });
        let preset = self.script.lock().unwrap().pop_front();
        let delay = self.delay;
        let gate = self.gate.clone();

        async move {
            let Some(preset) = preset else {
                return Err(Error::new("no preset answer left"));
            };
            for active in preset.loading {
                request.loading.set(active);
            }

            if let Some(gate) = gate {
                gate.acquire()
                    .await
                    .map_err(|_| Error::new("gate closed"))?
                    .forget();
            }
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            for delta in &preset.deltas {
                request.bubble.push_str(delta);
                if let Some(delay) = delay {
                    sleep(delay).await;
                }
            }

            match preset.failure {
                Some(failure) => Err(Error::new(failure)),
                None => Ok(preset.reply),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use no_brainer_chat_interface::{
        Bubble, BubbleKind, LoadingSwitch, USER_ROLE,
    };

    use super::*;
    use crate::TestBubbleNode;

    fn request(message: &str) -> AnswerRequest {
        AnswerRequest {
            message: message.to_owned(),
            bubble: Bubble::new(BubbleKind::Inbound, TestBubbleNode::default()),
            history: vec![HistoryEntry::new(message, USER_ROLE)].into(),
            loading: LoadingSwitch::new(|_| {}),
        }
    }

    #[tokio::test]
    async fn test_script_order() {
        let responder = ScriptedResponder::new();
        responder.add_answer(PresetAnswer::reply("first"));
        responder.add_answer(PresetAnswer::streamed(["sec", "ond"]));

        let first = request("a");
        assert_eq!(
            responder.answer(first).await,
            Ok(Some("first".to_owned()))
        );

        let second = request("b");
        let bubble = second.bubble.clone();
        assert_eq!(responder.answer(second).await, Ok(None));
        assert_eq!(bubble.content(), "second");

        let err = responder.answer(request("c")).await.unwrap_err();
        assert_eq!(err.message(), "no preset answer left");

        let calls = responder.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].message, "b");
        assert_eq!(calls[1].history, vec![HistoryEntry::new("b", USER_ROLE)]);
    }

    #[tokio::test]
    async fn test_failure() {
        let responder = ScriptedResponder::new();
        responder.add_answer(
            PresetAnswer::streamed(["partial"]).with_loading([false]),
        );
        responder.add_answer(PresetAnswer::failure("upstream is down"));
        responder.answer(request("a")).await.unwrap();

        let err = responder.answer(request("b")).await.unwrap_err();
        assert_eq!(err.to_string(), "upstream is down");
    }
}
