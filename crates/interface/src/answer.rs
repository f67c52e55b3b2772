use std::error::Error;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::bubble::Bubble;
use crate::history::HistoryEntry;

/// A capability to switch the widget's loading indicator.
///
/// Long-running answers can use it to clear or reassert loading between
/// steps. Switching it after the widget is gone has no effect.
#[derive(Clone)]
pub struct LoadingSwitch(Arc<dyn Fn(bool) + Send + Sync>);

impl LoadingSwitch {
    /// Creates a switch that forwards to the given function.
    #[inline]
    pub fn new(set_loading: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self(Arc::new(set_loading))
    }

    /// Turns the loading indicator on or off. Idempotent.
    #[inline]
    pub fn set(&self, active: bool) {
        (self.0)(active)
    }
}

impl Debug for LoadingSwitch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingSwitch").finish_non_exhaustive()
    }
}

/// Everything a responder gets for one submitted message.
#[derive(Clone, Debug)]
pub struct AnswerRequest {
    /// The submitted text.
    pub message: String,
    /// The inbound bubble reserved for the answer.
    ///
    /// Responders may stream into it directly. If they do, they should
    /// resolve with `None` so the widget keeps what they wrote.
    pub bubble: Bubble,
    /// The conversation so far, ending with the submitted message.
    pub history: Arc<[HistoryEntry]>,
    /// Switch for the loading indicator.
    pub loading: LoadingSwitch,
}

/// Produces answers to user messages.
///
/// Once the responder is handed to a widget, it should behave like a
/// stateless object: every call gets a complete [`AnswerRequest`] and the
/// returned future must not borrow the responder.
pub trait Responder: Send + Sync + 'static {
    /// The error type of a failed answer.
    type Error: Error + Send + Sync + 'static;

    /// Answers a message.
    ///
    /// # Return value
    ///
    /// - `Ok(Some(text))` replaces the content of the bubble with `text`.
    /// - `Ok(None)` means the responder already wrote into the bubble.
    /// - `Err(error)` means no answer could be produced.
    fn answer(
        &self,
        request: AnswerRequest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static;
}

/// A [`Responder`] made from an async function. See [`responder_fn`].
#[derive(Clone)]
pub struct FnResponder<F>(F);

/// Wraps an async function into a [`Responder`].
#[inline]
pub fn responder_fn<F, Fut, E>(f: F) -> FnResponder<F>
where
    F: Fn(AnswerRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<String>, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    FnResponder(f)
}

impl<F, Fut, E> Responder for FnResponder<F>
where
    F: Fn(AnswerRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<String>, E>> + Send + 'static,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    #[inline]
    fn answer(
        &self,
        request: AnswerRequest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        (self.0)(request)
    }
}

impl<F> Debug for FnResponder<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResponder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::{BubbleKind, BubbleNode, USER_ROLE};

    #[derive(Default)]
    struct Node(Mutex<String>);

    impl BubbleNode for Node {
        fn content(&self) -> String {
            self.0.lock().unwrap().clone()
        }

        fn set_content(&self, content: &str) {
            *self.0.lock().unwrap() = content.to_owned();
        }

        fn set_placeholder(&self, _placeholder: bool) {}
    }

    #[tokio::test]
    async fn test_fn_responder() {
        let loading = Arc::new(AtomicBool::new(true));
        let request = AnswerRequest {
            message: "ping".to_owned(),
            bubble: Bubble::new(BubbleKind::Inbound, Node::default()),
            history: vec![HistoryEntry::new("ping", USER_ROLE)].into(),
            loading: LoadingSwitch::new({
                let loading = Arc::clone(&loading);
                move |active| loading.store(active, Ordering::Relaxed)
            }),
        };
        let bubble = request.bubble.clone();

        let responder = responder_fn(|request: AnswerRequest| async move {
            request.loading.set(false);
            request.bubble.push_str("po");
            request.bubble.push_str("ng");
            Ok::<_, Infallible>(None)
        });

        let reply = responder.answer(request).await.unwrap();
        assert_eq!(reply, None);
        assert_eq!(bubble.content(), "pong");
        assert!(!loading.load(Ordering::Relaxed));
    }
}
