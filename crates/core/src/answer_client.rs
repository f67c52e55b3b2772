use std::error::Error as StdError;
use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;

use no_brainer_chat_interface::{AnswerRequest, Responder};
use tracing::Instrument;

pub(crate) type AnswerError = Box<dyn StdError + Send + Sync>;
pub(crate) type AnswerResult = Result<Option<String>, AnswerError>;
pub(crate) type BoxedAnswerFuture =
    Pin<Box<dyn Future<Output = AnswerResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(AnswerRequest) -> BoxedAnswerFuture + Send + Sync>;

/// A type-erased [`Responder`].
#[derive(Clone)]
pub struct AnswerClient {
    handler_fn: HandlerFn,
}

impl AnswerClient {
    /// Wraps a responder.
    #[inline]
    pub fn new<R: Responder>(responder: R) -> Self {
        // We have to erase the type `R`, since neither the widget nor its
        // configuration has a generic parameter.
        let handler_fn: HandlerFn = Arc::new(
            move |request: AnswerRequest| -> BoxedAnswerFuture {
                trace!("asking for an answer to: {:?}", request.message);
                let fut = responder.answer(request);
                Box::pin(
                    async move {
                        match fut.await {
                            Ok(reply) => {
                                trace!("answer resolved: {reply:?}");
                                Ok(reply)
                            }
                            Err(err) => {
                                error!("answer failed: {err}");
                                let err: AnswerError = Box::new(err);
                                Err(err)
                            }
                        }
                    }
                    .instrument(trace_span!("answer")),
                )
            },
        );
        Self { handler_fn }
    }

    /// Starts answering a request.
    ///
    /// The responder is called right away. The returned future only
    /// waits for the answer and is independent of `self`.
    #[inline]
    pub(crate) fn answer(&self, request: AnswerRequest) -> BoxedAnswerFuture {
        (self.handler_fn)(request)
    }
}

impl Debug for AnswerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use no_brainer_chat_interface::{
        Bubble, BubbleKind, HistoryEntry, LoadingSwitch,
    };
    use no_brainer_chat_test_kit::{
        PresetAnswer, ScriptedResponder, TestBubbleNode,
    };

    use super::*;

    fn request(message: &str) -> AnswerRequest {
        AnswerRequest {
            message: message.to_owned(),
            bubble: Bubble::new(BubbleKind::Inbound, TestBubbleNode::default()),
            history: Arc::from(vec![HistoryEntry::new(message, "user")]),
            loading: LoadingSwitch::new(|_| {}),
        }
    }

    #[tokio::test]
    async fn test_answer() {
        let responder = ScriptedResponder::new();
        responder.add_answer(PresetAnswer::reply("pong"));
        let client = AnswerClient::new(responder.clone());

        let fut = client.answer(request("ping"));
        // The responder has been called before the future is polled.
        assert_eq!(responder.calls().len(), 1);
        assert_eq!(fut.await.unwrap(), Some("pong".to_owned()));
    }

    #[tokio::test]
    async fn test_error_handling() {
        let client = AnswerClient::new(ScriptedResponder::new());
        let err = client.answer(request("ping")).await.unwrap_err();
        assert_eq!(err.to_string(), "no preset answer left");
    }
}
