use std::convert::Infallible;
use std::time::Duration;

use no_brainer_chat_interface::{AnswerRequest, Responder};
use tokio::time::sleep;

const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(80);
const THINKING_WORDS: u32 = 5;

/// Echoes every message back, streaming it into the bubble word by word.
#[derive(Clone, Copy, Debug)]
pub struct EchoResponder {
    word_delay: Duration,
}

impl EchoResponder {
    /// Creates an echo responder with the default pace.
    #[inline]
    pub fn new() -> Self {
        Self {
            word_delay: DEFAULT_WORD_DELAY,
        }
    }

    /// Sets the pause before each word.
    #[inline]
    pub fn with_word_delay(self, word_delay: Duration) -> Self {
        Self { word_delay }
    }
}

impl Default for EchoResponder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for EchoResponder {
    type Error = Infallible;

    fn answer(
        &self,
        request: AnswerRequest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        let word_delay = self.word_delay;
        async move {
            sleep(word_delay * THINKING_WORDS).await;
            // Streaming is visible progress, the spinner is not needed.
            request.loading.set(false);

            request.bubble.push_str("You said:");
            for word in request.message.split_whitespace() {
                sleep(word_delay).await;
                request.bubble.push_str(" ");
                request.bubble.push_str(word);
            }
            Ok(None)
        }
    }
}
