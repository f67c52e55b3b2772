//! Widget configuration and its defaults.

use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use no_brainer_chat_interface::{AnswerRequest, Responder, Styles};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::answer_client::AnswerClient;

/// A check run against the input text. Every returned string is shown
/// to the user, and a non-empty list blocks the submission.
pub type InputCheck = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

const DEFAULT_AGENT_NAME: &str = "assistant";
const DEFAULT_AVATAR_URL: &str =
    "https://code-for-me.com/build/images/logo-code-md.svg";
const DEFAULT_ANSWER: &str = "God does not play dice with the universe.";
const DEFAULT_ANSWER_DELAY: Duration = Duration::from_secs(3);
const DEFAULT_FAILURE_TEXT: &str =
    "Sorry, something went wrong. Please try again.";
const MIN_MESSAGE_CHARS: usize = 3;
const MAX_MESSAGE_CHARS: usize = 512;

static SQL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)select|insert|update|delete|drop|truncate|alter|create|grant",
    )
    .unwrap()
});

/// Rejects messages shorter than 3 or longer than 512 characters.
pub fn default_validate(message: &str) -> Vec<String> {
    let len = message.chars().count();
    let mut errors = vec![];
    if len < MIN_MESSAGE_CHARS {
        errors.push(format!(
            "Message must be at least {MIN_MESSAGE_CHARS} characters long"
        ));
    }
    if len > MAX_MESSAGE_CHARS {
        errors.push(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters long"
        ));
    }
    errors
}

/// Warns about input that looks like SQL.
pub fn default_on_input(message: &str) -> Vec<String> {
    if SQL_KEYWORDS.is_match(message) {
        vec!["SQL Injection detected".to_owned()]
    } else {
        vec![]
    }
}

/// Answers every message with the same quote after three seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResponder;

impl Responder for DefaultResponder {
    type Error = Infallible;

    fn answer(
        &self,
        _request: AnswerRequest,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'static
    {
        async {
            tokio::time::sleep(DEFAULT_ANSWER_DELAY).await;
            Ok(Some(DEFAULT_ANSWER.to_owned()))
        }
    }
}

/// Partial [`Styles`]. Present keys replace the defaults one by one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylesOverride {
    /// Overrides [`Styles::opener_bg_color`].
    pub opener_bg_color: Option<String>,
    /// Overrides [`Styles::opener_fill_color`].
    pub opener_fill_color: Option<String>,
    /// Overrides [`Styles::chat_bg_color`].
    pub chat_bg_color: Option<String>,
    /// Overrides [`Styles::chat_text_color`].
    pub chat_text_color: Option<String>,
    /// Overrides [`Styles::chat_textarea_bg_color`].
    pub chat_textarea_bg_color: Option<String>,
    /// Overrides [`Styles::chat_header_bg_color`].
    pub chat_header_bg_color: Option<String>,
    /// Overrides [`Styles::chat_buttons_bg_color`].
    pub chat_buttons_bg_color: Option<String>,
    /// Overrides [`Styles::chat_textarea_color`].
    pub chat_textarea_color: Option<String>,
    /// Overrides [`Styles::font_family`].
    pub font_family: Option<String>,
    /// Overrides [`Styles::loader_color`].
    pub loader_color: Option<String>,
}

impl StylesOverride {
    /// Writes every present key over `styles`.
    pub fn apply_to(self, styles: &mut Styles) {
        let Self {
            opener_bg_color,
            opener_fill_color,
            chat_bg_color,
            chat_text_color,
            chat_textarea_bg_color,
            chat_header_bg_color,
            chat_buttons_bg_color,
            chat_textarea_color,
            font_family,
            loader_color,
        } = self;

        let pairs = [
            (opener_bg_color, &mut styles.opener_bg_color),
            (opener_fill_color, &mut styles.opener_fill_color),
            (chat_bg_color, &mut styles.chat_bg_color),
            (chat_text_color, &mut styles.chat_text_color),
            (chat_textarea_bg_color, &mut styles.chat_textarea_bg_color),
            (chat_header_bg_color, &mut styles.chat_header_bg_color),
            (chat_buttons_bg_color, &mut styles.chat_buttons_bg_color),
            (chat_textarea_color, &mut styles.chat_textarea_color),
            (font_family, &mut styles.font_family),
            (loader_color, &mut styles.loader_color),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Caller-supplied configuration. Every field is optional.
///
/// Identity and styling can be loaded from JSON with the same keys as
/// [`Styles`]; callbacks are set in code.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOptions {
    /// Name shown in the header and used as the role of agent messages.
    pub agent_name: Option<String>,
    /// Avatar shown in the header.
    pub agent_avatar_url: Option<String>,
    /// Styles to change.
    pub styles: Option<StylesOverride>,
    /// Text written into the bubble of a failed answer.
    pub answer_failure_text: Option<String>,
    /// Hard check run on submission.
    #[serde(skip)]
    pub validate: Option<InputCheck>,
    /// Soft check run on every input event.
    #[serde(skip)]
    pub on_input: Option<InputCheck>,
    /// Produces the answers.
    #[serde(skip)]
    pub answer: Option<AnswerClient>,
}

impl Debug for WidgetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetOptions")
            .field("agent_name", &self.agent_name)
            .field("agent_avatar_url", &self.agent_avatar_url)
            .field("styles", &self.styles)
            .field("answer_failure_text", &self.answer_failure_text)
            .field("validate", &self.validate.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("answer", &self.answer)
            .finish()
    }
}

/// A complete widget configuration.
#[derive(Clone)]
pub struct WidgetConfig {
    /// Agent name as configured. It is capitalized when the widget mounts.
    pub agent_name: String,
    /// Avatar shown in the header.
    pub agent_avatar_url: String,
    /// Colors and font.
    pub styles: Styles,
    /// Written into the bubble of an answer that failed.
    pub answer_failure_text: String,
    /// Hard check run on submission.
    pub validate: InputCheck,
    /// Soft check run on every input event.
    pub on_input: InputCheck,
    /// Produces the answers.
    pub answer: AnswerClient,
}

impl WidgetConfig {
    /// Builds the default configuration. Each call returns a fresh value.
    pub fn defaults() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_owned(),
            agent_avatar_url: DEFAULT_AVATAR_URL.to_owned(),
            styles: default_styles(),
            answer_failure_text: DEFAULT_FAILURE_TEXT.to_owned(),
            validate: Arc::new(default_validate),
            on_input: Arc::new(default_on_input),
            answer: AnswerClient::new(DefaultResponder),
        }
    }

    /// Overrides every field present in `options`. Styles are merged key
    /// by key rather than replaced as a whole.
    pub fn merge(mut self, options: WidgetOptions) -> Self {
        let WidgetOptions {
            agent_name,
            agent_avatar_url,
            styles,
            answer_failure_text,
            validate,
            on_input,
            answer,
        } = options;

        if let Some(agent_name) = agent_name {
            self.agent_name = agent_name;
        }
        if let Some(agent_avatar_url) = agent_avatar_url {
            self.agent_avatar_url = agent_avatar_url;
        }
        if let Some(styles) = styles {
            styles.apply_to(&mut self.styles);
        }
        if let Some(answer_failure_text) = answer_failure_text {
            self.answer_failure_text = answer_failure_text;
        }
        if let Some(validate) = validate {
            self.validate = validate;
        }
        if let Some(on_input) = on_input {
            self.on_input = on_input;
        }
        if let Some(answer) = answer {
            self.answer = answer;
        }
        self
    }
}

impl Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("agent_name", &self.agent_name)
            .field("agent_avatar_url", &self.agent_avatar_url)
            .field("styles", &self.styles)
            .field("answer_failure_text", &self.answer_failure_text)
            .finish_non_exhaustive()
    }
}

fn default_styles() -> Styles {
    Styles {
        opener_bg_color: "#202123".to_owned(),
        opener_fill_color: "#413e50".to_owned(),
        chat_bg_color: "#343541".to_owned(),
        chat_text_color: "#fff".to_owned(),
        chat_textarea_bg_color: "#514f60".to_owned(),
        chat_header_bg_color: "#202123".to_owned(),
        chat_buttons_bg_color: "#473f56".to_owned(),
        chat_textarea_color: "#fff".to_owned(),
        font_family: "system-ui, -apple-system, BlinkMacSystemFont, \
                      \"Segoe UI\", Roboto, Oxygen, Ubuntu, Cantarell, \
                      \"Open Sans\", \"Helvetica Neue\", sans-serif"
            .to_owned(),
        loader_color: "#9880ff".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validate() {
        assert_eq!(
            default_validate("hi"),
            vec!["Message must be at least 3 characters long".to_owned()]
        );
        assert!(default_validate("hey").is_empty());
        // Length is counted in characters, not bytes.
        assert!(default_validate("äöü").is_empty());
        assert!(default_validate(&"a".repeat(512)).is_empty());
        assert_eq!(
            default_validate(&"a".repeat(513)),
            vec!["Message must be at most 512 characters long".to_owned()]
        );
    }

    #[test]
    fn test_default_on_input() {
        assert_eq!(
            default_on_input("please DROP TABLE users"),
            vec!["SQL Injection detected".to_owned()]
        );
        assert_eq!(default_on_input("Select one").len(), 1);
        assert!(default_on_input("hello there").is_empty());
    }

    #[test]
    fn test_defaults_are_fresh() {
        let mut first = WidgetConfig::defaults();
        first.styles.chat_bg_color = "#000".to_owned();
        first.agent_name = "changed".to_owned();

        let second = WidgetConfig::defaults();
        assert_eq!(second.styles.chat_bg_color, "#343541");
        assert_eq!(second.agent_name, "assistant");
    }

    #[test]
    fn test_merge_styles_key_by_key() {
        let options = WidgetOptions {
            agent_name: Some("robo".to_owned()),
            styles: Some(StylesOverride {
                chat_bg_color: Some("#000".to_owned()),
                loader_color: Some("red".to_owned()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = WidgetConfig::defaults().merge(options);

        assert_eq!(config.agent_name, "robo");
        assert_eq!(config.agent_avatar_url, DEFAULT_AVATAR_URL);
        assert_eq!(config.styles.chat_bg_color, "#000");
        assert_eq!(config.styles.loader_color, "red");
        assert_eq!(config.styles.opener_bg_color, "#202123");
        assert_eq!(config.styles.chat_text_color, "#fff");
    }

    #[test]
    fn test_merge_callbacks() {
        let options = WidgetOptions {
            validate: Some(Arc::new(|_: &str| Vec::<String>::new())),
            ..Default::default()
        };
        let config = WidgetConfig::defaults().merge(options);
        assert!((config.validate)("").is_empty());
        assert_eq!((config.on_input)("drop").len(), 1);
    }

    #[test]
    fn test_options_from_json() {
        let options: WidgetOptions = serde_json::from_str(
            r##"{
                "agentName": "helper",
                "styles": { "chatBgColor": "#101010", "fontFamily": "serif" }
            }"##,
        )
        .unwrap();
        let config = WidgetConfig::defaults().merge(options);

        assert_eq!(config.agent_name, "helper");
        assert_eq!(config.styles.chat_bg_color, "#101010");
        assert_eq!(config.styles.font_family, "serif");
        assert_eq!(config.styles.chat_header_bg_color, "#202123");
    }
}
