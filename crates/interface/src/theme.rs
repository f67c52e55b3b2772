use serde::{Deserialize, Serialize};

/// Colors and font of the widget.
///
/// Anything else can be changed by redefining the CSS classes of the
/// host page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    /// Background of the opener.
    pub opener_bg_color: String,
    /// Icon fill of the opener.
    pub opener_fill_color: String,
    /// Background of the panel.
    pub chat_bg_color: String,
    /// Text color of the panel.
    pub chat_text_color: String,
    /// Background of the input field.
    pub chat_textarea_bg_color: String,
    /// Background of the header.
    pub chat_header_bg_color: String,
    /// Background of the buttons.
    pub chat_buttons_bg_color: String,
    /// Text color of the input field.
    pub chat_textarea_color: String,
    /// Font stack.
    pub font_family: String,
    /// Color of the loading indicator.
    pub loader_color: String,
}

impl Styles {
    /// Projects every field onto its theming variable name.
    pub fn variables(&self) -> [(&'static str, &str); 10] {
        [
            (
                "--no-brainer-chat-opener-bg-color",
                self.opener_bg_color.as_str(),
            ),
            (
                "--no-brainer-chat-opener-fill-color",
                self.opener_fill_color.as_str(),
            ),
            ("--no-brainer-chat-bg-color", self.chat_bg_color.as_str()),
            ("--no-brainer-chat-text-color", self.chat_text_color.as_str()),
            (
                "--no-brainer-chat-textarea-bg-color",
                self.chat_textarea_bg_color.as_str(),
            ),
            (
                "--no-brainer-chat-header-bg-color",
                self.chat_header_bg_color.as_str(),
            ),
            (
                "--no-brainer-chat-buttons-bg-color",
                self.chat_buttons_bg_color.as_str(),
            ),
            (
                "--no-brainer-chat-textarea-color",
                self.chat_textarea_color.as_str(),
            ),
            ("--no-brainer-font", self.font_family.as_str()),
            ("--no-brainer-chat-loader-color", self.loader_color.as_str()),
        ]
    }
}
