use serde::{Deserialize, Serialize};

/// How a scripted responder answers one message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetAnswer {
    /// Loading states to switch to, in order, before anything else.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loading: Vec<bool>,
    /// Text streamed into the bubble, one delta at a time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deltas: Vec<String>,
    /// The value the answer resolves with.
    #[serde(default)]
    pub reply: Option<String>,
    /// If set, the answer fails with this message after streaming.
    #[serde(default)]
    pub failure: Option<String>,
}

impl PresetAnswer {
    /// An answer that resolves with `reply`.
    #[inline]
    pub fn reply<S: Into<String>>(reply: S) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    /// An answer that streams `deltas` into the bubble and resolves with
    /// nothing.
    #[inline]
    pub fn streamed<I, S>(deltas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deltas: deltas.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// An answer that fails with `message`.
    #[inline]
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Switches loading to each of `states` before answering.
    #[inline]
    pub fn with_loading(mut self, states: impl Into<Vec<bool>>) -> Self {
        self.loading = states.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let preset = PresetAnswer::streamed(["Thinking", "... done"])
            .with_loading([false, true]);

        let serialized = serde_json::to_string(&preset).unwrap();
        let deserialized: PresetAnswer =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(preset, deserialized);

        let minimal: PresetAnswer =
            serde_json::from_str(r#"{ "reply": "42" }"#).unwrap();
        assert_eq!(minimal, PresetAnswer::reply("42"));
    }
}
