use serde::Deserialize;

/// Event name whose payloads carry assistant text.
pub const DELTA_EVENT: &str = "conversation.message.delta";

/// Data payload announcing the logical end of generation.
pub const DONE_SENTINEL: &str = "[DONE]";

const DEFAULT_LINE_CAPACITY: usize = 8 * 1024;

/// Tunables for a [`FragmentDecoder`](crate::FragmentDecoder).
///
/// Every field has a default, so a partial table in a host's config file is
/// enough:
///
/// ```
/// let options: delta_events::DecoderOptions =
///     serde_json::from_str(r#"{ "delta_event": "chat.delta" }"#).unwrap();
/// assert_eq!(options.done_sentinel, "[DONE]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    pub delta_event: String,
    pub done_sentinel: String,
    pub line_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            delta_event: DELTA_EVENT.to_owned(),
            done_sentinel: DONE_SENTINEL.to_owned(),
            line_capacity: DEFAULT_LINE_CAPACITY,
        }
    }
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delta_event(mut self, name: impl Into<String>) -> Self {
        self.delta_event = name.into();
        self
    }

    pub fn with_done_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.done_sentinel = sentinel.into();
        self
    }

    pub fn with_line_capacity(mut self, capacity: usize) -> Self {
        self.line_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecoderOptions::new();

        assert_eq!(options.delta_event, "conversation.message.delta");
        assert_eq!(options.done_sentinel, "[DONE]");
        assert_eq!(options.line_capacity, DEFAULT_LINE_CAPACITY);
    }

    #[test]
    fn test_partial_deserialize() {
        let options: DecoderOptions =
            serde_json::from_str(r#"{"line_capacity": 16}"#).unwrap();

        assert_eq!(options, DecoderOptions::new().with_line_capacity(16));
    }
}
