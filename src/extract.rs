use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::options::DELTA_EVENT;

const FOLLOW_UP: &str = "follow_up";

/// Pulls assistant text out of a single data payload.
///
/// Payloads are JSON objects in one of several shapes:
///
/// ```text
/// { "content": "text" }
/// { "data": { "content": "text" } }
/// { "data": { "contents": [ { "content": "text" }, ... ] } }
/// ```
///
/// Every matching shape contributes, in the order listed. Anything else,
/// including malformed JSON, yields nothing.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    delta_event: String,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::with_delta_event(DELTA_EVENT)
    }

    pub fn with_delta_event(name: impl Into<String>) -> Self {
        Self {
            delta_event: name.into(),
        }
    }

    pub fn extract(&self, event: &str, payload: &str) -> Vec<String> {
        if !event.is_empty() && event != self.delta_event {
            trace!(event, "skipping non-delta event");
            return Vec::new();
        }

        let object = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                trace!("skipping non-object payload");
                return Vec::new();
            }
            Err(e) => {
                trace!(error = %e, "skipping malformed payload");
                return Vec::new();
            }
        };

        if is_follow_up(&object) {
            trace!("skipping follow-up suggestion");
            return Vec::new();
        }

        if let Some(error) = object.get("error") {
            warn!(%error, "upstream reported an error in-band");
        }

        let mut fragments = Vec::new();

        if let Some(Value::String(text)) = object.get("content") {
            push_fragment(&mut fragments, text);
        }

        if let Some(Value::Object(data)) = object.get("data") {
            if let Some(Value::String(text)) = data.get("content") {
                push_fragment(&mut fragments, text);
            }
            if let Some(Value::Array(contents)) = data.get("contents") {
                for item in contents {
                    if let Some(Value::String(text)) = item.get("content") {
                        push_fragment(&mut fragments, text);
                    }
                }
            }
        }

        fragments
    }
}

fn is_follow_up(object: &Map<String, Value>) -> bool {
    ["type", "msg_type"]
        .iter()
        .any(|key| object.get(*key).and_then(Value::as_str) == Some(FOLLOW_UP))
}

fn push_fragment(fragments: &mut Vec<String>, text: &str) {
    if !text.trim().is_empty() {
        fragments.push(text.to_owned());
    }
}
