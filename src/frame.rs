use tracing::trace;

use crate::event::Frame;
use crate::options::DONE_SENTINEL;

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    NoEvent,
    InEvent(String),
}

/// Folds SSE lines into [`Frame`]s.
///
/// The event name set by an `event:` line stays in force for every later
/// `data:` line until the next `event:` line. Blank lines do not reset it.
#[derive(Debug)]
pub struct EventFrameTracker {
    state: State,
    done_sentinel: String,
}

impl Default for EventFrameTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFrameTracker {
    pub fn new() -> Self {
        Self::with_done_sentinel(DONE_SENTINEL)
    }

    pub fn with_done_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            state: State::NoEvent,
            done_sentinel: sentinel.into(),
        }
    }

    /// The event name currently in force, empty if none was declared.
    pub fn current_event(&self) -> &str {
        match &self.state {
            State::NoEvent => "",
            State::InEvent(name) => name,
        }
    }

    /// Consumes one line and returns a frame for admitted `data:` lines.
    pub fn process<'a>(&'a mut self, line: &'a str) -> Option<Frame<'a>> {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
            let name = rest.trim();
            self.state = if name.is_empty() {
                State::NoEvent
            } else {
                State::InEvent(name.to_owned())
            };
            return None;
        }

        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            if !line.is_empty() {
                trace!(line, "ignoring non-sse line");
            }
            return None;
        };

        let data = rest.trim();
        if data.is_empty() {
            return None;
        }
        if data == self.done_sentinel {
            trace!("done sentinel received");
            return None;
        }

        Some(Frame {
            event: self.current_event(),
            data,
        })
    }
}
