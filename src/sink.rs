use crate::error::StreamError;

/// Receiver of a decode run's output.
///
/// `on_complete` and `on_error` are mutually exclusive and each fires at most
/// once, after every fragment has been delivered.
pub trait FragmentSink {
    fn on_fragment(&mut self, text: &str);

    fn on_complete(&mut self);

    fn on_error(&mut self, error: StreamError);
}

/// Accumulates the full assistant response of a stream.
#[derive(Debug, Default)]
pub struct Transcript {
    text: String,
    fragments: usize,
    outcome: Option<Result<(), StreamError>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, Some(Ok(())))
    }

    pub fn error(&self) -> Option<&StreamError> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().err())
    }

    /// The accumulated text, or the error that ended the stream.
    pub fn into_result(self) -> Result<String, StreamError> {
        match self.outcome {
            Some(Err(e)) => Err(e),
            _ => Ok(self.text),
        }
    }
}

impl FragmentSink for Transcript {
    fn on_fragment(&mut self, text: &str) {
        self.text.push_str(text);
        self.fragments += 1;
    }

    fn on_complete(&mut self) {
        self.outcome = Some(Ok(()));
    }

    fn on_error(&mut self, error: StreamError) {
        self.outcome = Some(Err(error));
    }
}
