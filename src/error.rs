use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause reported by the byte source.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Terminal failures of a decode run.
///
/// Malformed bytes, malformed JSON and unrecognized payload shapes are never
/// reported here; they are dropped inside the pipeline.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("byte stream failed: {source}")]
    Source { source: BoxError },

    #[error("stream cancelled")]
    Cancelled,
}

/// Coarse classification of a [`StreamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Source,
    Cancelled,
}

impl StreamError {
    pub fn source_failure(cause: impl Into<BoxError>) -> Self {
        StreamError::Source {
            source: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Source { .. } => ErrorKind::Source,
            StreamError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_source_failure_keeps_cause() {
        let err =
            StreamError::source_failure(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));

        assert_eq!(err.kind(), ErrorKind::Source);
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "byte stream failed: reset");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("reset"));
    }

    #[test]
    fn test_cancelled_has_no_cause() {
        let err = StreamError::Cancelled;

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(err.is_cancelled());
        assert!(err.source().is_none());
    }
}
