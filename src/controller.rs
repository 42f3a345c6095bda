use std::pin::pin;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::decoder::{FragmentDecoder, StreamStats};
use crate::error::{BoxError, StreamError};
use crate::options::DecoderOptions;
use crate::sink::{FragmentSink, Transcript};

/// Drives a byte stream through a [`FragmentDecoder`] into a [`FragmentSink`].
///
/// Each chunk is fully decoded and its fragments delivered before the next
/// chunk is requested.
#[derive(Debug)]
pub struct StreamController {
    decoder: FragmentDecoder,
    cancel: CancellationToken,
}

impl Default for StreamController {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamController {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            decoder: FragmentDecoder::with_options(options),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the controller's token, e.g. with a child of a session-wide one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that aborts [`run`](Self::run) when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Consumes `source` until it ends, fails, or the run is cancelled.
    ///
    /// Exactly one of `on_complete` or `on_error` is called on `sink`.
    pub async fn run<S, B, E, K>(mut self, source: S, sink: &mut K) -> StreamStats
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<BoxError>,
        K: FragmentSink + ?Sized,
    {
        let mut source = pin!(source);
        debug!("sse stream started");

        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                next = source.next() => Some(next),
            };

            let Some(next) = next else {
                return self.fail(sink, StreamError::Cancelled);
            };

            match next {
                Some(Ok(chunk)) => {
                    for fragment in self.decoder.feed(chunk.as_ref()) {
                        if self.cancel.is_cancelled() {
                            return self.fail(sink, StreamError::Cancelled);
                        }
                        sink.on_fragment(&fragment);
                    }
                }
                Some(Err(e)) => {
                    let error = StreamError::source_failure(e);
                    warn!(error = %error, "sse stream failed");
                    return self.fail(sink, error);
                }
                None => break,
            }
        }

        for fragment in self.decoder.finish() {
            sink.on_fragment(&fragment);
        }
        sink.on_complete();

        let stats = self.decoder.stats();
        debug!(
            chunks = stats.chunks,
            bytes = stats.bytes,
            fragments = stats.fragments,
            "sse stream complete"
        );
        stats
    }

    fn fail<K>(&self, sink: &mut K, error: StreamError) -> StreamStats
    where
        K: FragmentSink + ?Sized,
    {
        if error.is_cancelled() {
            debug!("sse stream cancelled");
        }
        sink.on_error(error);
        self.decoder.stats()
    }
}

/// Decodes `source` to completion and returns the concatenated fragments.
pub async fn collect_text<S, B, E>(source: S) -> Result<String, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<BoxError>,
{
    let mut transcript = Transcript::new();
    StreamController::new().run(source, &mut transcript).await;
    transcript.into_result()
}
