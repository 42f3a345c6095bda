use tracing::trace;

use crate::chunk::ChunkDecoder;
use crate::extract::ContentExtractor;
use crate::frame::EventFrameTracker;
use crate::lines::LineBuffer;
use crate::options::DecoderOptions;

/// Counters collected while decoding one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: u64,
    pub bytes: u64,
    pub lines: u64,
    pub frames: u64,
    pub fragments: u64,
}

/// Synchronous decoding pipeline: bytes in, text fragments out.
///
/// Output depends only on the concatenation of the fed chunks, never on where
/// the chunk boundaries fall.
#[derive(Debug)]
pub struct FragmentDecoder {
    chunks: ChunkDecoder,
    lines: LineBuffer,
    tracker: EventFrameTracker,
    extractor: ContentExtractor,
    stats: StreamStats,
}

impl Default for FragmentDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentDecoder {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            chunks: ChunkDecoder::new(),
            lines: LineBuffer::with_capacity(options.line_capacity),
            tracker: EventFrameTracker::with_done_sentinel(options.done_sentinel),
            extractor: ContentExtractor::with_delta_event(options.delta_event),
            stats: StreamStats::default(),
        }
    }

    /// Decodes one chunk and returns the fragments completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len() as u64;

        let text = self.chunks.decode(chunk, false);
        self.drain(&text)
    }

    /// Ends the stream. An unterminated final line is dropped.
    pub fn finish(&mut self) -> Vec<String> {
        let text = self.chunks.decode(&[], true);
        let fragments = self.drain(&text);

        let tail = self.lines.finish();
        if !tail.is_empty() {
            trace!(tail = %tail, "dropping unterminated final line");
        }

        fragments
    }

    /// The event name currently in force.
    pub fn current_event(&self) -> &str {
        self.tracker.current_event()
    }

    /// Decoded text still waiting for its `\n`.
    pub fn pending(&self) -> &str {
        self.lines.pending()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    fn drain(&mut self, text: &str) -> Vec<String> {
        let mut fragments = Vec::new();

        for line in self.lines.push(text) {
            self.stats.lines += 1;
            if let Some(frame) = self.tracker.process(line) {
                self.stats.frames += 1;
                fragments.extend(self.extractor.extract(frame.event, frame.data));
            }
        }

        self.stats.fragments += fragments.len() as u64;
        fragments
    }
}
