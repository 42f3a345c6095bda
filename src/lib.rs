//! Streaming decoder for the server-sent events of a conversational-AI backend.
//!
//! Raw byte chunks go in; ordered, non-empty text fragments come out.

mod chunk;
mod controller;
mod decoder;
mod error;
mod event;
mod extract;
mod frame;
mod lines;
mod options;
mod sink;

pub use chunk::ChunkDecoder;
pub use controller::{StreamController, collect_text};
pub use decoder::{FragmentDecoder, StreamStats};
pub use error::{BoxError, ErrorKind, StreamError};
pub use event::Frame;
pub use extract::ContentExtractor;
pub use frame::EventFrameTracker;
pub use lines::{LineBuffer, Lines};
pub use options::{DELTA_EVENT, DONE_SENTINEL, DecoderOptions};
pub use sink::{FragmentSink, Transcript};

pub use tokio_util::sync::CancellationToken;
