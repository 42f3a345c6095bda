use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use bytes::Bytes;
use delta_events::{
    ErrorKind, FragmentDecoder, FragmentSink, StreamController, StreamError, Transcript,
    collect_text,
};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use futures::stream;

const TEST_DATA_DIR: &str = "tests/test_data";

const COZE_FRAGMENTS: [&str; 6] = ["今天", "天气", "很好", "。", " Enjoy", " the sun! 🌞"];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn read_test_data(name: &str) -> Vec<u8> {
    let path = Path::new(TEST_DATA_DIR).join(name);
    if !path.exists() {
        panic!("File not found: {}", path.display());
    }
    fs::read(&path).unwrap()
}

fn decode_partitioned(data: &[u8], cuts: &[usize]) -> Vec<String> {
    let mut decoder = FragmentDecoder::new();
    let mut fragments = Vec::new();
    let mut start = 0;

    for &cut in cuts.iter().chain(std::iter::once(&data.len())) {
        fragments.extend(decoder.feed(&data[start..cut]));
        start = cut;
    }
    fragments.extend(decoder.finish());
    fragments
}

/// Deterministic pseudo-random cut points, so failures are reproducible.
fn scattered_cuts(len: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    let mut cuts = Vec::new();
    let mut pos = 0;

    loop {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        pos += 1 + (state >> 59) as usize;
        if pos >= len {
            return cuts;
        }
        cuts.push(pos);
    }
}

#[derive(Debug, Default)]
struct Recorder {
    fragments: Vec<String>,
    completed: usize,
    errors: Vec<StreamError>,
}

impl FragmentSink for Recorder {
    fn on_fragment(&mut self, text: &str) {
        self.fragments.push(text.to_owned());
    }

    fn on_complete(&mut self) {
        self.completed += 1;
    }

    fn on_error(&mut self, error: StreamError) {
        self.errors.push(error);
    }
}

#[test]
fn test_coze_chat_lf() {
    init_tracing();
    let data = read_test_data("coze_chat.sse");

    assert_eq!(decode_partitioned(&data, &[]), COZE_FRAGMENTS);
}

#[test]
fn test_coze_chat_crlf() {
    init_tracing();
    let data = read_test_data("coze_chat_crlf.sse");

    assert_eq!(decode_partitioned(&data, &[]), COZE_FRAGMENTS);
}

#[test]
fn test_relay_stream() {
    init_tracing();
    let data = read_test_data("relay.sse");

    assert_eq!(
        decode_partitioned(&data, &[]),
        vec!["模拟流式响应", ": hello", " there", "A", "B"]
    );
}

#[test]
fn test_every_two_way_split() {
    let data = read_test_data("coze_chat.sse");
    let expected = decode_partitioned(&data, &[]);

    for cut in 0..=data.len() {
        assert_eq!(decode_partitioned(&data, &[cut]), expected, "cut at byte {cut}");
    }
}

#[test]
fn test_scattered_splits() {
    for name in ["coze_chat.sse", "coze_chat_crlf.sse", "relay.sse"] {
        let data = read_test_data(name);
        let expected = decode_partitioned(&data, &[]);

        for seed in 1..=32 {
            let cuts = scattered_cuts(data.len(), seed);
            assert_eq!(
                decode_partitioned(&data, &cuts),
                expected,
                "{name} with seed {seed}"
            );
        }
    }
}

#[test]
fn test_lf_vs_crlf_consistency() {
    let lf = read_test_data("coze_chat.sse");
    let crlf = read_test_data("coze_chat_crlf.sse");

    assert_eq!(decode_partitioned(&lf, &[]), decode_partitioned(&crlf, &[]));
}

#[test]
fn test_event_gate() {
    let other = b"event: something.else\ndata: {\"content\":\"hidden\"}\n\n";
    let delta = b"event: conversation.message.delta\ndata: {\"content\":\"shown\"}\n\n";

    assert!(decode_partitioned(other, &[]).is_empty());
    assert_eq!(decode_partitioned(delta, &[]), vec!["shown"]);
}

#[tokio::test]
async fn test_hello_end_to_end() {
    init_tracing();
    let chunks = [
        "event: conversation.message.delta\ndata: {\"con",
        "tent\":\"Hel",
        "lo\"}\n\n",
    ];
    let source = stream::iter(chunks.map(|c| Ok::<_, io::Error>(Bytes::from_static(c.as_bytes()))));
    let mut sink = Recorder::default();

    StreamController::new().run(source, &mut sink).await;

    assert_eq!(sink.fragments, vec!["Hello"]);
    assert_eq!(sink.completed, 1);
    assert!(sink.errors.is_empty());
}

#[tokio::test]
async fn test_source_rejects_immediately() {
    init_tracing();
    let source = stream::iter([Err::<Bytes, _>(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset by peer",
    ))]);
    let mut transcript = Transcript::new();

    StreamController::new().run(source, &mut transcript).await;

    assert_eq!(transcript.fragment_count(), 0);
    assert!(!transcript.is_complete());
    let error = transcript.into_result().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Source);
    assert!(error.to_string().contains("connection reset by peer"));
}

#[tokio::test]
async fn test_gzip_body_in_small_reads() {
    init_tracing();
    let data = read_test_data("coze_chat.sse");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut body = GzDecoder::new(&compressed[..]);
    let mut chunks = Vec::new();
    let mut buf = [0u8; 7];
    loop {
        let n = body.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        chunks.push(Ok::<_, io::Error>(Bytes::copy_from_slice(&buf[..n])));
    }

    let text = collect_text(stream::iter(chunks)).await.unwrap();

    assert_eq!(text, COZE_FRAGMENTS.concat());
}
