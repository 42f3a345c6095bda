use std::borrow::Cow;
use std::mem;

const REPLACEMENT: char = '\u{FFFD}';

/// Incremental UTF-8 decoder for byte chunks of arbitrary size.
///
/// A multi-byte character split across two chunks is held back and decoded
/// once the rest of it arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    held: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `chunk`, prefixed by any bytes held back from the previous call.
    ///
    /// With `is_final` set, an incomplete trailing sequence is substituted
    /// instead of being held for a chunk that will never come.
    pub fn decode(&mut self, chunk: &[u8], is_final: bool) -> String {
        let input: Cow<'_, [u8]> = if self.held.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = mem::take(&mut self.held);
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(input.len());
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    // valid_up_to marks the end of a well-formed prefix
                    out.push_str(unsafe { std::str::from_utf8_unchecked(&rest[..valid]) });

                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &rest[valid + len..];
                        }
                        None if is_final => {
                            out.push(REPLACEMENT);
                            break;
                        }
                        None => {
                            self.held.extend_from_slice(&rest[valid..]);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Number of bytes waiting for the rest of their character.
    pub fn held_len(&self) -> usize {
        self.held.len()
    }
}
