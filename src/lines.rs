use memchr::{memchr, memrchr};

/// Splits decoded text into `\n`-terminated lines, keeping the unterminated tail.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
    ready: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: String::with_capacity(capacity),
            ready: String::with_capacity(capacity),
        }
    }

    /// Appends `text` and returns the lines it completed, without their `\n`.
    pub fn push(&mut self, text: &str) -> Lines<'_> {
        self.ready.clear();

        let start = self.pending.len();
        self.pending.push_str(text);

        if let Some(pos) = memrchr(b'\n', &self.pending.as_bytes()[start..]) {
            let end = start + pos + 1;
            self.ready.push_str(&self.pending[..end]);
            self.pending.drain(..end);
        }

        Lines { rest: &self.ready }
    }

    /// The text received since the last `\n`.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Clears the buffer at end of stream, returning the unterminated tail.
    pub fn finish(&mut self) -> String {
        self.ready.clear();
        std::mem::take(&mut self.pending)
    }
}

/// Lines completed by a single [`LineBuffer::push`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let pos = memchr(b'\n', self.rest.as_bytes())?;
        let line = &self.rest[..pos];
        self.rest = &self.rest[pos + 1..];
        Some(line)
    }
}
