/// Splits a chunked byte stream into text lines.
///
/// Any run of `\r` and `\n` bytes terminates a line, so CRLF pairs, bare
/// carriage returns used for in-place progress output, and blank lines all
/// collapse into a single boundary. Bytes after the last terminator stay
/// pending until more input arrives or [`LineFramer::finish`] flushes them.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        for (idx, byte) in self.pending.iter().enumerate() {
            if !is_terminator(*byte) {
                continue;
            }
            if idx > start {
                lines.push(decode_line(&self.pending[start..idx]));
            }
            start = idx + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Flushes the trailing fragment at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let fragment = std::mem::take(&mut self.pending);
        Some(decode_line(&fragment))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
