//! Line assembly over chunked byte input.
//!
//! The assembler is fed successive byte ranges of the input and emits
//! complete newline-delimited lines; the unfinished fragment after the last
//! `\n` of a chunk is carried forward and prepended to the next chunk. Because
//! splitting happens on raw bytes and `\n` never occurs inside a multi-byte
//! UTF-8 sequence, a character split across a chunk boundary is reassembled
//! intact. `\r` is left in place; trimming is the parser's job.
use memchr::memchr_iter;

/// Splits chunked input into complete logical lines, carrying a partial tail
/// across chunk boundaries.
#[derive(Debug, Default)]
pub struct LineAssembler {
    tail: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next chunk and return every line completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut start = 0;
        for nl in memchr_iter(b'\n', chunk) {
            if self.tail.is_empty() {
                lines.push(chunk[start..nl].to_vec());
            } else {
                let mut line = std::mem::take(&mut self.tail);
                line.extend_from_slice(&chunk[start..nl]);
                lines.push(line);
            }
            start = nl + 1;
        }
        self.tail.extend_from_slice(&chunk[start..]);
        lines
    }

    /// Emit the final unterminated line at end of input, if any is left and
    /// it is not all whitespace.
    pub fn flush(&mut self) -> Option<Vec<u8>> {
        let tail = std::mem::take(&mut self.tail);
        if tail.trim_ascii().is_empty() {
            None
        } else {
            Some(tail)
        }
    }
}
