//! Byte cursor over the input buffer.
//!
//! Reading past the end yields NUL instead of failing, so callers can peek
//! freely while matching two-byte markers such as `//` and `*/`.

/// Byte returned whenever the cursor is at or beyond the end of input.
pub const SENTINEL: u8 = b'\0';

/// Read-only view over the whole input with a clamped position.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the first byte.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, index: 0 }
    }

    /// The byte under the cursor, or [`SENTINEL`] past the end.
    pub fn current(&self) -> u8 {
        self.bytes.get(self.index).copied().unwrap_or(SENTINEL)
    }

    /// Move forward one byte and return the new current byte.
    pub fn advance(&mut self) -> u8 {
        self.skip_one();
        self.current()
    }

    /// The byte after the current one, without moving.
    pub fn peek_next(&self) -> u8 {
        self.bytes.get(self.index + 1).copied().unwrap_or(SENTINEL)
    }

    /// Consume one extra byte (the second half of an escape or marker).
    pub fn skip_one(&mut self) {
        self.index = (self.index + 1).min(self.bytes.len());
    }

    /// Whether every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.index >= self.bytes.len()
    }

    /// Zero-based line and column of the cursor.
    ///
    /// Only used when building diagnostics, so it rescans from the start
    /// rather than tracking lines on every advance.
    pub fn location(&self) -> (usize, usize) {
        let consumed = &self.bytes[..self.index];
        let line = consumed.iter().filter(|&&b| b == b'\n').count();
        let col = match consumed.iter().rposition(|&b| b == b'\n') {
            Some(nl) => self.index - nl - 1,
            None => self.index,
        };
        (line, col)
    }
}
