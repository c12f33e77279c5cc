//! Token accumulator.
//!
//! Collects the decoded bytes of the key or value being scanned. The buffer
//! is reused across tokens so a document allocates once per distinct token
//! length rather than once per byte.

/// Resettable byte sink for the token under construction.
#[derive(Debug, Default)]
pub struct Ring {
    buf: Vec<u8>,
}

impl Ring {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard anything accumulated and start a new token.
    pub fn begin(&mut self) {
        self.buf.clear();
    }

    /// Append one decoded byte.
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Copy the token out, byte for byte.
    ///
    /// The buffer is left intact until the next [`Ring::begin`].
    pub fn finish(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_discards() {
        let mut ring = Ring::new();
        ring.push(b'a');
        ring.push(b'b');
        assert_eq!(ring.finish(), b"ab");
        ring.begin();
        assert!(ring.finish().is_empty());
        ring.push(b'c');
        assert_eq!(ring.finish(), b"c");
    }

    #[test]
    fn test_finish_is_independent_copy() {
        let mut ring = Ring::new();
        ring.push(b'x');
        let first = ring.finish();
        ring.begin();
        ring.push(b'y');
        assert_eq!(first, b"x");
        assert_eq!(ring.finish(), b"y");
    }

    #[test]
    fn test_non_utf8_bytes_are_kept() {
        let mut ring = Ring::new();
        for b in [b'a', 0xff, b'b'] {
            ring.push(b);
        }
        assert_eq!(ring.finish(), [b'a', 0xff, b'b']);
    }
}
