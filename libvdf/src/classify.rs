//! Character classifiers.
//!
//! Each classifier looks at the byte under the cursor and either passes, so
//! the next classifier gets a look, or handles it. The driver in
//! [`crate::parser`] tries them in this priority:
//!
//! 1. [`newline`]: state cleanup only, never handles
//! 2. [`commented`]: swallows bytes inside comments
//! 3. [`quote`]: opens and closes keys and values
//! 4. [`quoted_text`]: accumulates and unescapes quoted bytes
//! 5. [`section`]: `{` and `}`
//! 6. [`line_comment`]: `//`
//! 7. [`block_comment`]: `/*` and `*/`

use crate::cursor::Cursor;
use crate::error::{ParseError, Result};
use crate::parser::ParserState;

const QUOTE: u8 = b'"';
const BACKSLASH: u8 = b'\\';
const OPEN: u8 = b'{';
const CLOSE: u8 = b'}';

/// What a classifier did with a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Consumed; no other classifier sees this byte.
    Handled,
    /// Not applicable; fall through to the next classifier.
    Pass,
}

/// Whitespace as the C locale defines it, vertical tab included.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Reset per-line state on `\n`.
///
/// Inside quotes a newline arms whitespace chewing so the indentation of a
/// continued value is dropped.
pub fn newline(state: &mut ParserState, byte: u8) {
    if byte != b'\n' {
        return;
    }
    state.flags.line_comment = false;
    state.flags.chew_whitespace = state.flags.quoted;
}

/// Swallow everything while a comment is open.
pub fn commented(state: &mut ParserState, cursor: &mut Cursor<'_>, byte: u8) -> Result<Outcome> {
    if state.flags.line_comment {
        return Ok(Outcome::Handled);
    }
    if state.flags.block_comment {
        // Only looking for the terminator; the byte is ignored either way.
        block_comment(state, cursor, byte)?;
        return Ok(Outcome::Handled);
    }
    Ok(Outcome::Pass)
}

/// Open or close a quoted token.
///
/// The first closed token of a statement becomes the pending key; the second
/// completes a key/value leaf in the current scope.
pub fn quote(state: &mut ParserState, byte: u8) -> Result<Outcome> {
    if byte != QUOTE {
        return Ok(Outcome::Pass);
    }

    if !state.flags.quoted {
        if state.quote_count > 2 {
            return Err(ParseError::ThirdQuotePair(String::new()));
        }
        state.flags.quoted = true;
        state.flags.chew_whitespace = false;
        state.ring.begin();
        return Ok(Outcome::Handled);
    }

    state.flags.quoted = false;
    let text = state.ring.finish();
    state.quote_count += 1;

    match state.quote_count {
        1 => {
            if state.pending_key.is_some() {
                return Err(ParseError::KeyAlreadySet(String::new()));
            }
            state.pending_key = Some(text);
        }
        2 => {
            let key = state
                .pending_key
                .take()
                .ok_or_else(|| ParseError::MissingKey(String::new()))?;
            state.tree.add_leaf(state.scope, key, text);
            state.quote_count = 0;
            state.flags.chew_whitespace = false;
        }
        _ => return Err(ParseError::QuoteCount(String::new())),
    }
    Ok(Outcome::Handled)
}

/// Accumulate a byte of quoted text, decoding backslash escapes.
pub fn quoted_text(state: &mut ParserState, cursor: &mut Cursor<'_>, byte: u8) -> Result<Outcome> {
    if !state.flags.quoted {
        return Ok(Outcome::Pass);
    }

    if state.flags.chew_whitespace && is_space(byte) {
        return Ok(Outcome::Handled);
    }
    state.flags.chew_whitespace = false;

    if byte != BACKSLASH {
        state.ring.push(byte);
        return Ok(Outcome::Handled);
    }

    let decoded = match cursor.peek_next() {
        b'r' => b'\r',
        b'n' => b'\n',
        b't' => b'\t',
        b'"' => b'"',
        b'\'' => b'\'',
        b'\\' => b'\\',
        other => return Err(ParseError::InvalidEscape(other, String::new())),
    };
    state.ring.push(decoded);
    cursor.skip_one();
    Ok(Outcome::Handled)
}

/// Enter a section on `{`, leave it on `}`.
pub fn section(state: &mut ParserState, byte: u8) -> Result<Outcome> {
    match byte {
        OPEN => open_section(state)?,
        CLOSE => close_section(state)?,
        _ => return Ok(Outcome::Pass),
    }
    Ok(Outcome::Handled)
}

fn open_section(state: &mut ParserState) -> Result<()> {
    state.ring.begin();

    match state.quote_count {
        1 => {}
        2 => return Err(ParseError::SectionWithValue(String::new())),
        _ => return Err(ParseError::SectionMissingName(String::new())),
    }

    let key = state
        .pending_key
        .take()
        .ok_or_else(|| ParseError::MissingKey(String::new()))?;
    state.quote_count = 0;
    state.scope = state.tree.add_section(state.scope, key);
    Ok(())
}

fn close_section(state: &mut ParserState) -> Result<()> {
    if state.quote_count != 0 {
        return Err(ParseError::UnterminatedStatement(String::new()));
    }
    state.scope = state
        .tree
        .parent_of(state.scope)
        .ok_or_else(|| ParseError::UnmatchedClose(String::new()))?;
    Ok(())
}

/// Start a `//` comment running to the end of the line.
pub fn line_comment(state: &mut ParserState, cursor: &mut Cursor<'_>, byte: u8) -> Outcome {
    if state.flags.block_comment {
        return Outcome::Pass;
    }
    if !(byte == b'/' && cursor.peek_next() == b'/') {
        return Outcome::Pass;
    }
    cursor.skip_one();
    state.flags.line_comment = true;
    Outcome::Handled
}

/// Track `/*` and `*/`. Block comments do not nest.
pub fn block_comment(
    state: &mut ParserState,
    cursor: &mut Cursor<'_>,
    byte: u8,
) -> Result<Outcome> {
    let next = cursor.peek_next();
    if byte == b'/' && next == b'*' {
        if state.flags.block_comment {
            return Err(ParseError::NestedBlockComment(String::new()));
        }
        state.flags.block_comment = true;
    } else if byte == b'*' && next == b'/' {
        if !state.flags.block_comment {
            return Err(ParseError::UnmatchedCommentEnd(String::new()));
        }
        state.flags.block_comment = false;
    } else {
        return Ok(Outcome::Pass);
    }
    cursor.skip_one();
    Ok(Outcome::Handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    /// Run `input` through one classifier byte by byte, as the driver would
    /// if every other classifier passed.
    fn feed<F>(state: &mut ParserState, input: &[u8], mut f: F) -> Result<Vec<Outcome>>
    where
        F: FnMut(&mut ParserState, &mut Cursor<'_>, u8) -> Result<Outcome>,
    {
        let mut cursor = Cursor::new(input);
        let mut outcomes = Vec::new();
        while !cursor.at_end() {
            let byte = cursor.current();
            outcomes.push(f(state, &mut cursor, byte)?);
            cursor.advance();
        }
        Ok(outcomes)
    }

    #[test]
    fn test_is_space() {
        for b in [b' ', b'\t', b'\n', b'\r', 0x0b, 0x0c] {
            assert!(is_space(b));
        }
        assert!(!is_space(b'a'));
        assert!(!is_space(0));
    }

    #[test]
    fn test_newline_never_handles() {
        let mut state = ParserState::new();
        state.flags.line_comment = true;
        newline(&mut state, b'\n');
        assert!(!state.flags.line_comment);
        assert!(!state.flags.chew_whitespace);

        state.flags.quoted = true;
        newline(&mut state, b'\n');
        assert!(state.flags.chew_whitespace);

        state.flags.line_comment = true;
        newline(&mut state, b'x');
        assert!(state.flags.line_comment);
    }

    #[test]
    fn test_quote_key_then_value() {
        let mut state = ParserState::new();
        for b in [b'"', b'"'] {
            assert_eq!(quote(&mut state, b).unwrap(), Outcome::Handled);
        }
        assert_eq!(state.pending_key.as_deref(), Some(&b""[..]));
        assert_eq!(state.quote_count, 1);

        quote(&mut state, b'"').unwrap();
        state.ring.push(b'v');
        quote(&mut state, b'"').unwrap();
        assert_eq!(state.quote_count, 0);
        assert!(state.pending_key.is_none());
        assert_eq!(state.tree.child_of(Tree::ROOT, "").unwrap().value(), Some("v"));
    }

    #[test]
    fn test_quote_passes_other_bytes() {
        let mut state = ParserState::new();
        assert_eq!(quote(&mut state, b'a').unwrap(), Outcome::Pass);
    }

    #[test]
    fn test_quote_guards() {
        let mut state = ParserState::new();
        state.quote_count = 3;
        assert_eq!(
            quote(&mut state, b'"'),
            Err(ParseError::ThirdQuotePair(String::new()))
        );

        let mut state = ParserState::new();
        state.pending_key = Some("k".into());
        state.flags.quoted = true;
        assert_eq!(
            quote(&mut state, b'"'),
            Err(ParseError::KeyAlreadySet(String::new()))
        );

        let mut state = ParserState::new();
        state.quote_count = 1;
        state.flags.quoted = true;
        assert_eq!(
            quote(&mut state, b'"'),
            Err(ParseError::MissingKey(String::new()))
        );
    }

    #[test]
    fn test_quoted_text_escapes() {
        let mut state = ParserState::new();
        state.flags.quoted = true;
        feed(&mut state, br#"a\tb\\c\"d\'e\r\n"#, quoted_text).unwrap();
        assert_eq!(state.ring.finish(), b"a\tb\\c\"d'e\r\n");
    }

    #[test]
    fn test_quoted_text_bad_escape() {
        let mut state = ParserState::new();
        state.flags.quoted = true;
        let err = feed(&mut state, br"\x", quoted_text).unwrap_err();
        assert_eq!(err, ParseError::InvalidEscape(b'x', String::new()));
    }

    #[test]
    fn test_quoted_text_trailing_backslash() {
        let mut state = ParserState::new();
        state.flags.quoted = true;
        let err = feed(&mut state, b"\\", quoted_text).unwrap_err();
        assert_eq!(err, ParseError::InvalidEscape(0, String::new()));
    }

    #[test]
    fn test_quoted_text_chews_indent() {
        let mut state = ParserState::new();
        state.flags.quoted = true;
        state.flags.chew_whitespace = true;
        feed(&mut state, b" \t x y", quoted_text).unwrap();
        assert_eq!(state.ring.finish(), b"x y");
        assert!(!state.flags.chew_whitespace);
    }

    #[test]
    fn test_quoted_text_outside_quotes() {
        let mut state = ParserState::new();
        let outcomes = feed(&mut state, b"ab", quoted_text).unwrap();
        assert_eq!(outcomes, [Outcome::Pass, Outcome::Pass]);
        assert!(state.ring.finish().is_empty());
    }

    #[test]
    fn test_section_open_close() {
        let mut state = ParserState::new();
        state.pending_key = Some("s".into());
        state.quote_count = 1;
        assert_eq!(section(&mut state, b'{').unwrap(), Outcome::Handled);
        assert_ne!(state.scope, Tree::ROOT);
        assert_eq!(state.quote_count, 0);
        assert!(state.pending_key.is_none());

        assert_eq!(section(&mut state, b'}').unwrap(), Outcome::Handled);
        assert_eq!(state.scope, Tree::ROOT);
        assert!(state.tree.child_of(Tree::ROOT, "s").unwrap().is_section());
    }

    #[test]
    fn test_section_errors() {
        let mut state = ParserState::new();
        assert_eq!(
            section(&mut state, b'{'),
            Err(ParseError::SectionMissingName(String::new()))
        );

        let mut state = ParserState::new();
        state.quote_count = 2;
        assert_eq!(
            section(&mut state, b'{'),
            Err(ParseError::SectionWithValue(String::new()))
        );

        let mut state = ParserState::new();
        assert_eq!(
            section(&mut state, b'}'),
            Err(ParseError::UnmatchedClose(String::new()))
        );

        let mut state = ParserState::new();
        state.quote_count = 1;
        state.pending_key = Some("k".into());
        assert_eq!(
            section(&mut state, b'}'),
            Err(ParseError::UnterminatedStatement(String::new()))
        );
    }

    #[test]
    fn test_line_comment_start() {
        let mut state = ParserState::new();
        let mut cursor = Cursor::new(b"// x");
        assert_eq!(line_comment(&mut state, &mut cursor, b'/'), Outcome::Handled);
        assert!(state.flags.line_comment);
        assert_eq!(cursor.peek_next(), b' ');

        let mut state = ParserState::new();
        let mut cursor = Cursor::new(b"/x");
        assert_eq!(line_comment(&mut state, &mut cursor, b'/'), Outcome::Pass);

        let mut state = ParserState::new();
        state.flags.block_comment = true;
        let mut cursor = Cursor::new(b"//");
        assert_eq!(line_comment(&mut state, &mut cursor, b'/'), Outcome::Pass);
    }

    #[test]
    fn test_block_comment_markers() {
        let mut state = ParserState::new();
        let mut cursor = Cursor::new(b"/**/");
        assert_eq!(
            block_comment(&mut state, &mut cursor, b'/').unwrap(),
            Outcome::Handled
        );
        assert!(state.flags.block_comment);
        cursor.advance();
        assert_eq!(
            block_comment(&mut state, &mut cursor, b'*').unwrap(),
            Outcome::Handled
        );
        assert!(!state.flags.block_comment);
    }

    #[test]
    fn test_block_comment_errors() {
        let mut state = ParserState::new();
        let mut cursor = Cursor::new(b"*/");
        assert_eq!(
            block_comment(&mut state, &mut cursor, b'*'),
            Err(ParseError::UnmatchedCommentEnd(String::new()))
        );

        let mut state = ParserState::new();
        state.flags.block_comment = true;
        let mut cursor = Cursor::new(b"/*");
        assert_eq!(
            commented(&mut state, &mut cursor, b'/'),
            Err(ParseError::NestedBlockComment(String::new()))
        );
    }

    #[test]
    fn test_commented_swallows() {
        let mut state = ParserState::new();
        state.flags.block_comment = true;
        let outcomes = feed(&mut state, b"\"{x", commented).unwrap();
        assert!(outcomes.iter().all(|o| *o == Outcome::Handled));
        assert!(state.flags.block_comment);

        let mut state = ParserState::new();
        state.flags.line_comment = true;
        let outcomes = feed(&mut state, b"*/", commented).unwrap();
        assert!(outcomes.iter().all(|o| *o == Outcome::Handled));

        let mut state = ParserState::new();
        assert_eq!(
            feed(&mut state, b"a", commented).unwrap(),
            [Outcome::Pass]
        );
    }
}
