//! Parse driver.
//!
//! Feeds the input one byte at a time through the classifiers in
//! [`crate::classify`], stopping at the first one that handles it. Any byte
//! left over must be whitespace. The first error ends the parse.

use crate::classify::{self, is_space, Outcome};
use crate::cursor::Cursor;
use crate::error::{ParseContext, ParseError, Result};
use crate::ring::Ring;
use crate::tree::{NodeId, Tree};

/// Independent lexical facets of the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub quoted: bool,
    pub line_comment: bool,
    pub block_comment: bool,
    /// Skip whitespace at the start of a continued quoted line.
    pub chew_whitespace: bool,
}

/// Lexical mode derived from [`Flags`].
///
/// Quoting and the comment facets can never be armed together: quotes and
/// comment markers are only recognized in [`Mode::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Quoted,
    LineComment,
    BlockComment,
}

/// Everything that changes while one document is parsed.
#[derive(Debug)]
pub struct ParserState {
    pub flags: Flags,
    /// Key closed by the first quote pair, waiting for a value or `{`.
    pub pending_key: Option<Vec<u8>>,
    /// Quote pairs completed in the current statement.
    pub quote_count: u8,
    /// Section that receives new nodes.
    pub scope: NodeId,
    pub ring: Ring,
    pub tree: Tree,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            pending_key: None,
            quote_count: 0,
            scope: Tree::ROOT,
            ring: Ring::new(),
            tree: Tree::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.flags.line_comment {
            Mode::LineComment
        } else if self.flags.block_comment {
            Mode::BlockComment
        } else if self.flags.quoted {
            Mode::Quoted
        } else {
            Mode::Normal
        }
    }

    /// Checks that only make sense once the input is exhausted.
    fn finish(self) -> Result<Tree> {
        if self.flags.block_comment {
            return Err(ParseError::UnterminatedBlockComment(String::new()));
        }
        if self.flags.quoted {
            return Err(ParseError::UnterminatedString(String::new()));
        }
        if self.quote_count != 0 || self.pending_key.is_some() {
            return Err(ParseError::DanglingKey(String::new()));
        }
        if self.scope != Tree::ROOT {
            return Err(ParseError::UnclosedSection(String::new()));
        }
        Ok(self.tree)
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete document.
pub fn parse_document(input: &[u8], ctx: &ParseContext) -> Result<Tree> {
    let mut cursor = Cursor::new(input);
    let mut state = ParserState::new();

    while !cursor.at_end() {
        if let Err(err) = step(&mut state, &mut cursor) {
            let (line, col) = cursor.location();
            return Err(report(err.with_location(ctx, line, col)));
        }
        cursor.advance();
    }

    match state.finish() {
        Ok(tree) => {
            log::debug!(
                "vdf: parsed {} nodes from {}",
                tree.len(),
                ctx.filename.as_deref().unwrap_or("<input>")
            );
            Ok(tree)
        }
        Err(err) => {
            let (line, col) = cursor.location();
            Err(report(err.with_location(ctx, line, col)))
        }
    }
}

/// Run the byte under the cursor through the classifiers.
fn step(state: &mut ParserState, cursor: &mut Cursor<'_>) -> Result<()> {
    let byte = cursor.current();

    classify::newline(state, byte);

    let outcome = match state.mode() {
        Mode::LineComment | Mode::BlockComment => classify::commented(state, cursor, byte)?,
        Mode::Quoted => match classify::quote(state, byte)? {
            Outcome::Handled => Outcome::Handled,
            Outcome::Pass => classify::quoted_text(state, cursor, byte)?,
        },
        Mode::Normal => {
            let mut outcome = classify::quote(state, byte)?;
            if outcome == Outcome::Pass {
                outcome = classify::section(state, byte)?;
            }
            if outcome == Outcome::Pass {
                outcome = classify::line_comment(state, cursor, byte);
            }
            if outcome == Outcome::Pass {
                outcome = classify::block_comment(state, cursor, byte)?;
            }
            outcome
        }
    };

    if outcome == Outcome::Pass && !is_space(byte) {
        return Err(ParseError::IllegalCharacter(byte, String::new()));
    }
    Ok(())
}

/// Send a diagnostic to the log and hand the error back.
fn report(err: ParseError) -> ParseError {
    log::error!("vdf: {}", err);
    err
}
