//! Error types for VDF parsing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for VDF parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Broad class of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A byte no rule accepts outside of quotes.
    IllegalCharacter,
    /// A backslash followed by an unknown byte.
    Escape,
    /// Keys and values paired up wrongly.
    Quoting,
    /// Braces used without a name, with a value, or unbalanced.
    Section,
    /// Block comments nested, unmatched, or left open.
    Comment,
}

/// Error type for VDF parsing.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Byte outside quotes that is neither whitespace nor syntax.
    #[error("Illegal character in stream: '{}'{}", .0.escape_ascii(), .1)]
    IllegalCharacter(u8, String),

    /// Unknown escape inside quoted text.
    #[error("Invalid escape sequence '\\{}'{}", .0.escape_ascii(), .1)]
    InvalidEscape(u8, String),

    /// A third quoted token was opened in one statement.
    #[error("Cannot start a third quoted token in one statement{0}")]
    ThirdQuotePair(String),

    /// A key was closed while another key was still waiting for its value.
    #[error("Key is already set{0}")]
    KeyAlreadySet(String),

    /// A value (or section) appeared without a preceding key.
    #[error("Missing key for value{0}")]
    MissingKey(String),

    /// The quote counter left the range a statement allows.
    #[error("Invalid number of quotes in statement{0}")]
    QuoteCount(String),

    /// Quoted text still open at end of input.
    #[error("Unterminated quoted text{0}")]
    UnterminatedString(String),

    /// A key with neither a value nor a section at end of input.
    #[error("Key without a value{0}")]
    DanglingKey(String),

    /// `{` after a complete key/value pair.
    #[error("Section cannot have a value{0}")]
    SectionWithValue(String),

    /// `{` with no quoted name before it.
    #[error("Section is missing a name{0}")]
    SectionMissingName(String),

    /// `}` while a key is waiting for its value.
    #[error("Unterminated statement before section close{0}")]
    UnterminatedStatement(String),

    /// `}` with no open section.
    #[error("Closed section without opening one{0}")]
    UnmatchedClose(String),

    /// End of input with a section still open.
    #[error("Section left open at end of input{0}")]
    UnclosedSection(String),

    /// `/*` inside a block comment.
    #[error("Starting nested block comment{0}")]
    NestedBlockComment(String),

    /// `*/` outside of a block comment.
    #[error("Ended block comment without starting one{0}")]
    UnmatchedCommentEnd(String),

    /// `/*` never closed.
    #[error("Started block comment without ending one{0}")]
    UnterminatedBlockComment(String),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::IllegalCharacter(b, _) => ParseError::IllegalCharacter(b, suffix),
            ParseError::InvalidEscape(b, _) => ParseError::InvalidEscape(b, suffix),
            ParseError::ThirdQuotePair(_) => ParseError::ThirdQuotePair(suffix),
            ParseError::KeyAlreadySet(_) => ParseError::KeyAlreadySet(suffix),
            ParseError::MissingKey(_) => ParseError::MissingKey(suffix),
            ParseError::QuoteCount(_) => ParseError::QuoteCount(suffix),
            ParseError::UnterminatedString(_) => ParseError::UnterminatedString(suffix),
            ParseError::DanglingKey(_) => ParseError::DanglingKey(suffix),
            ParseError::SectionWithValue(_) => ParseError::SectionWithValue(suffix),
            ParseError::SectionMissingName(_) => ParseError::SectionMissingName(suffix),
            ParseError::UnterminatedStatement(_) => ParseError::UnterminatedStatement(suffix),
            ParseError::UnmatchedClose(_) => ParseError::UnmatchedClose(suffix),
            ParseError::UnclosedSection(_) => ParseError::UnclosedSection(suffix),
            ParseError::NestedBlockComment(_) => ParseError::NestedBlockComment(suffix),
            ParseError::UnmatchedCommentEnd(_) => ParseError::UnmatchedCommentEnd(suffix),
            ParseError::UnterminatedBlockComment(_) => {
                ParseError::UnterminatedBlockComment(suffix)
            }
        }
    }

    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::IllegalCharacter(..) => ErrorKind::IllegalCharacter,
            ParseError::InvalidEscape(..) => ErrorKind::Escape,
            ParseError::ThirdQuotePair(_)
            | ParseError::KeyAlreadySet(_)
            | ParseError::MissingKey(_)
            | ParseError::QuoteCount(_)
            | ParseError::UnterminatedString(_)
            | ParseError::DanglingKey(_) => ErrorKind::Quoting,
            ParseError::SectionWithValue(_)
            | ParseError::SectionMissingName(_)
            | ParseError::UnterminatedStatement(_)
            | ParseError::UnmatchedClose(_)
            | ParseError::UnclosedSection(_) => ErrorKind::Section,
            ParseError::NestedBlockComment(_)
            | ParseError::UnmatchedCommentEnd(_)
            | ParseError::UnterminatedBlockComment(_) => ErrorKind::Comment,
        }
    }
}

/// Error type for loading a VDF document from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but is not a valid document.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
