//! Parser for Valve's KeyValues text format (VDF).
//!
//! A VDF document is a sequence of statements, either `"key" "value"` or
//! `"name" { statements... }`, with `//` line comments, `/* block */`
//! comments, and the escapes `\r \n \t \" \' \\` inside quotes.
//!
//! # Parsing Pipeline
//!
//! The whole document is in memory before parsing starts.
//!
//! 1. **Cursor**: Walks the input bytes, returning NUL past the end.
//!
//! 2. **Classifiers**: Each byte is offered to a fixed sequence of
//!    classifiers (newline, comment gate, quote, quoted text, braces, line
//!    comment, block comment). The first to handle it wins; anything left
//!    over must be whitespace.
//!
//! 3. **Tree**: Closed quote pairs and braces become leaf and section nodes,
//!    each prepended to the current section's children.
//!
//! The first error stops the parse, is logged through the `log` facade, and
//! is returned to the caller.

mod classify;
mod cursor;
mod encode;
mod error;
mod parser;
mod ring;
mod tree;

use std::fs;
use std::path::Path;

pub use encode::{encode, encode_node, Format};
pub use error::{ErrorKind, LoadError, ParseError, Result};
pub use tree::{Children, NodeId, NodeRef, Tree, Walk};

/// Parse a VDF document from bytes or a string.
///
/// # Example
///
/// ```
/// use libvdf::parse;
///
/// let tree = parse(r#""AppState" { "name" "Portal" }"#).unwrap();
/// let name = tree.root().get_path(["AppState", "name"]).unwrap();
/// assert_eq!(name.value(), Some("Portal"));
/// ```
pub fn parse(input: impl AsRef<[u8]>) -> Result<Tree> {
    parse_with_filename(input, None)
}

/// Parse a VDF document with a filename for error messages.
pub fn parse_with_filename(input: impl AsRef<[u8]>, filename: Option<&str>) -> Result<Tree> {
    let ctx = error::ParseContext::new(filename);
    parser::parse_document(input.as_ref(), &ctx)
}

/// Read a whole file and parse it.
///
/// Errors name the file by its final path component.
pub fn parse_file(path: impl AsRef<Path>) -> std::result::Result<Tree, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(parse_with_filename(&bytes, Some(&filename))?)
}
