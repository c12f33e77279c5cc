//! Encode parsed VDF trees to other text formats.
//!
//! Children are emitted in storage order, which is the reverse of the order
//! they appeared in the document. Duplicate keys are kept: JSON output
//! repeats the member, path output repeats the line.
//!
//! Both encoders drive [`NodeRef::walk`] rather than recursing, so any tree
//! the parser accepts can be encoded. Bytes that are not UTF-8 are replaced
//! with U+FFFD.

use crate::tree::{NodeRef, Tree};

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON: sections become objects, values become strings.
    Json,
    /// One `a/b/c = "value"` line per leaf.
    Paths,
}

/// Encode a VDF tree to a string in the specified format.
///
/// YAML, TOML, and CBOR are produced by the `vdf` tool with dedicated
/// libraries.
pub fn encode(tree: &Tree, format: Format) -> String {
    encode_node(tree.root(), format)
}

/// Encode one node and everything beneath it.
///
/// A leaf encodes as its bare value.
pub fn encode_node(node: NodeRef<'_>, format: Format) -> String {
    match format {
        Format::Json => encode_json(node),
        Format::Paths => encode_paths(node),
    }
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    // One entry per object still open: whether it has a member yet.
    let mut open: Vec<bool> = Vec::new();

    for (depth, n) in node.walk() {
        while open.len() > depth {
            close_object(&mut out, &mut open);
        }
        if let Some(has_members) = open.last_mut() {
            out.push_str(if *has_members { ",\n" } else { "\n" });
            *has_members = true;
            push_indent(&mut out, depth);
            out.push_str(&encode_json_string(&n.key_lossy().unwrap_or_default()));
            out.push_str(": ");
        }
        match n.value_lossy() {
            Some(value) => out.push_str(&encode_json_string(&value)),
            None => {
                out.push('{');
                open.push(false);
            }
        }
    }
    while !open.is_empty() {
        close_object(&mut out, &mut open);
    }
    out
}

fn close_object(out: &mut String, open: &mut Vec<bool>) {
    if open.pop() == Some(true) {
        out.push('\n');
        push_indent(out, open.len());
    }
    out.push('}');
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

// =============================================================================
// Path Encoder
// =============================================================================

fn encode_paths(node: NodeRef<'_>) -> String {
    if let Some(value) = node.value_lossy() {
        return encode_json_string(&value);
    }

    let mut out = String::new();
    let mut path = Vec::new();
    // Depth 0 is `node` itself; its key is not part of the printed paths.
    for (depth, n) in node.walk().skip(1) {
        path.truncate(depth - 1);
        path.push(n.key_lossy().unwrap_or_default());
        if let Some(value) = n.value_lossy() {
            out.push_str(&path.join("/"));
            out.push_str(" = ");
            out.push_str(&encode_json_string(&value));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_json_nested() {
        let tree = parse(r#""a" "1" "s" { "b" "2" "t" { } }"#).unwrap();
        let expected = r#"{
  "s": {
    "t": {},
    "b": "2"
  },
  "a": "1"
}"#;
        assert_eq!(encode(&tree, Format::Json), expected);
    }

    #[test]
    fn test_json_empty_and_leaf() {
        let tree = parse("").unwrap();
        assert_eq!(encode(&tree, Format::Json), "{}");
        let tree = parse(r#""k" "tab\there""#).unwrap();
        let leaf = tree.root().get("k").unwrap();
        assert_eq!(encode_node(leaf, Format::Json), r#""tab\there""#);
    }

    #[test]
    fn test_json_keeps_duplicates() {
        let tree = parse(r#""k" "1" "k" "2""#).unwrap();
        assert_eq!(encode(&tree, Format::Json), "{\n  \"k\": \"2\",\n  \"k\": \"1\"\n}");
    }

    #[test]
    fn test_json_string_escapes() {
        assert_eq!(encode_json_string("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(encode_json_string("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn test_json_non_utf8_is_replaced() {
        let tree = parse(b"\"caf\xe9\" \"\xff\"").unwrap();
        assert_eq!(encode(&tree, Format::Json), "{\n  \"caf\u{FFFD}\": \"\u{FFFD}\"\n}");
    }

    #[test]
    fn test_json_sibling_after_nested_section() {
        let tree = parse(r#""z" "0" "a" { "b" { "c" "1" } } "y" { }"#).unwrap();
        let expected = r#"{
  "y": {},
  "a": {
    "b": {
      "c": "1"
    }
  },
  "z": "0"
}"#;
        assert_eq!(encode(&tree, Format::Json), expected);
    }

    #[test]
    fn test_paths() {
        let tree = parse(r#""LibraryFolders" { "1" "/mnt/a" "2" "/mnt/b" } "x" "y""#).unwrap();
        assert_eq!(
            encode(&tree, Format::Paths),
            "x = \"y\"\nLibraryFolders/2 = \"/mnt/b\"\nLibraryFolders/1 = \"/mnt/a\"\n"
        );
        let folders = tree.root().get("LibraryFolders").unwrap();
        assert_eq!(
            encode_node(folders, Format::Paths),
            "2 = \"/mnt/b\"\n1 = \"/mnt/a\"\n"
        );
    }
}
