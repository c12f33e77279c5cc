//! TOML transcoding: convert VDF trees to TOML text.
//!
//! Mapping from VDF to TOML:
//!   - section  -> TOML table
//!   - leaf     -> TOML string
//!
//! Lossy edges:
//!   - TOML requires the top-level value to be a table; a selected leaf
//!     cannot be encoded on its own.
//!   - TOML tables cannot repeat a key; as with lookups, the last occurrence
//!     in the document wins.
//!   - Bytes that are not UTF-8 are replaced with U+FFFD.

use libvdf::NodeRef;
use toml_edit::DocumentMut;

/// Encode a VDF section (or the root) as a TOML string.
pub fn encode(node: NodeRef<'_>) -> Result<String, String> {
    if node.is_leaf() {
        return Err("TOML requires the top-level value to be a table".to_string());
    }
    super::check_depth(node)?;
    let table = node_to_table(node);
    let mut doc = DocumentMut::new();
    for (key, value) in table.iter() {
        doc[key] = value.clone();
    }
    Ok(doc.to_string())
}

fn node_to_table(node: NodeRef<'_>) -> toml_edit::Table {
    let mut table = toml_edit::Table::new();
    for child in node.children() {
        let key = child.key_lossy().unwrap_or_default();
        if table.contains_key(&key) {
            continue;
        }
        let item = match child.value_lossy() {
            Some(value) => toml_edit::Item::Value(toml_edit::Value::String(
                toml_edit::Formatted::new(value.into_owned()),
            )),
            None => toml_edit::Item::Table(node_to_table(child)),
        };
        table.insert(&key, item);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sections() {
        let tree = libvdf::parse(r#""name" "demo" "S" { "k" "v" }"#).unwrap();
        let toml = encode(tree.root()).unwrap();
        let parsed: DocumentMut = toml.parse().unwrap();
        assert_eq!(parsed["name"].as_str(), Some("demo"));
        assert_eq!(parsed["S"]["k"].as_str(), Some("v"));
    }

    #[test]
    fn test_leaf_is_rejected() {
        let tree = libvdf::parse(r#""a" "b""#).unwrap();
        assert!(encode(tree.root().get("a").unwrap()).is_err());
    }
}
