//! YAML transcoding: convert VDF trees to YAML text.
//!
//! Mapping from VDF to YAML:
//!   - section  -> YAML mapping
//!   - leaf     -> YAML string
//!
//! YAML mappings cannot repeat a key. When a section holds duplicates the
//! entry that lookups would find (the last one in the document) is kept.
//! Bytes that are not UTF-8 are replaced with U+FFFD.

use libvdf::NodeRef;

/// Encode a VDF node and its descendants as a YAML string.
pub fn encode(node: NodeRef<'_>) -> Result<String, String> {
    super::check_depth(node)?;
    let yaml_value = node_to_yaml(node);
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn node_to_yaml(node: NodeRef<'_>) -> serde_yaml::Value {
    if let Some(value) = node.value_lossy() {
        return serde_yaml::Value::String(value.into_owned());
    }

    let mut map = serde_yaml::Mapping::new();
    for child in node.children() {
        let key = serde_yaml::Value::String(child.key_lossy().unwrap_or_default().into_owned());
        if map.contains_key(&key) {
            continue;
        }
        map.insert(key, node_to_yaml(child));
    }
    serde_yaml::Value::Mapping(map)
}
