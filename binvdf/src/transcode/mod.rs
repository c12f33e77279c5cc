//! Transcoders from VDF trees to other data formats.
//!
//! Each one builds a value tree for a third-party serializer, and those
//! serializers recurse once per level of nesting. Trees nested deeper than
//! [`MAX_DEPTH`] are rejected up front instead.

use libvdf::NodeRef;

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Deepest section nesting, below the encoded node, that a transcoder accepts.
pub const MAX_DEPTH: usize = 128;

/// Fail if anything under `node` sits more than [`MAX_DEPTH`] levels down.
pub fn check_depth(node: NodeRef<'_>) -> Result<(), String> {
    if node.walk().any(|(depth, _)| depth > MAX_DEPTH) {
        return Err(format!(
            "nesting deeper than {} levels is not supported",
            MAX_DEPTH
        ));
    }
    Ok(())
}
