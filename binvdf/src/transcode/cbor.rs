//! CBOR transcoding: convert VDF trees to CBOR binary data.
//!
//! Mapping from VDF to CBOR:
//!   - section  -> CBOR map (determinate length, text string keys)
//!   - leaf     -> CBOR text string
//!
//! Keys and values that are not UTF-8 become byte strings, so nothing is
//! lost. Maps keep every child in storage order, so duplicate keys survive
//! as repeated map entries.

use ciborium::value::Value as CborValue;
use libvdf::NodeRef;

/// Encode a VDF node and its descendants as CBOR bytes.
pub fn encode(node: NodeRef<'_>) -> Result<Vec<u8>, String> {
    super::check_depth(node)?;
    let value = node_to_cbor(node);
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&value, &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn node_to_cbor(node: NodeRef<'_>) -> CborValue {
    match node.value_bytes() {
        Some(value) => text_or_bytes(value),
        None => CborValue::Map(
            node.children()
                .map(|child| {
                    (
                        text_or_bytes(child.key_bytes().unwrap_or_default()),
                        node_to_cbor(child),
                    )
                })
                .collect(),
        ),
    }
}

fn text_or_bytes(raw: &[u8]) -> CborValue {
    match std::str::from_utf8(raw) {
        Ok(text) => CborValue::Text(text.to_string()),
        Err(_) => CborValue::Bytes(raw.to_vec()),
    }
}

// ---------------------------------------------------------------------------
// Diagnostic Notation (CBOR -> human-readable text, RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render CBOR bytes as diagnostic notation (RFC 8949 §8).
///
/// Renders from the CBOR binary rather than the tree, so it shows what
/// actually went over the wire.
pub fn diagnostic(input: &[u8]) -> Result<String, String> {
    let cbor_value: CborValue =
        ciborium::de::from_reader(input).map_err(|e| format!("CBOR decode error: {}", e))?;
    let mut out = String::new();
    diag_value(&mut out, &cbor_value, 0);
    out.push('\n');
    Ok(out)
}

fn diag_value(out: &mut String, val: &CborValue, indent: usize) {
    match val {
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Bytes(b) => {
            out.push_str("h'");
            for byte in b {
                out.push_str(&format!("{:02x}", byte));
            }
            out.push('\'');
        }
        CborValue::Map(pairs) => diag_map(out, pairs, indent),
        _ => out.push_str(&format!("<?unexpected {:?}>", val)),
    }
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn diag_map(out: &mut String, pairs: &[(CborValue, CborValue)], indent: usize) {
    if pairs.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let child_indent = indent + 2;
    for (i, (k, v)) in pairs.iter().enumerate() {
        out.push_str(&" ".repeat(child_indent));
        diag_value(out, k, child_indent);
        out.push_str(": ");
        diag_value(out, v, child_indent);
        if i < pairs.len() - 1 {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(indent));
    out.push('}');
}
