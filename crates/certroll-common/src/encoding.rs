//! Transport encoding for plan file contents.
//!
//! Plan files travel as standard (padded) base64 so arbitrary bytes survive
//! JSON and the node-side agent decodes before writing to disk.

use base64::Engine;

pub fn encode_content(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode_content(input: &str) -> Result<Vec<u8>, String> {
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("invalid base64 content: {e}"))
}

/// Decode content that is expected to be UTF-8 text (scripts, configs).
pub fn decode_content_utf8(input: &str) -> Result<String, String> {
    let bytes = decode_content(input)?;
    String::from_utf8(bytes).map_err(|e| format!("content is not valid UTF-8: {e}"))
}
