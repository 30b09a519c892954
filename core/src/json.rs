use serde_json::Value;

/// Parse a response body into a JSON tree.
///
/// Returns `None` for empty or non-JSON bodies; callers decide whether
/// that is an error.
pub fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    let mut buf = body.to_vec();
    simd_json::serde::from_slice::<Value>(&mut buf).ok()
}
