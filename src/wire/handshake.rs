//! The handshake message: `{"hello": <string>, "version": <integer>}`.

use serde::Deserialize;

/// A parsed handshake. `hello` is recorded but not otherwise interpreted;
/// `version` is recorded for future compatibility checks (spec.md §4.2) —
/// neither is validated beyond its JSON type.
#[derive(Debug, Clone, Deserialize)]
pub struct Handshake {
    pub hello: String,
    pub version: i64,
}

/// Parse a handshake from an already-decoded JSON value. Fails if either
/// field is missing or has the wrong type.
pub fn parse_handshake(json: &serde_json::Value) -> Option<Handshake> {
    serde_json::from_value(json.clone()).ok()
}
