//! Structured Document
//!
//! Parsed manifests are plain `serde_json::Value` trees: mappings keep
//! their source field order, repeated elements become sequences, and
//! attributes live under `@name` keys.

use serde_json::Value;

/// A parsed manifest (or the merged result)
pub type Document = Value;

/// Key of the root record in a package manifest
pub const ROOT_KEY: &str = "Package";
pub const NAME_KEY: &str = "fullName";
pub const DESCRIPTION_KEY: &str = "description";
pub const VERSION_KEY: &str = "version";
pub const TYPES_KEY: &str = "types";
pub const TYPE_NAME_KEY: &str = "name";
pub const MEMBERS_KEY: &str = "members";

/// Prefix marking attribute keys
pub const ATTRIBUTE_PREFIX: char = '@';
/// Key holding element text when the element is also a mapping
pub const TEXT_KEY: &str = "#text";

/// Read the text content of a leaf value.
///
/// Accepts a bare string or a mapping that carries `#text` (an element
/// with attributes).
pub fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
        _ => None,
    }
}
