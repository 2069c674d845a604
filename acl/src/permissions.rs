use crate::{Ace, AclError, Result};
use serde_json::Value as JsonValue;

/// Parse a permission list.
///
/// A single record is accepted as a one-element list. Order and duplicate
/// entries are kept exactly as declared; the first invalid entry rejects the
/// whole list.
pub fn parse_permissions(value: &JsonValue) -> Result<Vec<Ace>> {
    match value {
        JsonValue::Null => Err(AclError::MissingValue("permissions".to_string())),
        JsonValue::String(s) if s.is_empty() => Err(AclError::InvalidValue(
            "A non-empty permissions must be provided".to_string(),
        )),
        JsonValue::Array(items) if items.is_empty() => Err(AclError::InvalidValue(
            "Value for permissions should be an array with at least one element specified"
                .to_string(),
        )),
        JsonValue::Array(items) => items.iter().map(Ace::from_value).collect(),
        JsonValue::Object(_) => Ok(vec![Ace::from_value(value)?]),
        other => Err(AclError::InvalidValue(format!(
            "Value for permissions should be a hash or an array of hashes, got {}",
            other
        ))),
    }
}
