use crate::{Field, FieldType, FieldValue, FieldsError, Result};
use serde_json::Value as JsonValue;
use tracing::trace;

/// Field validator for validating field values
pub struct FieldValidator;

impl FieldValidator {
    /// Validate a raw value against its field definition.
    ///
    /// Returns `Ok(None)` when an optional enumerated field without a default
    /// is assigned null, which leaves the field unset.
    pub fn validate_field_value(field: &Field, value: &JsonValue) -> Result<Option<FieldValue>> {
        trace!("validating field '{}' against {}", field.id, value);

        if value.is_null() {
            if let Some(default) = &field.default {
                return Ok(Some(default.clone()));
            }
            if field.required {
                return Err(FieldsError::MissingValue(field.id.clone()));
            }
            return match field.field_type {
                FieldType::Text | FieldType::EnumList => Err(Self::non_empty_error(field)),
                FieldType::Enum | FieldType::Boolean => Ok(None),
            };
        }

        let validated = match field.field_type {
            FieldType::Text => Self::validate_text(field, value)?,
            FieldType::Enum => Self::validate_enum(field, value)?,
            FieldType::Boolean => Self::validate_boolean(field, value)?,
            FieldType::EnumList => Self::validate_enum_list(field, value)?,
        };

        Ok(Some(validated))
    }

    /// Validate text field value
    fn validate_text(field: &Field, value: &JsonValue) -> Result<FieldValue> {
        match value.as_str() {
            Some("") => Err(Self::non_empty_error(field)),
            Some(s) => Ok(FieldValue::Text(s.to_string())),
            None => Err(FieldsError::InvalidValue(format!(
                "Value for {} should be a string, got {}",
                field.id, value
            ))),
        }
    }

    /// Validate enum field value
    fn validate_enum(field: &Field, value: &JsonValue) -> Result<FieldValue> {
        match value.as_str() {
            Some(s) if field.accepts(s) => Ok(FieldValue::Text(s.to_string())),
            _ => Err(Self::invalid_value_error(field, value)),
        }
    }

    /// Validate boolean field value
    fn validate_boolean(field: &Field, value: &JsonValue) -> Result<FieldValue> {
        match value {
            JsonValue::Bool(b) => Ok(FieldValue::Bool(*b)),
            JsonValue::String(s) if s == "true" => Ok(FieldValue::Bool(true)),
            JsonValue::String(s) if s == "false" => Ok(FieldValue::Bool(false)),
            _ => Err(Self::invalid_value_error(field, value)),
        }
    }

    /// Validate a list of enumerated values
    fn validate_enum_list(field: &Field, value: &JsonValue) -> Result<FieldValue> {
        let items = match value {
            JsonValue::Array(items) => items,
            JsonValue::String(s) if s.is_empty() => return Err(Self::non_empty_error(field)),
            JsonValue::String(s) => {
                return Err(FieldsError::InvalidValue(format!(
                    "Value for {} should be an array. Perhaps try ['{}']?",
                    field.id, s
                )));
            }
            other => {
                return Err(FieldsError::InvalidValue(format!(
                    "Value for {} should be an array. Perhaps try [{}]?",
                    field.id, other
                )));
            }
        };

        if items.is_empty() {
            return Err(FieldsError::InvalidValue(format!(
                "Value for {} should have at least one element in the array",
                field.id
            )));
        }

        let mut accepted = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(s) if field.accepts(s) => accepted.push(s.to_string()),
                _ => {
                    return Err(FieldsError::InvalidValue(format!(
                        "{}. Value for {} was {}",
                        Self::invalid_value_message(field, item),
                        field.id,
                        value
                    )));
                }
            }
        }

        Ok(FieldValue::List(accepted))
    }

    fn non_empty_error(field: &Field) -> FieldsError {
        FieldsError::InvalidValue(format!("A non-empty {} must be provided", field.id))
    }

    fn invalid_value_error(field: &Field, value: &JsonValue) -> FieldsError {
        FieldsError::InvalidValue(Self::invalid_value_message(field, value))
    }

    fn invalid_value_message(field: &Field, value: &JsonValue) -> String {
        format!(
            "Invalid value {}. Valid values are {}",
            value,
            field.valid_values().join(", ")
        )
    }
}
