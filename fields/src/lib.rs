use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

pub mod error;
pub mod field_types;
pub mod validation;

pub use error::{FieldsError, Result};
pub use field_types::{Field, FieldType, FieldValue};
pub use validation::FieldValidator;

/// Table of field definitions keyed by field id
#[derive(Debug, Clone)]
pub struct FieldCollection {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl FieldCollection {
    /// Create a new field collection
    pub fn new(fields: Vec<Field>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.id.clone(), i))
            .collect();

        Self { fields, index }
    }

    /// Get all fields, in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get field by ID
    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// Check whether the collection defines a field
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Validate a single value against the field registered under `id`
    pub fn validate(&self, id: &str, value: &JsonValue) -> Result<Option<FieldValue>> {
        let field = self
            .get_field(id)
            .ok_or_else(|| FieldsError::NotFound(id.to_string()))?;
        FieldValidator::validate_field_value(field, value)
    }

    /// Validate a whole record.
    ///
    /// Fields are checked in declaration order and the first failure wins.
    /// A key absent from the record is validated as null. Keys the collection
    /// does not define are rejected before any field is checked.
    pub fn validate_record(
        &self,
        record: &Map<String, JsonValue>,
    ) -> Result<HashMap<String, FieldValue>> {
        if let Some(unknown) = record.keys().find(|key| !self.contains(key)) {
            return Err(FieldsError::NotFound(unknown.clone()));
        }

        let mut values = HashMap::new();
        for field in &self.fields {
            let raw = record.get(&field.id).unwrap_or(&JsonValue::Null);
            if let Some(value) = FieldValidator::validate_field_value(field, raw)? {
                values.insert(field.id.clone(), value);
            }
        }

        Ok(values)
    }
}
